// Watermarker Library
// Batch text watermarking with mixed-script (Latin/CJK) layout

pub mod batch;
pub mod config;
pub mod logging;
pub mod watermark;
