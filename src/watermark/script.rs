//! Script classification for face selection.
//!
//! Every character is put into exactly one [`ScriptClass`]; the class picks
//! the font face used to measure and draw it. The classifier is a plain
//! function so other splits can be plugged into a [`FaceSet`](super::FaceSet)
//! without touching the wrap algorithm.

use std::ops::RangeInclusive;

/// CJK Unified Ideographs block.
pub const CJK_UNIFIED_IDEOGRAPHS: RangeInclusive<char> = '\u{4e00}'..='\u{9fff}';

/// Coarse script bucket used to select a font face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptClass {
    /// Everything not claimed by another class (Latin, digits, punctuation, ...)
    Default,
    /// Wide/CJK ideographs
    Wide,
}

/// Maps a character to the script class whose face should render it.
pub type ScriptClassifier = fn(char) -> ScriptClass;

/// Default classifier: CJK Unified Ideographs are wide, everything else is default.
pub fn classify_cjk(ch: char) -> ScriptClass {
    if CJK_UNIFIED_IDEOGRAPHS.contains(&ch) {
        ScriptClass::Wide
    } else {
        ScriptClass::Default
    }
}
