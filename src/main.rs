use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use watermarker::batch::{preview, run_batch, BatchJob};
use watermarker::config::{NumericField, Settings, SettingsStore, DEFAULT_SETTINGS_FILE};
use watermarker::watermark::{AnchorMode, Color, WatermarkProcessor};

/// Watermarker - batch text watermarking for image folders
#[derive(Parser, Debug)]
#[command(name = "watermarker")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the settings file (.json, .yaml or .yml)
    #[arg(short, long, default_value = DEFAULT_SETTINGS_FILE, global = true)]
    settings: PathBuf,

    /// Log level or filter directive (RUST_LOG takes precedence)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Watermark every supported image in a folder
    Run {
        /// Folder containing the source images
        folder: PathBuf,

        #[command(flatten)]
        style: StyleArgs,

        /// Output folder (default: <folder>/<output_dir_name>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Process images in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Watermark the first image of a folder into a single preview file
    Preview {
        /// Folder containing the source images
        folder: PathBuf,

        #[command(flatten)]
        style: StyleArgs,

        /// Preview file to write
        #[arg(short, long, default_value = "preview.png")]
        output: PathBuf,
    },

    /// Inspect or update the settings file
    #[command(subcommand)]
    Settings(SettingsCommands),
}

#[derive(Subcommand, Debug)]
enum SettingsCommands {
    /// Print the effective settings
    Show,
    /// Apply overrides and write the settings file
    Save {
        #[command(flatten)]
        style: StyleArgs,
    },
}

/// Overrides applied on top of the settings file.
#[derive(Args, Debug, Default)]
struct StyleArgs {
    /// Watermark text
    #[arg(long)]
    text: Option<String>,

    /// Font size in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    font_size: Option<u32>,

    /// Opacity in percent (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    opacity: Option<u8>,

    /// Text color as #RGB or #RRGGBB
    #[arg(long)]
    color: Option<Color>,

    /// top-left, top-right, bottom-left, bottom-right or center
    #[arg(long)]
    anchor: Option<AnchorMode>,

    /// Font file for Latin and other non-CJK characters
    #[arg(long)]
    default_font: Option<PathBuf>,

    /// Font file for CJK characters
    #[arg(long)]
    wide_font: Option<PathBuf>,
}

impl StyleArgs {
    fn apply(self, settings: &mut Settings) {
        if let Some(text) = self.text {
            settings.watermark_text = text;
        }
        if let Some(font_size) = self.font_size {
            settings.font_size = NumericField::Int(i64::from(font_size));
        }
        if let Some(opacity) = self.opacity {
            settings.opacity = NumericField::Int(i64::from(opacity));
        }
        if let Some(color) = self.color {
            settings.color = color;
        }
        if let Some(anchor) = self.anchor {
            settings.position = anchor;
        }
        if let Some(path) = self.default_font {
            settings.fonts.default = path;
        }
        if let Some(path) = self.wide_font {
            settings.fonts.wide = path;
        }
    }
}

fn load_settings(store: &SettingsStore, style: StyleArgs) -> anyhow::Result<Settings> {
    let mut settings = store
        .load()
        .with_context(|| format!("Failed to load settings from {}", store.path().display()))?;
    style.apply(&mut settings);
    Ok(settings)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging subsystem
    watermarker::logging::init_subscriber(&cli.log_level, cli.log_json)?;

    let store = SettingsStore::new(&cli.settings);

    match cli.command {
        Commands::Run {
            folder,
            style,
            output,
            parallel,
        } => {
            let settings = load_settings(&store, style)?;
            let processor = WatermarkProcessor::from_settings(&settings)?;

            let mut job = BatchJob::from_settings(&folder, &settings).parallel(parallel);
            if let Some(output) = output {
                job.output_dir = output;
            }

            let report = run_batch(&processor, &job, &AtomicBool::new(false))?;
            println!(
                "Watermarked {}/{} images into {}",
                report.processed.len(),
                report.total,
                job.output_dir.display()
            );

            if !report.failures.is_empty() {
                for failure in &report.failures {
                    eprintln!("  {}: {}", failure.source.display(), failure.error);
                }
                anyhow::bail!("{} image(s) could not be watermarked", report.failures.len());
            }
        }

        Commands::Preview {
            folder,
            style,
            output,
        } => {
            let settings = load_settings(&store, style)?;
            let processor = WatermarkProcessor::from_settings(&settings)?;
            let source = preview(&processor, &folder, &output)?;
            println!(
                "Preview of {} written to {}",
                source.display(),
                output.display()
            );
        }

        Commands::Settings(SettingsCommands::Show) => {
            let settings = load_settings(&store, StyleArgs::default())?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }

        Commands::Settings(SettingsCommands::Save { style }) => {
            let settings = load_settings(&store, style)?;
            settings.to_style()?;
            store.save(&settings)?;
            println!("Settings saved to {}", store.path().display());
        }
    }

    Ok(())
}
