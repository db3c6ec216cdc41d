//! voicecheck - see which notes each choir part sings, against its range
//!
//! Modes:
//! - `voicecheck song.mid` - interactive terminal view
//! - `voicecheck song.mid -o song.svg` - write the figure as SVG
//! - `voicecheck song.mid --summary` - text report (also used when piped)

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use voicerange::{aggregate, load, write_svg, Bucketing, Figure, Grouping, LayoutOptions, SvgStyle};
use voiceconf::VoiceConfig;

mod summary;
mod tui;

#[derive(Parser)]
#[command(name = "voicecheck")]
#[command(about = "Per-voice note histograms of a MIDI file with vocal range overlays")]
#[command(version)]
struct Cli {
    /// MIDI file to analyze
    #[arg(required_unless_present = "print_config")]
    midifile: Option<PathBuf>,

    /// Write the figure to this SVG file instead of displaying it
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print a text summary instead of displaying
    #[arg(long, conflicts_with = "output")]
    summary: bool,

    /// Config file (replaces ./voicecheck.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Panels per row
    #[arg(long)]
    columns: Option<usize>,

    /// Fold notes into the 12 pitch classes
    #[arg(long)]
    pitch_class: bool,

    /// How tracks and channels become voices: auto, track, channel
    #[arg(long)]
    group: Option<Grouping>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, sources) = VoiceConfig::load_with_sources_from(cli.config.as_deref())
        .context("Failed to load configuration")?;
    apply_cli_overrides(&mut config, &cli)?;

    if let Some(rejected) = init_tracing(&config, cli.verbose) {
        tracing::warn!(directive = %rejected, "invalid log level, using warn");
    }
    tracing::debug!(
        files = ?sources.files,
        env = ?sources.env_overrides,
        "loaded configuration"
    );

    if cli.print_config {
        print!("{}", config.to_toml());
        return Ok(());
    }

    let Some(path) = cli.midifile.as_deref() else {
        anyhow::bail!("No MIDI file given");
    };

    let midi = load(path, config.display.grouping)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    if midi.notes.is_empty() {
        tracing::warn!(path = %path.display(), "no notes found");
    }

    let catalog = config.catalog();

    if cli.summary || (cli.output.is_none() && !std::io::stdout().is_terminal()) {
        let summaries = summary::summarize(&midi, &catalog);
        print!(
            "{}",
            summary::format_summary(&summaries, std::io::stdout().is_terminal())
        );
        return Ok(());
    }

    let tables = aggregate(&midi.notes, &midi.voices, config.display.bucketing);
    let figure = Figure::build(
        &format!("Note Occurrence Histograms for '{}'", path.display()),
        &midi.voices,
        &tables,
        &catalog,
        &LayoutOptions {
            columns: config.display.columns,
        },
    );

    match cli.output {
        Some(output) => {
            let style = SvgStyle {
                width: config.display.width,
                panel_height: config.display.panel_height,
                ..SvgStyle::default()
            };
            write_svg(&figure, &style, &output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
        }
        None => tui::show(&figure).context("Terminal display failed")?,
    }

    Ok(())
}

fn apply_cli_overrides(config: &mut VoiceConfig, cli: &Cli) -> Result<()> {
    if let Some(columns) = cli.columns {
        anyhow::ensure!(columns > 0, "--columns must be at least 1");
        config.display.columns = columns;
    }
    if cli.pitch_class {
        config.display.bucketing = Bucketing::PitchClass;
    }
    if let Some(group) = cli.group {
        config.display.grouping = group;
    }
    Ok(())
}

/// Logs go to stderr so they never mix with the summary on stdout.
///
/// Returns the configured directive when it could not be parsed.
fn init_tracing(config: &VoiceConfig, verbose: u8) -> Option<String> {
    let level = match verbose {
        0 => config.telemetry.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let (filter, rejected) = match EnvFilter::try_new(level) {
        Ok(filter) => (filter, None),
        Err(_) => (EnvFilter::new("warn"), Some(level.to_string())),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    rejected
}
