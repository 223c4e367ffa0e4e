//! # HPS LED Pattern Player Binary
//!
//! Displays a sequence of LED patterns through the pattern register, each for
//! its own delay, once or in a loop until interrupted.
//!
//! # Usage
//!
//! ```bash
//! # Inline steps (pattern, delay in ms); loops until Ctrl-C by default
//! hps_patterns -p 0x81 250 0x42 250 0x24 250 0x18 250
//!
//! # Steps from a file; plays once by default
//! hps_patterns -f patterns.txt
//!
//! # Override the default, print every step
//! hps_patterns -f patterns.txt --loop -v
//!
//! # Program the base rate first, run against simulated registers
//! hps_patterns --simulate --rate 2.5 -p 0xFF 100 0x00 100
//! ```

use clap::Parser;
use hps::config::{PatternsConfig, Transport};
use hps::num::parse_int_as;
use hps::register::Register;
use hps_patterns::{CancelToken, LoadReport, PatternError, PatternStore, Sequencer};
use hps_regmap::{attrs, init_cli_tracing, open_guarded};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, debug, error, info, warn};

/// HPS LED pattern player - timed pattern playback
#[derive(Parser, Debug)]
#[command(name = "hps_patterns")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Display a timed sequence of LED patterns on the HPS LED component")]
#[command(
    after_help = "Supports up to 32 pattern steps. Pattern files hold one \"<hex-pattern> <delay-ms>\" per line."
)]
struct Args {
    /// Inline pattern steps as BIN TIME pairs (loops by default)
    #[arg(short, long = "pattern", value_name = "BIN TIME", num_args = 2..)]
    patterns: Vec<String>,

    /// Pattern file with one "<hex-pattern> <delay-ms>" per line (plays once by default)
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Display the pattern in a loop until cancelled
    #[arg(short = 'l', long = "loop", conflicts_with = "no_loop")]
    looping: bool,

    /// Display the pattern for one cycle
    #[arg(short = 'n', long = "no-loop")]
    no_loop: bool,

    /// Base rate to program before playback, as a decimal string
    #[arg(long, value_name = "DECIMAL")]
    rate: Option<String>,

    /// Path to configuration file (patterns.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Use an in-process simulated register file
    #[arg(short = 's', long)]
    simulate: bool,

    /// Override the device node from the configuration
    #[arg(long, value_name = "PATH")]
    device: Option<PathBuf>,

    /// Enable verbose logging (prints every step)
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

impl Args {
    /// Explicit loop flag, else the source's default.
    fn looping(&self, default: bool) -> bool {
        if self.looping {
            true
        } else if self.no_loop {
            false
        } else {
            default
        }
    }
}

fn main() {
    if let Err(e) = run() {
        error!("hps_patterns failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let loaded = PatternsConfig::load_or_default(args.config.as_deref());
    let configured = loaded
        .as_ref()
        .map(|c| c.shared.log_level.into())
        .unwrap_or(Level::INFO);
    setup_tracing(&args, configured);

    info!("HPS LED pattern player v{} starting...", env!("CARGO_PKG_VERSION"));

    // No register is touched until a playable store exists.
    let store = load_store(&args)?;
    store.ensure_playable()?;

    let mut config = loaded?;
    if args.simulate {
        info!("Simulation mode enabled");
        config.device.transport = Transport::Simulation;
    }
    if let Some(ref device) = args.device {
        config.device.path = Some(device.clone());
    }
    config.validate()?;
    debug!("Effective device config: {:?}", config.device);

    let guard = Arc::new(open_guarded(&config.device)?);

    if let Some(ref rate) = args.rate {
        attrs::store(&guard, Register::Rate, rate)?;
        info!("Base rate set to {}", attrs::show(&guard, Register::Rate)?);
    }

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        handler_token.cancel();
    })?;

    let mut sequencer = Sequencer::new(Arc::clone(&guard), store, cancel);
    let summary = sequencer.run()?;
    debug!("Playback summary: {:?}", summary);

    info!("{} shutdown complete", config.shared.service_name);
    Ok(())
}

/// Build the pattern store from whichever source was given.
fn load_store(args: &Args) -> Result<PatternStore, Box<dyn std::error::Error>> {
    let (store, report) = match (&args.file, args.patterns.is_empty()) {
        (Some(_), false) => return Err(PatternError::ConflictingSources.into()),
        (Some(path), true) => PatternStore::from_file(path, args.looping(false))?,
        (None, _) => PatternStore::from_literal(parse_pairs(&args.patterns)?, args.looping(true)),
    };
    log_report(&report);
    Ok(store)
}

/// Parse inline `BIN TIME` tokens. Values accept `0x`, `0b` and octal prefixes.
fn parse_pairs(tokens: &[String]) -> Result<Vec<(u8, u32)>, String> {
    if tokens.len() % 2 != 0 {
        return Err(format!(
            "pattern steps come in BIN TIME pairs, got {} values",
            tokens.len()
        ));
    }
    tokens
        .chunks_exact(2)
        .map(|pair| {
            let pattern = parse_int_as::<u8>(&pair[0])
                .ok_or_else(|| format!("invalid 8-bit pattern: {}", pair[0]))?;
            let delay = parse_int_as::<u32>(&pair[1])
                .ok_or_else(|| format!("invalid delay: {}", pair[1]))?;
            Ok((pattern, delay))
        })
        .collect()
}

fn log_report(report: &LoadReport) {
    if report.is_complete() {
        debug!("Loaded {} pattern steps", report.accepted);
    } else {
        warn!(
            "Loaded {} pattern steps ({} dropped, {} malformed lines skipped)",
            report.accepted, report.discarded, report.malformed
        );
    }
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args, configured: Level) {
    let level = if args.verbose { Level::DEBUG } else { configured };
    init_cli_tracing(level, args.json);
}
