//! # HPS LED Register Tool
//!
//! Inspect and poke the LED pattern component's registers through the same
//! validated window the pattern player uses.
//!
//! # Usage
//!
//! ```bash
//! # Show control, pattern and rate
//! hps_regs show
//!
//! # Set the base rate from a decimal string
//! hps_regs set rate 1.5
//!
//! # Raw byte/halfword/word access, devmem style
//! hps_regs read 0x4 w
//! hps_regs write 0x4 0xAA
//!
//! # Through the platform driver's device node
//! hps_regs --config /etc/hps_led/patterns.toml show
//! ```

use clap::{Parser, Subcommand};
use hps::config::{PatternsConfig, Transport};
use hps::num::parse_int_as;
use hps::register::{AccessWidth, Register};
use hps_regmap::{AccessGuard, attrs, init_cli_tracing, open_guarded};
use std::path::PathBuf;
use tracing::{Level, debug, error, info};

/// HPS LED register tool - validated register access
#[derive(Parser, Debug)]
#[command(name = "hps_regs")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Read and write the HPS LED pattern component registers")]
struct Args {
    /// Path to configuration file (patterns.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Use an in-process simulated register file
    #[arg(short = 's', long)]
    simulate: bool,

    /// Override the device node from the configuration
    #[arg(long, value_name = "PATH")]
    device: Option<PathBuf>,

    /// Override the physical base address
    #[arg(long, value_name = "ADDR", value_parser = parse_address)]
    base: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show all three register attributes
    Show,
    /// Show one register attribute
    Get {
        /// control, pattern or rate
        register: Register,
    },
    /// Store one register attribute
    Set {
        /// control, pattern or rate
        register: Register,
        /// Attribute text (bool word, 8-bit integer, or decimal rate)
        value: String,
    },
    /// Raw load at a byte offset
    Read {
        /// Byte offset inside the window
        #[arg(value_parser = parse_offset)]
        offset: usize,
        /// Access width: b, h or w
        #[arg(default_value = "w")]
        width: AccessWidth,
    },
    /// Raw store at a byte offset, followed by a readback
    Write {
        /// Byte offset inside the window
        #[arg(value_parser = parse_offset)]
        offset: usize,
        /// Value to store
        #[arg(value_parser = parse_value)]
        value: u32,
        /// Access width: b, h or w
        #[arg(default_value = "w")]
        width: AccessWidth,
    },
}

fn parse_address(text: &str) -> Result<u64, String> {
    parse_int_as(text).ok_or_else(|| format!("invalid address: {text}"))
}

fn parse_offset(text: &str) -> Result<usize, String> {
    parse_int_as(text).ok_or_else(|| format!("invalid offset: {text}"))
}

fn parse_value(text: &str) -> Result<u32, String> {
    parse_int_as(text).ok_or_else(|| format!("invalid 32-bit value: {text}"))
}

fn main() {
    if let Err(e) = run() {
        error!("hps_regs failed: {}", e);
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

    let mut config = loaded?;
    if args.simulate {
        config.device.transport = Transport::Simulation;
    }
    if let Some(ref device) = args.device {
        config.device.path = Some(device.clone());
    }
    if let Some(base) = args.base {
        config.device.base_address = base;
    }
    config.validate()?;
    debug!("Effective device config: {:?}", config.device);

    let guard = open_guarded(&config.device)?;
    execute(&guard, &args.command)?;

    info!("{} done", config.shared.service_name);
    Ok(())
}

fn execute(guard: &AccessGuard, command: &Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Show => {
            for register in Register::ALL {
                println!("{}: {}", register, attrs::show(guard, register)?);
            }
        }
        Command::Get { register } => {
            println!("{}", attrs::show(guard, *register)?);
        }
        Command::Set { register, value } => {
            attrs::store(guard, *register, value)?;
            println!("{}", attrs::show(guard, *register)?);
        }
        Command::Read { offset, width } => {
            let value = guard.read(*offset, *width)?;
            println!("Value at offset {:#X} ({}): {:#X}", offset, width, value);
        }
        Command::Write {
            offset,
            value,
            width,
        } => {
            guard.write(*offset, *width, *value)?;
            let readback = guard.read(*offset, *width)?;
            println!("Written {:#X}; readback {:#X}", value, readback);
        }
    }
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args, configured: Level) {
    let level = if args.verbose { Level::DEBUG } else { configured };
    init_cli_tracing(level, args.json);
}
