use anyhow::Context;
use clap::Parser;
use core_types::{ByteSource, IoSource, ProtocolMode, TransportError};
use runtime::{spawn_reader, tic_error, tic_info, tic_warn, ReaderConfig, ReaderError};
use std::io::Write;
use std::path::PathBuf;

/// Decode TIC electricity meter telemetry into JSON lines.
///
/// The serial line must already be configured (e.g. `stty -F /dev/ttyUSB0
/// 1200 cs7 -parenb`); this tool only reads bytes.
#[derive(Parser, Debug)]
#[command(name = "ticreader", version)]
struct Args {
    /// Device node or capture file to read, `-` for stdin
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Protocol mode: historical or standard (overrides the config file)
    #[arg(short, long)]
    mode: Option<ProtocolMode>,

    /// TOML reader configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frame channel depth (overrides the config file)
    #[arg(long)]
    capacity: Option<usize>,

    /// Pretty-print each frame
    #[arg(long)]
    pretty: bool,
}

fn open_source(input: &str) -> anyhow::Result<Box<dyn ByteSource + Send>> {
    if input == "-" {
        return Ok(Box::new(IoSource::new(std::io::stdin())));
    }
    let file = std::fs::File::open(input).with_context(|| format!("Failed to open {}", input))?;
    Ok(Box::new(IoSource::new(file)))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ReaderConfig::load(path)?,
        None => ReaderConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(capacity) = args.capacity {
        config.channel_capacity = capacity;
    }

    let line = config.mode.serial_config();
    tic_info!(
        "Reading {} in {} mode (line: {} baud {})",
        args.input,
        config.mode,
        line.baud_rate,
        line.framing()
    );

    let source = open_source(&args.input)?;
    let mut handle = spawn_reader(source, config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut frames = 0u64;
    for item in futures::executor::block_on_stream(handle.frames()) {
        let frame = match item {
            Ok(frame) => frame,
            // Reported by join below
            Err(_) => break,
        };
        if frame.invalid_groups() > 0 {
            tic_warn!("{} groups failed checksum", frame.invalid_groups());
        }
        frames += 1;
        let json = if args.pretty {
            serde_json::to_string_pretty(&frame)?
        } else {
            serde_json::to_string(&frame)?
        };
        writeln!(out, "{}", json)?;
    }

    match handle.join() {
        Ok(_) | Err(ReaderError::Transport(TransportError::EndOfStream)) => {
            tic_info!("Decoded {} frames", frames);
            Ok(())
        }
        Err(e) => {
            tic_error!("{}", e);
            Err(e.into())
        }
    }
}
