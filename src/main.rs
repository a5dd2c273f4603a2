use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

use mower_rc::config::Settings;
use mower_rc::{logging, LogSink, Mower, ReplaySource, UartSource};

#[derive(Debug, Parser)]
#[command(about = "SBUS remote-control interpreter for the mower")]
struct Args {
    /// JSON settings file, created with defaults when missing
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// Replay a captured SBUS byte stream instead of reading the UART
    #[arg(long)]
    replay: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::new(&args.settings);
    let loaded = settings.load();

    logging::init(settings.level_filter())?;
    match loaded {
        Ok(_) => info!("Loaded settings from {}", settings.path().display()),
        Err(e) => {
            warn!("Error loading {}: {}, using defaults", settings.path().display(), e);
            settings.save()?;
        }
    }

    let ticks = match args.replay {
        Some(path) => Mower::new(ReplaySource::open(path)?, LogSink).run()?,
        None => Mower::new(UartSource::open(&settings.serial)?, LogSink).run()?,
    };
    info!("Stopped after {} ticks", ticks);

    Ok(())
}
