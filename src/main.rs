use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use sat_capture::capture::{cf32, CaptureError, IqWriter};
use sat_capture::catalog::TleCatalog;
use sat_capture::config::{init_config, ConfigError, ConfigManager, DEFAULT_CONFIG_PATH};

const RECORD_BLOCK_SAMPLES: usize = 16_384;

#[derive(Parser)]
#[command(name = "sat-capture")]
#[command(about = "Ground station configuration and raw downlink capture")]
struct Cli {
    /// Configuration file, created with defaults if missing
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the configuration, seeding defaults on first run
    Init,
    /// Print the loaded configuration
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Look up a satellite by NORAD id
    Satellite {
        norad: u32,
        /// Directory of TLE files used to resolve the satellite name
        #[arg(long)]
        tle_dir: Option<PathBuf>,
    },
    /// Write interleaved f32 I/Q from a file as an int16 capture for a downlink
    Record {
        norad: u32,
        downlink: String,
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let manager = match init_config(&cli.config) {
        Ok(m) => m,
        Err(e) => return config_failure(e),
    };

    match cli.command {
        Commands::Init => init(&manager),
        Commands::Show { json } => show(&manager, json),
        Commands::Satellite { norad, tle_dir } => satellite(&manager, norad, tle_dir),
        Commands::Record {
            norad,
            downlink,
            input,
        } => record(&manager, norad, &downlink, input),
    }
}

fn config_failure(err: ConfigError) -> ExitCode {
    if err.is_fatal() {
        log::error!("Fatal error reading config! Aborting!");
    }
    log::error!("{}", err);
    ExitCode::FAILURE
}

fn init(manager: &ConfigManager) -> ExitCode {
    let config = manager.config();
    println!(
        "{} ({:.4}, {:.4}, {} m)",
        config.station_name,
        config.station.latitude,
        config.station.longitude,
        config.station.altitude
    );
    println!("  config: {}", manager.path().display());
    println!("  data directory: {}", config.data_directory.display());
    println!("  satellites: {}", config.satellites.len());
    ExitCode::SUCCESS
}

fn show(manager: &ConfigManager, json: bool) -> ExitCode {
    let rendered = if json {
        serde_json::to_string_pretty(manager.config()).map_err(|e| e.to_string())
    } else {
        serde_yaml::to_string(manager.config()).map_err(|e| e.to_string())
    };

    match rendered {
        Ok(text) => {
            println!("{}", text.trim_end());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Serialization error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn satellite(manager: &ConfigManager, norad: u32, tle_dir: Option<PathBuf>) -> ExitCode {
    let Some(sat) = manager.config().satellite(norad) else {
        eprintln!("Satellite {} is not configured", norad);
        return ExitCode::FAILURE;
    };

    let name = tle_dir.and_then(|dir| {
        let mut catalog = TleCatalog::new(dir);
        match catalog.load_all() {
            Ok(()) => sat.name(&catalog),
            Err(e) => {
                log::warn!("Failed to load TLE catalog: {}", e);
                None
            }
        }
    });

    println!(
        "{} [{}] min elevation {}°, priority {}",
        name.as_deref().unwrap_or("unknown"),
        sat.norad,
        sat.min_elevation,
        sat.priority
    );
    for d in &sat.downlinks {
        println!(
            "  {:<8} {:>12} Hz  bw {:>9} Hz  {:<5} {:>8} S/s  {}",
            d.name,
            d.frequency,
            d.bandwidth,
            d.modem,
            d.sample_rate,
            if d.enabled { "enabled" } else { "disabled" }
        );
    }
    ExitCode::SUCCESS
}

fn record(manager: &ConfigManager, norad: u32, downlink: &str, input: PathBuf) -> ExitCode {
    let config = manager.config();
    let Some(link) = config.satellite(norad).and_then(|s| s.downlink(downlink)) else {
        eprintln!("No downlink {} configured for satellite {}", downlink, norad);
        return ExitCode::FAILURE;
    };

    let file = match File::open(&input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = IqWriter::for_downlink(&config.data_directory, norad, link, chrono::Utc::now())
        .and_then(|writer| write_capture(BufReader::new(file), writer));

    match result {
        Ok(writer) => {
            log::info!(
                "Wrote {} samples to {}",
                writer.samples_written(),
                writer.path().display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Capture failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn write_capture(mut reader: impl Read, mut writer: IqWriter) -> Result<IqWriter, CaptureError> {
    log::info!("Recording to {}", writer.path().display());

    loop {
        let block = cf32::read_block(&mut reader, RECORD_BLOCK_SAMPLES)?;
        if block.is_empty() {
            break;
        }
        writer.process(&block)?;
    }

    writer.stop()?;
    Ok(writer)
}
