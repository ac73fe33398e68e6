//! envirod: polls the environmental sensors on a small single-board computer
//! and paints a two-line readout onto the attached LCD.
//!
//! The ambient temperature is corrected for CPU self-heating, and a proximity
//! tap over the sensor toggles the screen with a short debounce. Readings are
//! logged every cycle; Ctrl+C exits cleanly.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod compensate;
mod config;
mod cputemp;
mod display;
mod poll;
mod render;
mod screen;
mod sensors;

use config::{Config, CpuSource, DisplayBackend, SensorBackend};
use cputemp::{CpuTempSource, FixedSource, ThermalZoneSource, VcgencmdSource};
use display::{ConsoleDisplay, DisplayDevice, FramebufferDisplay};
use poll::Poller;
use sensors::iio::IioSensor;
use sensors::sim::{SimulatedEnvironment, SimulatedProximity};
use sensors::{EnvironmentSensor, ProximitySensor};

#[derive(Parser)]
#[command(name = "envirod")]
#[command(about = "Environmental sensor daemon with LCD readout")]
struct Cli {
    /// Path to an alternate config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run against simulated sensors and a console display
    #[arg(long)]
    simulate: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the config file in your editor
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config) => run_config_command()?,
        None => run_daemon(&cli).await?,
    }

    Ok(())
}

/// Open the config file in the user's editor, creating it from defaults first.
fn run_config_command() -> Result<()> {
    let config_path = Config::path().context("could not determine config directory")?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !config_path.exists() {
        let defaults = toml::to_string_pretty(&Config::default())?;
        std::fs::write(&config_path, defaults)?;
        println!("Created config file: {}", config_path.display());
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| "nano".to_string());

    println!("Opening {} with {}", config_path.display(), editor);
    std::process::Command::new(&editor)
        .arg(&config_path)
        .status()?;

    Ok(())
}

async fn run_daemon(cli: &Cli) -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load(cli.config.as_deref())?;
    tracing::info!("starting envirod; press Ctrl+C to exit");

    let (env, prox): (Box<dyn EnvironmentSensor>, Box<dyn ProximitySensor>) =
        if cli.simulate || config.sensors.backend == SensorBackend::Simulated {
            (
                Box::new(SimulatedEnvironment::new()),
                Box::new(SimulatedProximity),
            )
        } else {
            (
                Box::new(IioSensor::new(&config.sensors.environment_dir)),
                Box::new(IioSensor::new(&config.sensors.proximity_dir)),
            )
        };

    let cpu: Box<dyn CpuTempSource> = if cli.simulate {
        Box::new(FixedSource(45.0))
    } else {
        match config.cpu.source {
            CpuSource::Vcgencmd => Box::new(VcgencmdSource::new()),
            CpuSource::ThermalZone => {
                Box::new(ThermalZoneSource::new(&config.cpu.thermal_zone_path))
            }
        }
    };

    let display: Box<dyn DisplayDevice> =
        if cli.simulate || config.display.backend == DisplayBackend::Console {
            Box::new(ConsoleDisplay::new())
        } else {
            Box::new(FramebufferDisplay::new(
                &config.display.framebuffer,
                config.display.backlight.clone(),
            ))
        };

    let mut poller = Poller::new(env, prox, cpu, display, &config)?;

    let mut ticker = tokio::time::interval(config.poll_interval());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => poller.tick(Instant::now())?,
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    poller.shutdown()?;
    tracing::info!("envirod exiting");
    Ok(())
}
