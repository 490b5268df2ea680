use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use blinkt::config::{Config, LinesConfig};
use blinkt::{samples, Blinkt, LineDriver, RecordingLines, SysfsLines};

mod logging;

#[derive(Parser)]
#[command(name = "blinkt")]
#[command(about = "Blinkt! - APA102 LED strip control\n\nDrives an APA102 strip over two GPIO lines.", long_about = None)]
struct Cli {
    /// Path to configuration file (JSON); Blinkt! board defaults when omitted
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Record line writes in memory instead of driving GPIO
    #[arg(long)]
    dry_run: bool,

    /// Enable debug output
    #[arg(long)]
    debug: bool,

    /// Enable detailed debug (hex dumps every frame)
    #[arg(long)]
    ddebug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Light one LED and hold until Ctrl-C
    Set {
        index: usize,
        r: u8,
        g: u8,
        b: u8,
        #[arg(long)]
        brightness: Option<f32>,
    },
    /// Light every LED and hold until Ctrl-C
    Fill {
        r: u8,
        g: u8,
        b: u8,
        #[arg(long)]
        brightness: Option<f32>,
    },
    /// Turn all LEDs off
    Clear,
    /// Run a demo animation
    Demo {
        #[arg(value_enum)]
        demo: Demo,
        /// Time between frames
        #[arg(long)]
        step_ms: Option<u64>,
    },
    /// Load and check the configuration, then exit
    VerifyConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum Demo {
    Rgb,
    Rainbow,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::setup(cli.debug, cli.ddebug)?;

    let mut config = match &cli.config {
        Some(path) => Config::load(path).context("Failed to load configuration")?,
        None => Config::default(),
    };
    if cli.dry_run {
        config.lines = LinesConfig::DryRun;
    }

    if let Command::VerifyConfig = cli.command {
        tracing::info!(?config, "Configuration verified");
        return Ok(());
    }

    // Set up Ctrl-C handler with graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    let result = ctrlc::set_handler(move || {
        tracing::debug!("Shutting down...");
        handler_flag.store(false, Ordering::Relaxed);
    });
    if let Err(e) = result {
        tracing::warn!("Could not set Ctrl-C handler: {}", e);
    }

    let lines = open_lines(&config.lines)?;
    let mut blinkt = Blinkt::new(lines, config.strip.led_count)
        .context("Failed to initialize LED strip")?;

    // On error the controller is dropped, which still turns the LEDs off
    run(&mut blinkt, cli.command, &config, &running)?;

    blinkt.dispose().context("Failed to turn off LEDs")?;
    Ok(())
}

fn open_lines(config: &LinesConfig) -> Result<Box<dyn LineDriver>> {
    match config {
        LinesConfig::Sysfs { data_pin, clock_pin, gpio_root } => {
            let lines = SysfsLines::open(gpio_root.clone(), *data_pin, *clock_pin)
                .context(format!("Failed to open GPIO {} and {}", data_pin, clock_pin))?;
            Ok(Box::new(lines))
        }
        LinesConfig::DryRun => {
            tracing::info!("Dry run, no GPIO is driven");
            Ok(Box::new(RecordingLines::new()))
        }
    }
}

fn run<L: LineDriver>(blinkt: &mut Blinkt<L>, command: Command, config: &Config, running: &AtomicBool) -> Result<()> {
    let default_brightness = config.strip.brightness;

    match command {
        Command::Set { index, r, g, b, brightness } => {
            blinkt.set_pixel(index, r, g, b, brightness.unwrap_or(default_brightness))?;
            blinkt.show()?;
            hold(running);
        }
        Command::Fill { r, g, b, brightness } => {
            blinkt.set_all(r, g, b, brightness.unwrap_or(default_brightness));
            blinkt.show()?;
            hold(running);
        }
        Command::Clear => {
            blinkt.clear();
            blinkt.show()?;
        }
        Command::Demo { demo, step_ms } => match demo {
            Demo::Rgb => {
                let step = Duration::from_millis(step_ms.unwrap_or(1000));
                samples::simple_rgb(blinkt, step, running)?;
            }
            Demo::Rainbow => {
                let step = Duration::from_millis(step_ms.unwrap_or(500));
                samples::moving_rainbow(blinkt, step, running)?;
            }
        },
        Command::VerifyConfig => {}
    }

    Ok(())
}

/// Block until Ctrl-C
fn hold(running: &AtomicBool) {
    tracing::info!("LEDs on, press Ctrl-C to turn them off");
    while running.load(Ordering::Relaxed) {
        thread::sleep(Duration::from_millis(100));
    }
}
