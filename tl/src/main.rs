//! tl - traffic light console driver
//!
//! Starts a light, then either prints its phase changes or waits for one.

use std::fs;
use std::time::{Duration, Instant};

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::info;

use trafficlight::cli::{Cli, Command, OutputFormat, get_log_path};
use trafficlight::config::Config;
use trafficlight::light::{Phase, TrafficLight};

fn setup_logging(verbose: bool) -> Result<()> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Setup tracing subscriber - write to log file, not stdout/stderr
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_thread_names(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate()?;

    info!(
        "tl loaded config: cycle={}..{}ms, poll={}ms",
        config.cycle.min_interval_ms, config.cycle.max_interval_ms, config.observer.poll_interval_ms
    );

    match cli.command {
        Some(Command::Run { toggles }) => cmd_run(&config, toggles),
        Some(Command::Wait { phase, timeout_ms }) => cmd_wait(&config, phase, timeout_ms),
        Some(Command::Config { format }) => cmd_config(&config, format),
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

fn paint(phase: Phase) -> colored::ColoredString {
    match phase {
        Phase::Stopped => phase.to_string().red().bold(),
        Phase::Clear => phase.to_string().green().bold(),
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S%.3f").to_string()
}

/// Poll the light and print each phase change
fn cmd_run(config: &Config, toggles: Option<u64>) -> Result<()> {
    let light = TrafficLight::from_config(&config.cycle)?;
    let handle = light.start().context("Failed to start traffic light")?;

    let mut shown = handle.light().current_phase();
    println!("{} light is {}", timestamp(), paint(shown));

    while toggles.is_none_or(|limit| handle.toggles() < limit) {
        std::thread::sleep(config.observer.poll_interval());
        let phase = handle.light().current_phase();
        if phase != shown {
            println!("{} light is {}", timestamp(), paint(phase));
            shown = phase;
        }
    }

    let total = handle.join();
    let stats = light.queue_stats();
    info!(total, ?stats, "Run finished");
    println!("{} toggles", total);
    Ok(())
}

/// Block until the light publishes `phase`
fn cmd_wait(config: &Config, phase: Phase, timeout_ms: Option<u64>) -> Result<()> {
    let light = TrafficLight::from_config(&config.cycle)?;
    let handle = light.start().context("Failed to start traffic light")?;

    let timeout = timeout_ms.map(Duration::from_millis).or(config.observer.wait_timeout());
    println!("{} waiting for {}", timestamp(), paint(phase));

    let started = Instant::now();
    let waited = match timeout {
        Some(timeout) => light.wait_for_phase_timeout(phase, timeout),
        None => {
            light.wait_for_phase(phase);
            Ok(())
        }
    };
    let elapsed = started.elapsed();
    handle.join();

    if let Err(err) = waited {
        let reason = if err.is_timeout() {
            format!("Gave up waiting for {}", phase)
        } else {
            format!("Light stopped before {}", phase)
        };
        return Err(eyre::Report::new(err).wrap_err(reason));
    }
    println!("{} light is {} after {:.3}s", timestamp(), paint(phase), elapsed.as_secs_f64());
    Ok(())
}

/// Print the effective configuration
fn cmd_config(config: &Config, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(config)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
    }
    Ok(())
}
