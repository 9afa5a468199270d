//! `satradio`: wires a loaded configuration into a running
//! [`satr_dsp::engine::Engine`] — building each channel's audio source and
//! modulator, opening the configured radio sink, installing the shutdown
//! signal handler, and running the mux loop to completion.

mod cli;
mod sinks;
mod sources;

use anyhow::{Context, Result};
use clap::Parser;
use satr_core::ShutdownFlag;
use satr_dsp::channel::Channel;
use satr_dsp::config::Config;
use satr_dsp::engine::{Engine, MasterConfig};

fn main() -> Result<()> {
    let args = cli::Args::parse();

    let default_level = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    if let Err(err) = run(&args) {
        log::error!("{err:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run(args: &cli::Args) -> Result<()> {
    let config = Config::load(&args.config).with_context(|| format!("loading configuration from {}", args.config.display()))?;

    log::info!(
        "loaded configuration: {} channel(s), output = {:?} -> {}",
        config.channels.len(),
        config.output.output_type,
        config.output.output
    );

    let sink = sinks::open(&config.output).context("opening radio sink")?;
    let master_rate = config.output.sample_rate.round() as u32;

    let mut channels = Vec::with_capacity(config.channels.len());
    for (index, cfg) in config.channels.iter().enumerate() {
        let (source, reopen) = sources::open(cfg, cfg.mode).with_context(|| format!("channel {}: opening audio source", index + 1))?;
        let channel = Channel::new(index, cfg, master_rate, source, reopen).with_context(|| format!("channel {}: configuring modulator", index + 1))?;
        channels.push(channel);
    }

    let shutdown = ShutdownFlag::new();
    let handler_flag = shutdown.clone();
    let mut interrupts = 0u32;
    ctrlc::set_handler(move || {
        handler_flag.request();
        interrupts += 1;
        if interrupts >= 2 {
            std::process::exit(130);
        }
    })
    .context("installing signal handler")?;

    let mut engine = Engine::new(
        channels,
        sink,
        MasterConfig {
            sample_rate: master_rate,
            deviation: config.output.deviation,
            level: config.output.level,
        },
        shutdown,
    );

    let blocks = engine.run().context("running mux loop")?;
    log::info!("shut down cleanly after {blocks} blocks");

    Ok(())
}
