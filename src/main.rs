mod audio;
mod cli;
mod config;
mod error;
mod light;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::BufWriter;

use cli::Cli;
use light::map::ChannelConfig;

#[derive(Serialize)]
struct ExportFrame<'a> {
    time: f32,
    channels: &'a [u8],
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect dmxwave.toml / global config
    let config_path = cli.config.clone().or_else(|| {
        let local = std::path::PathBuf::from("dmxwave.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("dmxwave").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("dmxwave").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            // Merge: config values apply only when CLI is at its default
            if cli.brightness_channel == 1 { cli.brightness_channel = cfg.channels.brightness; }
            if cli.red_channel == 2 { cli.red_channel = cfg.channels.red; }
            if cli.green_channel == 3 { cli.green_channel = cfg.channels.green; }
            if cli.blue_channel == 4 { cli.blue_channel = cfg.channels.blue; }
            if cli.red_max.is_none() { cli.red_max = cfg.bands.red_max; }
            if cli.green_min.is_none() { cli.green_min = cfg.bands.green_min; }
            if cli.green_max.is_none() { cli.green_max = cfg.bands.green_max; }
            if cli.blue_min.is_none() { cli.blue_min = cfg.bands.blue_min; }
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    let input = cli.input.as_ref().context("Input audio file is required")?;
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    log::info!("dmxwave - audio to DMX channel mapper");
    log::info!("Input: {}", input.display());

    // 1. Decode audio
    log::info!("Decoding audio...");
    let audio_data = audio::decode::decode_audio(input)?;

    // 2. Spectrogram
    log::info!("Computing spectrogram...");
    let spec = audio::spectrogram::extract(&audio_data.samples, audio_data.sample_rate)?;

    // 3. Reduce each frame to (avg frequency, avg amplitude)
    let reductions = light::reduce::reduce(&spec.frequencies, &spec.magnitudes);

    // 4. Scale into per-frame channel values
    let channel_config = ChannelConfig {
        brightness: cli.brightness_channel,
        red: cli.red_channel,
        green: cli.green_channel,
        blue: cli.blue_channel,
        red_max: cli.red_max,
        green_min: cli.green_min,
        green_max: cli.green_max,
        blue_min: cli.blue_min,
    };
    let frame_data = light::map::build(&reductions, &spec.times, &channel_config)?;

    let span_start = spec.times[0];
    let span_end = *spec.times.last().unwrap();
    log::info!(
        "Frame data: {} frames covering {:.2}s - {:.2}s",
        frame_data.num_frames(),
        span_start,
        span_end
    );

    // 5. Point queries
    for &t in &cli.query {
        match frame_data.color_at(t) {
            Ok(row) => println!(
                "{:8.3}s  brightness={:3}  red={:3}  green={:3}  blue={:3}",
                t,
                row[channel_config.brightness as usize - 1],
                row[channel_config.red as usize - 1],
                row[channel_config.green as usize - 1],
                row[channel_config.blue as usize - 1],
            ),
            Err(e) => log::warn!("{}", e),
        }
    }

    // 6. Bulk export for a downstream DMX transmitter
    if let Some(ref path) = cli.export {
        log::info!("Exporting frame data to {}", path.display());
        let frames: Vec<ExportFrame> = (0..frame_data.num_frames())
            .map(|i| ExportFrame {
                time: frame_data.times()[i],
                channels: frame_data.row(i),
            })
            .collect();

        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer(BufWriter::new(file), &frames)
            .context("Failed to write frame data")?;
    }

    log::info!("Done");
    Ok(())
}
