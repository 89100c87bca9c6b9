use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dmxwave", about = "Map an audio file to DMX lighting channel values")]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG)
    pub input: Option<PathBuf>,

    /// Write the frame data as JSON to this file
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Print channel values at these timestamps (seconds, comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub query: Vec<f32>,

    /// DMX channel for brightness (1-based)
    #[arg(long, default_value_t = 1)]
    pub brightness_channel: u16,

    /// DMX channel for red (1-based)
    #[arg(long, default_value_t = 2)]
    pub red_channel: u16,

    /// DMX channel for green (1-based)
    #[arg(long, default_value_t = 3)]
    pub green_channel: u16,

    /// DMX channel for blue (1-based)
    #[arg(long, default_value_t = 4)]
    pub blue_channel: u16,

    /// Upper edge of the red frequency band, Hz (derived if unset)
    #[arg(long)]
    pub red_max: Option<i64>,

    /// Lower edge of the green frequency band, Hz (derived if unset)
    #[arg(long)]
    pub green_min: Option<i64>,

    /// Upper edge of the green frequency band, Hz (derived if unset)
    #[arg(long)]
    pub green_max: Option<i64>,

    /// Lower edge of the blue frequency band, Hz (derived if unset)
    #[arg(long)]
    pub blue_min: Option<i64>,

    /// Config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}
