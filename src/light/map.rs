use serde::{Deserialize, Serialize};

use super::reduce::FrameReduction;
use crate::error::{PipelineError, Result};

/// Channels in one DMX universe.
pub const UNIVERSE_SIZE: usize = 512;

/// Fixture channel assignment plus optional frequency-band boundaries.
///
/// Channel indices are 1-based DMX addresses. Boundaries left unset are
/// derived from the track's own frequency range at build time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub brightness: u16,
    pub red: u16,
    pub green: u16,
    pub blue: u16,
    /// Upper edge of the red band, Hz.
    pub red_max: Option<i64>,
    /// Lower edge of the green band, Hz.
    pub green_min: Option<i64>,
    /// Upper edge of the green band, Hz.
    pub green_max: Option<i64>,
    /// Lower edge of the blue band, Hz.
    pub blue_min: Option<i64>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            brightness: 1,
            red: 2,
            green: 3,
            blue: 4,
            red_max: None,
            green_min: None,
            green_max: None,
            blue_min: None,
        }
    }
}

impl ChannelConfig {
    fn validate(&self) -> Result<()> {
        let channels = [self.brightness, self.red, self.green, self.blue];
        for ch in channels {
            if ch < 1 || ch as usize > UNIVERSE_SIZE {
                return Err(PipelineError::InvalidChannel(format!(
                    "channel {} outside universe [1, {}]",
                    ch, UNIVERSE_SIZE
                )));
            }
        }
        for i in 0..channels.len() {
            for j in i + 1..channels.len() {
                if channels[i] == channels[j] {
                    return Err(PipelineError::InvalidChannel(format!(
                        "channel {} assigned twice",
                        channels[i]
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Resolved frequency-band boundaries, Hz (integer-truncated).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bands {
    pub red_max: i64,
    pub green_min: i64,
    pub green_max: i64,
    pub blue_min: i64,
}

fn resolve_bands(config: &ChannelConfig, avg_freq_max: i64) -> Bands {
    let red_max = config.red_max.unwrap_or(avg_freq_max / 2);
    let green_min = config.green_min.unwrap_or(red_max / 2);
    let blue_min = config.blue_min.unwrap_or(red_max);
    let green_max = config
        .green_max
        .unwrap_or(red_max + (avg_freq_max - blue_min) / 2);
    Bands {
        red_max,
        green_min,
        green_max,
        blue_min,
    }
}

/// Per-frame DMX channel values for one universe, immutable once built.
///
/// A contiguous T x 512 byte grid with a parallel sorted time vector;
/// safe to query from any number of threads.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameData {
    times: Vec<f32>,
    values: Vec<u8>,
}

fn rescale(x: f32, lo: f32, hi: f32) -> f32 {
    (x - lo) * 255.0 / (hi - lo)
}

/// Scale the reductions into channel values, one universe row per frame.
///
/// Brightness always gets the rescaled amplitude. Each color gets its
/// rescaled frequency only when the result lies strictly inside (0, 255);
/// a frequency outside a color's band leaves that channel at 0, which is
/// what crossfades the three bands instead of clipping them.
pub fn build(
    reductions: &[FrameReduction],
    times: &[f32],
    config: &ChannelConfig,
) -> Result<FrameData> {
    config.validate()?;

    if reductions.is_empty() || reductions.len() != times.len() {
        return Err(PipelineError::Input(format!(
            "frame mismatch: {} reductions for {} frame times",
            reductions.len(),
            times.len()
        )));
    }

    // Extrema are truncated to integers; boundary math below uses the
    // same truncation so comparisons stay consistent.
    let freqs: Vec<i64> = reductions.iter().map(|r| r.avg_frequency as i64).collect();
    let amps: Vec<i64> = reductions.iter().map(|r| r.avg_amplitude as i64).collect();
    let freq_min = *freqs.iter().min().unwrap();
    let freq_max = *freqs.iter().max().unwrap();
    let amp_min = *amps.iter().min().unwrap();
    let amp_max = *amps.iter().max().unwrap();

    if amp_min == amp_max {
        return Err(PipelineError::DegenerateRange {
            quantity: "amplitude",
            value: amp_min,
        });
    }
    if freq_min == freq_max {
        return Err(PipelineError::DegenerateRange {
            quantity: "frequency",
            value: freq_min,
        });
    }

    let bands = resolve_bands(config, freq_max);
    log::info!(
        "Bands: red <= {} Hz, green {}..{} Hz, blue >= {} Hz (track range {}..{} Hz)",
        bands.red_max,
        bands.green_min,
        bands.green_max,
        bands.blue_min,
        freq_min,
        freq_max
    );

    let mut values = vec![0u8; reductions.len() * UNIVERSE_SIZE];

    for (i, reduction) in reductions.iter().enumerate() {
        let row = &mut values[i * UNIVERSE_SIZE..(i + 1) * UNIVERSE_SIZE];

        // Truncating the amplitude the same way as the extrema keeps the
        // rescale inside [0, 255] without clamping.
        let brightness = rescale(amps[i] as f32, amp_min as f32, amp_max as f32);
        row[config.brightness as usize - 1] = brightness as u8;

        let freq = reduction.avg_frequency;
        let red = rescale(freq, freq_min as f32, bands.red_max as f32);
        let green = rescale(freq, bands.green_min as f32, bands.green_max as f32);
        let blue = rescale(freq, bands.blue_min as f32, freq_max as f32);

        // Gate, don't clip: out-of-band candidates (and the non-finite
        // result of a zero-width band) leave the channel at 0.
        if red > 0.0 && red < 255.0 {
            row[config.red as usize - 1] = red as u8;
        }
        if green > 0.0 && green < 255.0 {
            row[config.green as usize - 1] = green as u8;
        }
        if blue > 0.0 && blue < 255.0 {
            row[config.blue as usize - 1] = blue as u8;
        }
    }

    Ok(FrameData {
        times: times.to_vec(),
        values,
    })
}

impl FrameData {
    pub fn num_frames(&self) -> usize {
        self.times.len()
    }

    pub fn times(&self) -> &[f32] {
        &self.times
    }

    /// Channel values for frame `i`, a full 512-channel universe row.
    pub fn row(&self, i: usize) -> &[u8] {
        &self.values[i * UNIVERSE_SIZE..(i + 1) * UNIVERSE_SIZE]
    }

    /// Universe row for playback time `t`: the nearest frame at or before
    /// `t`, held until the next frame (no interpolation). Binary search,
    /// so repeated playback-rate queries stay cheap.
    ///
    /// Times outside the analyzed span are an error; callers that prefer
    /// clamping can retry with the span edges.
    pub fn color_at(&self, t: f32) -> Result<&[u8]> {
        let start = self.times[0];
        let end = *self.times.last().unwrap();
        if !t.is_finite() || t < start || t > end {
            return Err(PipelineError::OutOfRange { t, start, end });
        }

        // Greatest i with times[i] <= t; the guard above makes idx >= 1.
        let idx = self.times.partition_point(|&ft| ft <= t);
        Ok(self.row(idx - 1))
    }
}
