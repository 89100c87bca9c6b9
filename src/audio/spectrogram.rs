use rayon::prelude::*;
use rustfft::{num_complex::Complex, FftPlanner};

use crate::error::{PipelineError, Result};

const WINDOW_SIZE: usize = 2048;
const HOP_SIZE: usize = 1024;

/// Short-time spectral decomposition of a waveform.
///
/// One magnitude vector per time frame; all frames share the same
/// frequency grid. Frequencies are ascending, times non-decreasing.
pub struct Spectrogram {
    /// Frequency of each bin in Hz, ascending, length F.
    pub frequencies: Vec<f32>,
    /// Center time of each frame in seconds, length T.
    pub times: Vec<f32>,
    /// T frames, each a length-F vector of non-negative magnitudes.
    pub magnitudes: Vec<Vec<f32>>,
}

impl Spectrogram {
    pub fn num_frames(&self) -> usize {
        self.times.len()
    }

    pub fn num_bins(&self) -> usize {
        self.frequencies.len()
    }
}

/// Compute the spectrogram of mono samples with a Hann window.
///
/// Fails with an input error on empty samples or a zero sample rate.
/// The trailing partial window is zero-padded so short inputs still
/// produce one frame.
pub fn extract(samples: &[f32], sample_rate: u32) -> Result<Spectrogram> {
    if samples.is_empty() {
        return Err(PipelineError::Input("empty sample buffer".into()));
    }
    if sample_rate == 0 {
        return Err(PipelineError::Input("sample rate must be positive".into()));
    }

    let num_bins = WINDOW_SIZE / 2 + 1;
    let freq_resolution = sample_rate as f32 / WINDOW_SIZE as f32;
    let frequencies: Vec<f32> = (0..num_bins).map(|k| k as f32 * freq_resolution).collect();

    let num_frames = if samples.len() >= WINDOW_SIZE {
        (samples.len() - WINDOW_SIZE) / HOP_SIZE + 1
    } else {
        1
    };

    let hann = hann_window(WINDOW_SIZE);

    // Frames are independent, so compute them in parallel with a
    // per-thread FFT planner.
    let magnitudes: Vec<Vec<f32>> = (0..num_frames)
        .into_par_iter()
        .map(|frame_idx| {
            let start = frame_idx * HOP_SIZE;
            let end = (start + WINDOW_SIZE).min(samples.len());

            let mut buffer: Vec<Complex<f32>> = vec![Complex::new(0.0, 0.0); WINDOW_SIZE];
            for (i, &s) in samples[start..end].iter().enumerate() {
                buffer[i] = Complex::new(s * hann[i], 0.0);
            }

            let mut planner = FftPlanner::<f32>::new();
            let fft = planner.plan_fft_forward(WINDOW_SIZE);
            fft.process(&mut buffer);

            buffer[..num_bins].iter().map(|c| c.norm()).collect()
        })
        .collect();

    let times: Vec<f32> = (0..num_frames)
        .map(|i| (i * HOP_SIZE + WINDOW_SIZE / 2) as f32 / sample_rate as f32)
        .collect();

    log::info!(
        "Spectrogram: {} bins x {} frames ({:.1} Hz resolution)",
        num_bins,
        num_frames,
        freq_resolution
    );

    Ok(Spectrogram {
        frequencies,
        times,
        magnitudes,
    })
}

fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, secs: f32) -> Vec<f32> {
        let n = (sample_rate as f32 * secs) as usize;
        (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn rejects_empty_samples() {
        assert!(matches!(extract(&[], 44100), Err(PipelineError::Input(_))));
    }

    #[test]
    fn rejects_zero_sample_rate() {
        assert!(matches!(
            extract(&[0.0; 4096], 0),
            Err(PipelineError::Input(_))
        ));
    }

    #[test]
    fn shape_invariants() {
        let samples = sine(440.0, 44100, 1.0);
        let spec = extract(&samples, 44100).unwrap();

        assert_eq!(spec.times.len(), spec.magnitudes.len());
        for frame in &spec.magnitudes {
            assert_eq!(frame.len(), spec.frequencies.len());
            assert!(frame.iter().all(|&m| m >= 0.0));
        }
        assert!(spec.frequencies.windows(2).all(|w| w[0] < w[1]));
        assert!(spec.times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn pure_tone_peaks_at_its_frequency() {
        let samples = sine(440.0, 44100, 1.0);
        let spec = extract(&samples, 44100).unwrap();

        let mid = spec.num_frames() / 2;
        let frame = &spec.magnitudes[mid];
        let peak_bin = frame
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap()
            .0;
        let peak_hz = spec.frequencies[peak_bin];

        // Within one bin of 440 Hz (resolution ~21.5 Hz at 44.1k/2048)
        assert!((peak_hz - 440.0).abs() < 44100.0 / WINDOW_SIZE as f32 * 1.5);
    }

    #[test]
    fn short_input_yields_one_padded_frame() {
        let samples = vec![0.1f32; 100];
        let spec = extract(&samples, 8000).unwrap();
        assert_eq!(spec.num_frames(), 1);
    }
}
