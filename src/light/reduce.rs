/// Per-frame summary of a spectrogram column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReduction {
    /// Amplitude-weighted mean of the frequency bins, in Hz.
    /// Zero when the frame carries no energy at all.
    pub avg_frequency: f32,
    /// Unweighted mean of the frame's magnitudes.
    pub avg_amplitude: f32,
}

/// Collapse each time frame's magnitude vector into a representative
/// frequency and amplitude. Pure; one output entry per frame.
pub fn reduce(frequencies: &[f32], magnitudes: &[Vec<f32>]) -> Vec<FrameReduction> {
    magnitudes
        .iter()
        .map(|amps| {
            let total: f32 = amps.iter().sum();

            // Weighted mean is undefined for a silent frame; report 0.
            let avg_frequency = if total == 0.0 {
                0.0
            } else {
                frequencies
                    .iter()
                    .zip(amps.iter())
                    .map(|(&f, &a)| f * a)
                    .sum::<f32>()
                    / total
            };

            let avg_amplitude = total / amps.len() as f32;

            FrameReduction {
                avg_frequency,
                avg_amplitude,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_reduction_per_frame() {
        let freqs = vec![0.0, 50.0, 100.0];
        let mags = vec![vec![1.0, 1.0, 1.0]; 7];
        assert_eq!(reduce(&freqs, &mags).len(), 7);
    }

    #[test]
    fn weighted_mean_of_single_active_bin() {
        let freqs = vec![0.0, 100.0, 200.0];
        let mags = vec![vec![0.0, 0.0, 10.0]];

        let r = reduce(&freqs, &mags)[0];
        assert_eq!(r.avg_frequency, 200.0);
        assert!((r.avg_amplitude - 10.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn silent_frame_reduces_to_zero() {
        let freqs = vec![0.0, 100.0, 200.0];
        let mags = vec![vec![0.0, 0.0, 0.0]];

        let r = reduce(&freqs, &mags)[0];
        assert_eq!(r.avg_frequency, 0.0);
        assert_eq!(r.avg_amplitude, 0.0);
    }

    #[test]
    fn uniform_weights_give_plain_mean() {
        let freqs = vec![100.0, 200.0, 300.0];
        let mags = vec![vec![2.0, 2.0, 2.0]];

        let r = reduce(&freqs, &mags)[0];
        assert!((r.avg_frequency - 200.0).abs() < 1e-4);
        assert!((r.avg_amplitude - 2.0).abs() < 1e-6);
    }
}
