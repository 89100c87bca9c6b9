pub mod decode;
pub mod spectrogram;
