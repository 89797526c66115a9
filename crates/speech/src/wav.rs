//! PCM WAV encoding: canonical 44-byte header, mono, 16-bit.

/// Floating-point samples as produced by a speech model.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// A complete WAV file in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavBuffer {
    bytes: Vec<u8>,
    sample_rate: u32,
}

const HEADER_LEN: usize = 44;
const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const BLOCK_ALIGN: u16 = CHANNELS * BITS_PER_SAMPLE / 8;

impl WavBuffer {
    /// Encode samples. Each sample is clamped to `[-1, 1]` and scaled by 32767.
    pub fn encode(samples: &[f32], sample_rate: u32) -> Self {
        let data_len = (samples.len() * BLOCK_ALIGN as usize) as u32;
        let byte_rate = sample_rate * BLOCK_ALIGN as u32;

        let mut bytes = Vec::with_capacity(HEADER_LEN + data_len as usize);
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");

        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
        bytes.extend_from_slice(&CHANNELS.to_le_bytes());
        bytes.extend_from_slice(&sample_rate.to_le_bytes());
        bytes.extend_from_slice(&byte_rate.to_le_bytes());
        bytes.extend_from_slice(&BLOCK_ALIGN.to_le_bytes());
        bytes.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());

        for sample in samples {
            let clamped = if sample.is_nan() { 0.0 } else { sample.clamp(-1.0, 1.0) };
            let value = (clamped * 32767.0) as i16;
            bytes.extend_from_slice(&value.to_le_bytes());
        }

        Self { bytes, sample_rate }
    }

    pub fn from_raw(audio: &RawAudio) -> Self {
        Self::encode(&audio.samples, audio.sample_rate)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn sample_count(&self) -> usize {
        (self.bytes.len() - HEADER_LEN) / BLOCK_ALIGN as usize
    }

    /// Playback length in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.sample_count() as f32 / self.sample_rate as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
    }

    fn i16_at(bytes: &[u8], offset: usize) -> i16 {
        i16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
    }

    #[test]
    fn header_fields() {
        let wav = WavBuffer::encode(&[0.0; 100], 24_000);
        let b = wav.as_bytes();

        assert_eq!(b.len(), 44 + 200);
        assert_eq!(&b[0..4], b"RIFF");
        assert_eq!(u32_at(b, 4), 36 + 200); // ChunkSize
        assert_eq!(&b[8..12], b"WAVE");
        assert_eq!(&b[12..16], b"fmt ");
        assert_eq!(u32_at(b, 16), 16);
        assert_eq!(u16_at(b, 20), 1);
        assert_eq!(u16_at(b, 22), 1);
        assert_eq!(u32_at(b, 24), 24_000);
        assert_eq!(u32_at(b, 28), 48_000); // ByteRate
        assert_eq!(u16_at(b, 32), 2); // BlockAlign
        assert_eq!(u16_at(b, 34), 16);
        assert_eq!(&b[36..40], b"data");
        assert_eq!(u32_at(b, 40), 200); // Subchunk2Size
    }

    #[test]
    fn samples_are_clamped_and_scaled() {
        let wav = WavBuffer::encode(&[0.5, 1.0, -1.0, 2.5, -3.0, f32::NAN], 16_000);
        let b = wav.as_bytes();
        assert_eq!(i16_at(b, 44), 16383);
        assert_eq!(i16_at(b, 46), 32767);
        assert_eq!(i16_at(b, 48), -32767);
        assert_eq!(i16_at(b, 50), 32767);
        assert_eq!(i16_at(b, 52), -32767);
        assert_eq!(i16_at(b, 54), 0);
        assert_eq!(wav.sample_count(), 6);
    }

    #[test]
    fn empty_audio_is_header_only() {
        let wav = WavBuffer::encode(&[], 22_050);
        assert_eq!(wav.as_bytes().len(), 44);
        assert_eq!(wav.sample_count(), 0);
        assert_eq!(wav.duration_secs(), 0.0);
    }

    #[test]
    fn duration_from_raw() {
        let raw = RawAudio {
            samples: vec![0.1; 48_000],
            sample_rate: 24_000,
        };
        let wav = WavBuffer::from_raw(&raw);
        assert_eq!(wav.sample_rate(), 24_000);
        assert!((wav.duration_secs() - 2.0).abs() < f32::EPSILON);
    }
}
