//! Sample rate conversion
//!
//! Linear interpolation over interleaved i16 frames. Source positions are
//! tracked as exact rationals (`j * input_rate / output_rate`) so the output
//! is deterministic and independent of floating point rounding.

/// Linear-interpolation resampler for interleaved i16 audio
#[derive(Debug, Clone, Copy)]
pub struct AudioResampler {
    /// Input sample rate
    input_rate: u32,
    /// Output sample rate
    output_rate: u32,
}

impl AudioResampler {
    /// Create new audio resampler
    ///
    /// # Arguments
    /// * `input_rate` - Input sample rate (Hz), non-zero
    /// * `output_rate` - Output sample rate (Hz), non-zero
    pub fn new(input_rate: u32, output_rate: u32) -> Self {
        AudioResampler {
            input_rate,
            output_rate,
        }
    }

    /// Number of output frames for `input_frames` input frames
    ///
    /// Rounded to the nearest frame, so duration is kept within one frame.
    pub fn output_frames(&self, input_frames: usize) -> usize {
        let num = input_frames as u64 * self.output_rate as u64;
        let den = self.input_rate as u64;
        ((num + den / 2) / den) as usize
    }

    /// Resample interleaved frames with `channels` samples each
    pub fn process(&self, input: &[i16], channels: usize) -> Vec<i16> {
        if self.input_rate == self.output_rate || channels == 0 {
            return input.to_vec();
        }

        let in_frames = input.len() / channels;
        if in_frames == 0 {
            return Vec::new();
        }

        let out_frames = self.output_frames(in_frames);
        let den = self.output_rate as u64;
        let last = in_frames - 1;
        let mut output = Vec::with_capacity(out_frames * channels);

        for j in 0..out_frames as u64 {
            let pos = j * self.input_rate as u64;
            let index = ((pos / den) as usize).min(last);
            let next = (index + 1).min(last);
            let frac = (pos % den) as i64;

            for ch in 0..channels {
                let s0 = input[index * channels + ch] as i64;
                let s1 = input[next * channels + ch] as i64;
                let delta = round_div((s1 - s0) * frac, den as i64);
                output.push((s0 + delta) as i16);
            }
        }

        output
    }
}

/// Integer division rounding half away from zero (`b > 0`)
pub(crate) fn round_div(a: i64, b: i64) -> i64 {
    if a >= 0 {
        (a + b / 2) / b
    } else {
        (a - b / 2) / b
    }
}
