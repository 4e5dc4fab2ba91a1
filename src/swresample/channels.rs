//! Channel count conversion for interleaved i16 audio

use super::resample::round_div;

/// Mix every frame down to one channel with equal weights
pub fn downmix_to_mono(input: &[i16], channels: usize) -> Vec<i16> {
    if channels <= 1 {
        return input.to_vec();
    }

    input
        .chunks_exact(channels)
        .map(|frame| {
            let sum: i64 = frame.iter().map(|&s| s as i64).sum();
            round_div(sum, channels as i64) as i16
        })
        .collect()
}

/// Duplicate a mono signal into both channels of a stereo signal
pub fn mono_to_stereo(input: &[i16]) -> Vec<i16> {
    let mut output = Vec::with_capacity(input.len() * 2);
    for &sample in input {
        output.push(sample);
        output.push(sample);
    }
    output
}

/// Convert between channel counts
///
/// `target` must be 1 or 2. More than two source channels going to stereo
/// are mixed to mono first and then duplicated; no direct matrix is applied.
pub fn convert(input: &[i16], source: usize, target: usize) -> Vec<i16> {
    match (source, target) {
        (s, t) if s == t => input.to_vec(),
        (_, 1) => downmix_to_mono(input, source),
        (1, 2) => mono_to_stereo(input),
        _ => mono_to_stereo(&downmix_to_mono(input, source)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stereo_to_mono_averages() {
        assert_eq!(convert(&[100, 200, -3, 0, i16::MAX, i16::MAX], 2, 1), vec![150, -2, i16::MAX]);
    }

    #[test]
    fn test_mono_to_stereo_duplicates() {
        assert_eq!(convert(&[1, -2], 1, 2), vec![1, 1, -2, -2]);
    }

    #[test]
    fn test_surround_to_stereo_goes_through_mono() {
        // Four channels: average then duplicate
        let out = convert(&[10, 20, 30, 40, -4, -4, -4, -4], 4, 2);
        assert_eq!(out, vec![25, 25, -4, -4]);
    }

    #[test]
    fn test_surround_to_mono() {
        assert_eq!(convert(&[3, 3, 3, 3, 3, 4], 6, 1), vec![3]);
    }

    #[test]
    fn test_same_count_is_passthrough() {
        assert_eq!(convert(&[5, 6, 7, 8], 2, 2), vec![5, 6, 7, 8]);
    }
}
