/// Centers a byte channel value on zero and scales it to `[-0.5, 0.5)`.
#[inline]
pub fn normalize(byte: u8) -> f32 {
    (f32::from(byte) - 128.0) / 256.0
}

/// Converts raw frame bytes into the accelerator's float tensor, one value per byte.
pub fn encode(bytes: &[u8]) -> Vec<f32> {
    bytes.iter().copied().map(normalize).collect()
}

/// Encodes into a caller-owned buffer, reusing its allocation across cycles.
///
/// The buffer is resized to `bytes.len()`.
pub fn encode_into(bytes: &[u8], tensor: &mut Vec<f32>) {
    tensor.clear();
    tensor.extend(bytes.iter().copied().map(normalize));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case::zero(0, -0.5)]
    #[case::midpoint(128, 0.0)]
    #[case::one_above(129, 1.0 / 256.0)]
    #[case::max(255, 127.0 / 256.0)]
    fn test_normalize_known_values(#[case] byte: u8, #[case] expected: f32) {
        assert_relative_eq!(normalize(byte), expected);
    }

    #[test]
    fn test_normalize_stays_in_range_for_every_byte() {
        for b in 0..=255u8 {
            let v = normalize(b);
            assert!((-0.5..=0.4961).contains(&v), "byte {b} -> {v}");
        }
    }

    #[test]
    fn test_encode_preserves_length() {
        for len in [0usize, 1, 2, 27, 1000] {
            assert_eq!(encode(&vec![3u8; len]).len(), len);
        }
    }

    #[test]
    fn test_encode_is_elementwise() {
        let tensor = encode(&[0, 128, 255]);
        assert_relative_eq!(tensor[0], -0.5);
        assert_relative_eq!(tensor[1], 0.0);
        assert_relative_eq!(tensor[2], 0.49609375);
    }

    #[test]
    fn test_encode_into_reuses_buffer() {
        let mut tensor = vec![9.0; 10];
        encode_into(&[128, 0], &mut tensor);
        assert_eq!(tensor.len(), 2);
        assert_eq!(tensor, encode(&[128, 0]));
    }
}
