//! In-place payload transforms. Each one is its own inverse.

/// Swaps the bytes of every 16-bit unit. A trailing odd byte is left alone.
pub fn swap_bytes_16(data: &mut [u8]) {
    for unit in data.chunks_exact_mut(2) {
        unit.swap(0, 1);
    }
}

/// Reverses every 4-byte pixel, turning RGBA into ABGR and back.
pub fn reverse_channels(data: &mut [u8]) {
    for pixel in data.chunks_exact_mut(4) {
        pixel.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swaps_16_bit_units() {
        let mut data = [1, 2, 3, 4, 5];
        swap_bytes_16(&mut data);
        assert_eq!(data, [2, 1, 4, 3, 5]);

        swap_bytes_16(&mut data);
        assert_eq!(data, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn rgba_becomes_abgr() {
        let mut data = *b"RGBArgba";
        reverse_channels(&mut data);
        assert_eq!(&data, b"ABGRabgr");
    }
}
