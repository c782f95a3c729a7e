/// Split off the first `N` bytes as an array
#[inline]
pub(crate) fn get_split<const N: usize>(data: &[u8]) -> Option<([u8; N], &[u8])> {
    data.split_first_chunk::<N>().map(|(head, rest)| (*head, rest))
}

/// Scale a unit interval channel to a byte, truncating like an integer cast
#[inline]
pub(crate) fn unit_to_byte(x: f32) -> u8 {
    if x.is_nan() {
        return 0;
    }

    (x * 255.0).clamp(0.0, 255.0) as u8
}
