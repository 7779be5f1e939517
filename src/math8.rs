//! 8-bit integer helpers for intensity math.

/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// Uses integer math for efficiency on embedded systems.
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Re-map a raw reading from `0..=in_max` onto `out_min..=out_max`.
///
/// Integer division truncates toward `out_min`, matching the classic
/// Arduino `map()`. Readings above `in_max` are clamped first.
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn map_range(value: u16, in_max: u16, out_min: u8, out_max: u8) -> u8 {
    if in_max == 0 {
        return out_min;
    }
    let value = if value > in_max { in_max } else { value };
    let span = (out_max as u32).saturating_sub(out_min as u32);

    (value as u32 * span / in_max as u32 + out_min as u32) as u8
}
