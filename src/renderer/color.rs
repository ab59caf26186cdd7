/// Unpack a `0xRRGGBB` literal.
pub const fn hex(rgb: u32) -> [u8; 3] {
    [(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8]
}

pub const PARTICLE: [u8; 3] = hex(0x2E94B9);
/// Positive-strength sources and dipoles.
pub const POSITIVE: [u8; 3] = hex(0xFFFDC0);
/// Sinks, negative dipoles, and every vortex.
pub const NEGATIVE: [u8; 3] = hex(0xD25565);

/// Marker color by strength sign.
pub fn by_sign(strength: f64) -> [u8; 3] {
    if strength > 0.0 { POSITIVE } else { NEGATIVE }
}

/// Grey triple for the blended arrow lines.
pub fn grey(level: u8) -> [f64; 3] {
    let v = level as f64;
    [v, v, v]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_unpacks_channels() {
        assert_eq!(PARTICLE, [0x2E, 0x94, 0xB9]);
        assert_eq!(NEGATIVE, [0xD2, 0x55, 0x65]);
    }

    #[test]
    fn test_by_sign() {
        assert_eq!(by_sign(0.01), POSITIVE);
        assert_eq!(by_sign(-1.0), NEGATIVE);
    }
}
