/// Linear mix of two 8-bit channels by an 8-bit weight: `m = 0` yields `a`, `m = 255` yields `b`.
pub(crate) fn mix_u8(a: u8, b: u8, m: u8) -> u8 {
    let m = u32::from(m);
    ((u32::from(a) * (255 - m) + u32::from(b) * m + 127) / 255) as u8
}

/// Python-style floor division, used for centring math where the numerator can go negative.
pub(crate) fn floor_div(a: i64, b: i64) -> i64 {
    a.div_euclid(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_endpoints_are_exact() {
        for a in [0u8, 17, 128, 255] {
            for b in [0u8, 99, 200, 255] {
                assert_eq!(mix_u8(a, b, 0), a);
                assert_eq!(mix_u8(a, b, 255), b);
            }
        }
        assert_eq!(mix_u8(0, 255, 128), 128);
    }

    #[test]
    fn floor_div_rounds_toward_negative_infinity() {
        assert_eq!(floor_div(7, 2), 3);
        assert_eq!(floor_div(-7, 2), -4);
        assert_eq!(floor_div(-8, 2), -4);
    }
}
