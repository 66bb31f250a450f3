use serde::{Deserialize, Serialize};

/// Opaque 8-bit sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_pixel(self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }

    pub fn from_pixel(px: image::Rgb<u8>) -> Self {
        let [r, g, b] = px.0;
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn parse_hex(s: &str) -> Result<Self, String> {
        parse_hex(s)
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from(v: [u8; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl Serialize for Rgb8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            RgbObj { r: u8, g: u8, b: u8 },
            Arr(Vec<u8>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::RgbObj { r, g, b } => Ok(Self::new(r, g, b)),
            Repr::Arr(v) => {
                if v.len() == 3 {
                    Ok(Self::new(v[0], v[1], v[2]))
                } else {
                    Err(serde::de::Error::custom(
                        "rgb array must have len 3 ([r,g,b], 0-255)",
                    ))
                }
            }
        }
    }
}

fn parse_hex(s: &str) -> Result<Rgb8, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if s.len() != 6 || !s.is_ascii() {
        return Err("hex color must be #RRGGBB (case-insensitive)".to_owned());
    }

    Ok(Rgb8::new(
        hex_byte(&s[0..2])?,
        hex_byte(&s[2..4])?,
        hex_byte(&s[4..6])?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_hex() {
        let c: Rgb8 = serde_json::from_value(json!("#2c1e4a")).unwrap();
        assert_eq!(c, Rgb8::new(44, 30, 74));

        let c: Rgb8 = serde_json::from_value(json!("D5825E")).unwrap();
        assert_eq!(c, Rgb8::new(213, 130, 94));
    }

    #[test]
    fn parses_object_and_array() {
        let c: Rgb8 = serde_json::from_value(json!({"r": 10, "g": 10, "b": 12})).unwrap();
        assert_eq!(c, Rgb8::new(10, 10, 12));

        let c: Rgb8 = serde_json::from_value(json!([150, 161, 205])).unwrap();
        assert_eq!(c, Rgb8::new(150, 161, 205));
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(serde_json::from_value::<Rgb8>(json!("#fff")).is_err());
        assert!(serde_json::from_value::<Rgb8>(json!("#gg0000")).is_err());
        assert!(serde_json::from_value::<Rgb8>(json!([1, 2])).is_err());
        assert!(serde_json::from_value::<Rgb8>(json!([1, 2, 300])).is_err());
    }

    #[test]
    fn serializes_as_lowercase_hex() {
        let v = serde_json::to_value(Rgb8::new(169, 154, 184)).unwrap();
        assert_eq!(v, json!("#a99ab8"));
    }
}
