use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One colorscale entry, `[r, g, b]` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl FromStr for Rgb {
    type Err = Error;

    /// Accepts `#rrggbb` and `#rgb`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Rgb(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Rgb;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!("#ee6600".parse::<Rgb>().expect("long"), Rgb(0xee, 0x66, 0x00));
        assert_eq!("#0f8".parse::<Rgb>().expect("short"), Rgb(0x00, 0xff, 0x88));
    }

    #[test]
    fn rejects_malformed_colors() {
        for bad in ["ee6600", "#ee66", "#gg0000", "#", "#ééé"] {
            assert!(bad.parse::<Rgb>().is_err(), "{bad} should not parse");
        }
    }
}
