use crate::record::Medal;

pub const GOLD: &str = "#FFD700";
pub const SILVER: &str = "#C0C0C0";
pub const BRONZE: &str = "#CD7F32";
pub const NO_MEDAL: &str = "#8C8C8C";

pub const COUNTRY_NODE: &str = "black";
pub const SELECTED_COUNTRY_NODE: &str = "red";

/// Opacity applied to Sankey links.
pub const LINK_ALPHA: f64 = 0.7;

pub fn medal_color(medal: Medal) -> &'static str {
    match medal {
        Medal::Gold => GOLD,
        Medal::Silver => SILVER,
        Medal::Bronze => BRONZE,
        Medal::NoMedal => NO_MEDAL,
    }
}

/// `#RRGGBB` to `rgba(r, g, b, alpha)`. Returns `None` for anything that is
/// not a six-digit hex colour.
pub fn hex_to_rgba(hex: &str, alpha: f64) -> Option<String> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    let (r, g, b) = (channel(0)?, channel(2)?, channel(4)?);
    Some(format!("rgba({r}, {g}, {b}, {alpha})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_hex_to_rgba() {
        assert_eq!(hex_to_rgba(GOLD, LINK_ALPHA).as_deref(), Some("rgba(255, 215, 0, 0.7)"));
        assert_eq!(hex_to_rgba(BRONZE, 1.0).as_deref(), Some("rgba(205, 127, 50, 1)"));
        assert_eq!(hex_to_rgba("black", 0.7), None);
        assert_eq!(hex_to_rgba("#12345", 0.7), None);
    }
}
