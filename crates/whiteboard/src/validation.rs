use glam::Vec2;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Unsupported color: {0}")]
    InvalidColor(String),
    #[error("Non-finite position: ({x}, {y})")]
    NonFinitePosition { x: f32, y: f32 },
}

/// Check that a pointer position can be stored and replayed
pub fn validate_position(position: Vec2) -> Result<(), ValidationError> {
    if position.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinitePosition {
            x: position.x,
            y: position.y,
        })
    }
}

/// Parse a CSS color into straight RGBA in 0..1.
///
/// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`, `rgba(r, g, b, a)`
/// and a handful of basic named colors.
pub fn parse_color(input: &str) -> Result<[f32; 4], ValidationError> {
    let color = input.trim().to_ascii_lowercase();
    let invalid = || ValidationError::InvalidColor(input.to_string());

    if let Some(hex) = color.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(invalid);
    }

    if let Some(body) = color
        .strip_prefix("rgba(")
        .or_else(|| color.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_functional(body).ok_or_else(invalid);
    }

    let named = match color.as_str() {
        "black" => [0.0, 0.0, 0.0, 1.0],
        "white" => [1.0, 1.0, 1.0, 1.0],
        "red" => [1.0, 0.0, 0.0, 1.0],
        "green" => [0.0, 128.0 / 255.0, 0.0, 1.0],
        "blue" => [0.0, 0.0, 1.0, 1.0],
        "transparent" => [0.0, 0.0, 0.0, 0.0],
        _ => return Err(invalid()),
    };
    Ok(named)
}

fn parse_hex(hex: &str) -> Option<[f32; 4]> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
    match hex.len() {
        3 => {
            let mut rgb = [0.0; 3];
            for (slot, c) in rgb.iter_mut().zip(hex.chars()) {
                *slot = channel(&format!("{c}{c}"))?;
            }
            Some([rgb[0], rgb[1], rgb[2], 1.0])
        }
        6 | 8 => {
            let alpha = if hex.len() == 8 {
                channel(&hex[6..8])?
            } else {
                1.0
            };
            Some([
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                alpha,
            ])
        }
        _ => None,
    }
}

fn parse_functional(body: &str) -> Option<[f32; 4]> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let mut rgba = [0.0, 0.0, 0.0, 1.0];
    for (slot, part) in rgba.iter_mut().zip(&parts[..3]) {
        let value: f32 = part.parse().ok()?;
        *slot = (value / 255.0).clamp(0.0, 1.0);
    }
    if let Some(alpha) = parts.get(3) {
        rgba[3] = alpha.parse::<f32>().ok()?.clamp(0.0, 1.0);
    }
    Some(rgba)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(parse_color("#000000").unwrap(), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(parse_color("#ff0000").unwrap(), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(parse_color("#FFF").unwrap(), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(parse_color("#00ff0000").unwrap()[3], 0.0);
    }

    #[test]
    fn test_parse_rgb_colors() {
        assert_eq!(parse_color("rgb(255, 0, 0)").unwrap(), [1.0, 0.0, 0.0, 1.0]);
        let [r, g, b, a] = parse_color("rgba(0, 0, 255, 0.5)").unwrap();
        assert_eq!((r, g, b, a), (0.0, 0.0, 1.0, 0.5));
        assert_eq!(parse_color("green").unwrap()[1], 128.0 / 255.0);
    }

    #[test]
    fn test_parse_invalid_colors() {
        assert!(parse_color("#12").is_err());
        assert!(parse_color("#gggggg").is_err());
        assert!(parse_color("rgb(1, 2)").is_err());
        assert_eq!(
            parse_color("chartreuse-ish"),
            Err(ValidationError::InvalidColor("chartreuse-ish".into()))
        );
    }

    #[test]
    fn test_validate_position() {
        assert!(validate_position(Vec2::new(1.0, 2.0)).is_ok());
        assert!(validate_position(Vec2::new(f32::NAN, 2.0)).is_err());
        assert!(validate_position(Vec2::new(1.0, f32::INFINITY)).is_err());
    }
}
