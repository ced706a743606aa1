use ratatui::style::Color;

/// Colour scale for bubble charts, dark purple through yellow.
const VIRIDIS: [(u8, u8, u8); 6] = [
    (68, 1, 84),
    (65, 68, 135),
    (42, 120, 142),
    (34, 168, 132),
    (122, 209, 81),
    (253, 231, 37),
];

/// Parses `#rgb`, `#rrggbb` and `rgb()/rgba()` strings. Alpha is ignored.
pub fn css_color(input: &str) -> Option<Color> {
    let input = input.trim();
    if let Some(hex) = input.strip_prefix('#') {
        return parse_hex(hex);
    }

    let inner = input
        .strip_prefix("rgba(")
        .or_else(|| input.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let mut channels = inner.split(',').map(|part| part.trim().parse::<u8>().ok());
    let r = channels.next()??;
    let g = channels.next()??;
    let b = channels.next()??;
    Some(Color::Rgb(r, g, b))
}

fn parse_hex(hex: &str) -> Option<Color> {
    let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb(
            channel(hex.get(0..2)?)?,
            channel(hex.get(2..4)?)?,
            channel(hex.get(4..6)?)?,
        )),
        3 => {
            let expand = |index: usize| {
                hex.get(index..=index)
                    .and_then(channel)
                    .map(|value| value * 17)
            };
            Some(Color::Rgb(expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}

/// `css_color` with a fallback for anything unparseable.
pub fn color_or(input: Option<&str>, fallback: Color) -> Color {
    input.and_then(css_color).unwrap_or(fallback)
}

/// Viridis colour for a position in `0..=max`.
pub fn scale_color(position: usize, max: usize) -> Color {
    let ratio = if max == 0 {
        0.0
    } else {
        (position.min(max) as f64) / (max as f64)
    };
    let scaled = ratio * (VIRIDIS.len() - 1) as f64;
    let low = scaled.floor() as usize;
    let high = (low + 1).min(VIRIDIS.len() - 1);
    let t = scaled - low as f64;

    let lerp = |a: u8, b: u8| (f64::from(b) - f64::from(a)).mul_add(t, f64::from(a)).round() as u8;
    let (r0, g0, b0) = VIRIDIS[low];
    let (r1, g1, b1) = VIRIDIS[high];
    Color::Rgb(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

/// Fixed series colours for charts that don't name their own.
pub const SERIES: [Color; 6] = [
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Green,
    Color::LightRed,
    Color::LightBlue,
];

pub fn series_color(index: usize) -> Color {
    SERIES[index % SERIES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_rgba() {
        assert_eq!(css_color("#51b7e0"), Some(Color::Rgb(0x51, 0xb7, 0xe0)));
        assert_eq!(css_color("#fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(
            css_color("rgba(55, 128, 191, 0.7)"),
            Some(Color::Rgb(55, 128, 191))
        );
        assert_eq!(css_color("teal"), None);
        assert_eq!(css_color("#12"), None);
    }

    #[test]
    fn scale_runs_end_to_end() {
        assert_eq!(scale_color(0, 10), Color::Rgb(68, 1, 84));
        assert_eq!(scale_color(10, 10), Color::Rgb(253, 231, 37));
        assert_eq!(scale_color(3, 0), Color::Rgb(68, 1, 84));
    }
}
