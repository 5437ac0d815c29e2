use colored::Color;
use mergelog_types::DisplayToken;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Light text first, for dark terminals
    #[default]
    Dark,
    /// Dark text first, for light terminals
    Light,
    /// No color
    Off,
}

/// Solarized picks from the xterm 256-color table: whiteish (253), green
/// (64), cyan (37), blue (33), violet (61), magenta (125), red (160),
/// orange (166).
///
/// They are emitted as RGB truecolor sequences; terminals without truecolor
/// support show their nearest available color instead.
const SOLARIZED: [(u8, u8, u8); 8] = [
    (0xda, 0xda, 0xda),
    (0x5f, 0x87, 0x00),
    (0x00, 0xaf, 0xaf),
    (0x00, 0x87, 0xff),
    (0x5f, 0x5f, 0xaf),
    (0xaf, 0x00, 0x5f),
    (0xd7, 0x00, 0x00),
    (0xd7, 0x5f, 0x00),
];

/// Blackish (234), replaces the first entry on light terminals.
const BLACKISH: (u8, u8, u8) = (0x1c, 0x1c, 0x1c);

/// Per-source colors, handed out round-robin.
#[derive(Clone, Debug)]
pub struct Palette {
    colors: [Color; 8],
    enabled: bool,
}

impl Palette {
    pub fn for_scheme(scheme: ColorScheme) -> Self {
        let mut rgb = SOLARIZED;
        if scheme == ColorScheme::Light {
            rgb[0] = BLACKISH;
        }
        Self {
            colors: rgb.map(|(r, g, b)| Color::TrueColor { r, g, b }),
            enabled: scheme != ColorScheme::Off,
        }
    }

    /// Display token for the `index`-th source.
    pub fn token(&self, index: usize) -> DisplayToken {
        DisplayToken(index % self.colors.len())
    }

    /// Color for a token, or `None` when color is off.
    pub fn color(&self, token: DisplayToken) -> Option<Color> {
        if !self.enabled {
            return None;
        }
        self.colors.get(token.0 % self.colors.len()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_wrap_after_eight_sources() {
        let p = Palette::for_scheme(ColorScheme::Dark);
        assert_eq!(p.token(0), DisplayToken(0));
        assert_eq!(p.token(7), DisplayToken(7));
        assert_eq!(p.token(8), DisplayToken(0));
        assert_eq!(p.token(11), DisplayToken(3));
    }

    #[test]
    fn light_scheme_swaps_first_color() {
        let dark = Palette::for_scheme(ColorScheme::Dark);
        let light = Palette::for_scheme(ColorScheme::Light);
        assert_eq!(
            dark.color(DisplayToken(0)),
            Some(Color::TrueColor { r: 0xda, g: 0xda, b: 0xda })
        );
        assert_eq!(
            light.color(DisplayToken(0)),
            Some(Color::TrueColor { r: 0x1c, g: 0x1c, b: 0x1c })
        );
        assert_eq!(dark.color(DisplayToken(1)), light.color(DisplayToken(1)));
    }

    #[test]
    fn off_scheme_has_no_colors() {
        let p = Palette::for_scheme(ColorScheme::Off);
        assert!(p.color(DisplayToken(2)).is_none());
    }
}
