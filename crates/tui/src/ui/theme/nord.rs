//! Nord palette mapped onto the theme roles.

use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

// Polar Night (base surfaces)
const N0: Color = Color::Rgb(0x2E, 0x34, 0x40); // #2E3440
const N3: Color = Color::Rgb(0x4C, 0x56, 0x6A); // #4C566A

// Snow Storm (foregrounds)
const S0: Color = Color::Rgb(0xD8, 0xDE, 0xE9); // #D8DEE9
const S1: Color = Color::Rgb(0xE5, 0xE9, 0xF0); // #E5E9F0
const S2: Color = Color::Rgb(0xEC, 0xEF, 0xF4); // #ECEFF4

// Frost
const F1: Color = Color::Rgb(0x88, 0xC0, 0xD0); // #88C0D0
const F2: Color = Color::Rgb(0x81, 0xA1, 0xC1); // #81A1C1

// Aurora (semantic status)
const A_RED: Color = Color::Rgb(0xBF, 0x61, 0x6A); // #BF616A
const A_ORANGE: Color = Color::Rgb(0xD0, 0x87, 0x70); // #D08770
const A_GREEN: Color = Color::Rgb(0xA3, 0xBE, 0x8C); // #A3BE8C

const TEXT_MUTED: Color = Color::Rgb(0x61, 0x6E, 0x88); // #616E88 muted/disabled text

#[derive(Debug, Clone)]
pub struct NordTheme {
    roles: ThemeRoles,
}

impl Default for NordTheme {
    fn default() -> Self {
        Self {
            roles: ThemeRoles {
                background: N0,
                border: N3,

                text: S0,
                text_secondary: S1,
                text_muted: TEXT_MUTED,

                accent_primary: F1,

                info: F2,
                success: A_GREEN,
                warning: A_ORANGE,
                error: A_RED,

                selection_bg: N3,
                selection_fg: S2,
                focus: F1,
            },
        }
    }
}

impl Theme for NordTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_map_onto_the_nord_palette() {
        let theme = NordTheme::default();
        assert_eq!(theme.roles().background, N0);
        assert_eq!(theme.border_style(false).fg, Some(N3));
        assert_eq!(theme.border_style(true).fg, Some(F1));
        assert_eq!(theme.status_info().fg, Some(F2));
        assert_eq!(theme.status_error().fg, Some(A_RED));
        assert_eq!(theme.selection_style().bg, Some(N3));
        assert_eq!(theme.text_muted_style().fg, Some(TEXT_MUTED));
    }
}
