use clap::ValueEnum;
use ratatui::style::Color;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

/// Colours used by the terminal UI; the theme never changes game behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub dim: Color,
    pub card_back: Color,
    pub card_face: Color,
    pub matched: Color,
    pub focus: Color,
    pub accent: Color,
    pub alert: Color,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                background: Color::White,
                text: Color::Black,
                dim: Color::DarkGray,
                card_back: Color::Blue,
                card_face: Color::Black,
                matched: Color::Green,
                focus: Color::Magenta,
                accent: Color::Blue,
                alert: Color::Red,
            },
            Theme::Dark => Palette {
                background: Color::Reset,
                text: Color::White,
                dim: Color::Gray,
                card_back: Color::Cyan,
                card_face: Color::Yellow,
                matched: Color::LightGreen,
                focus: Color::Magenta,
                accent: Color::Cyan,
                alert: Color::LightRed,
            },
        }
    }
}
