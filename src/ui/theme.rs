use ratatui::style::{Color, Style};

use crate::config::ThemeName;

/// Colour palette for one render pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Theme {
    pub primary_bg: Color,
    pub card_bg: Color,
    pub text: Color,
    pub subtext: Color,
    pub accent: Color,
    pub highlight: Color,
}

impl Theme {
    pub const DARK: Theme = Theme {
        primary_bg: Color::Rgb(0x12, 0x12, 0x12),
        card_bg: Color::Rgb(0x18, 0x18, 0x18),
        text: Color::Rgb(0xff, 0xff, 0xff),
        subtext: Color::Rgb(0xb3, 0xb3, 0xb3),
        accent: Color::Rgb(0x1d, 0xb9, 0x54),
        highlight: Color::Rgb(0x1e, 0xd7, 0x60),
    };

    pub const LIGHT: Theme = Theme {
        primary_bg: Color::Rgb(0xf5, 0xf5, 0xf5),
        card_bg: Color::Rgb(0xff, 0xff, 0xff),
        text: Color::Rgb(0x00, 0x00, 0x00),
        subtext: Color::Rgb(0x55, 0x55, 0x55),
        accent: Color::Rgb(0x1d, 0xb9, 0x54),
        highlight: Color::Rgb(0x1e, 0xd7, 0x60),
    };

    pub fn named(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self::DARK,
            ThemeName::Light => Self::LIGHT,
        }
    }

    /// Base style for a card (bordered box).
    pub fn card(&self) -> Style {
        Style::default().bg(self.card_bg).fg(self.text)
    }

    pub fn muted(&self) -> Style {
        Style::default().bg(self.card_bg).fg(self.subtext)
    }
}
