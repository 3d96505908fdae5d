use ratatui::style::Color;

use crate::error::AppError;

/// Semantic color roles the screens ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    CardBackground,
    CardBorder,
    Text,
    SecondaryText,
    Badge,
    BadgeText,
    /// Accent; also the home side of a comparison bar.
    Tint,
    ScoreDivider,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn color(&self, role: Role) -> Color {
        match (self, role) {
            (Theme::Light, Role::CardBackground) => Color::White,
            (Theme::Light, Role::CardBorder) => Color::Gray,
            (Theme::Light, Role::Text) => Color::Black,
            (Theme::Light, Role::SecondaryText) => Color::DarkGray,
            (Theme::Light, Role::Badge) => Color::Rgb(255, 237, 213),
            (Theme::Light, Role::BadgeText) => Color::Rgb(194, 65, 12),
            (Theme::Light, Role::Tint) => Color::Rgb(10, 126, 164),
            (Theme::Light, Role::ScoreDivider) => Color::Gray,

            (Theme::Dark, Role::CardBackground) => Color::Reset,
            (Theme::Dark, Role::CardBorder) => Color::DarkGray,
            (Theme::Dark, Role::Text) => Color::White,
            (Theme::Dark, Role::SecondaryText) => Color::Gray,
            (Theme::Dark, Role::Badge) => Color::Rgb(67, 20, 7),
            (Theme::Dark, Role::BadgeText) => Color::Rgb(253, 186, 116),
            (Theme::Dark, Role::Tint) => Color::Cyan,
            (Theme::Dark, Role::ScoreDivider) => Color::DarkGray,
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(AppError::Config(format!("THEME must be light or dark, got {other:?}"))),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}
