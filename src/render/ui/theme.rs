//! Color theme and styling definitions using ratatui colors
//!
//! One canonical set of screens; visual variation is confined to the theme.

use crate::config::ThemeName;
use crate::incident::{SeverityLevel, Verification};
use ratatui::style::{Color, Modifier, Style};

/// Color theme for terminal UI elements
#[derive(Debug, Clone)]
pub struct ColorTheme {
    /// Normal text color (None uses terminal default)
    pub normal_text: Option<Color>,

    /// Table header and section titles
    pub header: Style,

    /// Selected table row / filter option
    pub selection: Style,

    /// Status line background
    pub status_bg: Color,

    /// Status line text
    pub status_fg: Color,

    /// Secondary text (dates, ids, hints)
    pub muted: Color,

    /// Active filters, current page link, bold description runs
    pub accent: Style,

    /// Error/warning text
    pub error_text: Color,

    /// Severity badges: critical, high, medium, low, unrated
    pub severity: [Style; 5],

    /// Verification badges: verified, unverified, disputed, other/not stated
    pub verification: [Style; 4],
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            normal_text: None,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selection: Style::default().fg(Color::White).bg(Color::Blue),
            status_bg: Color::Blue,
            status_fg: Color::White,
            muted: Color::DarkGray,
            accent: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            error_text: Color::Red,
            severity: [
                Style::default().fg(Color::White).bg(Color::Red),
                Style::default().fg(Color::Black).bg(Color::LightRed),
                Style::default().fg(Color::Black).bg(Color::Yellow),
                Style::default().fg(Color::Black).bg(Color::Green),
                Style::default().fg(Color::White).bg(Color::DarkGray),
            ],
            verification: [
                Style::default().fg(Color::Green),
                Style::default().fg(Color::Yellow),
                Style::default().fg(Color::Red),
                Style::default().fg(Color::DarkGray),
            ],
        }
    }
}

impl ColorTheme {
    /// Create a monochrome theme for terminals without color support
    pub fn monochrome() -> Self {
        let plain = Style::default();
        let inverted = Style::default().fg(Color::Black).bg(Color::White);
        Self {
            normal_text: None,
            header: Style::default().add_modifier(Modifier::BOLD),
            selection: inverted,
            status_bg: Color::Black,
            status_fg: Color::White,
            muted: Color::Reset,
            accent: Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            error_text: Color::White,
            severity: [
                inverted.add_modifier(Modifier::BOLD),
                inverted,
                plain.add_modifier(Modifier::BOLD),
                plain,
                plain.add_modifier(Modifier::DIM),
            ],
            verification: [
                plain.add_modifier(Modifier::BOLD),
                plain,
                plain.add_modifier(Modifier::UNDERLINED),
                plain.add_modifier(Modifier::DIM),
            ],
        }
    }

    /// Create a high-contrast theme for accessibility
    pub fn high_contrast() -> Self {
        Self {
            normal_text: Some(Color::White),
            header: Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
            selection: Style::default().fg(Color::Black).bg(Color::LightYellow),
            status_bg: Color::White,
            status_fg: Color::Black,
            muted: Color::Gray,
            accent: Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
            error_text: Color::LightRed,
            severity: [
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Red)
                    .add_modifier(Modifier::BOLD),
                Style::default().fg(Color::Black).bg(Color::LightMagenta),
                Style::default().fg(Color::Black).bg(Color::LightYellow),
                Style::default().fg(Color::Black).bg(Color::LightGreen),
                Style::default().fg(Color::Black).bg(Color::Gray),
            ],
            verification: [
                Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::LightYellow),
                Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::Gray),
            ],
        }
    }

    pub fn named(name: ThemeName) -> Self {
        match name {
            ThemeName::Default => Self::default(),
            ThemeName::Monochrome => Self::monochrome(),
            ThemeName::HighContrast => Self::high_contrast(),
        }
    }

    pub fn severity_style(&self, level: SeverityLevel) -> Style {
        let slot = match level {
            SeverityLevel::Critical => 0,
            SeverityLevel::High => 1,
            SeverityLevel::Medium => 2,
            SeverityLevel::Low => 3,
            SeverityLevel::Unrated => 4,
        };
        self.severity[slot]
    }

    pub fn verification_style(&self, status: Verification) -> Style {
        let slot = match status {
            Verification::Verified => 0,
            Verification::Unverified => 1,
            Verification::Disputed => 2,
            Verification::NotStated | Verification::Other => 3,
        };
        self.verification[slot]
    }

    /// Base style for body text
    pub fn text(&self) -> Style {
        match self.normal_text {
            Some(color) => Style::default().fg(color),
            None => Style::default(),
        }
    }
}
