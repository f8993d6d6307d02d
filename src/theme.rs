use ratatui::style::{Color, Modifier, Style};

/// A named color scheme. Themes are a static registry resolved once at
/// startup; an unknown name is a fatal configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub title_fg: Color,
    pub chart_fg: Color,
    pub border_fg: Color,
    pub table_fg: Color,
    pub selection_bg: Color,
    pub footer_fg: Color,
}

pub const DEFAULT_THEME: &str = "parallax";

pub const THEMES: &[Theme] = &[
    Theme {
        name: "parallax",
        title_fg: Color::White,
        chart_fg: Color::Magenta,
        border_fg: Color::Cyan,
        table_fg: Color::White,
        selection_bg: Color::LightRed,
        footer_fg: Color::White,
    },
    Theme {
        name: "acid",
        title_fg: Color::LightGreen,
        chart_fg: Color::LightGreen,
        border_fg: Color::Green,
        table_fg: Color::LightGreen,
        selection_bg: Color::Green,
        footer_fg: Color::Green,
    },
    Theme {
        name: "brew",
        title_fg: Color::LightYellow,
        chart_fg: Color::Yellow,
        border_fg: Color::DarkGray,
        table_fg: Color::LightYellow,
        selection_bg: Color::Yellow,
        footer_fg: Color::Yellow,
    },
    Theme {
        name: "dark",
        title_fg: Color::Gray,
        chart_fg: Color::DarkGray,
        border_fg: Color::DarkGray,
        table_fg: Color::Gray,
        selection_bg: Color::DarkGray,
        footer_fg: Color::DarkGray,
    },
    Theme {
        name: "gotham",
        title_fg: Color::LightBlue,
        chart_fg: Color::Blue,
        border_fg: Color::DarkGray,
        table_fg: Color::LightBlue,
        selection_bg: Color::Blue,
        footer_fg: Color::Blue,
    },
    Theme {
        name: "monokai",
        title_fg: Color::LightMagenta,
        chart_fg: Color::LightMagenta,
        border_fg: Color::Yellow,
        table_fg: Color::White,
        selection_bg: Color::Magenta,
        footer_fg: Color::Yellow,
    },
    Theme {
        name: "seti",
        title_fg: Color::LightCyan,
        chart_fg: Color::Cyan,
        border_fg: Color::Blue,
        table_fg: Color::LightCyan,
        selection_bg: Color::Cyan,
        footer_fg: Color::Cyan,
    },
];

pub fn lookup(name: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|theme| theme.name == name)
}

/// `name1|name2|...` for the CLI help text.
pub fn available() -> String {
    THEMES
        .iter()
        .map(|theme| theme.name)
        .collect::<Vec<_>>()
        .join("|")
}

impl Theme {
    pub fn title_style(&self) -> Style {
        Style::default().fg(self.title_fg)
    }

    pub fn chart_style(&self) -> Style {
        Style::default().fg(self.chart_fg)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border_fg)
    }

    pub fn table_style(&self) -> Style {
        Style::default().fg(self.table_fg)
    }

    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg)
    }
}
