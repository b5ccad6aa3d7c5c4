use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const SUBTITLE_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

/// Days outside of the displayed month
pub(crate) const OTHER_PERIOD_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const WEEKEND_STYLE: Style = BASE_STYLE.fg(Color::LightRed);

pub(crate) const TODAY_STYLE: Style = Style::new()
    .fg(Color::LightCyan)
    .add_modifier(Modifier::BOLD);

pub(crate) const SELECTED_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);
