use super::dates::{month_abbrev, weekday_abbrev};
use super::grid::{DayCell, ViewMode, Week};
use super::state::CalendarState;
use crate::theme::{
    BASE_STYLE, OTHER_PERIOD_STYLE, SELECTED_STYLE, SUBTITLE_STYLE, TITLE_STYLE, TODAY_STYLE,
    WEEKDAY_STYLE, WEEKEND_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Paragraph, Widget},
};
use time::Date;

/// Number of columns per day of week
const DAY_WIDTH: u16 = 7;

/// Width of the calendar in columns
const MAIN_WIDTH: u16 = DAY_WIDTH * 7;

/// Columns between the left edge of a day's column and the start of its text
const DAY_INDENT: u16 = 1;

const TITLE_LINE: u16 = 0;
const SUBTITLE_LINE: u16 = 1;
const WEEKDAY_LINE: u16 = 2;
const RULE_LINE: u16 = 3;

/// Number of lines above the first week
const HEADER_LINES: u16 = 4;

/// Number of lines taken up by each week in month view
const WEEK_LINES: u16 = 2;

/// Number of lines taken up by the week in week view
const WEEK_VIEW_LINES: u16 = 2;

const TODAY_LABEL: &str = "Today";

const ACS_HLINE: char = '─';

/// Draws the grid of a `CalendarState` along with its title & weekday header
#[derive(Clone, Copy, Debug)]
pub(crate) struct Calendar<'a> {
    state: &'a CalendarState,
}

impl<'a> Calendar<'a> {
    pub(crate) fn new(state: &'a CalendarState) -> Calendar<'a> {
        Calendar { state }
    }

    /// Returns the date drawn at screen position (`column`, `row`) when the
    /// calendar is rendered in `area`.  Either line of a week counts as part
    /// of it.
    pub(crate) fn date_at(&self, area: Rect, column: u16, row: u16) -> Option<Date> {
        let area = main_area(area);
        if column >= area.right() || row >= area.bottom() {
            return None;
        }
        let x = column.checked_sub(area.x)?;
        let y = row.checked_sub(area.y)?.checked_sub(HEADER_LINES)?;
        let grid = self.state.grid();
        let week_no = match grid.view() {
            ViewMode::Month => usize::from(y / WEEK_LINES),
            ViewMode::Week => (y < WEEK_VIEW_LINES).then_some(0)?,
        };
        grid.weeks()
            .get(week_no)?
            .iter()
            .nth(usize::from(x / DAY_WIDTH))
            .map(|cell| cell.date)
    }
}

fn main_area(area: Rect) -> Rect {
    let [area] = Layout::horizontal([MAIN_WIDTH])
        .flex(Flex::Center)
        .areas(area);
    area
}

fn selection_text(date: Date) -> String {
    format!(
        "Selected: {} {} {}, {}",
        weekday_abbrev(date.weekday()),
        month_abbrev(date.month()),
        date.day(),
        date.year()
    )
}

impl Widget for Calendar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut canvas = BufferCanvas::new(main_area(area), buf);
        canvas.draw_centered(TITLE_LINE, self.state.title(), TITLE_STYLE);
        if let Some(subtitle) = self.state.subtitle() {
            canvas.draw_centered(SUBTITLE_LINE, subtitle, SUBTITLE_STYLE);
        }
        for (col, wd) in std::iter::zip(0u16.., self.state.week_start().weekdays()) {
            canvas.mvprint(
                WEEKDAY_LINE,
                col * DAY_WIDTH + DAY_INDENT,
                weekday_abbrev(wd),
                Some(WEEKDAY_STYLE),
            );
        }
        canvas.hline(RULE_LINE, 0, ACS_HLINE, MAIN_WIDTH);
        let grid = self.state.grid();
        let status_line = match grid.view() {
            ViewMode::Month => {
                let mut y = HEADER_LINES;
                for week in grid.weeks() {
                    canvas.draw_week(y, week);
                    y = y.saturating_add(WEEK_LINES);
                }
                y
            }
            ViewMode::Week => {
                for week in grid.weeks() {
                    canvas.draw_week(HEADER_LINES, week);
                }
                if let Some(col) = grid.cells().position(|cell| cell.is_today) {
                    let col = u16::try_from(col).unwrap_or(u16::MAX);
                    canvas.mvprint(
                        HEADER_LINES + 1,
                        col.saturating_mul(DAY_WIDTH) + DAY_INDENT,
                        TODAY_LABEL,
                        Some(TODAY_STYLE),
                    );
                }
                HEADER_LINES + WEEK_VIEW_LINES
            }
        };
        if let Some(date) = self.state.selected() {
            canvas.draw_centered(status_line, selection_text(date), SUBTITLE_STYLE);
        }
    }
}

fn cell_style(cell: &DayCell) -> Style {
    let mut style = if !cell.is_current_period {
        OTHER_PERIOD_STYLE
    } else if cell.is_weekend {
        WEEKEND_STYLE
    } else {
        BASE_STYLE
    };
    if cell.is_today {
        style = style.patch(TODAY_STYLE);
    }
    if cell.is_selected {
        style = style.patch(SELECTED_STYLE);
    }
    style
}

fn cell_text(cell: &DayCell) -> String {
    if cell.is_today {
        format!("[{:2}]", cell.date.day())
    } else {
        format!(" {:2} ", cell.date.day())
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_week(&mut self, y: u16, week: &Week) {
        for (col, cell) in std::iter::zip(0u16.., week) {
            self.mvprint(
                y,
                col * DAY_WIDTH + DAY_INDENT,
                cell_text(cell),
                Some(cell_style(cell)),
            );
        }
    }

    fn draw_centered(&mut self, y: u16, s: String, style: Style) {
        if y < self.area.height {
            Line::styled(s, style).centered().render(
                Rect {
                    x: self.area.x,
                    y: y + self.area.y,
                    width: self.area.width,
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Option<Style>) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style.unwrap_or_default());
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // The Rect given to the Paragraph must lie entirely within the
            // buffer, so clip the text to the calendar's area.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), None);
    }
}
