use ratatui::{
    buffer::Buffer,
    layout::Flex,
    layout::{Alignment, Layout, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};

static TEXT: &[&str] = &[
    "p, [, PAGE UP        Previous month/week\n",
    "n, ], PAGE DOWN      Next month/week\n",
    "t, 0, HOME           Jump to today\n",
    "m                    Month view\n",
    "w                    Week view\n",
    "v, TAB               Switch view\n",
    "h, LEFT / l, RIGHT   Select previous/next day\n",
    "k, UP / j, DOWN      Select previous/next week\n",
    "x                    Clear selection\n",
    "?                    Show this help\n",
    "q, ESC               Quit\n",
    "\n",
    "Press the Any Key to dismiss.\n",
];

/// Columns or lines taken up by the box's border
const BORDER_SIZE: u16 = 2;

/// Blank columns drawn to the left & right of the box
const MARGIN_SIZE: u16 = 2;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = TEXT.iter().map(|&s| Line::raw(s)).collect::<Vec<_>>();
        let text = Text::from(lines);
        // Leave room for the border plus a one-column margin on each side
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .saturating_add(BORDER_SIZE)
            .min(area.height);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .saturating_add(BORDER_SIZE)
            .min(area.width.saturating_sub(MARGIN_SIZE));
        let para = Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Commands ")
                    .title_alignment(Alignment::Center),
            )
            .style(self.0);
        let [help_area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [help_area] = Layout::vertical([height])
            .flex(Flex::Center)
            .areas(help_area);
        let outer_area = Rect {
            x: help_area.x.saturating_sub(1),
            y: help_area.y,
            width: help_area.width.saturating_add(MARGIN_SIZE),
            height: help_area.height,
        }
        .intersection(area);
        Clear.render(outer_area, buf);
        Block::new().style(self.0).render(outer_area, buf);
        para.render(help_area.intersection(area), buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::BASE_STYLE;

    #[test]
    fn test_help_box() {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        Help(BASE_STYLE).render(area, &mut buffer);
        let row = |y: u16| {
            (0..area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        };
        let top = (0..area.height)
            .find(|&y| row(y).contains(" Commands "))
            .unwrap();
        assert!(row(top).contains('┌'));
        assert!(row(top + 1).contains("Previous month/week"));
        assert!(row(top + 11).contains("Quit"));
        assert!(row(top + 13).contains("Press the Any Key to dismiss."));
        assert!(row(top + 14).contains('┘'));
    }

    #[test]
    fn test_help_box_narrow() {
        for (width, height) in [(49, 24), (48, 24), (20, 24), (20, 8), (2, 3), (0, 0)] {
            let area = Rect::new(0, 0, width, height);
            let mut buffer = Buffer::empty(area);
            Help(BASE_STYLE).render(area, &mut buffer);
            if width >= 20 && height >= 8 {
                let found = (0..height).any(|y| {
                    (0..width)
                        .map(|x| buffer[(x, y)].symbol())
                        .collect::<String>()
                        .contains("Commands")
                });
                assert!(found, "no title at {width}x{height}");
            }
        }
    }

    #[test]
    fn test_help_box_offset_area() {
        let full = Rect::new(0, 0, 60, 30);
        let mut buffer = Buffer::empty(full);
        let area = Rect::new(10, 5, 30, 20);
        Help(BASE_STYLE).render(area, &mut buffer);
        for y in 0..full.height {
            for x in 0..full.width {
                if !area.contains(ratatui::layout::Position { x, y }) {
                    assert_eq!(buffer[(x, y)].symbol(), " ", "drew outside area at ({x}, {y})");
                }
            }
        }
    }
}
