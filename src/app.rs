use crate::calendar::{Calendar, CalendarState, OutOfTimeError, ViewMode};
use crate::help::Help;
use crate::theme::BASE_STYLE;
use crossterm::event::{
    read, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget, DefaultTerminal};
use std::io::{self, Write};
use time::OffsetDateTime;
use tracing::{debug, warn};

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App {
    calendar: CalendarState,
    state: AppState,
    /// The area most recently drawn to, used to map mouse clicks to dates
    area: Rect,
}

impl App {
    pub(crate) fn new(calendar: CalendarState) -> App {
        App {
            calendar,
            state: AppState::Calendar,
            area: Rect::default(),
        }
    }

    pub(crate) fn run(mut self, mut terminal: DefaultTerminal) -> io::Result<()> {
        while !self.quitting() {
            self.area = terminal
                .draw(|frame| frame.render_widget(&self, frame.area()))?
                .area;
            self.handle_input()?;
            self.refresh_today();
        }
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        let event = read()?;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = event.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        } else if let Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) = event
        {
            if !self.handle_click(column, row) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key or tried to go past
    // the end of time
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Calendar => match key {
                KeyCode::Char('p' | '[') | KeyCode::PageUp => {
                    self.apply(CalendarState::go_to_previous)
                }
                KeyCode::Char('n' | ']') | KeyCode::PageDown => {
                    self.apply(CalendarState::go_to_next)
                }
                KeyCode::Char('t' | '0') | KeyCode::Home => self.apply(CalendarState::go_to_today),
                KeyCode::Char('m') => self.apply(|cal| cal.set_view_mode(ViewMode::Month)),
                KeyCode::Char('w') => self.apply(|cal| cal.set_view_mode(ViewMode::Week)),
                KeyCode::Char('v') | KeyCode::Tab => {
                    self.apply(|cal| cal.set_view_mode(cal.view().toggle()))
                }
                KeyCode::Char('h') | KeyCode::Left => self.apply(|cal| cal.move_selection(-1)),
                KeyCode::Char('l') | KeyCode::Right => self.apply(|cal| cal.move_selection(1)),
                KeyCode::Char('k') | KeyCode::Up => self.apply(|cal| cal.move_selection(-7)),
                KeyCode::Char('j') | KeyCode::Down => self.apply(|cal| cal.move_selection(7)),
                KeyCode::Char('x') => self.apply(CalendarState::clear_selection),
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Quitting => false,
        }
    }

    // Clicking on a day selects it; clicking anywhere else is ignored.
    // Returns `false` only if the selection could not be made.
    fn handle_click(&mut self, column: u16, row: u16) -> bool {
        match self.state {
            AppState::Calendar => {
                match Calendar::new(&self.calendar).date_at(self.area, column, row) {
                    Some(date) => self.apply(|cal| cal.select_date(date)),
                    None => true,
                }
            }
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Quitting => false,
        }
    }

    fn apply<F>(&mut self, func: F) -> bool
    where
        F: FnOnce(&mut CalendarState) -> Result<(), OutOfTimeError>,
    {
        match func(&mut self.calendar) {
            Ok(()) => true,
            Err(e) => {
                warn!(reference = %self.calendar.reference(), "{e}");
                false
            }
        }
    }

    // The current date is re-read after every event so that the "today"
    // marker moves once midnight passes.
    fn refresh_today(&mut self) {
        match OffsetDateTime::now_local() {
            Ok(now) if now.date() != self.calendar.today() => {
                if let Err(e) = self.calendar.set_today(now.date()) {
                    warn!(today = %now.date(), "{e}");
                }
            }
            Ok(_) => (),
            Err(e) => debug!("failed to determine local date: {e}"),
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        Calendar::new(&self.calendar).render(area, buf);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Quitting,
}
