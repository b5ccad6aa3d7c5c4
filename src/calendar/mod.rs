mod dates;
mod grid;
mod state;
mod widget;
pub(crate) use self::dates::{OutOfTimeError, WeekStart};
pub(crate) use self::grid::ViewMode;
pub(crate) use self::state::CalendarState;
pub(crate) use self::widget::Calendar;
