use super::dates::{add_days, add_months, add_weeks, month_abbrev, OutOfTimeError, WeekStart};
use super::grid::{Grid, GridBuilder, ViewMode};
use time::Date;
use tracing::debug;

/// The user-facing state of the calendar together with the grid computed from
/// it.  The grid is rebuilt after every transition; a transition that would
/// need a grid extending past the end of time fails and leaves the state as
/// it was.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CalendarState {
    today: Date,
    reference: Date,
    view: ViewMode,
    selected: Option<Date>,
    week_start: WeekStart,
    grid: Grid,
}

impl CalendarState {
    pub(crate) fn new(today: Date, week_start: WeekStart) -> Result<Self, OutOfTimeError> {
        let view = ViewMode::default();
        let selected = Some(today);
        let grid = GridBuilder {
            week_start,
            today,
            selected,
        }
        .build(view, today)?;
        Ok(CalendarState {
            today,
            reference: today,
            view,
            selected,
            week_start,
            grid,
        })
    }

    pub(crate) fn reference_date(mut self, date: Date) -> Result<Self, OutOfTimeError> {
        self.commit(|st| st.reference = date)?;
        Ok(self)
    }

    pub(crate) fn view_mode(mut self, view: ViewMode) -> Result<Self, OutOfTimeError> {
        self.commit(|st| st.view = view)?;
        Ok(self)
    }

    pub(crate) fn today(&self) -> Date {
        self.today
    }

    pub(crate) fn reference(&self) -> Date {
        self.reference
    }

    pub(crate) fn view(&self) -> ViewMode {
        self.view
    }

    pub(crate) fn selected(&self) -> Option<Date> {
        self.selected
    }

    pub(crate) fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub(crate) fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The month & year being viewed, e.g., "February 2024"
    pub(crate) fn title(&self) -> String {
        format!("{} {}", self.reference.month(), self.reference.year())
    }

    /// In week view, the span of the displayed week, e.g., "Jun 9 - Jun 15,
    /// 2024"
    pub(crate) fn subtitle(&self) -> Option<String> {
        (self.view == ViewMode::Week).then(|| {
            let first = self.grid.period_start();
            let last = self.grid.last_date();
            format!(
                "{} {} - {} {}, {}",
                month_abbrev(first.month()),
                first.day(),
                month_abbrev(last.month()),
                last.day(),
                last.year()
            )
        })
    }

    pub(crate) fn go_to_previous(&mut self) -> Result<(), OutOfTimeError> {
        let reference = match self.view {
            ViewMode::Month => add_months(self.reference, -1),
            ViewMode::Week => add_weeks(self.reference, -1),
        }
        .ok_or(OutOfTimeError)?;
        self.commit(|st| st.reference = reference)?;
        debug!(reference = %self.reference, view = ?self.view, "moved to previous period");
        Ok(())
    }

    pub(crate) fn go_to_next(&mut self) -> Result<(), OutOfTimeError> {
        let reference = match self.view {
            ViewMode::Month => add_months(self.reference, 1),
            ViewMode::Week => add_weeks(self.reference, 1),
        }
        .ok_or(OutOfTimeError)?;
        self.commit(|st| st.reference = reference)?;
        debug!(reference = %self.reference, view = ?self.view, "moved to next period");
        Ok(())
    }

    pub(crate) fn go_to_today(&mut self) -> Result<(), OutOfTimeError> {
        self.commit(|st| st.reference = st.today)?;
        debug!(reference = %self.reference, "jumped to today");
        Ok(())
    }

    pub(crate) fn set_view_mode(&mut self, view: ViewMode) -> Result<(), OutOfTimeError> {
        self.commit(|st| st.view = view)?;
        debug!(view = ?self.view, "changed view");
        Ok(())
    }

    /// Select the given date.  The date need not be in the displayed grid.
    pub(crate) fn select_date(&mut self, date: Date) -> Result<(), OutOfTimeError> {
        self.commit(|st| st.selected = Some(date))?;
        debug!(selected = %date, "selected date");
        Ok(())
    }

    pub(crate) fn clear_selection(&mut self) -> Result<(), OutOfTimeError> {
        self.commit(|st| st.selected = None)?;
        debug!("cleared selection");
        Ok(())
    }

    /// Move the selection `days` days from its current position (or from
    /// today if nothing is selected).  If the new selection is not in the
    /// displayed grid, the view moves to it.
    pub(crate) fn move_selection(&mut self, days: i64) -> Result<(), OutOfTimeError> {
        let from = self.selected.unwrap_or(self.today);
        let to = add_days(from, days).ok_or(OutOfTimeError)?;
        let follow = !self.grid.contains(to);
        self.commit(|st| {
            st.selected = Some(to);
            if follow {
                st.reference = to;
            }
        })?;
        debug!(selected = %to, follow, "moved selection");
        Ok(())
    }

    /// Update the current date.  Only the cell flags change; the view stays
    /// where it is.
    pub(crate) fn set_today(&mut self, today: Date) -> Result<(), OutOfTimeError> {
        if today != self.today {
            self.commit(|st| st.today = today)?;
            debug!(%today, "date changed");
        }
        Ok(())
    }

    fn builder(&self) -> GridBuilder {
        GridBuilder {
            week_start: self.week_start,
            today: self.today,
            selected: self.selected,
        }
    }

    fn commit<F: FnOnce(&mut Self)>(&mut self, func: F) -> Result<(), OutOfTimeError> {
        let mut next = self.clone();
        func(&mut next);
        next.grid = next.builder().build(next.view, next.reference)?;
        *self = next;
        Ok(())
    }
}
