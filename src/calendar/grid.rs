use super::dates::{
    add_days, days_through, end_of_month, is_weekend, same_day, same_month, start_of_month,
    OutOfTimeError, WeekStart, DAYS_IN_WEEK,
};
use std::ops::Index;
use time::Date;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum ViewMode {
    #[default]
    Month,
    Week,
}

impl ViewMode {
    pub(crate) fn toggle(self) -> ViewMode {
        match self {
            ViewMode::Month => ViewMode::Week,
            ViewMode::Week => ViewMode::Month,
        }
    }
}

/// A single date of the grid along with the flags that govern how it is
/// displayed
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DayCell {
    pub(crate) date: Date,
    /// Whether the date lies in the month being displayed.  Always true in
    /// week view.
    pub(crate) is_current_period: bool,
    pub(crate) is_today: bool,
    pub(crate) is_selected: bool,
    pub(crate) is_weekend: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Week([DayCell; DAYS_IN_WEEK]);

impl Week {
    pub(crate) fn iter(&self) -> std::slice::Iter<'_, DayCell> {
        self.0.iter()
    }

    pub(crate) fn first(&self) -> DayCell {
        self.0[0]
    }

    pub(crate) fn last(&self) -> DayCell {
        self.0[DAYS_IN_WEEK - 1]
    }
}

impl Index<usize> for Week {
    type Output = DayCell;

    fn index(&self, column: usize) -> &DayCell {
        &self.0[column]
    }
}

impl<'a> IntoIterator for &'a Week {
    type Item = &'a DayCell;
    type IntoIter = std::slice::Iter<'a, DayCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The rows of dates to display for one month or one week
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Grid {
    view: ViewMode,
    /// First day of the displayed month, or first day of the displayed week
    period_start: Date,
    // Invariant: nonempty, and the dates across all rows are consecutive
    weeks: Vec<Week>,
}

impl Grid {
    pub(crate) fn view(&self) -> ViewMode {
        self.view
    }

    pub(crate) fn period_start(&self) -> Date {
        self.period_start
    }

    pub(crate) fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    /// All cells of the grid in date order
    pub(crate) fn cells(&self) -> impl Iterator<Item = &DayCell> + '_ {
        self.weeks.iter().flat_map(Week::iter)
    }

    pub(crate) fn first_date(&self) -> Date {
        self.weeks
            .first()
            .map_or(self.period_start, |w| w.first().date)
    }

    pub(crate) fn last_date(&self) -> Date {
        self.weeks
            .last()
            .map_or(self.period_start, |w| w.last().date)
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        (self.first_date()..=self.last_date()).contains(&date)
    }
}

/// Builds month and week grids.  Holds everything other than the anchor date
/// that goes into the cell flags.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct GridBuilder {
    pub(crate) week_start: WeekStart,
    pub(crate) today: Date,
    pub(crate) selected: Option<Date>,
}

impl GridBuilder {
    pub(crate) fn build(&self, view: ViewMode, anchor: Date) -> Result<Grid, OutOfTimeError> {
        match view {
            ViewMode::Month => self.month(anchor),
            ViewMode::Week => self.week(anchor),
        }
    }

    /// Returns the weeks covering the whole month containing `anchor`, padded
    /// out with days from the neighboring months
    pub(crate) fn month(&self, anchor: Date) -> Result<Grid, OutOfTimeError> {
        let month_start = start_of_month(anchor);
        let month_end = end_of_month(anchor);
        let grid_start = self
            .week_start
            .start_of_week(month_start)
            .ok_or(OutOfTimeError)?;
        let grid_end = self
            .week_start
            .end_of_week(month_end)
            .ok_or(OutOfTimeError)?;
        let cells = days_through(grid_start, grid_end)
            .map(|d| self.cell(d, same_month(d, month_start)))
            .collect::<Vec<_>>();
        Ok(Grid {
            view: ViewMode::Month,
            period_start: month_start,
            weeks: into_weeks(&cells),
        })
    }

    /// Returns the single week containing `anchor`
    pub(crate) fn week(&self, anchor: Date) -> Result<Grid, OutOfTimeError> {
        let week_start = self
            .week_start
            .start_of_week(anchor)
            .ok_or(OutOfTimeError)?;
        let week_end = add_days(week_start, 6).ok_or(OutOfTimeError)?;
        let cells = days_through(week_start, week_end)
            .map(|d| self.cell(d, true))
            .collect::<Vec<_>>();
        Ok(Grid {
            view: ViewMode::Week,
            period_start: week_start,
            weeks: into_weeks(&cells),
        })
    }

    fn cell(&self, date: Date, is_current_period: bool) -> DayCell {
        DayCell {
            date,
            is_current_period,
            is_today: same_day(date, self.today),
            is_selected: self.selected.is_some_and(|sel| same_day(date, sel)),
            is_weekend: is_weekend(date),
        }
    }
}

fn into_weeks(cells: &[DayCell]) -> Vec<Week> {
    cells
        .chunks_exact(DAYS_IN_WEEK)
        .filter_map(|chunk| <[DayCell; DAYS_IN_WEEK]>::try_from(chunk).ok())
        .map(Week)
        .collect()
}
