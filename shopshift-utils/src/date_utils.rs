use time::{Date, Duration};

/// A calendar week running from Monday to Sunday.
///
/// Weekly budgets and every week based query use this boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StoreWeek {
    pub start: Date,
    pub end: Date,
}

impl StoreWeek {
    pub fn containing(date: Date) -> Self {
        let offset = date.weekday().number_days_from_monday();
        let start = date - Duration::days(i64::from(offset));
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn previous(&self) -> Self {
        Self::containing(self.start - Duration::days(7))
    }

    /// The `weeks` most recent weeks ending with the week of `date`,
    /// as one continuous date range.
    pub fn range_ending_at(date: Date, weeks: u8) -> (Date, Date) {
        let last = Self::containing(date);
        let first = (1..weeks.max(1)).fold(last, |week, _| week.previous());
        (first.start, last.end)
    }
}
