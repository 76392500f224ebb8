use chrono::{Days, Local, NaiveDate};

/// Estimates the date an active listing will be sold on.
///
/// Active listings have no sale date yet; records still get a `sold_date`
/// so they line up with sold records.
pub trait ListingDateEstimator: Send + Sync {
    fn estimate(&self) -> NaiveDate;
}

/// Always the same date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDate(pub NaiveDate);

impl Default for FixedDate {
    fn default() -> Self {
        Self(NaiveDate::from_ymd_opt(2021, 6, 15).unwrap_or(NaiveDate::MIN))
    }
}

impl ListingDateEstimator for FixedDate {
    fn estimate(&self) -> NaiveDate {
        self.0
    }
}

/// Today plus a number of days (roughly half the time a listing stays up)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaysAhead {
    pub days: i64,
}

impl DaysAhead {
    fn shift(&self, today: NaiveDate) -> NaiveDate {
        let shifted = if self.days >= 0 {
            today.checked_add_days(Days::new(self.days.unsigned_abs()))
        } else {
            today.checked_sub_days(Days::new(self.days.unsigned_abs()))
        };
        shifted.unwrap_or(today)
    }
}

impl ListingDateEstimator for DaysAhead {
    fn estimate(&self) -> NaiveDate {
        self.shift(Local::now().date_naive())
    }
}

/// Date as stored in records
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
