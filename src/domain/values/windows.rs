//! Calendar windows the dashboard counts against.
//!
//! All boundaries are derived from one instant (the request time) in the
//! configured time zone. Weeks start on Monday.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingWindows {
    pub now: DateTime<Utc>,
    pub today: NaiveDate,
    pub week_start: NaiveDate,
    pub month_start: NaiveDate,
    pub next_month_start: NaiveDate,
    /// Local midnight of `week_start`, as an instant.
    pub week_start_at: DateTime<Utc>,
}

impl ReportingWindows {
    pub fn at(now: DateTime<Utc>, tz: Tz) -> Self {
        let today = now.with_timezone(&tz).date_naive();
        let week_start = today - Duration::days(today.weekday().num_days_from_monday() as i64);
        let month_start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
        let next_month_start = if today.month() == 12 {
            NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
        }
        .unwrap_or(today);

        Self {
            now,
            today,
            week_start,
            month_start,
            next_month_start,
            week_start_at: local_midnight(week_start, tz),
        }
    }

    pub fn is_today(&self, date: NaiveDate) -> bool {
        date == self.today
    }

    pub fn in_week(&self, date: NaiveDate) -> bool {
        date >= self.week_start && date < self.week_start + Duration::days(7)
    }

    pub fn in_month(&self, date: NaiveDate) -> bool {
        date >= self.month_start && date < self.next_month_start
    }

    /// Consultation window for deals: from the start of this week up to seven
    /// days past `now`, which reaches into next week.
    pub fn in_consultation_horizon(&self, at: DateTime<Utc>) -> bool {
        at >= self.week_start_at && at <= self.now + Duration::days(7)
    }
}

fn local_midnight(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}
