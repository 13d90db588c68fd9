//! Rolling time windows used for usage accounting.

use chrono::{DateTime, Datelike, Days, NaiveTime, Offset, TimeZone};

use crate::config::CYCLE_HOURS;


/// Start of the weekly and cycle windows, in epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageWindows {
    pub week_start: f64,
    pub cycle_start: f64,
}


impl UsageWindows {
    /// Windows containing `now`, with the week anchored in `now`'s timezone.
    pub fn at<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        Self {
            week_start: week_start(now),
            cycle_start: cycle_start(epoch_seconds(now)),
        }
    }
}


/// Most recent Monday at local midnight, as epoch seconds.
pub fn week_start<Tz: TimeZone>(now: &DateTime<Tz>) -> f64 {
    let days_since_monday = u64::from(now.weekday().num_days_from_monday());
    let monday = now.date_naive() - Days::new(days_since_monday);
    let midnight = monday.and_time(NaiveTime::MIN);

    let tz = now.timezone();
    match tz.from_local_datetime(&midnight).earliest() {
        Some(dt) => dt.timestamp() as f64,
        // Midnight skipped by a DST jump: apply the zone's offset directly.
        None => {
            let offset = tz.offset_from_utc_datetime(&midnight).fix().local_minus_utc();
            (midnight.and_utc().timestamp() - i64::from(offset)) as f64
        }
    }
}


/// Start of the fixed-length cycle containing `now_epoch`.
///
/// Cycles are aligned to the Unix epoch, not to calendar boundaries.
pub fn cycle_start(now_epoch: f64) -> f64 {
    let cycle_secs = (CYCLE_HOURS * 3600) as f64;
    (now_epoch / cycle_secs).floor() * cycle_secs
}


/// Epoch seconds with millisecond precision.
pub fn epoch_seconds<Tz: TimeZone>(dt: &DateTime<Tz>) -> f64 {
    dt.timestamp_millis() as f64 / 1000.0
}
