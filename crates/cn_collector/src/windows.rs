use chrono::{DateTime, Duration, Utc};
use cn_core::{DateRange, TimeWindow};

/// Default window set: four consecutive lookback buckets covering the
/// last year, newest first.
pub fn default_windows() -> Vec<TimeWindow> {
    vec![
        TimeWindow::new("present_to_2weeks", 0, 14),
        TimeWindow::new("2weeks_to_1month", 14, 30),
        TimeWindow::new("1month_to_1quarter", 30, 90),
        TimeWindow::new("1quarter_to_1year", 90, 365),
    ]
}

/// Resolves a window against a reference instant. Offsets are subtracted
/// from `now` and truncated to calendar dates.
pub fn compute_range(window: &TimeWindow, now: DateTime<Utc>) -> DateRange {
    DateRange {
        from: (now - Duration::days(window.end_offset_days)).date_naive(),
        to: (now - Duration::days(window.start_offset_days)).date_naive(),
    }
}
