use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};

/// One calendar month, `[start, end)` in UTC
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthWindow {
    /// Display label, e.g. "Tháng 3"
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

fn month_start(month_index: i32) -> Option<DateTime<Utc>> {
    let year = month_index.div_euclid(12);
    let month = month_index.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

/// The month containing `now` and the `count - 1` months before it, oldest first
pub fn month_windows(now: DateTime<Utc>, count: u32) -> Vec<MonthWindow> {
    let current = now.year() * 12 + now.month0() as i32;

    (0..count as i32)
        .rev()
        .filter_map(|back| {
            let index = current - back;
            Some(MonthWindow {
                label: format!("Tháng {}", index.rem_euclid(12) + 1),
                start: month_start(index)?,
                end: month_start(index + 1)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_five_windows_oldest_first() {
        let now = Utc.with_ymd_and_hms(2024, 7, 15, 10, 30, 0).unwrap();
        let windows = month_windows(now, 5);

        let labels: Vec<_> = windows.iter().map(|w| w.label.as_str()).collect();
        assert_eq!(labels, ["Tháng 3", "Tháng 4", "Tháng 5", "Tháng 6", "Tháng 7"]);

        assert_eq!(windows[0].start, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(windows[4].end, Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap());
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_windows_cross_year_boundary() {
        let now = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let windows = month_windows(now, 5);

        let labels: Vec<_> = windows.iter().map(|w| w.label.as_str()).collect();
        assert_eq!(labels, ["Tháng 10", "Tháng 11", "Tháng 12", "Tháng 1", "Tháng 2"]);
        assert_eq!(windows[2].start, Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(windows[2].end, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_december_window_ends_next_year() {
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        let windows = month_windows(now, 1);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].label, "Tháng 12");
        assert_eq!(windows[0].end, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }
}
