//! Point-in-time availability built on resolved windows.

use chrono::{DateTime, Utc};

use crate::models::availability::{ProviderStatus, ResolvedWindow};

impl ProviderStatus {
    /// Nothing free at the instant and nothing found ahead of it.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            current_window: None,
            next_available_at: None,
        }
    }

    /// True once the answer no longer depends on later days.
    pub fn is_settled(&self) -> bool {
        self.available || self.next_available_at.is_some()
    }
}

/// Evaluates `instant` against a set of windows.
///
/// Busy windows are ignored. When `instant` is not inside a free window,
/// `next_available_at` is the earliest free window start after it.
pub fn status_at(instant: DateTime<Utc>, windows: &[ResolvedWindow]) -> ProviderStatus {
    let free = windows.iter().filter(|w| w.is_available);

    if let Some(current) = free.clone().find(|w| w.contains(instant)) {
        return ProviderStatus {
            available: true,
            current_window: Some(*current),
            next_available_at: None,
        };
    }

    ProviderStatus {
        available: false,
        current_window: None,
        next_available_at: free
            .filter(|w| w.start > instant)
            .map(|w| w.start)
            .min(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn window(start_h: u32, end_h: u32, is_available: bool) -> ResolvedWindow {
        ResolvedWindow {
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            start: Utc.with_ymd_and_hms(2025, 3, 10, start_h, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 3, 10, end_h, 0, 0).unwrap(),
            is_available,
        }
    }

    #[test]
    fn inside_a_free_window_is_available() {
        let windows = [window(9, 12, true), window(12, 13, false), window(13, 17, true)];
        let status = status_at(Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap(), &windows);
        assert!(status.available);
        assert_eq!(status.current_window, Some(windows[0]));
        assert_eq!(status.next_available_at, None);
    }

    #[test]
    fn window_end_is_exclusive() {
        let windows = [window(9, 12, true), window(13, 17, true)];
        let status = status_at(Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap(), &windows);
        assert!(!status.available);
        assert_eq!(status.next_available_at, Some(windows[1].start));
    }

    #[test]
    fn nothing_ahead_is_not_an_error() {
        let windows = [window(9, 12, true)];
        let status = status_at(Utc.with_ymd_and_hms(2025, 3, 10, 18, 0, 0).unwrap(), &windows);
        assert_eq!(status, ProviderStatus::unavailable());
        assert!(!status.is_settled());
    }
}
