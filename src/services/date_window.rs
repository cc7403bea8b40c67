use chrono::{Duration, NaiveDate};

use crate::domain::calendar::CalendarDay;

/// The selected day plus the strip of days the navigator shows around it.
///
/// The strip starts at `anchor` and is `stride` days long. Stepping moves the
/// anchor and the selection together by one stride; jumping re-anchors the
/// strip on the target day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    anchor: NaiveDate,
    selected: NaiveDate,
    stride: u32,
}

impl DateWindow {
    pub fn new(selected: impl CalendarDay, stride: u32) -> Self {
        let selected = selected.calendar_day();
        Self {
            anchor: selected,
            selected,
            stride: stride.max(1),
        }
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn advance(&mut self) {
        self.shift(i64::from(self.stride));
    }

    pub fn retreat(&mut self) {
        self.shift(-i64::from(self.stride));
    }

    pub fn jump_to(&mut self, date: impl CalendarDay) {
        let day = date.calendar_day();
        self.anchor = day;
        self.selected = day;
    }

    /// Selects a day; re-anchors only when it falls outside the strip.
    pub fn select(&mut self, date: impl CalendarDay) {
        let day = date.calendar_day();
        if self.visible_days().contains(&day) {
            self.selected = day;
        } else {
            self.jump_to(day);
        }
    }

    pub fn visible_days(&self) -> Vec<NaiveDate> {
        (0..self.stride)
            .filter_map(|offset| self.anchor.checked_add_signed(Duration::days(i64::from(offset))))
            .collect()
    }

    fn shift(&mut self, days: i64) {
        let delta = Duration::days(days);
        // Saturate at chrono's calendar limits.
        if let (Some(anchor), Some(selected)) = (
            self.anchor.checked_add_signed(delta),
            self.selected.checked_add_signed(delta),
        ) {
            self.anchor = anchor;
            self.selected = selected;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_advance_and_retreat_by_stride() {
        let mut window = DateWindow::new(day(2024, 5, 1), 5);
        window.advance();
        assert_eq!(window.selected(), day(2024, 5, 6));
        window.retreat();
        window.retreat();
        assert_eq!(window.selected(), day(2024, 4, 26));
    }

    #[test]
    fn test_visible_days() {
        let window = DateWindow::new(day(2024, 2, 27), 5);
        assert_eq!(
            window.visible_days(),
            vec![day(2024, 2, 27), day(2024, 2, 28), day(2024, 2, 29), day(2024, 3, 1), day(2024, 3, 2)]
        );
    }

    #[test]
    fn test_select_inside_strip_keeps_anchor() {
        let mut window = DateWindow::new(day(2024, 5, 1), 5);
        window.select(day(2024, 5, 3));
        assert_eq!(window.selected(), day(2024, 5, 3));
        assert_eq!(window.visible_days()[0], day(2024, 5, 1));

        window.select(day(2024, 6, 1));
        assert_eq!(window.visible_days()[0], day(2024, 6, 1));
    }

    #[test]
    fn test_zero_stride_is_one_day() {
        let mut window = DateWindow::new(day(2024, 5, 1), 0);
        assert_eq!(window.stride(), 1);
        window.advance();
        assert_eq!(window.selected(), day(2024, 5, 2));
    }

    #[test]
    fn test_jump_to_datetime_uses_its_day() {
        let mut window = DateWindow::new(day(2024, 5, 1), 5);
        window.jump_to(day(2025, 1, 9).and_hms_opt(23, 59, 0).unwrap());
        assert_eq!(window.selected(), day(2025, 1, 9));
    }
}
