//! Valentine's Day countdown helpers. Months are zero-based (January = 0)
//! to line up with the JS `Date` accessors the web layer reads from.

pub const FEBRUARY: u32 = 1;
pub const VALENTINES_DAY: u32 = 14;

/// Year of the next Feb 14 midnight. Exactly midnight on Feb 14 still
/// counts as this year's target; any later instant rolls over.
pub fn valentines_target_year(year: i32, month0: u32, day: u32, ms_into_day: f64) -> i32 {
    let after = (month0, day) > (FEBRUARY, VALENTINES_DAY)
        || ((month0, day) == (FEBRUARY, VALENTINES_DAY) && ms_into_day > 0.0);
    if after { year + 1 } else { year }
}

pub fn is_valentines_day(month0: u32, day: u32) -> bool {
    month0 == FEBRUARY && day == VALENTINES_DAY
}

/// `"{d}d {hh}h {mm}m {ss}s"`; negative input shows all zeroes.
pub fn format_countdown(ms: f64) -> String {
    let total = if ms.is_finite() { (ms / 1000.0).floor().max(0.0) as u64 } else { 0 };
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    format!("{days}d {hours:02}h {minutes:02}m {seconds:02}s")
}
