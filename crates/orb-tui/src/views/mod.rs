pub mod activity;
pub mod burndown;
pub mod details;
pub mod header;
pub mod legend;
pub mod orb;

/// Hours without a trailing `.0`: `850`, `142.5`.
pub fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{}", hours as i64)
    } else {
        format!("{:.1}", hours)
    }
}

/// Axis label in thousands, e.g. `$120k`.
pub fn format_thousands(value: f64) -> String {
    format!("${}k", (value / 1000.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_drop_trailing_zero() {
        assert_eq!(format_hours(850.0), "850");
        assert_eq!(format_hours(142.5), "142.5");
        assert_eq!(format_hours(0.3), "0.3");
    }

    #[test]
    fn thousands_round() {
        assert_eq!(format_thousands(180_000.0), "$180k");
        assert_eq!(format_thousands(0.0), "$0k");
        assert_eq!(format_thousands(59_600.0), "$60k");
    }
}
