use chrono::{Datelike, Utc, Weekday};
use domain::notify::entity::DayOfWeek;
use ports::secondary::clock_port::ClockPort;

/// Wall-clock adapter: current UTC day of week.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn utc_day(&self) -> DayOfWeek {
        weekday_to_domain(Utc::now().weekday())
    }
}

fn weekday_to_domain(weekday: Weekday) -> DayOfWeek {
    match weekday {
        Weekday::Mon => DayOfWeek::Mon,
        Weekday::Tue => DayOfWeek::Tue,
        Weekday::Wed => DayOfWeek::Wed,
        Weekday::Thu => DayOfWeek::Thu,
        Weekday::Fri => DayOfWeek::Fri,
        Weekday::Sat => DayOfWeek::Sat,
        Weekday::Sun => DayOfWeek::Sun,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_mapping_is_total() {
        assert_eq!(weekday_to_domain(Weekday::Mon), DayOfWeek::Mon);
        assert_eq!(weekday_to_domain(Weekday::Fri), DayOfWeek::Fri);
        assert_eq!(weekday_to_domain(Weekday::Sun), DayOfWeek::Sun);
    }

    #[test]
    fn system_clock_returns_some_day() {
        // Smoke test: the call itself must not panic.
        let _ = SystemClock.utc_day();
    }
}
