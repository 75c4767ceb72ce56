use domain::notify::entity::DayOfWeek;

/// Secondary port for wall-clock queries.
///
/// The amateur channel gates on the current UTC day at dispatch time; going
/// through a port instead of the system clock keeps that gate
/// deterministically testable.
pub trait ClockPort: Send + Sync {
    /// Current day of week, UTC.
    fn utc_day(&self) -> DayOfWeek;
}
