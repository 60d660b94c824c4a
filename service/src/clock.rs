use mockall::automock;

/// Source of the current wall clock time.
///
/// All scheduling happens in naive local time, so the implementation decides
/// which offset "now" is taken from.
#[automock]
pub trait ClockService {
    fn time_now(&self) -> time::Time;
    fn date_now(&self) -> time::Date;
    fn date_time_now(&self) -> time::PrimitiveDateTime;
}
