use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::employee::Employee;
use crate::shift::Shift;
use crate::ServiceError;

/// An event as read back from the external calendar. Start and end keep
/// the calendar's own notation, a date time or an all day date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarEvent {
    pub id: Arc<str>,
    pub summary: Option<Arc<str>>,
    pub description: Option<Arc<str>>,
    pub start: Option<Arc<str>>,
    pub end: Option<Arc<str>>,
}

/// Pushes shifts to an external calendar.
#[automock]
#[async_trait]
pub trait CalendarService {
    /// Creates the event, or updates it when the shift already carries an
    /// event id. Returns the event id, or `None` when no calendar is
    /// configured.
    async fn sync_shift(
        &self,
        shift: &Shift,
        employee: &Employee,
    ) -> Result<Option<Arc<str>>, ServiceError>;

    async fn delete_event(&self, event_id: &str) -> Result<(), ServiceError>;

    /// Events of the Monday to Sunday week containing `date`, ordered by
    /// start. Empty when no calendar is configured or it cannot be read.
    async fn week_events(&self, date: time::Date) -> Result<Arc<[CalendarEvent]>, ServiceError>;

    /// Whether the configured calendar is reachable with the configured
    /// credentials.
    async fn heartbeat(&self) -> Result<bool, ServiceError>;
}

pub fn event_summary(employee: &Employee) -> String {
    let employee_type = match employee.employee_type {
        crate::employee::EmployeeType::Manager => "manager",
        crate::employee::EmployeeType::Associate => "associate",
        crate::employee::EmployeeType::PartTime => "part_time",
    };
    format!("{} - {}", employee.name, employee_type)
}

pub fn event_description(shift: &Shift, employee: &Employee) -> String {
    match &shift.note {
        Some(note) => note.to_string(),
        None => format!("Shift for {}", employee.name),
    }
}
