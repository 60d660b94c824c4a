use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

#[cfg(feature = "service-impl")]
use shopshift_utils::{derive_from_reference, format_clock_time, parse_clock_time, ClockTimeError};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct StoreTO {
    #[serde(default)]
    pub id: Uuid,
    pub name: Arc<str>,
    #[serde(with = "rust_decimal::serde::float")]
    pub weekly_budget: Decimal,
    /// `HH:MM`
    pub open_time: Arc<str>,
    /// `HH:MM`
    pub close_time: Arc<str>,
    #[serde(default)]
    pub created: Option<PrimitiveDateTime>,
    #[serde(default)]
    pub deleted: Option<PrimitiveDateTime>,
    #[serde(rename = "$version")]
    #[serde(default)]
    pub version: Uuid,
}
#[cfg(feature = "service-impl")]
impl From<&service::store::Store> for StoreTO {
    fn from(store: &service::store::Store) -> Self {
        Self {
            id: store.id,
            name: store.name.clone(),
            weekly_budget: store.weekly_budget,
            open_time: format_clock_time(store.open_time).into(),
            close_time: format_clock_time(store.close_time).into(),
            created: store.created,
            deleted: store.deleted,
            version: store.version,
        }
    }
}
#[cfg(feature = "service-impl")]
derive_from_reference!(service::store::Store, StoreTO);
#[cfg(feature = "service-impl")]
impl TryFrom<&StoreTO> for service::store::Store {
    type Error = ClockTimeError;
    fn try_from(store: &StoreTO) -> Result<Self, Self::Error> {
        Ok(Self {
            id: store.id,
            name: store.name.clone(),
            weekly_budget: store.weekly_budget,
            open_time: parse_clock_time(&store.open_time)?,
            close_time: parse_clock_time(&store.close_time)?,
            created: store.created,
            deleted: store.deleted,
            version: store.version,
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeTypeTO {
    Manager,
    #[default]
    Associate,
    PartTime,
}
#[cfg(feature = "service-impl")]
impl From<service::employee::EmployeeType> for EmployeeTypeTO {
    fn from(employee_type: service::employee::EmployeeType) -> Self {
        match employee_type {
            service::employee::EmployeeType::Manager => Self::Manager,
            service::employee::EmployeeType::Associate => Self::Associate,
            service::employee::EmployeeType::PartTime => Self::PartTime,
        }
    }
}
#[cfg(feature = "service-impl")]
impl From<EmployeeTypeTO> for service::employee::EmployeeType {
    fn from(employee_type: EmployeeTypeTO) -> Self {
        match employee_type {
            EmployeeTypeTO::Manager => Self::Manager,
            EmployeeTypeTO::Associate => Self::Associate,
            EmployeeTypeTO::PartTime => Self::PartTime,
        }
    }
}

fn default_hourly_rate() -> Decimal {
    Decimal::from(20)
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct EmployeeTO {
    #[serde(default)]
    pub id: Uuid,
    pub name: Arc<str>,
    pub email: Arc<str>,
    #[serde(default)]
    pub employee_type: EmployeeTypeTO,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_hours: Decimal,
    /// Maintained by the scheduler, ignored on write.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub current_hours: Decimal,
    #[serde(default = "default_hourly_rate", with = "rust_decimal::serde::float")]
    pub hourly_rate: Decimal,
    pub store_id: Uuid,
    #[serde(default)]
    pub created: Option<PrimitiveDateTime>,
    #[serde(default)]
    pub deleted: Option<PrimitiveDateTime>,
    #[serde(rename = "$version")]
    #[serde(default)]
    pub version: Uuid,
}
#[cfg(feature = "service-impl")]
impl From<&service::employee::Employee> for EmployeeTO {
    fn from(employee: &service::employee::Employee) -> Self {
        Self {
            id: employee.id,
            name: employee.name.clone(),
            email: employee.email.clone(),
            employee_type: employee.employee_type.into(),
            max_hours: employee.max_hours,
            current_hours: employee.current_hours,
            hourly_rate: employee.hourly_rate,
            store_id: employee.store_id,
            created: employee.created,
            deleted: employee.deleted,
            version: employee.version,
        }
    }
}
#[cfg(feature = "service-impl")]
derive_from_reference!(service::employee::Employee, EmployeeTO);
#[cfg(feature = "service-impl")]
impl From<&EmployeeTO> for service::employee::Employee {
    fn from(employee: &EmployeeTO) -> Self {
        Self {
            id: employee.id,
            name: employee.name.clone(),
            email: employee.email.clone(),
            employee_type: employee.employee_type.into(),
            max_hours: employee.max_hours,
            current_hours: employee.current_hours,
            hourly_rate: employee.hourly_rate,
            store_id: employee.store_id,
            created: employee.created,
            deleted: employee.deleted,
            version: employee.version,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ResetHoursTO {
    pub store_id: Uuid,
    pub employees_reset: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityTO {
    #[serde(default)]
    pub id: Uuid,
    pub employee_id: Uuid,
    pub date: time::Date,
    pub start_time: Arc<str>,
    pub end_time: Arc<str>,
    #[serde(default = "default_true")]
    pub is_blocked: bool,
    #[serde(default)]
    pub note: Option<Arc<str>>,
    #[serde(default)]
    pub created: Option<PrimitiveDateTime>,
    #[serde(default)]
    pub deleted: Option<PrimitiveDateTime>,
    #[serde(rename = "$version")]
    #[serde(default)]
    pub version: Uuid,
}

fn default_true() -> bool {
    true
}

#[cfg(feature = "service-impl")]
impl From<&service::availability::Availability> for AvailabilityTO {
    fn from(availability: &service::availability::Availability) -> Self {
        Self {
            id: availability.id,
            employee_id: availability.employee_id,
            date: availability.date,
            start_time: format_clock_time(availability.start_time).into(),
            end_time: format_clock_time(availability.end_time).into(),
            is_blocked: availability.is_blocked,
            note: availability.note.clone(),
            created: availability.created,
            deleted: availability.deleted,
            version: availability.version,
        }
    }
}
#[cfg(feature = "service-impl")]
derive_from_reference!(service::availability::Availability, AvailabilityTO);
#[cfg(feature = "service-impl")]
impl TryFrom<&AvailabilityTO> for service::availability::Availability {
    type Error = ClockTimeError;
    fn try_from(availability: &AvailabilityTO) -> Result<Self, Self::Error> {
        Ok(Self {
            id: availability.id,
            employee_id: availability.employee_id,
            date: availability.date,
            start_time: parse_clock_time(&availability.start_time)?,
            end_time: parse_clock_time(&availability.end_time)?,
            is_blocked: availability.is_blocked,
            note: availability.note.clone(),
            created: availability.created,
            deleted: availability.deleted,
            version: availability.version,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ShiftTO {
    #[serde(default)]
    pub id: Uuid,
    pub employee_id: Uuid,
    pub store_id: Uuid,
    pub date: time::Date,
    pub start_time: Arc<str>,
    pub end_time: Arc<str>,
    /// Derived from the times, ignored on write.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub hours: Decimal,
    /// Derived from hours and the hourly rate, ignored on write.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub cost: Decimal,
    #[serde(default)]
    pub note: Option<Arc<str>>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub calendar_event_id: Option<Arc<str>>,
    #[serde(default)]
    pub created: Option<PrimitiveDateTime>,
    #[serde(default)]
    pub deleted: Option<PrimitiveDateTime>,
    #[serde(rename = "$version")]
    #[serde(default)]
    pub version: Uuid,
}
#[cfg(feature = "service-impl")]
impl From<&service::shift::Shift> for ShiftTO {
    fn from(shift: &service::shift::Shift) -> Self {
        Self {
            id: shift.id,
            employee_id: shift.employee_id,
            store_id: shift.store_id,
            date: shift.date,
            start_time: format_clock_time(shift.start_time).into(),
            end_time: format_clock_time(shift.end_time).into(),
            hours: shift.hours,
            cost: shift.cost,
            note: shift.note.clone(),
            is_published: shift.is_published,
            calendar_event_id: shift.calendar_event_id.clone(),
            created: shift.created,
            deleted: shift.deleted,
            version: shift.version,
        }
    }
}
#[cfg(feature = "service-impl")]
derive_from_reference!(service::shift::Shift, ShiftTO);
#[cfg(feature = "service-impl")]
impl TryFrom<&ShiftTO> for service::shift::Shift {
    type Error = ClockTimeError;
    fn try_from(shift: &ShiftTO) -> Result<Self, Self::Error> {
        Ok(Self {
            id: shift.id,
            employee_id: shift.employee_id,
            store_id: shift.store_id,
            date: shift.date,
            start_time: parse_clock_time(&shift.start_time)?,
            end_time: parse_clock_time(&shift.end_time)?,
            hours: shift.hours,
            cost: shift.cost,
            note: shift.note.clone(),
            is_published: shift.is_published,
            calendar_event_id: shift.calendar_event_id.clone(),
            created: shift.created,
            deleted: shift.deleted,
            version: shift.version,
        })
    }
}

/// Partial shift update. Missing fields keep their current value.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ShiftUpdateTO {
    #[serde(default)]
    pub employee_id: Option<Uuid>,
    #[serde(default)]
    pub date: Option<time::Date>,
    #[serde(default)]
    pub start_time: Option<Arc<str>>,
    #[serde(default)]
    pub end_time: Option<Arc<str>>,
    #[serde(default)]
    pub note: Option<Arc<str>>,
    #[serde(default)]
    pub is_published: Option<bool>,
}
#[cfg(feature = "service-impl")]
impl TryFrom<&ShiftUpdateTO> for service::shift::ShiftUpdate {
    type Error = ClockTimeError;
    fn try_from(update: &ShiftUpdateTO) -> Result<Self, Self::Error> {
        Ok(Self {
            employee_id: update.employee_id,
            date: update.date,
            start_time: update
                .start_time
                .as_deref()
                .map(parse_clock_time)
                .transpose()?,
            end_time: update
                .end_time
                .as_deref()
                .map(parse_clock_time)
                .transpose()?,
            note: update.note.clone(),
            is_published: update.is_published,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteConfirmationTO {
    pub id: Uuid,
    pub deleted: PrimitiveDateTime,
}
#[cfg(feature = "service-impl")]
impl From<&service::shift::DeleteConfirmation> for DeleteConfirmationTO {
    fn from(confirmation: &service::shift::DeleteConfirmation) -> Self {
        Self {
            id: confirmation.id,
            deleted: confirmation.deleted,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct WeeklyStatsTO {
    pub id: Uuid,
    pub store_id: Uuid,
    pub week_start: time::Date,
    pub week_end: time::Date,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_hours: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub budget_allocated: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub budget_remaining: Decimal,
    #[serde(default)]
    pub notes: Option<Arc<str>>,
    #[serde(default)]
    pub created: Option<PrimitiveDateTime>,
    #[serde(rename = "$version")]
    pub version: Uuid,
}
#[cfg(feature = "service-impl")]
impl From<&service::weekly_stats::WeeklyStats> for WeeklyStatsTO {
    fn from(stats: &service::weekly_stats::WeeklyStats) -> Self {
        Self {
            id: stats.id,
            store_id: stats.store_id,
            week_start: stats.week_start,
            week_end: stats.week_end,
            total_hours: stats.total_hours,
            total_cost: stats.total_cost,
            budget_allocated: stats.budget_allocated,
            budget_remaining: stats.budget_remaining,
            notes: stats.notes.clone(),
            created: stats.created,
            version: stats.version,
        }
    }
}
#[cfg(feature = "service-impl")]
derive_from_reference!(service::weekly_stats::WeeklyStats, WeeklyStatsTO);

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct WeeklyStatsUpdateTO {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub budget_allocated: Option<Decimal>,
    #[serde(default)]
    pub notes: Option<Arc<str>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TimeSlotTO {
    pub start_time: Arc<str>,
    pub end_time: Arc<str>,
    pub available: bool,
}
#[cfg(feature = "service-impl")]
impl From<&service::slot::TimeSlot> for TimeSlotTO {
    fn from(slot: &service::slot::TimeSlot) -> Self {
        Self {
            start_time: format_clock_time(slot.start_time).into(),
            end_time: format_clock_time(slot.end_time).into(),
            available: slot.available,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SlotWindowTO {
    #[default]
    Shift,
    StoreHours,
}
#[cfg(feature = "service-impl")]
impl From<SlotWindowTO> for service::slot::SlotWindow {
    fn from(window: SlotWindowTO) -> Self {
        match window {
            SlotWindowTO::Shift => Self::Shift,
            SlotWindowTO::StoreHours => Self::StoreHours,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatusTO {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}
#[cfg(feature = "service-impl")]
impl From<service::reservation::ReservationStatus> for ReservationStatusTO {
    fn from(status: service::reservation::ReservationStatus) -> Self {
        match status {
            service::reservation::ReservationStatus::Pending => Self::Pending,
            service::reservation::ReservationStatus::Confirmed => Self::Confirmed,
            service::reservation::ReservationStatus::Completed => Self::Completed,
            service::reservation::ReservationStatus::Cancelled => Self::Cancelled,
        }
    }
}
#[cfg(feature = "service-impl")]
impl From<ReservationStatusTO> for service::reservation::ReservationStatus {
    fn from(status: ReservationStatusTO) -> Self {
        match status {
            ReservationStatusTO::Pending => Self::Pending,
            ReservationStatusTO::Confirmed => Self::Confirmed,
            ReservationStatusTO::Completed => Self::Completed,
            ReservationStatusTO::Cancelled => Self::Cancelled,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ReservationTO {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub customer_id: Uuid,
    pub date: time::Date,
    pub start_time: Arc<str>,
    pub end_time: Arc<str>,
    /// Minutes: 30, 45 or 60.
    pub duration: u16,
    pub status: ReservationStatusTO,
    #[serde(default)]
    pub notes: Option<Arc<str>>,
    #[serde(default)]
    pub created: Option<PrimitiveDateTime>,
    #[serde(rename = "$version")]
    pub version: Uuid,
}
#[cfg(feature = "service-impl")]
impl From<&service::reservation::Reservation> for ReservationTO {
    fn from(reservation: &service::reservation::Reservation) -> Self {
        Self {
            id: reservation.id,
            employee_id: reservation.employee_id,
            customer_id: reservation.customer_id,
            date: reservation.date,
            start_time: format_clock_time(reservation.start_time).into(),
            end_time: format_clock_time(reservation.end_time).into(),
            duration: reservation.duration.minutes(),
            status: reservation.status.into(),
            notes: reservation.notes.clone(),
            created: reservation.created,
            version: reservation.version,
        }
    }
}
#[cfg(feature = "service-impl")]
derive_from_reference!(service::reservation::Reservation, ReservationTO);

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ReservationRequestTO {
    pub employee_id: Uuid,
    #[serde(default)]
    pub name: Option<Arc<str>>,
    pub email: Arc<str>,
    pub phone: Arc<str>,
    pub date: time::Date,
    /// `HH:MM`
    pub start_time: Arc<str>,
    /// Minutes: 30, 45 or 60.
    pub duration: u16,
    #[serde(default)]
    pub notes: Option<Arc<str>>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema)]
pub struct ReservationStatusUpdateTO {
    pub status: ReservationStatusTO,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CalendarEventTO {
    pub id: Arc<str>,
    pub summary: Option<Arc<str>>,
    pub description: Option<Arc<str>>,
    /// Date time, or date for all day events.
    pub start: Option<Arc<str>>,
    pub end: Option<Arc<str>>,
}
#[cfg(feature = "service-impl")]
impl From<&service::calendar::CalendarEvent> for CalendarEventTO {
    fn from(event: &service::calendar::CalendarEvent) -> Self {
        Self {
            id: event.id.clone(),
            summary: event.summary.clone(),
            description: event.description.clone(),
            start: event.start.clone(),
            end: event.end.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CalendarHeartbeatTO {
    pub google_calendar_connected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_defaults() {
        let employee: EmployeeTO = serde_json::from_str(
            r#"{"name":"Jane","email":"jane@example.com","max_hours":40,"store_id":"67e55044-10b1-426f-9247-bb680e5fe0c8"}"#,
        )
        .unwrap();
        assert_eq!(employee.employee_type, EmployeeTypeTO::Associate);
        assert_eq!(employee.hourly_rate, Decimal::from(20));
        assert_eq!(employee.current_hours, Decimal::ZERO);
        assert_eq!(employee.id, Uuid::nil());
    }

    #[test]
    fn test_money_serializes_as_number() {
        let update = WeeklyStatsUpdateTO {
            budget_allocated: Some(Decimal::new(150050, 2)),
            notes: None,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["budget_allocated"], 1500.5);
    }

    #[test]
    fn test_enum_names() {
        assert_eq!(
            serde_json::to_string(&EmployeeTypeTO::PartTime).unwrap(),
            "\"part_time\""
        );
        assert_eq!(
            serde_json::to_string(&SlotWindowTO::StoreHours).unwrap(),
            "\"store_hours\""
        );
        let status: ReservationStatusTO = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(status, ReservationStatusTO::Cancelled);
    }
}
