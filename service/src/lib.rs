use std::fmt::Display;
use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use time::{Date, Time};
use uuid::Uuid;

pub mod availability;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod customer;
pub mod employee;
pub mod permission;
pub mod reservation;
pub mod shift;
pub mod slot;
pub mod store;
pub mod user_service;
pub mod uuid_service;
pub mod weekly_stats;

pub use permission::MockPermissionService;
pub use permission::PermissionService;

use reservation::ReservationStatus;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ValidationFailureItem {
    ModificationNotAllowed(Arc<str>),
    InvalidValue(Arc<str>),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EntityKind {
    Store,
    Employee,
    Availability,
    Shift,
    WeeklyStats,
    Customer,
    Reservation,
}
impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Store => "Store",
            EntityKind::Employee => "Employee",
            EntityKind::Availability => "Availability",
            EntityKind::Shift => "Shift",
            EntityKind::WeeklyStats => "WeeklyStats",
            EntityKind::Customer => "Customer",
            EntityKind::Reservation => "Reservation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Database query error: {0}")]
    DatabaseQueryError(#[from] dao::DaoError),

    #[error("Forbidden")]
    Forbidden,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Acting user has no id")]
    MissingActorId,

    #[error("{0} {1} not found")]
    EntityNotFound(EntityKind, Uuid),

    #[error("No weekly stats for store {0} in the week of {1}")]
    WeeklyStatsNotFound(Uuid, Date),

    #[error("Employee {0} has no shift on {1}")]
    ShiftNotFoundOnDate(Uuid, Date),

    #[error("Entity {0} already exists")]
    EntityAlreadyExists(Uuid),

    #[error("Entity {0} conflicts, expected version {1} but got {2}")]
    EntityConflicts(Uuid, Uuid, Uuid),

    #[error("Employee {0} still has {1} scheduled shifts")]
    EmployeeHasShifts(Uuid, usize),

    #[error("Validation error: {0:?}")]
    ValidationError(Arc<[ValidationFailureItem]>),

    #[error("ID cannot be set on create")]
    IdSetOnCreate,

    #[error("Version cannot be set on create")]
    VersionSetOnCreate,

    #[error("Deleted cannot be set on create")]
    DeletedSetOnCreate,

    #[error("Created cannot be set on create")]
    CreatedSetOnCreate,

    #[error("Time order wrong. {0} must be before {1}")]
    TimeOrderWrong(Time, Time),

    #[error("Date order wrong. {0} must be before {1}")]
    DateOrderWrong(Date, Date),

    #[error("Employee {0} is not available on {1}")]
    AvailabilityBlocked(Uuid, Date),

    #[error("Employee {0} would work {1} hours but may only work {2}")]
    MaxHoursExceeded(Uuid, Decimal, Decimal),

    #[error("Weekly cost {0} would exceed the allocated budget {1}")]
    BudgetExceeded(Decimal, Decimal),

    #[error("Shift {0} - {1} is outside of the store hours {2} - {3}")]
    InvalidShiftWindow(Time, Time, Time, Time),

    #[error("Invalid email address: {0}")]
    InvalidEmail(Arc<str>),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(Arc<str>),

    #[error("Slot {1} - {2} on {0} is not available")]
    SlotUnavailable(Date, Time, Time),

    #[error("Missing parameter: {0}")]
    MissingParameter(Arc<str>),

    #[error("Reservation status cannot change from {0} to {1}")]
    InvalidStatusTransition(ReservationStatus, ReservationStatus),

    #[error("Calendar sync failed: {0}")]
    CalendarSyncFailed(Arc<str>),

    #[error("Time component range error: {0}")]
    TimeComponentRange(#[from] time::error::ComponentRange),

    #[error("Internal error")]
    InternalError,
}
