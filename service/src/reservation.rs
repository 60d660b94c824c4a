use std::fmt::{Debug, Display};
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use dao::reservation::{ReservationEntity, ReservationStatusEntity};
use mockall::automock;
use regex::Regex;
use uuid::Uuid;

use crate::permission::{Actor, Authentication, EmployeeRole};
use crate::{ServiceError, ValidationFailureItem};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}-\d{3}-\d{4}$").expect("phone pattern is valid"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}
impl ReservationStatus {
    /// Pending may be confirmed or cancelled, confirmed may be completed or
    /// cancelled. Completed and cancelled are final. Keeping the current
    /// status is always allowed.
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        *self == next
            || matches!(
                (self, next),
                (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled)
            )
    }

    /// Whether the reservation still occupies its time range.
    pub fn is_active(&self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Confirmed)
    }
}
impl Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        })
    }
}
impl From<&ReservationStatusEntity> for ReservationStatus {
    fn from(status: &ReservationStatusEntity) -> Self {
        match status {
            ReservationStatusEntity::Pending => Self::Pending,
            ReservationStatusEntity::Confirmed => Self::Confirmed,
            ReservationStatusEntity::Completed => Self::Completed,
            ReservationStatusEntity::Cancelled => Self::Cancelled,
        }
    }
}
impl From<&ReservationStatus> for ReservationStatusEntity {
    fn from(status: &ReservationStatus) -> Self {
        match status {
            ReservationStatus::Pending => Self::Pending,
            ReservationStatus::Confirmed => Self::Confirmed,
            ReservationStatus::Completed => Self::Completed,
            ReservationStatus::Cancelled => Self::Cancelled,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReservationDuration {
    Minutes30,
    Minutes45,
    Minutes60,
}
impl ReservationDuration {
    pub fn minutes(&self) -> u16 {
        match self {
            ReservationDuration::Minutes30 => 30,
            ReservationDuration::Minutes45 => 45,
            ReservationDuration::Minutes60 => 60,
        }
    }
}
impl TryFrom<u16> for ReservationDuration {
    type Error = ServiceError;
    fn try_from(minutes: u16) -> Result<Self, Self::Error> {
        match minutes {
            30 => Ok(Self::Minutes30),
            45 => Ok(Self::Minutes45),
            60 => Ok(Self::Minutes60),
            _ => Err(ServiceError::ValidationError(Arc::new([
                ValidationFailureItem::InvalidValue("duration".into()),
            ]))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reservation {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub customer_id: Uuid,
    pub date: time::Date,
    pub start_time: time::Time,
    pub end_time: time::Time,
    pub duration: ReservationDuration,
    pub status: ReservationStatus,
    pub notes: Option<Arc<str>>,
    pub created: Option<time::PrimitiveDateTime>,
    pub deleted: Option<time::PrimitiveDateTime>,
    pub version: Uuid,
}
impl TryFrom<&ReservationEntity> for Reservation {
    type Error = ServiceError;
    fn try_from(reservation: &ReservationEntity) -> Result<Self, Self::Error> {
        Ok(Self {
            id: reservation.id,
            employee_id: reservation.employee_id,
            customer_id: reservation.customer_id,
            date: reservation.date,
            start_time: reservation.start_time,
            end_time: reservation.end_time,
            duration: ReservationDuration::try_from(reservation.duration_minutes)?,
            status: (&reservation.status).into(),
            notes: reservation.notes.clone(),
            created: Some(reservation.created),
            deleted: reservation.deleted,
            version: reservation.version,
        })
    }
}
impl TryFrom<&Reservation> for ReservationEntity {
    type Error = ServiceError;
    fn try_from(reservation: &Reservation) -> Result<Self, Self::Error> {
        Ok(Self {
            id: reservation.id,
            employee_id: reservation.employee_id,
            customer_id: reservation.customer_id,
            date: reservation.date,
            start_time: reservation.start_time,
            end_time: reservation.end_time,
            duration_minutes: reservation.duration.minutes(),
            status: (&reservation.status).into(),
            notes: reservation.notes.clone(),
            created: reservation.created.ok_or(ServiceError::InternalError)?,
            deleted: reservation.deleted,
            version: reservation.version,
        })
    }
}

/// A booking request as submitted by a customer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReservationRequest {
    pub employee_id: Uuid,
    pub name: Option<Arc<str>>,
    pub email: Arc<str>,
    pub phone: Arc<str>,
    pub date: time::Date,
    pub start_time: time::Time,
    pub duration: ReservationDuration,
    pub notes: Option<Arc<str>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReservationQuery {
    pub employee_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub start_date: Option<time::Date>,
    pub end_date: Option<time::Date>,
    pub status: Option<ReservationStatus>,
}

/// Restricts a reservation query to what the acting user may see.
///
/// Managers keep every filter. Other staff only see their own reservations
/// and customers only see their own reservations in any status.
pub fn scope_query(
    actor: Option<&Actor>,
    query: &ReservationQuery,
) -> Result<ReservationQuery, ServiceError> {
    match actor {
        None => Err(ServiceError::Unauthorized),
        Some(Actor::Employee {
            role: EmployeeRole::Manager,
            ..
        }) => Ok(query.clone()),
        Some(Actor::Employee { id, .. }) => Ok(ReservationQuery {
            employee_id: Some(id.ok_or(ServiceError::MissingActorId)?),
            customer_id: None,
            ..query.clone()
        }),
        Some(Actor::Customer { id }) => Ok(ReservationQuery {
            employee_id: None,
            customer_id: Some(id.ok_or(ServiceError::MissingActorId)?),
            status: None,
            ..query.clone()
        }),
    }
}

/// End of a reservation starting at `start_time`. Fails when the end
/// would pass midnight.
pub fn reservation_end(
    start_time: time::Time,
    duration: ReservationDuration,
) -> Result<time::Time, ServiceError> {
    let minutes = u32::from(start_time.hour()) * 60
        + u32::from(start_time.minute())
        + u32::from(duration.minutes());
    if minutes >= 24 * 60 {
        return Err(ServiceError::ValidationError(Arc::new([
            ValidationFailureItem::InvalidValue("start_time".into()),
        ])));
    }
    Ok(time::Time::from_hms(
        (minutes / 60) as u8,
        (minutes % 60) as u8,
        start_time.second(),
    )?)
}

/// Closed interval overlap as used by the double booking guard.
pub fn overlaps_inclusive(
    existing: (time::Time, time::Time),
    requested: (time::Time, time::Time),
) -> bool {
    existing.0 <= requested.1 && existing.1 >= requested.0
}

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait ReservationService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    /// Books a slot. Does not require an acting user.
    async fn create(
        &self,
        request: &ReservationRequest,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Reservation, ServiceError>;
    async fn get_reservations(
        &self,
        query: &ReservationQuery,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Reservation]>, ServiceError>;
    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Reservation, ServiceError>;
    async fn update_status(
        &self,
        id: Uuid,
        status: ReservationStatus,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Reservation, ServiceError>;
    async fn cancel(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Reservation, ServiceError>;

    /// Dates from today on where the employee has a shift. Does not require
    /// an acting user.
    async fn available_dates(
        &self,
        employee_id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[time::Date]>, ServiceError>;
}
