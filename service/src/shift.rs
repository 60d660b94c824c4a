use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use dao::shift::ShiftEntity;
use mockall::automock;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::permission::Authentication;
use crate::ServiceError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shift {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub store_id: Uuid,
    pub date: time::Date,
    pub start_time: time::Time,
    pub end_time: time::Time,
    pub hours: Decimal,
    pub cost: Decimal,
    pub note: Option<Arc<str>>,
    pub is_published: bool,
    pub calendar_event_id: Option<Arc<str>>,
    pub created: Option<time::PrimitiveDateTime>,
    pub deleted: Option<time::PrimitiveDateTime>,
    pub version: Uuid,
}
impl From<&ShiftEntity> for Shift {
    fn from(shift: &ShiftEntity) -> Self {
        Self {
            id: shift.id,
            employee_id: shift.employee_id,
            store_id: shift.store_id,
            date: shift.date,
            start_time: shift.start_time,
            end_time: shift.end_time,
            hours: shift.hours,
            cost: shift.cost,
            note: shift.note.clone(),
            is_published: shift.is_published,
            calendar_event_id: shift.calendar_event_id.clone(),
            created: Some(shift.created),
            deleted: shift.deleted,
            version: shift.version,
        }
    }
}
impl TryFrom<&Shift> for ShiftEntity {
    type Error = ServiceError;
    fn try_from(shift: &Shift) -> Result<Self, Self::Error> {
        Ok(Self {
            id: shift.id,
            employee_id: shift.employee_id,
            store_id: shift.store_id,
            date: shift.date,
            start_time: shift.start_time,
            end_time: shift.end_time,
            hours: shift.hours,
            cost: shift.cost,
            note: shift.note.clone(),
            is_published: shift.is_published,
            calendar_event_id: shift.calendar_event_id.clone(),
            created: shift.created.ok_or(ServiceError::InternalError)?,
            deleted: shift.deleted,
            version: shift.version,
        })
    }
}

/// Fields of a shift which can be changed after creation. `None` keeps the
/// current value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShiftUpdate {
    pub employee_id: Option<Uuid>,
    pub date: Option<time::Date>,
    pub start_time: Option<time::Time>,
    pub end_time: Option<time::Time>,
    pub note: Option<Arc<str>>,
    pub is_published: Option<bool>,
}
impl ShiftUpdate {
    pub fn merge_into(&self, shift: &Shift) -> Shift {
        Shift {
            employee_id: self.employee_id.unwrap_or(shift.employee_id),
            date: self.date.unwrap_or(shift.date),
            start_time: self.start_time.unwrap_or(shift.start_time),
            end_time: self.end_time.unwrap_or(shift.end_time),
            note: self.note.clone().or_else(|| shift.note.clone()),
            is_published: self.is_published.unwrap_or(shift.is_published),
            ..shift.clone()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShiftFilter {
    pub store_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    pub from: Option<time::Date>,
    pub to: Option<time::Date>,
}

/// How a failed calendar sync affects the surrounding operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncFailurePolicy {
    /// The operation fails with `CalendarSyncFailed` and rolls back.
    Fatal,
    /// The failure is logged and the shift keeps its previous event id.
    BestEffort,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteConfirmation {
    pub id: Uuid,
    pub deleted: time::PrimitiveDateTime,
}

/// Hours and cost of a shift. Hours are whole hours taken from the hour
/// component of the start and end time.
pub fn shift_hours_and_cost(
    start_time: time::Time,
    end_time: time::Time,
    hourly_rate: Decimal,
) -> Result<(Decimal, Decimal), ServiceError> {
    if start_time >= end_time {
        return Err(ServiceError::TimeOrderWrong(start_time, end_time));
    }
    let hours = shopshift_utils::hours_between(start_time, end_time);
    Ok((hours, shopshift_utils::cost(hours, hourly_rate)))
}

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait ShiftService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    async fn get_all(
        &self,
        filter: &ShiftFilter,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Shift]>, ServiceError>;
    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Shift, ServiceError>;

    /// Shifts of the store in the Monday to Sunday week containing `date`.
    /// Both arguments are required.
    async fn get_weekly(
        &self,
        store_id: Option<Uuid>,
        date: Option<time::Date>,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Shift]>, ServiceError>;

    /// Creates a shift after checking store hours, availability, the
    /// employee's hour cap and the weekly budget. Hours, cost and the
    /// calendar event id of the input are ignored.
    async fn create(
        &self,
        shift: &Shift,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Shift, ServiceError>;
    async fn update(
        &self,
        id: Uuid,
        update: &ShiftUpdate,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Shift, ServiceError>;
    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<DeleteConfirmation, ServiceError>;
    async fn publish(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Shift, ServiceError>;
}
