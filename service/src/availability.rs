use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use dao::availability::AvailabilityEntity;
use mockall::automock;
use uuid::Uuid;

use crate::permission::Authentication;
use crate::ServiceError;

/// A period in which an employee cannot be scheduled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Availability {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub date: time::Date,
    pub start_time: time::Time,
    pub end_time: time::Time,
    pub is_blocked: bool,
    pub note: Option<Arc<str>>,
    pub created: Option<time::PrimitiveDateTime>,
    pub deleted: Option<time::PrimitiveDateTime>,
    pub version: Uuid,
}
impl From<&AvailabilityEntity> for Availability {
    fn from(availability: &AvailabilityEntity) -> Self {
        Self {
            id: availability.id,
            employee_id: availability.employee_id,
            date: availability.date,
            start_time: availability.start_time,
            end_time: availability.end_time,
            is_blocked: availability.is_blocked,
            note: availability.note.clone(),
            created: Some(availability.created),
            deleted: availability.deleted,
            version: availability.version,
        }
    }
}
impl TryFrom<&Availability> for AvailabilityEntity {
    type Error = ServiceError;
    fn try_from(availability: &Availability) -> Result<Self, Self::Error> {
        Ok(Self {
            id: availability.id,
            employee_id: availability.employee_id,
            date: availability.date,
            start_time: availability.start_time,
            end_time: availability.end_time,
            is_blocked: availability.is_blocked,
            note: availability.note.clone(),
            created: availability.created.ok_or(ServiceError::InternalError)?,
            deleted: availability.deleted,
            version: availability.version,
        })
    }
}

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait AvailabilityService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    async fn get_by_employee(
        &self,
        employee_id: Uuid,
        from: Option<time::Date>,
        to: Option<time::Date>,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Availability]>, ServiceError>;
    async fn create(
        &self,
        availability: &Availability,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Availability, ServiceError>;
    async fn update(
        &self,
        availability: &Availability,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Availability, ServiceError>;
    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError>;

    /// True when any blocking entry exists for the employee on that date,
    /// regardless of its time range.
    async fn is_blocked(
        &self,
        employee_id: Uuid,
        date: time::Date,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<bool, ServiceError>;
}
