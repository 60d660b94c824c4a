use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReservationStatusEntity {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReservationEntity {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub customer_id: Uuid,
    pub date: time::Date,
    pub start_time: time::Time,
    pub end_time: time::Time,
    pub duration_minutes: u16,
    pub status: ReservationStatusEntity,
    pub notes: Option<Arc<str>>,
    pub created: time::PrimitiveDateTime,
    pub deleted: Option<time::PrimitiveDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait ReservationDao {
    type Transaction: crate::Transaction;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<ReservationEntity>, DaoError>;

    /// All reservations of the employee on that date regardless of status,
    /// ordered by start time.
    async fn find_by_employee_and_date(
        &self,
        employee_id: Uuid,
        date: time::Date,
        tx: Self::Transaction,
    ) -> Result<Arc<[ReservationEntity]>, DaoError>;
    async fn find_by_filter(
        &self,
        employee_id: Option<Uuid>,
        customer_id: Option<Uuid>,
        from: Option<time::Date>,
        to: Option<time::Date>,
        status: Option<ReservationStatusEntity>,
        tx: Self::Transaction,
    ) -> Result<Arc<[ReservationEntity]>, DaoError>;
    async fn create(
        &self,
        entity: &ReservationEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn update(
        &self,
        entity: &ReservationEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
