use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvailabilityEntity {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub date: time::Date,
    pub start_time: time::Time,
    pub end_time: time::Time,
    pub is_blocked: bool,
    pub note: Option<Arc<str>>,
    pub created: time::PrimitiveDateTime,
    pub deleted: Option<time::PrimitiveDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait AvailabilityDao {
    type Transaction: crate::Transaction;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<AvailabilityEntity>, DaoError>;
    async fn find_by_employee_id(
        &self,
        employee_id: Uuid,
        from: Option<time::Date>,
        to: Option<time::Date>,
        tx: Self::Transaction,
    ) -> Result<Arc<[AvailabilityEntity]>, DaoError>;
    async fn find_blocked_by_employee_and_date(
        &self,
        employee_id: Uuid,
        date: time::Date,
        tx: Self::Transaction,
    ) -> Result<Arc<[AvailabilityEntity]>, DaoError>;
    async fn create(
        &self,
        entity: &AvailabilityEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn update(
        &self,
        entity: &AvailabilityEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
