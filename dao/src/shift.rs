use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShiftEntity {
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
    pub created: time::PrimitiveDateTime,
    pub deleted: Option<time::PrimitiveDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait ShiftDao {
    type Transaction: crate::Transaction;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<ShiftEntity>, DaoError>;

    /// Every filter is optional. Results are ordered by date and start time.
    async fn find_by_filter(
        &self,
        store_id: Option<Uuid>,
        employee_id: Option<Uuid>,
        from: Option<time::Date>,
        to: Option<time::Date>,
        tx: Self::Transaction,
    ) -> Result<Arc<[ShiftEntity]>, DaoError>;
    async fn create(
        &self,
        entity: &ShiftEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn update(
        &self,
        entity: &ShiftEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
