use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreEntity {
    pub id: Uuid,
    pub name: Arc<str>,
    pub weekly_budget: Decimal,
    pub open_time: time::Time,
    pub close_time: time::Time,
    pub created: time::PrimitiveDateTime,
    pub deleted: Option<time::PrimitiveDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait StoreDao {
    type Transaction: crate::Transaction;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[StoreEntity]>, DaoError>;
    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<StoreEntity>, DaoError>;
    async fn create(
        &self,
        entity: &StoreEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn update(
        &self,
        entity: &StoreEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
