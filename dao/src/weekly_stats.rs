use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeeklyStatsEntity {
    pub id: Uuid,
    pub store_id: Uuid,
    pub week_start: time::Date,
    pub week_end: time::Date,
    pub total_hours: Decimal,
    pub total_cost: Decimal,
    pub budget_allocated: Decimal,
    pub budget_remaining: Decimal,
    pub notes: Option<Arc<str>>,
    pub created: time::PrimitiveDateTime,
    pub deleted: Option<time::PrimitiveDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait WeeklyStatsDao {
    type Transaction: crate::Transaction;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<WeeklyStatsEntity>, DaoError>;

    /// Weekly stats of the store whose week start lies within `from..=to`,
    /// ordered by week start.
    async fn find_by_store_between(
        &self,
        store_id: Uuid,
        from: time::Date,
        to: time::Date,
        tx: Self::Transaction,
    ) -> Result<Arc<[WeeklyStatsEntity]>, DaoError>;
    async fn create(
        &self,
        entity: &WeeklyStatsEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn update(
        &self,
        entity: &WeeklyStatsEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
