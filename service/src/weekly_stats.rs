use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use dao::weekly_stats::WeeklyStatsEntity;
use mockall::automock;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::permission::Authentication;
use crate::ServiceError;

pub const DEFAULT_HISTORY_WEEKS: u8 = 4;

/// Cost and hour totals of one store for one Monday to Sunday week.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeeklyStats {
    pub id: Uuid,
    pub store_id: Uuid,
    pub week_start: time::Date,
    pub week_end: time::Date,
    pub total_hours: Decimal,
    pub total_cost: Decimal,
    pub budget_allocated: Decimal,
    pub budget_remaining: Decimal,
    pub notes: Option<Arc<str>>,
    pub created: Option<time::PrimitiveDateTime>,
    pub deleted: Option<time::PrimitiveDateTime>,
    pub version: Uuid,
}
impl From<&WeeklyStatsEntity> for WeeklyStats {
    fn from(stats: &WeeklyStatsEntity) -> Self {
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
            created: Some(stats.created),
            deleted: stats.deleted,
            version: stats.version,
        }
    }
}
impl TryFrom<&WeeklyStats> for WeeklyStatsEntity {
    type Error = ServiceError;
    fn try_from(stats: &WeeklyStats) -> Result<Self, Self::Error> {
        Ok(Self {
            id: stats.id,
            store_id: stats.store_id,
            week_start: stats.week_start,
            week_end: stats.week_end,
            total_hours: stats.total_hours,
            total_cost: stats.total_cost,
            budget_allocated: stats.budget_allocated,
            budget_remaining: stats.budget_remaining,
            notes: stats.notes.clone(),
            created: stats.created.ok_or(ServiceError::InternalError)?,
            deleted: stats.deleted,
            version: stats.version,
        })
    }
}

impl WeeklyStats {
    /// Applies the hour and cost change of one shift mutation.
    pub fn apply_shift_delta(&self, hours_delta: Decimal, cost_delta: Decimal) -> Self {
        Self {
            total_hours: self.total_hours + hours_delta,
            total_cost: self.total_cost + cost_delta,
            budget_remaining: self.budget_remaining - cost_delta,
            ..self.clone()
        }
    }

    /// Changes the allocated budget and moves the remaining budget by the
    /// same amount.
    pub fn with_budget(&self, budget_allocated: Decimal) -> Self {
        Self {
            budget_allocated,
            budget_remaining: self.budget_remaining + (budget_allocated - self.budget_allocated),
            ..self.clone()
        }
    }

    pub fn would_exceed_budget(&self, cost_delta: Decimal) -> bool {
        self.total_cost + cost_delta > self.budget_allocated
    }
}

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait WeeklyStatsService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    /// Returns the stats of the week containing `reference_date` and creates
    /// them from the store's weekly budget when missing.
    async fn get_or_create(
        &self,
        store_id: Uuid,
        reference_date: time::Date,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<WeeklyStats, ServiceError>;

    /// Like `get_or_create` but never creates.
    async fn find_for_week(
        &self,
        store_id: Uuid,
        reference_date: time::Date,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Option<WeeklyStats>, ServiceError>;

    /// Persists `stats` with the shift delta applied. Only available with
    /// full authentication.
    async fn apply_shift_delta(
        &self,
        stats: &WeeklyStats,
        hours_delta: Decimal,
        cost_delta: Decimal,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<WeeklyStats, ServiceError>;

    /// Manager view. `date` defaults to today.
    async fn get_for_week(
        &self,
        store_id: Uuid,
        date: Option<time::Date>,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<WeeklyStats, ServiceError>;
    async fn update(
        &self,
        id: Uuid,
        budget_allocated: Option<Decimal>,
        notes: Option<Arc<str>>,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<WeeklyStats, ServiceError>;

    /// The stats of the last `weeks` weeks up to the current one, oldest
    /// first. Weeks without stats are skipped.
    async fn history(
        &self,
        store_id: Uuid,
        weeks: Option<u8>,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[WeeklyStats]>, ServiceError>;
}
