use std::sync::Arc;

use crate::{
    date_from_db, date_time_from_db, date_time_to_db, date_to_db, decimal_from_db, uuid_from_db,
    ResultDbErrorExt, TransactionImpl,
};
use async_trait::async_trait;
use dao::{
    weekly_stats::{WeeklyStatsDao, WeeklyStatsEntity},
    DaoError,
};
use sqlx::{query, query_as};
use tracing::info;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct WeeklyStatsDb {
    id: Vec<u8>,
    store_id: Vec<u8>,
    week_start: String,
    week_end: String,
    total_hours: String,
    total_cost: String,
    budget_allocated: String,
    budget_remaining: String,
    notes: Option<String>,
    created: String,
    deleted: Option<String>,
    update_version: Vec<u8>,
}

impl TryFrom<&WeeklyStatsDb> for WeeklyStatsEntity {
    type Error = DaoError;

    fn try_from(stats: &WeeklyStatsDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: uuid_from_db(&stats.id)?,
            store_id: uuid_from_db(&stats.store_id)?,
            week_start: date_from_db(&stats.week_start)?,
            week_end: date_from_db(&stats.week_end)?,
            total_hours: decimal_from_db(&stats.total_hours)?,
            total_cost: decimal_from_db(&stats.total_cost)?,
            budget_allocated: decimal_from_db(&stats.budget_allocated)?,
            budget_remaining: decimal_from_db(&stats.budget_remaining)?,
            notes: stats.notes.as_deref().map(Arc::from),
            created: date_time_from_db(&stats.created)?,
            deleted: stats
                .deleted
                .as_deref()
                .map(date_time_from_db)
                .transpose()?,
            version: uuid_from_db(&stats.update_version)?,
        })
    }
}

pub struct WeeklyStatsDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl WeeklyStatsDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl WeeklyStatsDao for WeeklyStatsDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<WeeklyStatsEntity>, DaoError> {
        let id_vec = id.as_bytes().to_vec();
        query_as::<_, WeeklyStatsDb>(
            "SELECT id, store_id, week_start, week_end, total_hours, total_cost, budget_allocated, budget_remaining, notes, created, deleted, update_version FROM weekly_stats WHERE id = ? AND deleted IS NULL",
        )
        .bind(id_vec)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(WeeklyStatsEntity::try_from)
        .transpose()
    }

    async fn find_by_store_between(
        &self,
        store_id: Uuid,
        from: time::Date,
        to: time::Date,
        tx: Self::Transaction,
    ) -> Result<Arc<[WeeklyStatsEntity]>, DaoError> {
        let store_id_vec = store_id.as_bytes().to_vec();
        query_as::<_, WeeklyStatsDb>(
            "SELECT id, store_id, week_start, week_end, total_hours, total_cost, budget_allocated, budget_remaining, notes, created, deleted, update_version FROM weekly_stats \
             WHERE store_id = ? AND week_start >= ? AND week_start <= ? AND deleted IS NULL \
             ORDER BY week_start",
        )
        .bind(store_id_vec)
        .bind(date_to_db(from)?)
        .bind(date_to_db(to)?)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(WeeklyStatsEntity::try_from)
        .collect::<Result<Arc<[WeeklyStatsEntity]>, DaoError>>()
    }

    async fn create(
        &self,
        entity: &WeeklyStatsEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        info!("Running query to create weekly stats {}", entity.id);
        query("INSERT INTO weekly_stats (id, store_id, week_start, week_end, total_hours, total_cost, budget_allocated, budget_remaining, notes, created, deleted, update_version, update_process) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)")
            .bind(entity.id.as_bytes().to_vec())
            .bind(entity.store_id.as_bytes().to_vec())
            .bind(date_to_db(entity.week_start)?)
            .bind(date_to_db(entity.week_end)?)
            .bind(entity.total_hours.to_string())
            .bind(entity.total_cost.to_string())
            .bind(entity.budget_allocated.to_string())
            .bind(entity.budget_remaining.to_string())
            .bind(entity.notes.as_deref())
            .bind(date_time_to_db(entity.created)?)
            .bind(entity.deleted.map(date_time_to_db).transpose()?)
            .bind(entity.version.as_bytes().to_vec())
            .bind(process)
            .execute(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?;
        Ok(())
    }

    async fn update(
        &self,
        entity: &WeeklyStatsEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        info!("Running query to update weekly stats {}", entity.id);
        query("UPDATE weekly_stats SET total_hours = ?, total_cost = ?, budget_allocated = ?, budget_remaining = ?, notes = ?, deleted = ?, update_version = ?, update_process = ? WHERE id = ?")
            .bind(entity.total_hours.to_string())
            .bind(entity.total_cost.to_string())
            .bind(entity.budget_allocated.to_string())
            .bind(entity.budget_remaining.to_string())
            .bind(entity.notes.as_deref())
            .bind(entity.deleted.map(date_time_to_db).transpose()?)
            .bind(entity.version.as_bytes().to_vec())
            .bind(process)
            .bind(entity.id.as_bytes().to_vec())
            .execute(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?;
        Ok(())
    }
}
