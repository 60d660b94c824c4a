use std::sync::Arc;

use crate::{
    date_time_from_db, date_time_to_db, decimal_from_db, time_from_db, time_to_db, uuid_from_db,
    ResultDbErrorExt, TransactionImpl,
};
use async_trait::async_trait;
use dao::{
    store::{StoreDao, StoreEntity},
    DaoError,
};
use sqlx::{query, query_as};
use tracing::info;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct StoreDb {
    id: Vec<u8>,
    name: String,
    weekly_budget: String,
    open_time: String,
    close_time: String,
    created: String,
    deleted: Option<String>,
    update_version: Vec<u8>,
}

impl TryFrom<&StoreDb> for StoreEntity {
    type Error = DaoError;

    fn try_from(store: &StoreDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: uuid_from_db(&store.id)?,
            name: store.name.as_str().into(),
            weekly_budget: decimal_from_db(&store.weekly_budget)?,
            open_time: time_from_db(&store.open_time)?,
            close_time: time_from_db(&store.close_time)?,
            created: date_time_from_db(&store.created)?,
            deleted: store
                .deleted
                .as_deref()
                .map(date_time_from_db)
                .transpose()?,
            version: uuid_from_db(&store.update_version)?,
        })
    }
}

pub struct StoreDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl StoreDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl StoreDao for StoreDaoImpl {
    type Transaction = TransactionImpl;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[StoreEntity]>, DaoError> {
        query_as::<_, StoreDb>(
            "SELECT id, name, weekly_budget, open_time, close_time, created, deleted, update_version FROM store WHERE deleted IS NULL ORDER BY name",
        )
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(StoreEntity::try_from)
        .collect::<Result<Arc<[StoreEntity]>, DaoError>>()
    }

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<StoreEntity>, DaoError> {
        let id_vec = id.as_bytes().to_vec();
        query_as::<_, StoreDb>(
            "SELECT id, name, weekly_budget, open_time, close_time, created, deleted, update_version FROM store WHERE id = ? AND deleted IS NULL",
        )
        .bind(id_vec)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(StoreEntity::try_from)
        .transpose()
    }

    async fn create(
        &self,
        entity: &StoreEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        info!("Running query to create store {}", entity.id);
        query("INSERT INTO store (id, name, weekly_budget, open_time, close_time, created, deleted, update_version, update_process) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)")
            .bind(entity.id.as_bytes().to_vec())
            .bind(entity.name.as_ref())
            .bind(entity.weekly_budget.to_string())
            .bind(time_to_db(entity.open_time)?)
            .bind(time_to_db(entity.close_time)?)
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
        entity: &StoreEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        info!("Running query to update store {}", entity.id);
        query("UPDATE store SET name = ?, weekly_budget = ?, open_time = ?, close_time = ?, deleted = ?, update_version = ?, update_process = ? WHERE id = ?")
            .bind(entity.name.as_ref())
            .bind(entity.weekly_budget.to_string())
            .bind(time_to_db(entity.open_time)?)
            .bind(time_to_db(entity.close_time)?)
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
