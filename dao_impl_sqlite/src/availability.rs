use std::sync::Arc;

use crate::{
    date_from_db, date_time_from_db, date_time_to_db, date_to_db, time_from_db, time_to_db,
    uuid_from_db, ResultDbErrorExt, TransactionImpl,
};
use async_trait::async_trait;
use dao::{
    availability::{AvailabilityDao, AvailabilityEntity},
    DaoError,
};
use sqlx::{query, query_as};
use tracing::info;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct AvailabilityDb {
    id: Vec<u8>,
    employee_id: Vec<u8>,
    date: String,
    start_time: String,
    end_time: String,
    is_blocked: bool,
    note: Option<String>,
    created: String,
    deleted: Option<String>,
    update_version: Vec<u8>,
}

impl TryFrom<&AvailabilityDb> for AvailabilityEntity {
    type Error = DaoError;

    fn try_from(availability: &AvailabilityDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: uuid_from_db(&availability.id)?,
            employee_id: uuid_from_db(&availability.employee_id)?,
            date: date_from_db(&availability.date)?,
            start_time: time_from_db(&availability.start_time)?,
            end_time: time_from_db(&availability.end_time)?,
            is_blocked: availability.is_blocked,
            note: availability.note.as_deref().map(Arc::from),
            created: date_time_from_db(&availability.created)?,
            deleted: availability
                .deleted
                .as_deref()
                .map(date_time_from_db)
                .transpose()?,
            version: uuid_from_db(&availability.update_version)?,
        })
    }
}

pub struct AvailabilityDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl AvailabilityDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl AvailabilityDao for AvailabilityDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<AvailabilityEntity>, DaoError> {
        let id_vec = id.as_bytes().to_vec();
        query_as::<_, AvailabilityDb>(
            "SELECT id, employee_id, date, start_time, end_time, is_blocked, note, created, deleted, update_version FROM availability WHERE id = ? AND deleted IS NULL",
        )
        .bind(id_vec)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(AvailabilityEntity::try_from)
        .transpose()
    }

    async fn find_by_employee_id(
        &self,
        employee_id: Uuid,
        from: Option<time::Date>,
        to: Option<time::Date>,
        tx: Self::Transaction,
    ) -> Result<Arc<[AvailabilityEntity]>, DaoError> {
        let employee_id_vec = employee_id.as_bytes().to_vec();
        let from = from.map(date_to_db).transpose()?;
        let to = to.map(date_to_db).transpose()?;
        query_as::<_, AvailabilityDb>(
            "SELECT id, employee_id, date, start_time, end_time, is_blocked, note, created, deleted, update_version FROM availability \
             WHERE employee_id = ? AND deleted IS NULL \
             AND (? IS NULL OR date >= ?) AND (? IS NULL OR date <= ?) \
             ORDER BY date, start_time",
        )
        .bind(employee_id_vec)
        .bind(from.clone())
        .bind(from)
        .bind(to.clone())
        .bind(to)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(AvailabilityEntity::try_from)
        .collect::<Result<Arc<[AvailabilityEntity]>, DaoError>>()
    }

    async fn find_blocked_by_employee_and_date(
        &self,
        employee_id: Uuid,
        date: time::Date,
        tx: Self::Transaction,
    ) -> Result<Arc<[AvailabilityEntity]>, DaoError> {
        let employee_id_vec = employee_id.as_bytes().to_vec();
        query_as::<_, AvailabilityDb>(
            "SELECT id, employee_id, date, start_time, end_time, is_blocked, note, created, deleted, update_version FROM availability WHERE employee_id = ? AND date = ? AND is_blocked = 1 AND deleted IS NULL",
        )
        .bind(employee_id_vec)
        .bind(date_to_db(date)?)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(AvailabilityEntity::try_from)
        .collect::<Result<Arc<[AvailabilityEntity]>, DaoError>>()
    }

    async fn create(
        &self,
        entity: &AvailabilityEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        info!("Running query to create availability {}", entity.id);
        query("INSERT INTO availability (id, employee_id, date, start_time, end_time, is_blocked, note, created, deleted, update_version, update_process) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)")
            .bind(entity.id.as_bytes().to_vec())
            .bind(entity.employee_id.as_bytes().to_vec())
            .bind(date_to_db(entity.date)?)
            .bind(time_to_db(entity.start_time)?)
            .bind(time_to_db(entity.end_time)?)
            .bind(entity.is_blocked)
            .bind(entity.note.as_deref())
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
        entity: &AvailabilityEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        info!("Running query to update availability {}", entity.id);
        query("UPDATE availability SET date = ?, start_time = ?, end_time = ?, is_blocked = ?, note = ?, deleted = ?, update_version = ?, update_process = ? WHERE id = ?")
            .bind(date_to_db(entity.date)?)
            .bind(time_to_db(entity.start_time)?)
            .bind(time_to_db(entity.end_time)?)
            .bind(entity.is_blocked)
            .bind(entity.note.as_deref())
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
