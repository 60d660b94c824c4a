use std::sync::Arc;

use crate::{
    date_from_db, date_time_from_db, date_time_to_db, date_to_db, decimal_from_db, time_from_db,
    time_to_db, uuid_from_db, ResultDbErrorExt, TransactionImpl,
};
use async_trait::async_trait;
use dao::{
    shift::{ShiftDao, ShiftEntity},
    DaoError,
};
use sqlx::{query, query_as};
use tracing::info;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct ShiftDb {
    id: Vec<u8>,
    employee_id: Vec<u8>,
    store_id: Vec<u8>,
    date: String,
    start_time: String,
    end_time: String,
    hours: String,
    cost: String,
    note: Option<String>,
    is_published: bool,
    calendar_event_id: Option<String>,
    created: String,
    deleted: Option<String>,
    update_version: Vec<u8>,
}

impl TryFrom<&ShiftDb> for ShiftEntity {
    type Error = DaoError;

    fn try_from(shift: &ShiftDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: uuid_from_db(&shift.id)?,
            employee_id: uuid_from_db(&shift.employee_id)?,
            store_id: uuid_from_db(&shift.store_id)?,
            date: date_from_db(&shift.date)?,
            start_time: time_from_db(&shift.start_time)?,
            end_time: time_from_db(&shift.end_time)?,
            hours: decimal_from_db(&shift.hours)?,
            cost: decimal_from_db(&shift.cost)?,
            note: shift.note.as_deref().map(Arc::from),
            is_published: shift.is_published,
            calendar_event_id: shift.calendar_event_id.as_deref().map(Arc::from),
            created: date_time_from_db(&shift.created)?,
            deleted: shift
                .deleted
                .as_deref()
                .map(date_time_from_db)
                .transpose()?,
            version: uuid_from_db(&shift.update_version)?,
        })
    }
}

pub struct ShiftDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl ShiftDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl ShiftDao for ShiftDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<ShiftEntity>, DaoError> {
        let id_vec = id.as_bytes().to_vec();
        query_as::<_, ShiftDb>(
            "SELECT id, employee_id, store_id, date, start_time, end_time, hours, cost, note, is_published, calendar_event_id, created, deleted, update_version FROM shift WHERE id = ? AND deleted IS NULL",
        )
        .bind(id_vec)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(ShiftEntity::try_from)
        .transpose()
    }

    async fn find_by_filter(
        &self,
        store_id: Option<Uuid>,
        employee_id: Option<Uuid>,
        from: Option<time::Date>,
        to: Option<time::Date>,
        tx: Self::Transaction,
    ) -> Result<Arc<[ShiftEntity]>, DaoError> {
        let store_id = store_id.map(|id| id.as_bytes().to_vec());
        let employee_id = employee_id.map(|id| id.as_bytes().to_vec());
        let from = from.map(date_to_db).transpose()?;
        let to = to.map(date_to_db).transpose()?;
        query_as::<_, ShiftDb>(
            "SELECT id, employee_id, store_id, date, start_time, end_time, hours, cost, note, is_published, calendar_event_id, created, deleted, update_version FROM shift \
             WHERE deleted IS NULL \
             AND (? IS NULL OR store_id = ?) \
             AND (? IS NULL OR employee_id = ?) \
             AND (? IS NULL OR date >= ?) \
             AND (? IS NULL OR date <= ?) \
             ORDER BY date, start_time",
        )
        .bind(store_id.clone())
        .bind(store_id)
        .bind(employee_id.clone())
        .bind(employee_id)
        .bind(from.clone())
        .bind(from)
        .bind(to.clone())
        .bind(to)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(ShiftEntity::try_from)
        .collect::<Result<Arc<[ShiftEntity]>, DaoError>>()
    }

    async fn create(
        &self,
        entity: &ShiftEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        info!("Running query to create shift {}", entity.id);
        query("INSERT INTO shift (id, employee_id, store_id, date, start_time, end_time, hours, cost, note, is_published, calendar_event_id, created, deleted, update_version, update_process) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)")
            .bind(entity.id.as_bytes().to_vec())
            .bind(entity.employee_id.as_bytes().to_vec())
            .bind(entity.store_id.as_bytes().to_vec())
            .bind(date_to_db(entity.date)?)
            .bind(time_to_db(entity.start_time)?)
            .bind(time_to_db(entity.end_time)?)
            .bind(entity.hours.to_string())
            .bind(entity.cost.to_string())
            .bind(entity.note.as_deref())
            .bind(entity.is_published)
            .bind(entity.calendar_event_id.as_deref())
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
        entity: &ShiftEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        info!("Running query to update shift {}", entity.id);
        query("UPDATE shift SET employee_id = ?, store_id = ?, date = ?, start_time = ?, end_time = ?, hours = ?, cost = ?, note = ?, is_published = ?, calendar_event_id = ?, deleted = ?, update_version = ?, update_process = ? WHERE id = ?")
            .bind(entity.employee_id.as_bytes().to_vec())
            .bind(entity.store_id.as_bytes().to_vec())
            .bind(date_to_db(entity.date)?)
            .bind(time_to_db(entity.start_time)?)
            .bind(time_to_db(entity.end_time)?)
            .bind(entity.hours.to_string())
            .bind(entity.cost.to_string())
            .bind(entity.note.as_deref())
            .bind(entity.is_published)
            .bind(entity.calendar_event_id.as_deref())
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
