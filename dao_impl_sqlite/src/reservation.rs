use std::sync::Arc;

use crate::{
    date_from_db, date_time_from_db, date_time_to_db, date_to_db, time_from_db, time_to_db,
    uuid_from_db, ResultDbErrorExt, TransactionImpl,
};
use async_trait::async_trait;
use dao::{
    reservation::{ReservationDao, ReservationEntity, ReservationStatusEntity},
    DaoError,
};
use sqlx::{query, query_as};
use tracing::info;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct ReservationDb {
    id: Vec<u8>,
    employee_id: Vec<u8>,
    customer_id: Vec<u8>,
    date: String,
    start_time: String,
    end_time: String,
    duration_minutes: i64,
    status: String,
    notes: Option<String>,
    created: String,
    deleted: Option<String>,
    update_version: Vec<u8>,
}

fn status_to_db(status: ReservationStatusEntity) -> &'static str {
    match status {
        ReservationStatusEntity::Pending => "pending",
        ReservationStatusEntity::Confirmed => "confirmed",
        ReservationStatusEntity::Completed => "completed",
        ReservationStatusEntity::Cancelled => "cancelled",
    }
}

fn status_from_db(status: &str) -> Result<ReservationStatusEntity, DaoError> {
    match status {
        "pending" => Ok(ReservationStatusEntity::Pending),
        "confirmed" => Ok(ReservationStatusEntity::Confirmed),
        "completed" => Ok(ReservationStatusEntity::Completed),
        "cancelled" => Ok(ReservationStatusEntity::Cancelled),
        value => Err(DaoError::EnumValueNotFound(value.into())),
    }
}

impl TryFrom<&ReservationDb> for ReservationEntity {
    type Error = DaoError;

    fn try_from(reservation: &ReservationDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: uuid_from_db(&reservation.id)?,
            employee_id: uuid_from_db(&reservation.employee_id)?,
            customer_id: uuid_from_db(&reservation.customer_id)?,
            date: date_from_db(&reservation.date)?,
            start_time: time_from_db(&reservation.start_time)?,
            end_time: time_from_db(&reservation.end_time)?,
            duration_minutes: u16::try_from(reservation.duration_minutes).map_err(|_| {
                DaoError::EnumValueNotFound(
                    format!("duration_minutes {}", reservation.duration_minutes).into(),
                )
            })?,
            status: status_from_db(&reservation.status)?,
            notes: reservation.notes.as_deref().map(Arc::from),
            created: date_time_from_db(&reservation.created)?,
            deleted: reservation
                .deleted
                .as_deref()
                .map(date_time_from_db)
                .transpose()?,
            version: uuid_from_db(&reservation.update_version)?,
        })
    }
}

pub struct ReservationDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl ReservationDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl ReservationDao for ReservationDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<ReservationEntity>, DaoError> {
        let id_vec = id.as_bytes().to_vec();
        query_as::<_, ReservationDb>(
            "SELECT id, employee_id, customer_id, date, start_time, end_time, duration_minutes, status, notes, created, deleted, update_version FROM reservation WHERE id = ? AND deleted IS NULL",
        )
        .bind(id_vec)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(ReservationEntity::try_from)
        .transpose()
    }

    async fn find_by_employee_and_date(
        &self,
        employee_id: Uuid,
        date: time::Date,
        tx: Self::Transaction,
    ) -> Result<Arc<[ReservationEntity]>, DaoError> {
        let employee_id_vec = employee_id.as_bytes().to_vec();
        query_as::<_, ReservationDb>(
            "SELECT id, employee_id, customer_id, date, start_time, end_time, duration_minutes, status, notes, created, deleted, update_version FROM reservation WHERE employee_id = ? AND date = ? AND deleted IS NULL ORDER BY start_time",
        )
        .bind(employee_id_vec)
        .bind(date_to_db(date)?)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(ReservationEntity::try_from)
        .collect::<Result<Arc<[ReservationEntity]>, DaoError>>()
    }

    async fn find_by_filter(
        &self,
        employee_id: Option<Uuid>,
        customer_id: Option<Uuid>,
        from: Option<time::Date>,
        to: Option<time::Date>,
        status: Option<ReservationStatusEntity>,
        tx: Self::Transaction,
    ) -> Result<Arc<[ReservationEntity]>, DaoError> {
        let employee_id = employee_id.map(|id| id.as_bytes().to_vec());
        let customer_id = customer_id.map(|id| id.as_bytes().to_vec());
        let from = from.map(date_to_db).transpose()?;
        let to = to.map(date_to_db).transpose()?;
        let status = status.map(status_to_db);
        query_as::<_, ReservationDb>(
            "SELECT id, employee_id, customer_id, date, start_time, end_time, duration_minutes, status, notes, created, deleted, update_version FROM reservation \
             WHERE deleted IS NULL \
             AND (? IS NULL OR employee_id = ?) \
             AND (? IS NULL OR customer_id = ?) \
             AND (? IS NULL OR date >= ?) \
             AND (? IS NULL OR date <= ?) \
             AND (? IS NULL OR status = ?) \
             ORDER BY date, start_time",
        )
        .bind(employee_id.clone())
        .bind(employee_id)
        .bind(customer_id.clone())
        .bind(customer_id)
        .bind(from.clone())
        .bind(from)
        .bind(to.clone())
        .bind(to)
        .bind(status)
        .bind(status)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(ReservationEntity::try_from)
        .collect::<Result<Arc<[ReservationEntity]>, DaoError>>()
    }

    async fn create(
        &self,
        entity: &ReservationEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        info!("Running query to create reservation {}", entity.id);
        query("INSERT INTO reservation (id, employee_id, customer_id, date, start_time, end_time, duration_minutes, status, notes, created, deleted, update_version, update_process) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)")
            .bind(entity.id.as_bytes().to_vec())
            .bind(entity.employee_id.as_bytes().to_vec())
            .bind(entity.customer_id.as_bytes().to_vec())
            .bind(date_to_db(entity.date)?)
            .bind(time_to_db(entity.start_time)?)
            .bind(time_to_db(entity.end_time)?)
            .bind(i64::from(entity.duration_minutes))
            .bind(status_to_db(entity.status))
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
        entity: &ReservationEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        info!("Running query to update reservation {}", entity.id);
        query("UPDATE reservation SET status = ?, notes = ?, deleted = ?, update_version = ?, update_process = ? WHERE id = ?")
            .bind(status_to_db(entity.status))
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
