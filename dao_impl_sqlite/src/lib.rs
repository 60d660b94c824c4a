use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use dao::{DaoError, Transaction};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use time::{macros::format_description, Date, PrimitiveDateTime, Time};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

pub mod availability;
pub mod customer;
pub mod employee;
pub mod reservation;
pub mod shift;
pub mod store;
pub mod weekly_stats;

pub use availability::AvailabilityDaoImpl;
pub use customer::CustomerDaoImpl;
pub use employee::EmployeeDaoImpl;
pub use reservation::ReservationDaoImpl;
pub use shift::ShiftDaoImpl;
pub use store::StoreDaoImpl;
pub use weekly_stats::WeeklyStatsDaoImpl;

pub trait ResultDbErrorExt<T, E> {
    fn map_db_error(self) -> Result<T, DaoError>;
}
impl<T, E: std::error::Error + Send + Sync + 'static> ResultDbErrorExt<T, E> for Result<T, E> {
    fn map_db_error(self) -> Result<T, DaoError> {
        self.map_err(|err| DaoError::DatabaseQueryError(Box::new(err)))
    }
}

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DaoError> {
    info!("Running database migrations");
    sqlx::migrate!("./migrations").run(pool).await.map_db_error()
}

pub(crate) fn uuid_from_db(bytes: &[u8]) -> Result<Uuid, DaoError> {
    Uuid::from_slice(bytes).map_err(DaoError::from)
}

pub(crate) fn date_to_db(date: Date) -> Result<String, DaoError> {
    date.format(format_description!("[year]-[month]-[day]"))
        .map_err(DaoError::from)
}

pub(crate) fn date_from_db(date: &str) -> Result<Date, DaoError> {
    Date::parse(date, format_description!("[year]-[month]-[day]")).map_err(DaoError::from)
}

pub(crate) fn time_to_db(time: Time) -> Result<String, DaoError> {
    time.format(format_description!("[hour]:[minute]:[second]"))
        .map_err(DaoError::from)
}

pub(crate) fn time_from_db(time: &str) -> Result<Time, DaoError> {
    shopshift_utils::parse_clock_time(time).map_err(DaoError::from)
}

pub(crate) fn date_time_to_db(date_time: PrimitiveDateTime) -> Result<String, DaoError> {
    date_time
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"
        ))
        .map_err(DaoError::from)
}

pub(crate) fn date_time_from_db(date_time: &str) -> Result<PrimitiveDateTime, DaoError> {
    PrimitiveDateTime::parse(
        date_time,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    )
    .map_err(DaoError::from)
}

pub(crate) fn decimal_from_db(value: &str) -> Result<Decimal, DaoError> {
    Decimal::from_str(value).map_err(DaoError::from)
}

#[derive(Clone, Debug)]
pub struct TransactionImpl {
    pub(crate) tx: Arc<Mutex<sqlx::Transaction<'static, sqlx::Sqlite>>>,
}

impl Transaction for TransactionImpl {}

pub struct TransactionDaoImpl {
    pool: Arc<SqlitePool>,
}
impl TransactionDaoImpl {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}
#[async_trait]
impl dao::TransactionDao for TransactionDaoImpl {
    type Transaction = TransactionImpl;

    async fn new_transaction(&self) -> Result<Self::Transaction, DaoError> {
        let tx = self.pool.begin().await.map_db_error()?;
        Ok(TransactionImpl {
            tx: Arc::new(tx.into()),
        })
    }

    async fn use_transaction(
        &self,
        tx: Option<Self::Transaction>,
    ) -> Result<Self::Transaction, DaoError> {
        match tx {
            Some(tx) => Ok(tx),
            None => self.new_transaction().await,
        }
    }

    async fn commit(&self, transaction: Self::Transaction) -> Result<(), DaoError> {
        if let Some(tx) = Arc::into_inner(transaction.tx) {
            tx.into_inner().commit().await.map_db_error()?;
        }
        Ok(())
    }
}
