use std::sync::Arc;

use crate::{
    date_time_from_db, date_time_to_db, uuid_from_db, ResultDbErrorExt, TransactionImpl,
};
use async_trait::async_trait;
use dao::{
    customer::{CustomerDao, CustomerEntity},
    DaoError,
};
use sqlx::{query, query_as};
use tracing::info;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct CustomerDb {
    id: Vec<u8>,
    name: String,
    email: String,
    phone: String,
    created: String,
    deleted: Option<String>,
    update_version: Vec<u8>,
}

impl TryFrom<&CustomerDb> for CustomerEntity {
    type Error = DaoError;

    fn try_from(customer: &CustomerDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: uuid_from_db(&customer.id)?,
            name: customer.name.as_str().into(),
            email: customer.email.as_str().into(),
            phone: customer.phone.as_str().into(),
            created: date_time_from_db(&customer.created)?,
            deleted: customer
                .deleted
                .as_deref()
                .map(date_time_from_db)
                .transpose()?,
            version: uuid_from_db(&customer.update_version)?,
        })
    }
}

pub struct CustomerDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl CustomerDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl CustomerDao for CustomerDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<CustomerEntity>, DaoError> {
        let id_vec = id.as_bytes().to_vec();
        query_as::<_, CustomerDb>(
            "SELECT id, name, email, phone, created, deleted, update_version FROM customer WHERE id = ? AND deleted IS NULL",
        )
        .bind(id_vec)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(CustomerEntity::try_from)
        .transpose()
    }

    async fn find_by_email_and_phone(
        &self,
        email: &str,
        phone: &str,
        tx: Self::Transaction,
    ) -> Result<Option<CustomerEntity>, DaoError> {
        query_as::<_, CustomerDb>(
            "SELECT id, name, email, phone, created, deleted, update_version FROM customer WHERE email = ? AND phone = ? AND deleted IS NULL",
        )
        .bind(email)
        .bind(phone)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(CustomerEntity::try_from)
        .transpose()
    }

    async fn create(
        &self,
        entity: &CustomerEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        info!("Running query to create customer {}", entity.id);
        query("INSERT INTO customer (id, name, email, phone, created, deleted, update_version, update_process) VALUES (?, ?, ?, ?, ?, ?, ?, ?)")
            .bind(entity.id.as_bytes().to_vec())
            .bind(entity.name.as_ref())
            .bind(entity.email.as_ref())
            .bind(entity.phone.as_ref())
            .bind(date_time_to_db(entity.created)?)
            .bind(entity.deleted.map(date_time_to_db).transpose()?)
            .bind(entity.version.as_bytes().to_vec())
            .bind(process)
            .execute(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?;
        Ok(())
    }
}
