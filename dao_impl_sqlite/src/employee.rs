use std::sync::Arc;

use crate::{
    date_time_from_db, date_time_to_db, decimal_from_db, uuid_from_db, ResultDbErrorExt,
    TransactionImpl,
};
use async_trait::async_trait;
use dao::{
    employee::{EmployeeDao, EmployeeEntity, EmployeeTypeEntity},
    DaoError,
};
use sqlx::{query, query_as};
use tracing::info;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct EmployeeDb {
    id: Vec<u8>,
    name: String,
    email: String,
    password_hash: Option<String>,
    employee_type: String,
    max_hours: String,
    current_hours: String,
    hourly_rate: String,
    store_id: Vec<u8>,
    created: String,
    deleted: Option<String>,
    update_version: Vec<u8>,
}

fn employee_type_to_db(employee_type: EmployeeTypeEntity) -> &'static str {
    match employee_type {
        EmployeeTypeEntity::Manager => "manager",
        EmployeeTypeEntity::Associate => "associate",
        EmployeeTypeEntity::PartTime => "part_time",
    }
}

fn employee_type_from_db(employee_type: &str) -> Result<EmployeeTypeEntity, DaoError> {
    match employee_type {
        "manager" => Ok(EmployeeTypeEntity::Manager),
        "associate" => Ok(EmployeeTypeEntity::Associate),
        "part_time" => Ok(EmployeeTypeEntity::PartTime),
        value => Err(DaoError::EnumValueNotFound(value.into())),
    }
}

impl TryFrom<&EmployeeDb> for EmployeeEntity {
    type Error = DaoError;

    fn try_from(employee: &EmployeeDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: uuid_from_db(&employee.id)?,
            name: employee.name.as_str().into(),
            email: employee.email.as_str().into(),
            password_hash: employee.password_hash.as_deref().map(Arc::from),
            employee_type: employee_type_from_db(&employee.employee_type)?,
            max_hours: decimal_from_db(&employee.max_hours)?,
            current_hours: decimal_from_db(&employee.current_hours)?,
            hourly_rate: decimal_from_db(&employee.hourly_rate)?,
            store_id: uuid_from_db(&employee.store_id)?,
            created: date_time_from_db(&employee.created)?,
            deleted: employee
                .deleted
                .as_deref()
                .map(date_time_from_db)
                .transpose()?,
            version: uuid_from_db(&employee.update_version)?,
        })
    }
}

pub struct EmployeeDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl EmployeeDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl EmployeeDao for EmployeeDaoImpl {
    type Transaction = TransactionImpl;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[EmployeeEntity]>, DaoError> {
        query_as::<_, EmployeeDb>(
            "SELECT id, name, email, password_hash, employee_type, max_hours, current_hours, hourly_rate, store_id, created, deleted, update_version FROM employee WHERE deleted IS NULL ORDER BY name",
        )
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(EmployeeEntity::try_from)
        .collect::<Result<Arc<[EmployeeEntity]>, DaoError>>()
    }

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<EmployeeEntity>, DaoError> {
        let id_vec = id.as_bytes().to_vec();
        query_as::<_, EmployeeDb>(
            "SELECT id, name, email, password_hash, employee_type, max_hours, current_hours, hourly_rate, store_id, created, deleted, update_version FROM employee WHERE id = ? AND deleted IS NULL",
        )
        .bind(id_vec)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(EmployeeEntity::try_from)
        .transpose()
    }

    async fn find_by_store_id(
        &self,
        store_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[EmployeeEntity]>, DaoError> {
        let store_id_vec = store_id.as_bytes().to_vec();
        query_as::<_, EmployeeDb>(
            "SELECT id, name, email, password_hash, employee_type, max_hours, current_hours, hourly_rate, store_id, created, deleted, update_version FROM employee WHERE store_id = ? AND deleted IS NULL ORDER BY name",
        )
        .bind(store_id_vec)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(EmployeeEntity::try_from)
        .collect::<Result<Arc<[EmployeeEntity]>, DaoError>>()
    }

    async fn find_by_email(
        &self,
        email: &str,
        tx: Self::Transaction,
    ) -> Result<Option<EmployeeEntity>, DaoError> {
        query_as::<_, EmployeeDb>(
            "SELECT id, name, email, password_hash, employee_type, max_hours, current_hours, hourly_rate, store_id, created, deleted, update_version FROM employee WHERE email = ? AND deleted IS NULL",
        )
        .bind(email)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(EmployeeEntity::try_from)
        .transpose()
    }

    async fn create(
        &self,
        entity: &EmployeeEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        info!("Running query to create employee {}", entity.id);
        query("INSERT INTO employee (id, name, email, password_hash, employee_type, max_hours, current_hours, hourly_rate, store_id, created, deleted, update_version, update_process) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)")
            .bind(entity.id.as_bytes().to_vec())
            .bind(entity.name.as_ref())
            .bind(entity.email.as_ref())
            .bind(entity.password_hash.as_deref())
            .bind(employee_type_to_db(entity.employee_type))
            .bind(entity.max_hours.to_string())
            .bind(entity.current_hours.to_string())
            .bind(entity.hourly_rate.to_string())
            .bind(entity.store_id.as_bytes().to_vec())
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
        entity: &EmployeeEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        info!("Running query to update employee {}", entity.id);
        query("UPDATE employee SET name = ?, email = ?, password_hash = ?, employee_type = ?, max_hours = ?, current_hours = ?, hourly_rate = ?, store_id = ?, deleted = ?, update_version = ?, update_process = ? WHERE id = ?")
            .bind(entity.name.as_ref())
            .bind(entity.email.as_ref())
            .bind(entity.password_hash.as_deref())
            .bind(employee_type_to_db(entity.employee_type))
            .bind(entity.max_hours.to_string())
            .bind(entity.current_hours.to_string())
            .bind(entity.hourly_rate.to_string())
            .bind(entity.store_id.as_bytes().to_vec())
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
