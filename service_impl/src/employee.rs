use std::sync::Arc;

use async_trait::async_trait;
use dao::{
    employee::{EmployeeDao, EmployeeEntity},
    shift::ShiftDao,
    TransactionDao,
};
use rust_decimal::Decimal;
use service::{
    clock::ClockService,
    employee::{Employee, EmployeeService},
    permission::{Authentication, MANAGER_PRIVILEGE},
    uuid_service::UuidService,
    EntityKind, PermissionService, ServiceError, ValidationFailureItem,
};
use tokio::join;
use tracing::info;
use uuid::Uuid;

use crate::gen_service_impl;

gen_service_impl! {
    struct EmployeeServiceImpl: EmployeeService = EmployeeServiceDeps {
        EmployeeDao: EmployeeDao<Transaction = Self::Transaction> = employee_dao,
        ShiftDao: ShiftDao<Transaction = Self::Transaction> = shift_dao,
        PermissionService: PermissionService<Context = Self::Context> = permission_service,
        ClockService: ClockService = clock_service,
        UuidService: UuidService = uuid_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

const EMPLOYEE_SERVICE_PROCESS: &str = "employee-service";

fn validate_employee(employee: &Employee) -> Result<(), ServiceError> {
    let mut failures = Vec::new();
    if employee.name.trim().is_empty() {
        failures.push(ValidationFailureItem::InvalidValue("name".into()));
    }
    if employee.email.trim().is_empty() {
        failures.push(ValidationFailureItem::InvalidValue("email".into()));
    }
    if employee.max_hours < Decimal::ZERO {
        failures.push(ValidationFailureItem::InvalidValue("max_hours".into()));
    }
    if employee.hourly_rate < Decimal::ZERO {
        failures.push(ValidationFailureItem::InvalidValue("hourly_rate".into()));
    }
    if failures.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::ValidationError(failures.into()))
    }
}

impl<Deps: EmployeeServiceDeps> EmployeeServiceImpl<Deps> {
    async fn find_entity(
        &self,
        id: Uuid,
        tx: Deps::Transaction,
    ) -> Result<EmployeeEntity, ServiceError> {
        self.employee_dao
            .find_by_id(id, tx)
            .await?
            .ok_or(ServiceError::EntityNotFound(EntityKind::Employee, id))
    }

    async fn check_unique_email(
        &self,
        email: &str,
        own_id: Option<Uuid>,
        tx: Deps::Transaction,
    ) -> Result<(), ServiceError> {
        match self.employee_dao.find_by_email(email, tx).await? {
            Some(existing) if Some(existing.id) != own_id => {
                Err(ServiceError::EntityAlreadyExists(existing.id))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<Deps: EmployeeServiceDeps> EmployeeService for EmployeeServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn get_all(
        &self,
        store_id: Option<Uuid>,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Employee]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(MANAGER_PRIVILEGE, context)
            .await?;
        let entities = match store_id {
            Some(store_id) => self.employee_dao.find_by_store_id(store_id, tx.clone()).await?,
            None => self.employee_dao.all(tx.clone()).await?,
        };
        let employees = entities.iter().map(Employee::from).collect();
        self.transaction_dao.commit(tx).await?;
        Ok(employees)
    }

    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Employee, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let (manager, own) = join!(
            self.permission_service
                .check_permission(MANAGER_PRIVILEGE, context.clone()),
            self.permission_service.check_employee(id, context),
        );
        manager.or(own)?;
        let employee = Employee::from(&self.find_entity(id, tx.clone()).await?);
        self.transaction_dao.commit(tx).await?;
        Ok(employee)
    }

    async fn create(
        &self,
        employee: &Employee,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Employee, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(MANAGER_PRIVILEGE, context)
            .await?;

        if employee.id != Uuid::nil() {
            return Err(ServiceError::IdSetOnCreate);
        }
        if employee.version != Uuid::nil() {
            return Err(ServiceError::VersionSetOnCreate);
        }
        validate_employee(employee)?;
        self.check_unique_email(&employee.email, None, tx.clone())
            .await?;

        let employee = Employee {
            id: self.uuid_service.new_uuid("EmployeeService::create id"),
            version: self.uuid_service.new_uuid("EmployeeService::create version"),
            current_hours: Decimal::ZERO,
            created: Some(self.clock_service.date_time_now()),
            deleted: None,
            ..employee.clone()
        };
        self.employee_dao
            .create(
                &EmployeeEntity::try_from(&employee)?,
                EMPLOYEE_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(employee)
    }

    async fn update(
        &self,
        employee: &Employee,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Employee, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(MANAGER_PRIVILEGE, context)
            .await?;

        let persisted = self.find_entity(employee.id, tx.clone()).await?;
        if employee.version != persisted.version {
            return Err(ServiceError::EntityConflicts(
                employee.id,
                persisted.version,
                employee.version,
            ));
        }
        if employee.deleted != persisted.deleted {
            return Err(ServiceError::ValidationError(Arc::new([
                ValidationFailureItem::ModificationNotAllowed("deleted".into()),
            ])));
        }
        validate_employee(employee)?;
        if employee.email != persisted.email {
            self.check_unique_email(&employee.email, Some(employee.id), tx.clone())
                .await?;
        }

        let employee = Employee {
            current_hours: persisted.current_hours,
            created: Some(persisted.created),
            version: self.uuid_service.new_uuid("EmployeeService::update version"),
            ..employee.clone()
        };
        let entity = EmployeeEntity {
            password_hash: persisted.password_hash.clone(),
            ..EmployeeEntity::try_from(&employee)?
        };
        self.employee_dao
            .update(&entity, EMPLOYEE_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(employee)
    }

    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(MANAGER_PRIVILEGE, context)
            .await?;
        let mut entity = self.find_entity(id, tx.clone()).await?;
        let live_shifts = self
            .shift_dao
            .find_by_filter(None, Some(id), None, None, tx.clone())
            .await?;
        if !live_shifts.is_empty() {
            info!(employee_id = %id, shifts = live_shifts.len(), "Employee still has shifts");
            return Err(ServiceError::EmployeeHasShifts(id, live_shifts.len()));
        }
        entity.deleted = Some(self.clock_service.date_time_now());
        entity.version = self.uuid_service.new_uuid("EmployeeService::delete version");
        self.employee_dao
            .update(&entity, EMPLOYEE_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(())
    }

    async fn add_current_hours(
        &self,
        id: Uuid,
        delta: Decimal,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Employee, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_only_full_authentication(context)
            .await?;
        let entity = self.find_entity(id, tx.clone()).await?;
        let entity = EmployeeEntity {
            current_hours: entity.current_hours + delta,
            version: self
                .uuid_service
                .new_uuid("EmployeeService::add_current_hours version"),
            ..entity
        };
        self.employee_dao
            .update(&entity, EMPLOYEE_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(Employee::from(&entity))
    }

    async fn reset_hours(
        &self,
        store_id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<u32, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(MANAGER_PRIVILEGE, context)
            .await?;
        let employees = self
            .employee_dao
            .find_by_store_id(store_id, tx.clone())
            .await?;
        if employees.is_empty() {
            return Err(ServiceError::EntityNotFound(EntityKind::Store, store_id));
        }
        for employee in employees.iter() {
            let entity = EmployeeEntity {
                current_hours: Decimal::ZERO,
                version: self
                    .uuid_service
                    .new_uuid("EmployeeService::reset_hours version"),
                ..employee.clone()
            };
            self.employee_dao
                .update(&entity, EMPLOYEE_SERVICE_PROCESS, tx.clone())
                .await?;
        }
        info!(%store_id, count = employees.len(), "Reset employee hours");
        self.transaction_dao.commit(tx).await?;
        Ok(employees.len() as u32)
    }
}
