use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use dao::employee::{EmployeeEntity, EmployeeTypeEntity};
use mockall::automock;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::permission::{Authentication, EmployeeRole};
use crate::ServiceError;

pub const DEFAULT_HOURLY_RATE: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmployeeType {
    Manager,
    #[default]
    Associate,
    PartTime,
}
impl From<&EmployeeTypeEntity> for EmployeeType {
    fn from(employee_type: &EmployeeTypeEntity) -> Self {
        match employee_type {
            EmployeeTypeEntity::Manager => Self::Manager,
            EmployeeTypeEntity::Associate => Self::Associate,
            EmployeeTypeEntity::PartTime => Self::PartTime,
        }
    }
}
impl From<&EmployeeType> for EmployeeTypeEntity {
    fn from(employee_type: &EmployeeType) -> Self {
        match employee_type {
            EmployeeType::Manager => Self::Manager,
            EmployeeType::Associate => Self::Associate,
            EmployeeType::PartTime => Self::PartTime,
        }
    }
}
impl From<EmployeeType> for EmployeeRole {
    fn from(employee_type: EmployeeType) -> Self {
        match employee_type {
            EmployeeType::Manager => EmployeeRole::Manager,
            EmployeeType::Associate => EmployeeRole::Associate,
            EmployeeType::PartTime => EmployeeRole::PartTime,
        }
    }
}

/// A staff member. The credential hash of the entity is never exposed here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Employee {
    pub id: Uuid,
    pub name: Arc<str>,
    pub email: Arc<str>,
    pub employee_type: EmployeeType,
    pub max_hours: Decimal,
    pub current_hours: Decimal,
    pub hourly_rate: Decimal,
    pub store_id: Uuid,
    pub created: Option<time::PrimitiveDateTime>,
    pub deleted: Option<time::PrimitiveDateTime>,
    pub version: Uuid,
}
impl From<&EmployeeEntity> for Employee {
    fn from(employee: &EmployeeEntity) -> Self {
        Self {
            id: employee.id,
            name: employee.name.clone(),
            email: employee.email.clone(),
            employee_type: (&employee.employee_type).into(),
            max_hours: employee.max_hours,
            current_hours: employee.current_hours,
            hourly_rate: employee.hourly_rate,
            store_id: employee.store_id,
            created: Some(employee.created),
            deleted: employee.deleted,
            version: employee.version,
        }
    }
}
impl TryFrom<&Employee> for EmployeeEntity {
    type Error = ServiceError;
    fn try_from(employee: &Employee) -> Result<Self, Self::Error> {
        Ok(Self {
            id: employee.id,
            name: employee.name.clone(),
            email: employee.email.clone(),
            password_hash: None,
            employee_type: (&employee.employee_type).into(),
            max_hours: employee.max_hours,
            current_hours: employee.current_hours,
            hourly_rate: employee.hourly_rate,
            store_id: employee.store_id,
            created: employee.created.ok_or(ServiceError::InternalError)?,
            deleted: employee.deleted,
            version: employee.version,
        })
    }
}

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait EmployeeService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    async fn get_all(
        &self,
        store_id: Option<Uuid>,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Employee]>, ServiceError>;
    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Employee, ServiceError>;
    async fn create(
        &self,
        employee: &Employee,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Employee, ServiceError>;

    /// Updates the editable fields. `current_hours` is only written through
    /// [`EmployeeService::add_current_hours`] and [`EmployeeService::reset_hours`].
    async fn update(
        &self,
        employee: &Employee,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Employee, ServiceError>;
    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError>;

    /// Adds `delta` (which may be negative) to the running total of worked
    /// hours. Only available with full authentication.
    async fn add_current_hours(
        &self,
        id: Uuid,
        delta: Decimal,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Employee, ServiceError>;

    /// Sets the running total of every employee of the store back to zero
    /// and returns the number of employees touched.
    async fn reset_hours(
        &self,
        store_id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<u32, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hourly_rate() {
        assert_eq!(DEFAULT_HOURLY_RATE, Decimal::from(20));
        assert_eq!(EmployeeType::default(), EmployeeType::Associate);
    }
}
