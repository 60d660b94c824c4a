mod invariants;
mod rest_api;
mod scenarios;

use std::sync::Arc;

use rest::RestStateDef;
use rust_decimal::Decimal;
use service::employee::{Employee, EmployeeService, EmployeeType};
use service::permission::Authentication;
use service::shift::{Shift, ShiftService};
use service::store::{Store, StoreService};
use service::ServiceError;
use sqlx::sqlite::SqlitePoolOptions;
use time::macros::time;
use uuid::Uuid;

use crate::RestStateImpl;

pub struct TestSetup {
    pub rest_state: RestStateImpl,
}

impl TestSetup {
    /// Fresh in-memory database with the schema applied. A single
    /// connection keeps every transaction on the same database.
    pub async fn new() -> Self {
        let pool = Arc::new(
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect("sqlite::memory:")
                .await
                .expect("Could not connect to database"),
        );
        dao_impl_sqlite::run_migrations(pool.as_ref())
            .await
            .expect("Failed to run migrations");
        Self {
            rest_state: RestStateImpl::new(pool),
        }
    }

    /// Store open 09:00 to 17:00.
    pub async fn create_store(&self, weekly_budget: Decimal) -> Store {
        self.rest_state
            .store_service()
            .create(
                &Store {
                    id: Uuid::nil(),
                    name: "Downtown".into(),
                    weekly_budget,
                    open_time: time!(09:00),
                    close_time: time!(17:00),
                    created: None,
                    deleted: None,
                    version: Uuid::nil(),
                },
                Authentication::Full,
                None,
            )
            .await
            .unwrap()
    }

    pub async fn create_employee(
        &self,
        store_id: Uuid,
        email: &str,
        max_hours: Decimal,
        hourly_rate: Decimal,
    ) -> Employee {
        self.rest_state
            .employee_service()
            .create(
                &Employee {
                    id: Uuid::nil(),
                    name: "Jane Doe".into(),
                    email: email.into(),
                    employee_type: EmployeeType::Associate,
                    max_hours,
                    current_hours: Decimal::ZERO,
                    hourly_rate,
                    store_id,
                    created: None,
                    deleted: None,
                    version: Uuid::nil(),
                },
                Authentication::Full,
                None,
            )
            .await
            .unwrap()
    }

    pub async fn employee(&self, id: Uuid) -> Employee {
        self.rest_state
            .employee_service()
            .get(id, Authentication::Full, None)
            .await
            .unwrap()
    }

    pub async fn create_shift(
        &self,
        employee: &Employee,
        date: time::Date,
        start_time: time::Time,
        end_time: time::Time,
    ) -> Result<Shift, ServiceError> {
        self.rest_state
            .shift_service()
            .create(
                &Shift {
                    id: Uuid::nil(),
                    employee_id: employee.id,
                    store_id: employee.store_id,
                    date,
                    start_time,
                    end_time,
                    hours: Decimal::ZERO,
                    cost: Decimal::ZERO,
                    note: None,
                    is_published: false,
                    calendar_event_id: None,
                    created: None,
                    deleted: None,
                    version: Uuid::nil(),
                },
                Authentication::Full,
                None,
            )
            .await
    }
}
