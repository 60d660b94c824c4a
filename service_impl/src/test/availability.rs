use crate::availability::{AvailabilityServiceDeps, AvailabilityServiceImpl};
use crate::test::error_test::*;
use dao::availability::{AvailabilityEntity, MockAvailabilityDao};
use dao::{MockTransaction, MockTransactionDao};
use mockall::predicate::{always, eq};
use service::availability::{Availability, AvailabilityService};
use service::clock::MockClockService;
use service::employee::MockEmployeeService;
use service::permission::{Authentication, MANAGER_PRIVILEGE};
use service::uuid_service::MockUuidService;
use service::{EntityKind, MockPermissionService, ServiceError, ValidationFailureItem};
use time::macros::{date, time};
use uuid::{uuid, Uuid};

use super::employee::default_employee;

pub fn default_id() -> Uuid {
    uuid!("B7E1C9A2-5D3F-4E6A-8B0C-1D2E3F4A5B60")
}
pub fn default_version() -> Uuid {
    uuid!("B7E1C9A2-5D3F-4E6A-8B0C-1D2E3F4A5B61")
}
pub fn alternate_version() -> Uuid {
    uuid!("B7E1C9A2-5D3F-4E6A-8B0C-1D2E3F4A5B62")
}
pub fn employee_id() -> Uuid {
    default_employee().id
}

pub fn default_availability_entity() -> AvailabilityEntity {
    AvailabilityEntity {
        id: default_id(),
        employee_id: employee_id(),
        date: date!(2024 - 06 - 12),
        start_time: time!(09:00),
        end_time: time!(17:00),
        is_blocked: true,
        note: Some("Dentist".into()),
        created: generate_default_datetime(),
        deleted: None,
        version: default_version(),
    }
}

pub fn default_availability() -> Availability {
    Availability::from(&default_availability_entity())
}

pub struct AvailabilityServiceDependencies {
    pub availability_dao: MockAvailabilityDao,
    pub employee_service: MockEmployeeService,
    pub permission_service: MockPermissionService,
    pub clock_service: MockClockService,
    pub uuid_service: MockUuidService,
}
impl AvailabilityServiceDeps for AvailabilityServiceDependencies {
    type Context = ();
    type Transaction = MockTransaction;
    type AvailabilityDao = MockAvailabilityDao;
    type EmployeeService = MockEmployeeService;
    type PermissionService = MockPermissionService;
    type ClockService = MockClockService;
    type UuidService = MockUuidService;
    type TransactionDao = MockTransactionDao;
}
impl AvailabilityServiceDependencies {
    pub fn build_service(self) -> AvailabilityServiceImpl<AvailabilityServiceDependencies> {
        AvailabilityServiceImpl {
            availability_dao: self.availability_dao.into(),
            employee_service: self.employee_service.into(),
            permission_service: self.permission_service.into(),
            clock_service: self.clock_service.into(),
            uuid_service: self.uuid_service.into(),
            transaction_dao: default_transaction_dao().into(),
        }
    }
}

pub fn build_dependencies(manager: bool, own_employee_id: Option<Uuid>) -> AvailabilityServiceDependencies {
    let privileges: &'static [&'static str] = if manager {
        &[MANAGER_PRIVILEGE]
    } else {
        &[]
    };
    let mut uuid_service = MockUuidService::new();
    uuid_service.expect_new_uuid().returning(|usage| {
        if usage.ends_with(" id") {
            default_id()
        } else {
            alternate_version()
        }
    });
    let mut employee_service = MockEmployeeService::new();
    employee_service
        .expect_get()
        .returning(|_, _, _| Ok(default_employee()));
    AvailabilityServiceDependencies {
        availability_dao: MockAvailabilityDao::new(),
        employee_service,
        permission_service: permission_service_granting(privileges, own_employee_id),
        clock_service: default_clock_service(),
        uuid_service,
    }
}

fn new_availability() -> Availability {
    Availability {
        id: Uuid::nil(),
        version: Uuid::nil(),
        created: None,
        ..default_availability()
    }
}

#[tokio::test]
async fn test_employee_creates_own_block() {
    let mut deps = build_dependencies(false, Some(employee_id()));
    deps.availability_dao
        .expect_create()
        .with(
            eq(AvailabilityEntity {
                version: alternate_version(),
                ..default_availability_entity()
            }),
            eq("availability-service"),
            always(),
        )
        .times(1)
        .returning(|_, _, _| Ok(()));
    let result = deps
        .build_service()
        .create(&new_availability(), ().auth(), None)
        .await
        .unwrap();
    assert_eq!(result.id, default_id());
}

#[tokio::test]
async fn test_create_for_other_employee_forbidden() {
    let deps = build_dependencies(false, Some(Uuid::nil()));
    let result = deps
        .build_service()
        .create(&new_availability(), ().auth(), None)
        .await;
    test_forbidden(&result);
}

#[tokio::test]
async fn test_create_time_order() {
    let deps = build_dependencies(true, None);
    let result = deps
        .build_service()
        .create(
            &Availability {
                start_time: time!(12:00),
                end_time: time!(11:00),
                ..new_availability()
            },
            ().auth(),
            None,
        )
        .await;
    test_time_order_wrong(&result);
}

#[tokio::test]
async fn test_create_unknown_employee() {
    let mut deps = build_dependencies(true, None);
    deps.employee_service = MockEmployeeService::new();
    deps.employee_service
        .expect_get()
        .returning(|id, _, _| Err(ServiceError::EntityNotFound(EntityKind::Employee, id)));
    let result = deps
        .build_service()
        .create(&new_availability(), ().auth(), None)
        .await;
    test_not_found(&result, EntityKind::Employee, &employee_id());
}

#[tokio::test]
async fn test_get_by_employee_date_order() {
    let deps = build_dependencies(true, None);
    let result = deps
        .build_service()
        .get_by_employee(
            employee_id(),
            Some(date!(2024 - 06 - 20)),
            Some(date!(2024 - 06 - 10)),
            ().auth(),
            None,
        )
        .await;
    test_date_order_wrong(&result);
}

#[tokio::test]
async fn test_update_cannot_move_to_other_employee() {
    let mut deps = build_dependencies(true, None);
    deps.availability_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(Some(default_availability_entity())));
    let result = deps
        .build_service()
        .update(
            &Availability {
                employee_id: Uuid::nil(),
                ..default_availability()
            },
            ().auth(),
            None,
        )
        .await;
    test_validation_error(
        &result,
        &ValidationFailureItem::ModificationNotAllowed("employee_id".into()),
        1,
    );
}

#[tokio::test]
async fn test_delete_is_soft() {
    let mut deps = build_dependencies(false, Some(employee_id()));
    deps.availability_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(Some(default_availability_entity())));
    deps.availability_dao
        .expect_update()
        .with(
            eq(AvailabilityEntity {
                deleted: Some(generate_default_datetime()),
                version: alternate_version(),
                ..default_availability_entity()
            }),
            always(),
            always(),
        )
        .times(1)
        .returning(|_, _, _| Ok(()));
    deps.build_service()
        .delete(default_id(), ().auth(), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_is_blocked_ignores_time_range() {
    let mut deps = build_dependencies(false, None);
    deps.availability_dao
        .expect_find_blocked_by_employee_and_date()
        .with(eq(employee_id()), eq(date!(2024 - 06 - 12)), always())
        .returning(|_, _, _| {
            Ok([AvailabilityEntity {
                start_time: time!(18:00),
                end_time: time!(19:00),
                ..default_availability_entity()
            }]
            .into())
        });
    let service = deps.build_service();
    assert!(service
        .is_blocked(
            employee_id(),
            date!(2024 - 06 - 12),
            Authentication::Full,
            None
        )
        .await
        .unwrap());
}

#[tokio::test]
async fn test_not_blocked_without_entries() {
    let mut deps = build_dependencies(false, Some(employee_id()));
    deps.availability_dao
        .expect_find_blocked_by_employee_and_date()
        .returning(|_, _, _| Ok([].into()));
    assert!(!deps
        .build_service()
        .is_blocked(employee_id(), date!(2024 - 06 - 13), ().auth(), None)
        .await
        .unwrap());
}
