use crate::employee::{EmployeeServiceDeps, EmployeeServiceImpl};
use crate::test::error_test::*;
use dao::employee::{EmployeeEntity, EmployeeTypeEntity, MockEmployeeDao};
use dao::shift::MockShiftDao;
use dao::{MockTransaction, MockTransactionDao};
use mockall::predicate::{always, eq};
use rust_decimal::Decimal;
use service::clock::MockClockService;
use service::employee::{Employee, EmployeeService, EmployeeType};
use service::permission::{Authentication, MANAGER_PRIVILEGE};
use service::uuid_service::MockUuidService;
use service::{EntityKind, MockPermissionService, ServiceError, ValidationFailureItem};
use uuid::{uuid, Uuid};

pub fn default_id() -> Uuid {
    uuid!("8E4B2D6A-1C3F-4A5B-9D7E-2F1A0B3C4D50")
}
pub fn alternate_id() -> Uuid {
    uuid!("8E4B2D6A-1C3F-4A5B-9D7E-2F1A0B3C4D51")
}
pub fn default_version() -> Uuid {
    uuid!("8E4B2D6A-1C3F-4A5B-9D7E-2F1A0B3C4D52")
}
pub fn alternate_version() -> Uuid {
    uuid!("8E4B2D6A-1C3F-4A5B-9D7E-2F1A0B3C4D53")
}
pub fn default_store_id() -> Uuid {
    uuid!("8E4B2D6A-1C3F-4A5B-9D7E-2F1A0B3C4D54")
}

pub fn default_employee_entity() -> EmployeeEntity {
    EmployeeEntity {
        id: default_id(),
        name: "Jane Doe".into(),
        email: "jane@example.com".into(),
        password_hash: Some("hash".into()),
        employee_type: EmployeeTypeEntity::Associate,
        max_hours: Decimal::from(40),
        current_hours: Decimal::from(10),
        hourly_rate: Decimal::from(20),
        store_id: default_store_id(),
        created: generate_default_datetime(),
        deleted: None,
        version: default_version(),
    }
}

pub fn default_employee() -> Employee {
    Employee::from(&default_employee_entity())
}

pub struct EmployeeServiceDependencies {
    pub employee_dao: MockEmployeeDao,
    pub shift_dao: MockShiftDao,
    pub permission_service: MockPermissionService,
    pub clock_service: MockClockService,
    pub uuid_service: MockUuidService,
}
impl EmployeeServiceDeps for EmployeeServiceDependencies {
    type Context = ();
    type Transaction = MockTransaction;
    type EmployeeDao = MockEmployeeDao;
    type ShiftDao = MockShiftDao;
    type PermissionService = MockPermissionService;
    type ClockService = MockClockService;
    type UuidService = MockUuidService;
    type TransactionDao = MockTransactionDao;
}
impl EmployeeServiceDependencies {
    pub fn build_service(self) -> EmployeeServiceImpl<EmployeeServiceDependencies> {
        EmployeeServiceImpl {
            employee_dao: self.employee_dao.into(),
            shift_dao: self.shift_dao.into(),
            permission_service: self.permission_service.into(),
            clock_service: self.clock_service.into(),
            uuid_service: self.uuid_service.into(),
            transaction_dao: default_transaction_dao().into(),
        }
    }
}

pub fn build_dependencies(manager: bool, own_employee_id: Option<Uuid>) -> EmployeeServiceDependencies {
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
    EmployeeServiceDependencies {
        employee_dao: MockEmployeeDao::new(),
        shift_dao: MockShiftDao::new(),
        permission_service: permission_service_granting(privileges, own_employee_id),
        clock_service: default_clock_service(),
        uuid_service,
    }
}

fn new_employee() -> Employee {
    Employee {
        id: Uuid::nil(),
        version: Uuid::nil(),
        created: None,
        current_hours: Decimal::from(99),
        ..default_employee()
    }
}

#[tokio::test]
async fn test_get_own_record_without_manager() {
    let mut deps = build_dependencies(false, Some(default_id()));
    deps.employee_dao
        .expect_find_by_id()
        .with(eq(default_id()), always())
        .returning(|_, _| Ok(Some(default_employee_entity())));
    let result = deps
        .build_service()
        .get(default_id(), ().auth(), None)
        .await
        .unwrap();
    assert_eq!(result, default_employee());
}

#[tokio::test]
async fn test_get_other_record_forbidden() {
    let deps = build_dependencies(false, Some(alternate_id()));
    let result = deps.build_service().get(default_id(), ().auth(), None).await;
    test_forbidden(&result);
}

#[tokio::test]
async fn test_get_all_by_store() {
    let mut deps = build_dependencies(true, None);
    deps.employee_dao
        .expect_find_by_store_id()
        .with(eq(default_store_id()), always())
        .returning(|_, _| {
            Ok([
                default_employee_entity(),
                EmployeeEntity {
                    id: alternate_id(),
                    ..default_employee_entity()
                },
            ]
            .into())
        });
    let result = deps
        .build_service()
        .get_all(Some(default_store_id()), ().auth(), None)
        .await
        .unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result[1].id, alternate_id());
}

#[tokio::test]
async fn test_create_resets_running_hours() {
    let mut deps = build_dependencies(true, None);
    deps.employee_dao
        .expect_find_by_email()
        .returning(|_, _| Ok(None));
    deps.employee_dao
        .expect_create()
        .with(
            eq(EmployeeEntity {
                password_hash: None,
                current_hours: Decimal::ZERO,
                version: alternate_version(),
                ..default_employee_entity()
            }),
            eq("employee-service"),
            always(),
        )
        .times(1)
        .returning(|_, _, _| Ok(()));
    let result = deps
        .build_service()
        .create(&new_employee(), ().auth(), None)
        .await
        .unwrap();
    assert_eq!(result.current_hours, Decimal::ZERO);
    assert_eq!(result.employee_type, EmployeeType::Associate);
}

#[tokio::test]
async fn test_create_duplicate_email() {
    let mut deps = build_dependencies(true, None);
    deps.employee_dao
        .expect_find_by_email()
        .with(eq("jane@example.com"), always())
        .returning(|_, _| {
            Ok(Some(EmployeeEntity {
                id: alternate_id(),
                ..default_employee_entity()
            }))
        });
    let result = deps
        .build_service()
        .create(&new_employee(), ().auth(), None)
        .await;
    assert!(matches!(result, Err(ServiceError::EntityAlreadyExists(id)) if id == alternate_id()));
}

#[tokio::test]
async fn test_create_requires_name_and_email() {
    let deps = build_dependencies(true, None);
    let result = deps
        .build_service()
        .create(
            &Employee {
                name: "".into(),
                email: "".into(),
                ..new_employee()
            },
            ().auth(),
            None,
        )
        .await;
    test_validation_error(
        &result,
        &ValidationFailureItem::InvalidValue("email".into()),
        2,
    );
}

#[tokio::test]
async fn test_update_keeps_hours_and_credentials() {
    let mut deps = build_dependencies(true, None);
    deps.employee_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(Some(default_employee_entity())));
    deps.employee_dao
        .expect_update()
        .with(
            eq(EmployeeEntity {
                name: "Jane Smith".into(),
                version: alternate_version(),
                ..default_employee_entity()
            }),
            eq("employee-service"),
            always(),
        )
        .times(1)
        .returning(|_, _, _| Ok(()));
    let result = deps
        .build_service()
        .update(
            &Employee {
                name: "Jane Smith".into(),
                current_hours: Decimal::ZERO,
                ..default_employee()
            },
            ().auth(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(result.current_hours, Decimal::from(10));
}

#[tokio::test]
async fn test_add_current_hours_requires_full_authentication() {
    let deps = build_dependencies(true, None);
    let result = deps
        .build_service()
        .add_current_hours(default_id(), Decimal::from(4), ().auth(), None)
        .await;
    test_forbidden(&result);
}

#[tokio::test]
async fn test_add_current_hours() {
    let mut deps = build_dependencies(false, None);
    deps.employee_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(Some(default_employee_entity())));
    deps.employee_dao
        .expect_update()
        .with(
            eq(EmployeeEntity {
                current_hours: Decimal::from(6),
                version: alternate_version(),
                ..default_employee_entity()
            }),
            always(),
            always(),
        )
        .times(1)
        .returning(|_, _, _| Ok(()));
    let result = deps
        .build_service()
        .add_current_hours(default_id(), Decimal::from(-4), Authentication::Full, None)
        .await
        .unwrap();
    assert_eq!(result.current_hours, Decimal::from(6));
}

#[tokio::test]
async fn test_add_current_hours_unknown_employee() {
    let mut deps = build_dependencies(false, None);
    deps.employee_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(None));
    let result = deps
        .build_service()
        .add_current_hours(default_id(), Decimal::from(4), Authentication::Full, None)
        .await;
    test_not_found(&result, EntityKind::Employee, &default_id());
}

#[tokio::test]
async fn test_reset_hours() {
    let mut deps = build_dependencies(true, None);
    deps.employee_dao.expect_find_by_store_id().returning(|_, _| {
        Ok([
            default_employee_entity(),
            EmployeeEntity {
                id: alternate_id(),
                ..default_employee_entity()
            },
        ]
        .into())
    });
    deps.employee_dao
        .expect_update()
        .withf(|entity, _, _| entity.current_hours == Decimal::ZERO)
        .times(2)
        .returning(|_, _, _| Ok(()));
    let count = deps
        .build_service()
        .reset_hours(default_store_id(), ().auth(), None)
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_reset_hours_without_employees() {
    let mut deps = build_dependencies(true, None);
    deps.employee_dao
        .expect_find_by_store_id()
        .returning(|_, _| Ok([].into()));
    let result = deps
        .build_service()
        .reset_hours(default_store_id(), ().auth(), None)
        .await;
    test_not_found(&result, EntityKind::Store, &default_store_id());
}

#[tokio::test]
async fn test_delete() {
    let mut deps = build_dependencies(true, None);
    deps.employee_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(Some(default_employee_entity())));
    deps.shift_dao
        .expect_find_by_filter()
        .with(always(), eq(Some(default_id())), always(), always(), always())
        .returning(|_, _, _, _, _| Ok([].into()));
    deps.employee_dao
        .expect_update()
        .with(
            eq(EmployeeEntity {
                deleted: Some(generate_default_datetime()),
                version: alternate_version(),
                ..default_employee_entity()
            }),
            eq("employee-service"),
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
async fn test_delete_with_live_shifts() {
    let mut deps = build_dependencies(true, None);
    deps.employee_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(Some(default_employee_entity())));
    deps.shift_dao
        .expect_find_by_filter()
        .returning(|_, _, _, _, _| Ok([crate::test::shift::default_shift_entity()].into()));
    deps.employee_dao.expect_update().never();
    let result = deps
        .build_service()
        .delete(default_id(), ().auth(), None)
        .await;
    assert!(matches!(
        result,
        Err(ServiceError::EmployeeHasShifts(id, 1)) if id == default_id()
    ));
}
