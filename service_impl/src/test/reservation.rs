use std::sync::Arc;

use crate::reservation::{ReservationServiceDeps, ReservationServiceImpl};
use crate::test::error_test::*;
use dao::reservation::{MockReservationDao, ReservationEntity, ReservationStatusEntity};
use dao::{MockTransaction, MockTransactionDao};
use mockall::predicate::{always, eq};
use service::clock::MockClockService;
use service::customer::{Customer, MockCustomerService};
use service::employee::MockEmployeeService;
use service::permission::{Actor, EmployeeRole, EMPLOYEE_PRIVILEGE, MANAGER_PRIVILEGE};
use service::reservation::{
    ReservationDuration, ReservationQuery, ReservationRequest, ReservationService,
    ReservationStatus,
};
use service::shift::{MockShiftService, Shift};
use service::uuid_service::MockUuidService;
use service::{MockPermissionService, ServiceError};
use time::macros::{date, time};
use uuid::{uuid, Uuid};

use super::employee::default_employee;
use super::shift::default_shift;

pub fn default_id() -> Uuid {
    uuid!("A1F3E5C7-2B4D-4E6F-8A0C-9B7D5F3E1C90")
}
pub fn default_version() -> Uuid {
    uuid!("A1F3E5C7-2B4D-4E6F-8A0C-9B7D5F3E1C91")
}
pub fn alternate_version() -> Uuid {
    uuid!("A1F3E5C7-2B4D-4E6F-8A0C-9B7D5F3E1C92")
}
pub fn customer_id() -> Uuid {
    uuid!("A1F3E5C7-2B4D-4E6F-8A0C-9B7D5F3E1C93")
}
pub fn other_customer_id() -> Uuid {
    uuid!("A1F3E5C7-2B4D-4E6F-8A0C-9B7D5F3E1C94")
}

pub fn default_reservation_entity() -> ReservationEntity {
    ReservationEntity {
        id: default_id(),
        employee_id: default_employee().id,
        customer_id: customer_id(),
        date: date!(2024 - 06 - 12),
        start_time: time!(10:00),
        end_time: time!(10:30),
        duration_minutes: 30,
        status: ReservationStatusEntity::Confirmed,
        notes: None,
        created: generate_default_datetime(),
        deleted: None,
        version: default_version(),
    }
}

pub fn default_customer() -> Customer {
    Customer {
        id: customer_id(),
        name: "Alex Smith".into(),
        email: "alex@example.com".into(),
        phone: "555-123-4567".into(),
        created: Some(generate_default_datetime()),
        deleted: None,
        version: default_version(),
    }
}

pub fn default_request() -> ReservationRequest {
    ReservationRequest {
        employee_id: default_employee().id,
        name: Some("Alex Smith".into()),
        email: "alex@example.com".into(),
        phone: "555-123-4567".into(),
        date: date!(2024 - 06 - 12),
        start_time: time!(11:00),
        duration: ReservationDuration::Minutes30,
        notes: None,
    }
}

pub struct ReservationServiceDependencies {
    pub reservation_dao: MockReservationDao,
    pub customer_service: MockCustomerService,
    pub employee_service: MockEmployeeService,
    pub shift_service: MockShiftService,
    pub permission_service: MockPermissionService,
    pub clock_service: MockClockService,
    pub uuid_service: MockUuidService,
}
impl ReservationServiceDeps for ReservationServiceDependencies {
    type Context = ();
    type Transaction = MockTransaction;
    type ReservationDao = MockReservationDao;
    type CustomerService = MockCustomerService;
    type EmployeeService = MockEmployeeService;
    type ShiftService = MockShiftService;
    type PermissionService = MockPermissionService;
    type ClockService = MockClockService;
    type UuidService = MockUuidService;
    type TransactionDao = MockTransactionDao;
}
impl ReservationServiceDependencies {
    pub fn build_service(self) -> ReservationServiceImpl<ReservationServiceDependencies> {
        ReservationServiceImpl {
            reservation_dao: self.reservation_dao.into(),
            customer_service: self.customer_service.into(),
            employee_service: self.employee_service.into(),
            shift_service: self.shift_service.into(),
            permission_service: self.permission_service.into(),
            clock_service: self.clock_service.into(),
            uuid_service: self.uuid_service.into(),
            transaction_dao: default_transaction_dao().into(),
        }
    }

    /// Lets the permission service report `actor` as the acting user.
    pub fn acting_as(&mut self, actor: Option<Actor>) {
        let privileges: &'static [&'static str] = match &actor {
            Some(Actor::Employee {
                role: EmployeeRole::Manager,
                ..
            }) => &[MANAGER_PRIVILEGE, EMPLOYEE_PRIVILEGE],
            Some(Actor::Employee { .. }) => &[EMPLOYEE_PRIVILEGE],
            _ => &[],
        };
        let own_employee_id = match &actor {
            Some(Actor::Employee { id, .. }) => *id,
            _ => None,
        };
        self.permission_service = permission_service_granting(privileges, own_employee_id);
        self.permission_service
            .expect_current_actor()
            .returning(move |_| Ok(actor.clone()));
    }

    pub fn with_stored(&mut self, entities: Arc<[ReservationEntity]>) {
        let by_id = entities.clone();
        self.reservation_dao
            .expect_find_by_id()
            .returning(move |id, _| Ok(by_id.iter().find(|entity| entity.id == id).cloned()));
        self.reservation_dao
            .expect_find_by_employee_and_date()
            .returning(move |_, _, _| Ok(entities.clone()));
    }
}

pub fn build_dependencies() -> ReservationServiceDependencies {
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
    let mut customer_service = MockCustomerService::new();
    customer_service
        .expect_find_or_create()
        .returning(|_, _, _, _, _| Ok(default_customer()));
    let mut deps = ReservationServiceDependencies {
        reservation_dao: MockReservationDao::new(),
        customer_service,
        employee_service,
        shift_service: MockShiftService::new(),
        permission_service: MockPermissionService::new(),
        clock_service: default_clock_service(),
        uuid_service,
    };
    deps.acting_as(None);
    deps
}

fn manager() -> Actor {
    Actor::Employee {
        id: Some(uuid!("A1F3E5C7-2B4D-4E6F-8A0C-9B7D5F3E1C95")),
        role: EmployeeRole::Manager,
    }
}

fn own_staff() -> Actor {
    Actor::Employee {
        id: Some(default_employee().id),
        role: EmployeeRole::Associate,
    }
}

#[tokio::test]
async fn test_create_confirms_reservation() {
    let mut deps = build_dependencies();
    deps.with_stored([default_reservation_entity()].into());
    deps.reservation_dao
        .expect_create()
        .with(
            eq(ReservationEntity {
                start_time: time!(11:00),
                end_time: time!(11:30),
                version: alternate_version(),
                ..default_reservation_entity()
            }),
            eq("reservation-service"),
            always(),
        )
        .times(1)
        .returning(|_, _, _| Ok(()));
    let reservation = deps
        .build_service()
        .create(&default_request(), ().auth(), None)
        .await
        .unwrap();
    assert_eq!(reservation.status, ReservationStatus::Confirmed);
    assert_eq!(reservation.customer_id, customer_id());
    assert_eq!(reservation.end_time, time!(11:30));
}

#[tokio::test]
async fn test_create_rejects_invalid_contact() {
    let deps = build_dependencies();
    let service = deps.build_service();
    let result = service
        .create(
            &ReservationRequest {
                email: "not-an-email".into(),
                ..default_request()
            },
            ().auth(),
            None,
        )
        .await;
    assert!(matches!(result, Err(ServiceError::InvalidEmail(email)) if &*email == "not-an-email"));

    let result = service
        .create(
            &ReservationRequest {
                phone: "5551234567".into(),
                ..default_request()
            },
            ().auth(),
            None,
        )
        .await;
    assert!(matches!(result, Err(ServiceError::InvalidPhone(_))));
}

#[tokio::test]
async fn test_create_rejects_touching_slot() {
    let mut deps = build_dependencies();
    deps.with_stored(
        [ReservationEntity {
            start_time: time!(11:30),
            end_time: time!(12:00),
            ..default_reservation_entity()
        }]
        .into(),
    );
    deps.reservation_dao.expect_create().times(0);
    let result = deps
        .build_service()
        .create(&default_request(), ().auth(), None)
        .await;
    assert!(matches!(
        result,
        Err(ServiceError::SlotUnavailable(day, start, end))
            if day == date!(2024 - 06 - 12) && start == time!(11:00) && end == time!(11:30)
    ));
}

#[tokio::test]
async fn test_cancelled_reservation_frees_slot() {
    let mut deps = build_dependencies();
    deps.with_stored(
        [ReservationEntity {
            start_time: time!(11:00),
            end_time: time!(11:30),
            status: ReservationStatusEntity::Cancelled,
            ..default_reservation_entity()
        }]
        .into(),
    );
    deps.reservation_dao
        .expect_create()
        .times(1)
        .returning(|_, _, _| Ok(()));
    assert!(deps
        .build_service()
        .create(&default_request(), ().auth(), None)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_create_past_midnight() {
    let mut deps = build_dependencies();
    deps.with_stored([].into());
    let result = deps
        .build_service()
        .create(
            &ReservationRequest {
                start_time: time!(23:45),
                ..default_request()
            },
            ().auth(),
            None,
        )
        .await;
    assert!(matches!(result, Err(ServiceError::ValidationError(_))));
}

#[tokio::test]
async fn test_customer_query_is_scoped() {
    let mut deps = build_dependencies();
    deps.acting_as(Some(Actor::Customer {
        id: Some(customer_id()),
    }));
    deps.reservation_dao
        .expect_find_by_filter()
        .with(
            eq(None),
            eq(Some(customer_id())),
            eq(None),
            eq(None),
            eq(None),
            always(),
        )
        .times(1)
        .returning(|_, _, _, _, _, _| Ok([default_reservation_entity()].into()));
    let reservations = deps
        .build_service()
        .get_reservations(
            &ReservationQuery {
                employee_id: Some(default_employee().id),
                status: Some(ReservationStatus::Pending),
                ..Default::default()
            },
            ().auth(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(reservations.len(), 1);
}

#[tokio::test]
async fn test_staff_query_is_scoped() {
    let mut deps = build_dependencies();
    deps.acting_as(Some(own_staff()));
    deps.reservation_dao
        .expect_find_by_filter()
        .with(
            eq(Some(default_employee().id)),
            eq(None),
            always(),
            always(),
            eq(Some(ReservationStatusEntity::Confirmed)),
            always(),
        )
        .times(1)
        .returning(|_, _, _, _, _, _| Ok([].into()));
    deps.build_service()
        .get_reservations(
            &ReservationQuery {
                customer_id: Some(other_customer_id()),
                status: Some(ReservationStatus::Confirmed),
                ..Default::default()
            },
            ().auth(),
            None,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_anonymous_query_unauthorized() {
    let deps = build_dependencies();
    let result = deps
        .build_service()
        .get_reservations(&ReservationQuery::default(), ().auth(), None)
        .await;
    assert!(matches!(result, Err(ServiceError::Unauthorized)));
}

#[tokio::test]
async fn test_query_date_order() {
    let mut deps = build_dependencies();
    deps.acting_as(Some(manager()));
    let result = deps
        .build_service()
        .get_reservations(
            &ReservationQuery {
                start_date: Some(date!(2024 - 06 - 20)),
                end_date: Some(date!(2024 - 06 - 10)),
                ..Default::default()
            },
            ().auth(),
            None,
        )
        .await;
    test_date_order_wrong(&result);
}

#[tokio::test]
async fn test_other_customer_cannot_see_reservation() {
    let mut deps = build_dependencies();
    deps.acting_as(Some(Actor::Customer {
        id: Some(other_customer_id()),
    }));
    deps.with_stored([default_reservation_entity()].into());
    let result = deps.build_service().get(default_id(), ().auth(), None).await;
    test_forbidden(&result);
}

#[tokio::test]
async fn test_customer_cancels_own_reservation() {
    let mut deps = build_dependencies();
    deps.acting_as(Some(Actor::Customer {
        id: Some(customer_id()),
    }));
    deps.with_stored([default_reservation_entity()].into());
    deps.reservation_dao
        .expect_update()
        .with(
            eq(ReservationEntity {
                status: ReservationStatusEntity::Cancelled,
                version: alternate_version(),
                ..default_reservation_entity()
            }),
            always(),
            always(),
        )
        .times(1)
        .returning(|_, _, _| Ok(()));
    let reservation = deps
        .build_service()
        .cancel(default_id(), ().auth(), None)
        .await
        .unwrap();
    assert_eq!(reservation.status, ReservationStatus::Cancelled);
}

#[tokio::test]
async fn test_update_status_transitions() {
    let mut deps = build_dependencies();
    deps.acting_as(Some(own_staff()));
    deps.with_stored(
        [ReservationEntity {
            status: ReservationStatusEntity::Completed,
            ..default_reservation_entity()
        }]
        .into(),
    );
    deps.reservation_dao.expect_update().times(0);
    let result = deps
        .build_service()
        .update_status(default_id(), ReservationStatus::Confirmed, ().auth(), None)
        .await;
    assert!(matches!(
        result,
        Err(ServiceError::InvalidStatusTransition(
            ReservationStatus::Completed,
            ReservationStatus::Confirmed
        ))
    ));
}

#[tokio::test]
async fn test_update_status_completes() {
    let mut deps = build_dependencies();
    deps.acting_as(Some(manager()));
    deps.with_stored([default_reservation_entity()].into());
    deps.reservation_dao
        .expect_update()
        .withf(|entity, _, _| entity.status == ReservationStatusEntity::Completed)
        .times(1)
        .returning(|_, _, _| Ok(()));
    let reservation = deps
        .build_service()
        .update_status(default_id(), ReservationStatus::Completed, ().auth(), None)
        .await
        .unwrap();
    assert_eq!(reservation.status, ReservationStatus::Completed);
}

#[tokio::test]
async fn test_customer_cannot_update_status() {
    let mut deps = build_dependencies();
    deps.acting_as(Some(Actor::Customer {
        id: Some(customer_id()),
    }));
    deps.with_stored([default_reservation_entity()].into());
    let result = deps
        .build_service()
        .update_status(default_id(), ReservationStatus::Completed, ().auth(), None)
        .await;
    test_forbidden(&result);
}

#[tokio::test]
async fn test_available_dates_sorted_and_unique() {
    let mut deps = build_dependencies();
    deps.shift_service
        .expect_get_all()
        .withf(|filter, _, _| {
            filter.employee_id == Some(default_employee().id)
                && filter.from == Some(generate_default_datetime().date())
                && filter.to.is_none()
        })
        .times(1)
        .returning(|_, _, _| {
            Ok(Arc::<[Shift]>::from([
                Shift {
                    date: date!(2063 - 04 - 09),
                    ..default_shift()
                },
                Shift {
                    date: date!(2063 - 04 - 06),
                    ..default_shift()
                },
                Shift {
                    date: date!(2063 - 04 - 09),
                    start_time: time!(15:00),
                    end_time: time!(17:00),
                    ..default_shift()
                },
            ]))
        });
    let dates = deps
        .build_service()
        .available_dates(default_employee().id, ().auth(), None)
        .await
        .unwrap();
    assert_eq!(
        dates.as_ref(),
        &[date!(2063 - 04 - 06), date!(2063 - 04 - 09)]
    );
}
