use crate::customer::{CustomerServiceDeps, CustomerServiceImpl};
use crate::test::error_test::*;
use dao::customer::{CustomerEntity, MockCustomerDao};
use dao::{MockTransaction, MockTransactionDao};
use mockall::predicate::{always, eq};
use service::clock::MockClockService;
use service::customer::CustomerService;
use service::permission::{Authentication, EMPLOYEE_PRIVILEGE};
use service::uuid_service::MockUuidService;
use service::{EntityKind, MockPermissionService};
use uuid::{uuid, Uuid};

pub fn default_id() -> Uuid {
    uuid!("8C1D2E3F-4A5B-4C6D-9E7F-102132435460")
}
pub fn default_version() -> Uuid {
    uuid!("8C1D2E3F-4A5B-4C6D-9E7F-102132435461")
}

pub fn default_customer_entity() -> CustomerEntity {
    CustomerEntity {
        id: default_id(),
        name: "Alex Smith".into(),
        email: "alex@example.com".into(),
        phone: "555-123-4567".into(),
        created: generate_default_datetime(),
        deleted: None,
        version: default_version(),
    }
}

pub struct CustomerServiceDependencies {
    pub customer_dao: MockCustomerDao,
    pub permission_service: MockPermissionService,
    pub clock_service: MockClockService,
    pub uuid_service: MockUuidService,
}
impl CustomerServiceDeps for CustomerServiceDependencies {
    type Context = ();
    type Transaction = MockTransaction;
    type CustomerDao = MockCustomerDao;
    type PermissionService = MockPermissionService;
    type ClockService = MockClockService;
    type UuidService = MockUuidService;
    type TransactionDao = MockTransactionDao;
}
impl CustomerServiceDependencies {
    pub fn build_service(self) -> CustomerServiceImpl<CustomerServiceDependencies> {
        CustomerServiceImpl {
            customer_dao: self.customer_dao.into(),
            permission_service: self.permission_service.into(),
            clock_service: self.clock_service.into(),
            uuid_service: self.uuid_service.into(),
            transaction_dao: default_transaction_dao().into(),
        }
    }
}

pub fn build_dependencies(employee: bool) -> CustomerServiceDependencies {
    let privileges: &'static [&'static str] = if employee {
        &[EMPLOYEE_PRIVILEGE]
    } else {
        &[]
    };
    let mut uuid_service = MockUuidService::new();
    uuid_service.expect_new_uuid().returning(|usage| {
        if usage.ends_with(" id") {
            default_id()
        } else {
            default_version()
        }
    });
    CustomerServiceDependencies {
        customer_dao: MockCustomerDao::new(),
        permission_service: permission_service_granting(privileges, None),
        clock_service: default_clock_service(),
        uuid_service,
    }
}

#[tokio::test]
async fn test_get() {
    let mut deps = build_dependencies(true);
    deps.customer_dao
        .expect_find_by_id()
        .with(eq(default_id()), always())
        .returning(|_, _| Ok(Some(default_customer_entity())));
    let customer = deps
        .build_service()
        .get(default_id(), ().auth(), None)
        .await
        .unwrap();
    assert_eq!(customer.email.as_ref(), "alex@example.com");
    assert_eq!(customer.created, Some(generate_default_datetime()));
}

#[tokio::test]
async fn test_get_not_found() {
    let mut deps = build_dependencies(true);
    deps.customer_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(None));
    let result = deps.build_service().get(default_id(), ().auth(), None).await;
    test_not_found(&result, EntityKind::Customer, &default_id());
}

#[tokio::test]
async fn test_get_requires_employee() {
    let result = build_dependencies(false)
        .build_service()
        .get(default_id(), ().auth(), None)
        .await;
    test_forbidden(&result);
}

#[tokio::test]
async fn test_find_or_create_returns_existing() {
    let mut deps = build_dependencies(false);
    deps.customer_dao
        .expect_find_by_email_and_phone()
        .with(eq("alex@example.com"), eq("555-123-4567"), always())
        .returning(|_, _, _| Ok(Some(default_customer_entity())));
    deps.customer_dao.expect_create().never();
    let customer = deps
        .build_service()
        .find_or_create(
            Some("Someone Else".into()),
            "alex@example.com",
            "555-123-4567",
            Authentication::Full,
            None,
        )
        .await
        .unwrap();
    assert_eq!(customer.id, default_id());
    assert_eq!(customer.name.as_ref(), "Alex Smith");
}

#[tokio::test]
async fn test_find_or_create_stores_empty_name() {
    let mut deps = build_dependencies(false);
    deps.customer_dao
        .expect_find_by_email_and_phone()
        .returning(|_, _, _| Ok(None));
    deps.customer_dao
        .expect_create()
        .with(
            eq(CustomerEntity {
                name: "".into(),
                ..default_customer_entity()
            }),
            eq("customer-service"),
            always(),
        )
        .times(1)
        .returning(|_, _, _| Ok(()));
    let customer = deps
        .build_service()
        .find_or_create(
            None,
            "alex@example.com",
            "555-123-4567",
            Authentication::Full,
            None,
        )
        .await
        .unwrap();
    assert_eq!(customer.name.as_ref(), "");
    assert_eq!(customer.version, default_version());
}

#[tokio::test]
async fn test_find_or_create_requires_full_authentication() {
    let result = build_dependencies(true)
        .build_service()
        .find_or_create(None, "alex@example.com", "555-123-4567", ().auth(), None)
        .await;
    test_forbidden(&result);
}
