#[cfg(test)]
mod integration_test;

use std::sync::Arc;

use dao_impl_sqlite::{
    AvailabilityDaoImpl, CustomerDaoImpl, EmployeeDaoImpl, ReservationDaoImpl, ShiftDaoImpl,
    StoreDaoImpl, TransactionDaoImpl, TransactionImpl, WeeklyStatsDaoImpl,
};
use service::permission::Actor;
use service_impl::{
    availability::AvailabilityServiceDeps, customer::CustomerServiceDeps,
    employee::EmployeeServiceDeps, reservation::ReservationServiceDeps, shift::ShiftServiceDeps,
    slot::SlotServiceDeps, store::StoreServiceDeps, weekly_stats::WeeklyStatsServiceDeps,
};
use sqlx::SqlitePool;
#[cfg(feature = "json_logging")]
use tracing_subscriber::fmt::format::FmtSpan;

type Context = Option<Actor>;
type Transaction = TransactionImpl;
type TransactionDao = TransactionDaoImpl;
type StoreDao = StoreDaoImpl;
type EmployeeDao = EmployeeDaoImpl;
type AvailabilityDao = AvailabilityDaoImpl;
type ShiftDao = ShiftDaoImpl;
type WeeklyStatsDao = WeeklyStatsDaoImpl;
type CustomerDao = CustomerDaoImpl;
type ReservationDao = ReservationDaoImpl;

type UserService = service_impl::UserServiceImpl;
type PermissionService = service_impl::PermissionServiceImpl<UserService>;
type ClockService = service_impl::clock::ClockServiceImpl;
type UuidService = service_impl::uuid_service::UuidServiceImpl;
type ConfigService = service_impl::config::ConfigServiceImpl;
type CalendarService = service_impl::calendar::CalendarServiceImpl<ConfigService>;

pub struct StoreServiceDependencies;
impl StoreServiceDeps for StoreServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type StoreDao = StoreDao;
    type PermissionService = PermissionService;
    type ClockService = ClockService;
    type UuidService = UuidService;
    type TransactionDao = TransactionDao;
}
type StoreService = service_impl::store::StoreServiceImpl<StoreServiceDependencies>;

pub struct EmployeeServiceDependencies;
impl EmployeeServiceDeps for EmployeeServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type EmployeeDao = EmployeeDao;
    type ShiftDao = ShiftDao;
    type PermissionService = PermissionService;
    type ClockService = ClockService;
    type UuidService = UuidService;
    type TransactionDao = TransactionDao;
}
type EmployeeService = service_impl::employee::EmployeeServiceImpl<EmployeeServiceDependencies>;

pub struct AvailabilityServiceDependencies;
impl AvailabilityServiceDeps for AvailabilityServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type AvailabilityDao = AvailabilityDao;
    type EmployeeService = EmployeeService;
    type PermissionService = PermissionService;
    type ClockService = ClockService;
    type UuidService = UuidService;
    type TransactionDao = TransactionDao;
}
type AvailabilityService =
    service_impl::availability::AvailabilityServiceImpl<AvailabilityServiceDependencies>;

pub struct WeeklyStatsServiceDependencies;
impl WeeklyStatsServiceDeps for WeeklyStatsServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type WeeklyStatsDao = WeeklyStatsDao;
    type StoreService = StoreService;
    type PermissionService = PermissionService;
    type ClockService = ClockService;
    type UuidService = UuidService;
    type TransactionDao = TransactionDao;
}
type WeeklyStatsService =
    service_impl::weekly_stats::WeeklyStatsServiceImpl<WeeklyStatsServiceDependencies>;

pub struct ShiftServiceDependencies;
impl ShiftServiceDeps for ShiftServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type ShiftDao = ShiftDao;
    type StoreService = StoreService;
    type EmployeeService = EmployeeService;
    type AvailabilityService = AvailabilityService;
    type WeeklyStatsService = WeeklyStatsService;
    type CalendarService = CalendarService;
    type PermissionService = PermissionService;
    type ClockService = ClockService;
    type UuidService = UuidService;
    type TransactionDao = TransactionDao;
}
type ShiftService = service_impl::shift::ShiftServiceImpl<ShiftServiceDependencies>;

pub struct CustomerServiceDependencies;
impl CustomerServiceDeps for CustomerServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type CustomerDao = CustomerDao;
    type PermissionService = PermissionService;
    type ClockService = ClockService;
    type UuidService = UuidService;
    type TransactionDao = TransactionDao;
}
type CustomerService = service_impl::customer::CustomerServiceImpl<CustomerServiceDependencies>;

pub struct SlotServiceDependencies;
impl SlotServiceDeps for SlotServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type ReservationDao = ReservationDao;
    type ShiftService = ShiftService;
    type EmployeeService = EmployeeService;
    type StoreService = StoreService;
    type ConfigService = ConfigService;
    type TransactionDao = TransactionDao;
}
type SlotService = service_impl::slot::SlotServiceImpl<SlotServiceDependencies>;

pub struct ReservationServiceDependencies;
impl ReservationServiceDeps for ReservationServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type ReservationDao = ReservationDao;
    type CustomerService = CustomerService;
    type EmployeeService = EmployeeService;
    type ShiftService = ShiftService;
    type PermissionService = PermissionService;
    type ClockService = ClockService;
    type UuidService = UuidService;
    type TransactionDao = TransactionDao;
}
type ReservationService =
    service_impl::reservation::ReservationServiceImpl<ReservationServiceDependencies>;

#[derive(Clone)]
pub struct RestStateImpl {
    store_service: Arc<StoreService>,
    employee_service: Arc<EmployeeService>,
    availability_service: Arc<AvailabilityService>,
    shift_service: Arc<ShiftService>,
    weekly_stats_service: Arc<WeeklyStatsService>,
    slot_service: Arc<SlotService>,
    reservation_service: Arc<ReservationService>,
    calendar_service: Arc<CalendarService>,
}
impl rest::RestStateDef for RestStateImpl {
    type StoreService = StoreService;
    type EmployeeService = EmployeeService;
    type AvailabilityService = AvailabilityService;
    type ShiftService = ShiftService;
    type WeeklyStatsService = WeeklyStatsService;
    type SlotService = SlotService;
    type ReservationService = ReservationService;
    type CalendarService = CalendarService;

    fn store_service(&self) -> Arc<Self::StoreService> {
        self.store_service.clone()
    }
    fn employee_service(&self) -> Arc<Self::EmployeeService> {
        self.employee_service.clone()
    }
    fn availability_service(&self) -> Arc<Self::AvailabilityService> {
        self.availability_service.clone()
    }
    fn shift_service(&self) -> Arc<Self::ShiftService> {
        self.shift_service.clone()
    }
    fn weekly_stats_service(&self) -> Arc<Self::WeeklyStatsService> {
        self.weekly_stats_service.clone()
    }
    fn slot_service(&self) -> Arc<Self::SlotService> {
        self.slot_service.clone()
    }
    fn reservation_service(&self) -> Arc<Self::ReservationService> {
        self.reservation_service.clone()
    }
    fn calendar_service(&self) -> Arc<Self::CalendarService> {
        self.calendar_service.clone()
    }
}
impl RestStateImpl {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        let transaction_dao = Arc::new(TransactionDao::new(pool.clone()));
        let permission_service = Arc::new(PermissionService::new(Arc::new(
            service_impl::UserServiceImpl,
        )));
        let clock_service = Arc::new(service_impl::clock::ClockServiceImpl);
        let uuid_service = Arc::new(service_impl::uuid_service::UuidServiceImpl);
        let config_service = Arc::new(service_impl::config::ConfigServiceImpl);
        let calendar_service = Arc::new(CalendarService::new(config_service.clone()));

        let store_service = Arc::new(StoreService {
            store_dao: Arc::new(StoreDao::new(pool.clone())),
            permission_service: permission_service.clone(),
            clock_service: clock_service.clone(),
            uuid_service: uuid_service.clone(),
            transaction_dao: transaction_dao.clone(),
        });
        let shift_dao = Arc::new(ShiftDao::new(pool.clone()));
        let employee_service = Arc::new(EmployeeService {
            employee_dao: Arc::new(EmployeeDao::new(pool.clone())),
            shift_dao: shift_dao.clone(),
            permission_service: permission_service.clone(),
            clock_service: clock_service.clone(),
            uuid_service: uuid_service.clone(),
            transaction_dao: transaction_dao.clone(),
        });
        let availability_service = Arc::new(AvailabilityService {
            availability_dao: Arc::new(AvailabilityDao::new(pool.clone())),
            employee_service: employee_service.clone(),
            permission_service: permission_service.clone(),
            clock_service: clock_service.clone(),
            uuid_service: uuid_service.clone(),
            transaction_dao: transaction_dao.clone(),
        });
        let weekly_stats_service = Arc::new(WeeklyStatsService {
            weekly_stats_dao: Arc::new(WeeklyStatsDao::new(pool.clone())),
            store_service: store_service.clone(),
            permission_service: permission_service.clone(),
            clock_service: clock_service.clone(),
            uuid_service: uuid_service.clone(),
            transaction_dao: transaction_dao.clone(),
        });
        let shift_service = Arc::new(ShiftService {
            shift_dao,
            store_service: store_service.clone(),
            employee_service: employee_service.clone(),
            availability_service: availability_service.clone(),
            weekly_stats_service: weekly_stats_service.clone(),
            calendar_service: calendar_service.clone(),
            permission_service: permission_service.clone(),
            clock_service: clock_service.clone(),
            uuid_service: uuid_service.clone(),
            transaction_dao: transaction_dao.clone(),
        });
        let customer_service = Arc::new(CustomerService {
            customer_dao: Arc::new(CustomerDao::new(pool.clone())),
            permission_service: permission_service.clone(),
            clock_service: clock_service.clone(),
            uuid_service: uuid_service.clone(),
            transaction_dao: transaction_dao.clone(),
        });
        let reservation_dao = Arc::new(ReservationDao::new(pool.clone()));
        let slot_service = Arc::new(SlotService {
            reservation_dao: reservation_dao.clone(),
            shift_service: shift_service.clone(),
            employee_service: employee_service.clone(),
            store_service: store_service.clone(),
            config_service,
            transaction_dao: transaction_dao.clone(),
        });
        let reservation_service = Arc::new(ReservationService {
            reservation_dao,
            customer_service,
            employee_service: employee_service.clone(),
            shift_service: shift_service.clone(),
            permission_service,
            clock_service,
            uuid_service,
            transaction_dao,
        });

        Self {
            store_service,
            employee_service,
            availability_service,
            shift_service,
            weekly_stats_service,
            slot_service,
            reservation_service,
            calendar_service,
        }
    }
}

#[tokio::main]
async fn main() {
    let version = env!("CARGO_PKG_VERSION");

    #[cfg(feature = "local_logging")]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::TRACE)
        .pretty()
        .with_file(true)
        .finish();

    #[cfg(all(feature = "json_logging", not(feature = "local_logging")))]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_span_list(true)
        .with_file(true)
        .finish();

    #[cfg(not(any(feature = "local_logging", feature = "json_logging")))]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    tracing::info!("Shopshift backend version: {}", version);
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./localdb.sqlite3".to_string());
    let server_address =
        std::env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    let options = database_url
        .parse::<sqlx::sqlite::SqliteConnectOptions>()
        .expect("Invalid DATABASE_URL")
        .create_if_missing(true);
    let pool = Arc::new(
        SqlitePool::connect_with(options)
            .await
            .expect("Could not connect to database"),
    );
    dao_impl_sqlite::run_migrations(pool.as_ref())
        .await
        .expect("Failed to run migrations");

    let rest_state = RestStateImpl::new(pool.clone());
    rest::start_server(rest_state, &server_address)
        .await
        .expect("Could not start server")
}
