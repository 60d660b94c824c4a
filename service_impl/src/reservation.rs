use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use dao::{
    reservation::{ReservationDao, ReservationEntity},
    TransactionDao,
};
use service::{
    clock::ClockService,
    customer::CustomerService,
    employee::EmployeeService,
    permission::{Actor, Authentication, EmployeeRole, EMPLOYEE_PRIVILEGE},
    reservation::{
        is_valid_email, is_valid_phone, overlaps_inclusive, reservation_end, scope_query,
        Reservation, ReservationQuery, ReservationRequest, ReservationService, ReservationStatus,
    },
    shift::{ShiftFilter, ShiftService},
    uuid_service::UuidService,
    EntityKind, PermissionService, ServiceError,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::gen_service_impl;

gen_service_impl! {
    struct ReservationServiceImpl: ReservationService = ReservationServiceDeps {
        ReservationDao: ReservationDao<Transaction = Self::Transaction> = reservation_dao,
        CustomerService: CustomerService<Context = Self::Context, Transaction = Self::Transaction> = customer_service,
        EmployeeService: EmployeeService<Context = Self::Context, Transaction = Self::Transaction> = employee_service,
        ShiftService: ShiftService<Context = Self::Context, Transaction = Self::Transaction> = shift_service,
        PermissionService: PermissionService<Context = Self::Context> = permission_service,
        ClockService: ClockService = clock_service,
        UuidService: UuidService = uuid_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

const RESERVATION_SERVICE_PROCESS: &str = "reservation-service";

/// Whether the acting user may see the reservation. Managers see all of
/// them, other staff their own and customers the ones they booked.
fn ensure_visible(actor: Option<&Actor>, reservation: &Reservation) -> Result<(), ServiceError> {
    let allowed = match actor {
        None => return Err(ServiceError::Unauthorized),
        Some(Actor::Employee {
            role: EmployeeRole::Manager,
            ..
        }) => true,
        Some(Actor::Employee { id, .. }) => {
            id.ok_or(ServiceError::MissingActorId)? == reservation.employee_id
        }
        Some(Actor::Customer { id }) => {
            id.ok_or(ServiceError::MissingActorId)? == reservation.customer_id
        }
    };
    if allowed {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}

impl<Deps: ReservationServiceDeps> ReservationServiceImpl<Deps> {
    async fn find_reservation(
        &self,
        id: Uuid,
        tx: Deps::Transaction,
    ) -> Result<Reservation, ServiceError> {
        self.reservation_dao
            .find_by_id(id, tx)
            .await?
            .as_ref()
            .map(Reservation::try_from)
            .transpose()?
            .ok_or(ServiceError::EntityNotFound(EntityKind::Reservation, id))
    }

    async fn check_visible(
        &self,
        reservation: &Reservation,
        context: Authentication<Deps::Context>,
    ) -> Result<(), ServiceError> {
        if context == Authentication::Full {
            return Ok(());
        }
        let actor = self.permission_service.current_actor(context).await?;
        ensure_visible(actor.as_ref(), reservation)
    }

    async fn store_status(
        &self,
        reservation: &Reservation,
        status: ReservationStatus,
        tx: Deps::Transaction,
    ) -> Result<Reservation, ServiceError> {
        let reservation = Reservation {
            status,
            version: self
                .uuid_service
                .new_uuid("ReservationService::update_status version"),
            ..reservation.clone()
        };
        self.reservation_dao
            .update(
                &ReservationEntity::try_from(&reservation)?,
                RESERVATION_SERVICE_PROCESS,
                tx,
            )
            .await?;
        Ok(reservation)
    }
}

#[async_trait]
impl<Deps: ReservationServiceDeps> ReservationService for ReservationServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    #[instrument(skip(self, request, _context, tx), fields(employee_id = %request.employee_id, date = %request.date))]
    async fn create(
        &self,
        request: &ReservationRequest,
        _context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Reservation, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        if !is_valid_email(&request.email) {
            return Err(ServiceError::InvalidEmail(request.email.clone()));
        }
        if !is_valid_phone(&request.phone) {
            return Err(ServiceError::InvalidPhone(request.phone.clone()));
        }

        let employee = self
            .employee_service
            .get(request.employee_id, Authentication::Full, tx.clone().into())
            .await?;
        let customer = self
            .customer_service
            .find_or_create(
                request.name.clone(),
                &request.email,
                &request.phone,
                Authentication::Full,
                tx.clone().into(),
            )
            .await?;

        let end_time = reservation_end(request.start_time, request.duration)?;
        let taken = self
            .reservation_dao
            .find_by_employee_and_date(employee.id, request.date, tx.clone())
            .await?
            .iter()
            .any(|existing| {
                ReservationStatus::from(&existing.status).is_active()
                    && overlaps_inclusive(
                        (existing.start_time, existing.end_time),
                        (request.start_time, end_time),
                    )
            });
        if taken {
            info!("Requested slot is taken");
            return Err(ServiceError::SlotUnavailable(
                request.date,
                request.start_time,
                end_time,
            ));
        }

        let reservation = Reservation {
            id: self.uuid_service.new_uuid("ReservationService::create id"),
            employee_id: employee.id,
            customer_id: customer.id,
            date: request.date,
            start_time: request.start_time,
            end_time,
            duration: request.duration,
            status: ReservationStatus::Confirmed,
            notes: request.notes.clone(),
            created: Some(self.clock_service.date_time_now()),
            deleted: None,
            version: self
                .uuid_service
                .new_uuid("ReservationService::create version"),
        };
        self.reservation_dao
            .create(
                &ReservationEntity::try_from(&reservation)?,
                RESERVATION_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(reservation)
    }

    async fn get_reservations(
        &self,
        query: &ReservationQuery,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Reservation]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let query = match context {
            Authentication::Full => query.clone(),
            context => scope_query(
                self.permission_service
                    .current_actor(context)
                    .await?
                    .as_ref(),
                query,
            )?,
        };
        if let (Some(start_date), Some(end_date)) = (query.start_date, query.end_date) {
            if start_date > end_date {
                return Err(ServiceError::DateOrderWrong(start_date, end_date));
            }
        }
        let reservations = self
            .reservation_dao
            .find_by_filter(
                query.employee_id,
                query.customer_id,
                query.start_date,
                query.end_date,
                query.status.as_ref().map(Into::into),
                tx.clone(),
            )
            .await?
            .iter()
            .map(Reservation::try_from)
            .collect::<Result<Arc<[Reservation]>, ServiceError>>()?;
        self.transaction_dao.commit(tx).await?;
        Ok(reservations)
    }

    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Reservation, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let reservation = self.find_reservation(id, tx.clone()).await?;
        self.check_visible(&reservation, context).await?;
        self.transaction_dao.commit(tx).await?;
        Ok(reservation)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ReservationStatus,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Reservation, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(EMPLOYEE_PRIVILEGE, context.clone())
            .await?;
        let reservation = self.find_reservation(id, tx.clone()).await?;
        self.check_visible(&reservation, context).await?;
        if !reservation.status.can_transition_to(status) {
            return Err(ServiceError::InvalidStatusTransition(
                reservation.status,
                status,
            ));
        }
        let reservation = self.store_status(&reservation, status, tx.clone()).await?;
        self.transaction_dao.commit(tx).await?;
        Ok(reservation)
    }

    async fn cancel(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Reservation, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let reservation = self.find_reservation(id, tx.clone()).await?;
        self.check_visible(&reservation, context).await?;
        let reservation = self
            .store_status(&reservation, ReservationStatus::Cancelled, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(reservation)
    }

    async fn available_dates(
        &self,
        employee_id: Uuid,
        _context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[time::Date]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let employee = self
            .employee_service
            .get(employee_id, Authentication::Full, tx.clone().into())
            .await?;
        let dates: BTreeSet<time::Date> = self
            .shift_service
            .get_all(
                &ShiftFilter {
                    store_id: None,
                    employee_id: Some(employee.id),
                    from: Some(self.clock_service.date_now()),
                    to: None,
                },
                Authentication::Full,
                tx.clone().into(),
            )
            .await?
            .iter()
            .map(|shift| shift.date)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(dates.into_iter().collect())
    }
}
