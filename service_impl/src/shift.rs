use std::sync::Arc;

use async_trait::async_trait;
use dao::{
    shift::{ShiftDao, ShiftEntity},
    TransactionDao,
};
use rust_decimal::Decimal;
use service::{
    availability::AvailabilityService,
    calendar::CalendarService,
    clock::ClockService,
    employee::{Employee, EmployeeService},
    permission::{Authentication, EMPLOYEE_PRIVILEGE, MANAGER_PRIVILEGE},
    shift::{
        shift_hours_and_cost, DeleteConfirmation, Shift, ShiftFilter, ShiftService, ShiftUpdate,
        SyncFailurePolicy,
    },
    store::StoreService,
    uuid_service::UuidService,
    weekly_stats::WeeklyStatsService,
    EntityKind, PermissionService, ServiceError,
};
use shopshift_utils::StoreWeek;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::gen_service_impl;

gen_service_impl! {
    struct ShiftServiceImpl: ShiftService = ShiftServiceDeps {
        ShiftDao: ShiftDao<Transaction = Self::Transaction> = shift_dao,
        StoreService: StoreService<Context = Self::Context, Transaction = Self::Transaction> = store_service,
        EmployeeService: EmployeeService<Context = Self::Context, Transaction = Self::Transaction> = employee_service,
        AvailabilityService: AvailabilityService<Context = Self::Context, Transaction = Self::Transaction> = availability_service,
        WeeklyStatsService: WeeklyStatsService<Context = Self::Context, Transaction = Self::Transaction> = weekly_stats_service,
        CalendarService: CalendarService = calendar_service,
        PermissionService: PermissionService<Context = Self::Context> = permission_service,
        ClockService: ClockService = clock_service,
        UuidService: UuidService = uuid_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

const SHIFT_SERVICE_PROCESS: &str = "shift-service";

impl<Deps: ShiftServiceDeps> ShiftServiceImpl<Deps> {
    async fn find_shift(&self, id: Uuid, tx: Deps::Transaction) -> Result<Shift, ServiceError> {
        self.shift_dao
            .find_by_id(id, tx)
            .await?
            .as_ref()
            .map(Shift::from)
            .ok_or(ServiceError::EntityNotFound(EntityKind::Shift, id))
    }

    /// Pushes the shift to the calendar and returns the event id the shift
    /// should carry afterwards.
    async fn sync_calendar(
        &self,
        shift: &Shift,
        employee: &Employee,
        policy: SyncFailurePolicy,
    ) -> Result<Option<Arc<str>>, ServiceError> {
        match self.calendar_service.sync_shift(shift, employee).await {
            Ok(Some(event_id)) => Ok(Some(event_id)),
            Ok(None) => Ok(shift.calendar_event_id.clone()),
            Err(err) => match policy {
                SyncFailurePolicy::Fatal => {
                    error!(shift_id = %shift.id, "Calendar sync failed: {}", err);
                    match err {
                        ServiceError::CalendarSyncFailed(_) => Err(err),
                        err => Err(ServiceError::CalendarSyncFailed(err.to_string().into())),
                    }
                }
                SyncFailurePolicy::BestEffort => {
                    warn!(shift_id = %shift.id, "Calendar sync failed, keeping shift: {}", err);
                    Ok(shift.calendar_event_id.clone())
                }
            },
        }
    }

    async fn persist(&self, shift: &Shift, tx: Deps::Transaction) -> Result<(), ServiceError> {
        self.shift_dao
            .update(&ShiftEntity::try_from(shift)?, SHIFT_SERVICE_PROCESS, tx)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl<Deps: ShiftServiceDeps> ShiftService for ShiftServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn get_all(
        &self,
        filter: &ShiftFilter,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Shift]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(EMPLOYEE_PRIVILEGE, context)
            .await?;
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if from > to {
                return Err(ServiceError::DateOrderWrong(from, to));
            }
        }
        let shifts = self
            .shift_dao
            .find_by_filter(
                filter.store_id,
                filter.employee_id,
                filter.from,
                filter.to,
                tx.clone(),
            )
            .await?
            .iter()
            .map(Shift::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(shifts)
    }

    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Shift, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(EMPLOYEE_PRIVILEGE, context)
            .await?;
        let shift = self.find_shift(id, tx.clone()).await?;
        self.transaction_dao.commit(tx).await?;
        Ok(shift)
    }

    async fn get_weekly(
        &self,
        store_id: Option<Uuid>,
        date: Option<time::Date>,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Shift]>, ServiceError> {
        let store_id = store_id.ok_or(ServiceError::MissingParameter("store_id".into()))?;
        let date = date.ok_or(ServiceError::MissingParameter("date".into()))?;
        let week = StoreWeek::containing(date);
        self.get_all(
            &ShiftFilter {
                store_id: Some(store_id),
                employee_id: None,
                from: Some(week.start),
                to: Some(week.end),
            },
            context,
            tx,
        )
        .await
    }

    #[instrument(skip(self, context, tx), fields(employee_id = %shift.employee_id, date = %shift.date))]
    async fn create(
        &self,
        shift: &Shift,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Shift, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(MANAGER_PRIVILEGE, context)
            .await?;

        if shift.id != Uuid::nil() {
            return Err(ServiceError::IdSetOnCreate);
        }
        if shift.version != Uuid::nil() {
            return Err(ServiceError::VersionSetOnCreate);
        }

        let store = self
            .store_service
            .get(shift.store_id, Authentication::Full, tx.clone().into())
            .await?;
        if shift.start_time < store.open_time || shift.end_time > store.close_time {
            info!("Shift outside of store hours");
            return Err(ServiceError::InvalidShiftWindow(
                shift.start_time,
                shift.end_time,
                store.open_time,
                store.close_time,
            ));
        }

        let employee = self
            .employee_service
            .get(shift.employee_id, Authentication::Full, tx.clone().into())
            .await?;
        if self
            .availability_service
            .is_blocked(
                employee.id,
                shift.date,
                Authentication::Full,
                tx.clone().into(),
            )
            .await?
        {
            info!("Employee blocked the date");
            return Err(ServiceError::AvailabilityBlocked(employee.id, shift.date));
        }

        let (hours, cost) =
            shift_hours_and_cost(shift.start_time, shift.end_time, employee.hourly_rate)?;
        if employee.current_hours + hours > employee.max_hours {
            info!(%hours, "Shift exceeds the employee's maximum hours");
            return Err(ServiceError::MaxHoursExceeded(
                employee.id,
                employee.current_hours + hours,
                employee.max_hours,
            ));
        }

        let stats = self
            .weekly_stats_service
            .get_or_create(
                shift.store_id,
                shift.date,
                Authentication::Full,
                tx.clone().into(),
            )
            .await?;
        if stats.would_exceed_budget(cost) {
            info!(%cost, "Shift exceeds the weekly budget");
            return Err(ServiceError::BudgetExceeded(
                stats.total_cost + cost,
                stats.budget_allocated,
            ));
        }

        let mut shift = Shift {
            id: self.uuid_service.new_uuid("ShiftService::create id"),
            version: self.uuid_service.new_uuid("ShiftService::create version"),
            hours,
            cost,
            calendar_event_id: None,
            created: Some(self.clock_service.date_time_now()),
            deleted: None,
            ..shift.clone()
        };
        if shift.is_published {
            shift.calendar_event_id = self
                .sync_calendar(&shift, &employee, SyncFailurePolicy::Fatal)
                .await?;
        }
        self.shift_dao
            .create(
                &ShiftEntity::try_from(&shift)?,
                SHIFT_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;

        self.employee_service
            .add_current_hours(employee.id, hours, Authentication::Full, tx.clone().into())
            .await?;
        self.weekly_stats_service
            .apply_shift_delta(&stats, hours, cost, Authentication::Full, tx.clone().into())
            .await?;

        self.transaction_dao.commit(tx).await?;
        Ok(shift)
    }

    #[instrument(skip(self, update, context, tx))]
    async fn update(
        &self,
        id: Uuid,
        update: &ShiftUpdate,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Shift, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(MANAGER_PRIVILEGE, context)
            .await?;

        let original = self.find_shift(id, tx.clone()).await?;
        let reassigned = update
            .employee_id
            .is_some_and(|employee_id| employee_id != original.employee_id);
        let employee = self
            .employee_service
            .get(
                update.employee_id.unwrap_or(original.employee_id),
                Authentication::Full,
                tx.clone().into(),
            )
            .await?;

        let merged = update.merge_into(&original);
        let (hours, cost) =
            shift_hours_and_cost(merged.start_time, merged.end_time, employee.hourly_rate)?;
        let hours_delta = hours - original.hours;
        let cost_delta = cost - original.cost;

        if !reassigned && employee.current_hours + hours_delta > employee.max_hours {
            info!(%hours_delta, "Shift update exceeds the employee's maximum hours");
            return Err(ServiceError::MaxHoursExceeded(
                employee.id,
                employee.current_hours + hours_delta,
                employee.max_hours,
            ));
        }

        let stats = self
            .weekly_stats_service
            .find_for_week(
                original.store_id,
                merged.date,
                Authentication::Full,
                tx.clone().into(),
            )
            .await?
            .ok_or(ServiceError::WeeklyStatsNotFound(
                original.store_id,
                merged.date,
            ))?;
        let same_week = stats.week_start <= original.date && original.date <= stats.week_end;
        let budget_delta = if same_week { cost_delta } else { cost };
        if stats.would_exceed_budget(budget_delta) {
            info!(%budget_delta, "Shift update exceeds the weekly budget");
            return Err(ServiceError::BudgetExceeded(
                stats.total_cost + budget_delta,
                stats.budget_allocated,
            ));
        }

        let mut shift = Shift {
            hours,
            cost,
            version: self.uuid_service.new_uuid("ShiftService::update version"),
            ..merged
        };
        if update.is_published == Some(true) && shift.calendar_event_id.is_none() {
            shift.calendar_event_id = self
                .sync_calendar(&shift, &employee, SyncFailurePolicy::BestEffort)
                .await?;
        }
        self.persist(&shift, tx.clone()).await?;

        if reassigned {
            self.employee_service
                .add_current_hours(
                    original.employee_id,
                    -original.hours,
                    Authentication::Full,
                    tx.clone().into(),
                )
                .await?;
            self.employee_service
                .add_current_hours(employee.id, hours, Authentication::Full, tx.clone().into())
                .await?;
        } else if hours_delta != Decimal::ZERO {
            self.employee_service
                .add_current_hours(
                    employee.id,
                    hours_delta,
                    Authentication::Full,
                    tx.clone().into(),
                )
                .await?;
        }

        if same_week {
            self.weekly_stats_service
                .apply_shift_delta(
                    &stats,
                    hours_delta,
                    cost_delta,
                    Authentication::Full,
                    tx.clone().into(),
                )
                .await?;
        } else {
            if let Some(previous_stats) = self
                .weekly_stats_service
                .find_for_week(
                    original.store_id,
                    original.date,
                    Authentication::Full,
                    tx.clone().into(),
                )
                .await?
            {
                self.weekly_stats_service
                    .apply_shift_delta(
                        &previous_stats,
                        -original.hours,
                        -original.cost,
                        Authentication::Full,
                        tx.clone().into(),
                    )
                    .await?;
            }
            self.weekly_stats_service
                .apply_shift_delta(&stats, hours, cost, Authentication::Full, tx.clone().into())
                .await?;
        }

        self.transaction_dao.commit(tx).await?;
        Ok(shift)
    }

    #[instrument(skip(self, context, tx))]
    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<DeleteConfirmation, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(MANAGER_PRIVILEGE, context)
            .await?;

        let shift = self.find_shift(id, tx.clone()).await?;
        self.employee_service
            .add_current_hours(
                shift.employee_id,
                -shift.hours,
                Authentication::Full,
                tx.clone().into(),
            )
            .await?;
        if let Some(stats) = self
            .weekly_stats_service
            .find_for_week(
                shift.store_id,
                shift.date,
                Authentication::Full,
                tx.clone().into(),
            )
            .await?
        {
            self.weekly_stats_service
                .apply_shift_delta(
                    &stats,
                    -shift.hours,
                    -shift.cost,
                    Authentication::Full,
                    tx.clone().into(),
                )
                .await?;
        } else {
            warn!(store_id = %shift.store_id, date = %shift.date, "No weekly stats for deleted shift");
        }

        let deleted = self.clock_service.date_time_now();
        let shift = Shift {
            deleted: Some(deleted),
            version: self.uuid_service.new_uuid("ShiftService::delete version"),
            ..shift
        };
        self.persist(&shift, tx.clone()).await?;
        self.transaction_dao.commit(tx).await?;

        // Only after the commit so a failed commit keeps the event.
        if let Some(event_id) = &shift.calendar_event_id {
            if let Err(err) = self.calendar_service.delete_event(event_id).await {
                warn!(shift_id = %shift.id, "Could not remove calendar event: {}", err);
            }
        }
        Ok(DeleteConfirmation { id, deleted })
    }

    #[instrument(skip(self, context, tx))]
    async fn publish(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Shift, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(MANAGER_PRIVILEGE, context)
            .await?;

        let shift = self.find_shift(id, tx.clone()).await?;
        let employee = self
            .employee_service
            .get(shift.employee_id, Authentication::Full, tx.clone().into())
            .await?;
        let mut shift = Shift {
            is_published: true,
            version: self.uuid_service.new_uuid("ShiftService::publish version"),
            ..shift
        };
        shift.calendar_event_id = self
            .sync_calendar(&shift, &employee, SyncFailurePolicy::BestEffort)
            .await?;
        self.persist(&shift, tx.clone()).await?;

        self.transaction_dao.commit(tx).await?;
        Ok(shift)
    }
}
