use std::sync::Arc;

use async_trait::async_trait;
use dao::{
    reservation::{ReservationDao, ReservationStatusEntity},
    TransactionDao,
};
use service::{
    config::ConfigService,
    employee::EmployeeService,
    permission::Authentication,
    shift::{ShiftFilter, ShiftService},
    slot::{compute_slots, SlotService, SlotWindow, TimeSlot},
    store::StoreService,
    ServiceError,
};
use uuid::Uuid;

use crate::gen_service_impl;

gen_service_impl! {
    struct SlotServiceImpl: SlotService = SlotServiceDeps {
        ReservationDao: ReservationDao<Transaction = Self::Transaction> = reservation_dao,
        ShiftService: ShiftService<Context = Self::Context, Transaction = Self::Transaction> = shift_service,
        EmployeeService: EmployeeService<Context = Self::Context, Transaction = Self::Transaction> = employee_service,
        StoreService: StoreService<Context = Self::Context, Transaction = Self::Transaction> = store_service,
        ConfigService: ConfigService = config_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

#[async_trait]
impl<Deps: SlotServiceDeps> SlotService for SlotServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn available_slots(
        &self,
        employee_id: Uuid,
        date: time::Date,
        slot_minutes: Option<u16>,
        window: SlotWindow,
        _context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[TimeSlot]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let employee = self
            .employee_service
            .get(employee_id, Authentication::Full, tx.clone().into())
            .await?;

        let (window_start, window_end) = match window {
            SlotWindow::Shift => {
                let shifts = self
                    .shift_service
                    .get_all(
                        &ShiftFilter {
                            store_id: None,
                            employee_id: Some(employee.id),
                            from: Some(date),
                            to: Some(date),
                        },
                        Authentication::Full,
                        tx.clone().into(),
                    )
                    .await?;
                let shift = shifts
                    .first()
                    .ok_or(ServiceError::ShiftNotFoundOnDate(employee.id, date))?;
                (shift.start_time, shift.end_time)
            }
            SlotWindow::StoreHours => {
                let store = self
                    .store_service
                    .get(employee.store_id, Authentication::Full, tx.clone().into())
                    .await?;
                (store.open_time, store.close_time)
            }
        };

        let slot_minutes = match slot_minutes {
            Some(slot_minutes) => slot_minutes,
            None => self.config_service.get_config().await?.slot_duration_minutes,
        };
        let reserved: Vec<(time::Time, time::Time)> = self
            .reservation_dao
            .find_by_employee_and_date(employee.id, date, tx.clone())
            .await?
            .iter()
            .filter(|reservation| reservation.status == ReservationStatusEntity::Confirmed)
            .map(|reservation| (reservation.start_time, reservation.end_time))
            .collect();

        let slots = compute_slots(window_start, window_end, slot_minutes, &reserved)?;
        self.transaction_dao.commit(tx).await?;
        Ok(slots)
    }
}
