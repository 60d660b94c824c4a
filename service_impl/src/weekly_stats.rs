use std::sync::Arc;

use async_trait::async_trait;
use dao::{
    weekly_stats::{WeeklyStatsDao, WeeklyStatsEntity},
    TransactionDao,
};
use rust_decimal::Decimal;
use service::{
    clock::ClockService,
    permission::{Authentication, MANAGER_PRIVILEGE},
    store::StoreService,
    uuid_service::UuidService,
    weekly_stats::{WeeklyStats, WeeklyStatsService, DEFAULT_HISTORY_WEEKS},
    EntityKind, PermissionService, ServiceError,
};
use shopshift_utils::StoreWeek;
use tracing::info;
use uuid::Uuid;

use crate::gen_service_impl;

gen_service_impl! {
    struct WeeklyStatsServiceImpl: WeeklyStatsService = WeeklyStatsServiceDeps {
        WeeklyStatsDao: WeeklyStatsDao<Transaction = Self::Transaction> = weekly_stats_dao,
        StoreService: StoreService<Context = Self::Context, Transaction = Self::Transaction> = store_service,
        PermissionService: PermissionService<Context = Self::Context> = permission_service,
        ClockService: ClockService = clock_service,
        UuidService: UuidService = uuid_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

const WEEKLY_STATS_SERVICE_PROCESS: &str = "weekly-stats-service";

impl<Deps: WeeklyStatsServiceDeps> WeeklyStatsServiceImpl<Deps> {
    async fn find_week(
        &self,
        store_id: Uuid,
        week: StoreWeek,
        tx: Deps::Transaction,
    ) -> Result<Option<WeeklyStats>, ServiceError> {
        Ok(self
            .weekly_stats_dao
            .find_by_store_between(store_id, week.start, week.end, tx)
            .await?
            .first()
            .map(WeeklyStats::from))
    }
}

#[async_trait]
impl<Deps: WeeklyStatsServiceDeps> WeeklyStatsService for WeeklyStatsServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn get_or_create(
        &self,
        store_id: Uuid,
        reference_date: time::Date,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<WeeklyStats, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(MANAGER_PRIVILEGE, context)
            .await?;

        let week = StoreWeek::containing(reference_date);
        if let Some(stats) = self.find_week(store_id, week, tx.clone()).await? {
            self.transaction_dao.commit(tx).await?;
            return Ok(stats);
        }

        let store = self
            .store_service
            .get(store_id, Authentication::Full, tx.clone().into())
            .await?;
        let stats = WeeklyStats {
            id: self.uuid_service.new_uuid("WeeklyStatsService::create id"),
            store_id,
            week_start: week.start,
            week_end: week.end,
            total_hours: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            budget_allocated: store.weekly_budget,
            budget_remaining: store.weekly_budget,
            notes: None,
            created: Some(self.clock_service.date_time_now()),
            deleted: None,
            version: self
                .uuid_service
                .new_uuid("WeeklyStatsService::create version"),
        };
        self.weekly_stats_dao
            .create(
                &WeeklyStatsEntity::try_from(&stats)?,
                WEEKLY_STATS_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        info!(%store_id, week_start = %week.start, "Created weekly stats");
        self.transaction_dao.commit(tx).await?;
        Ok(stats)
    }

    async fn find_for_week(
        &self,
        store_id: Uuid,
        reference_date: time::Date,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Option<WeeklyStats>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(MANAGER_PRIVILEGE, context)
            .await?;
        let stats = self
            .find_week(store_id, StoreWeek::containing(reference_date), tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(stats)
    }

    async fn apply_shift_delta(
        &self,
        stats: &WeeklyStats,
        hours_delta: Decimal,
        cost_delta: Decimal,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<WeeklyStats, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_only_full_authentication(context)
            .await?;
        let stats = WeeklyStats {
            version: self
                .uuid_service
                .new_uuid("WeeklyStatsService::apply_shift_delta version"),
            ..stats.apply_shift_delta(hours_delta, cost_delta)
        };
        self.weekly_stats_dao
            .update(
                &WeeklyStatsEntity::try_from(&stats)?,
                WEEKLY_STATS_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(stats)
    }

    async fn get_for_week(
        &self,
        store_id: Uuid,
        date: Option<time::Date>,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<WeeklyStats, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(MANAGER_PRIVILEGE, context)
            .await?;
        let date = date.unwrap_or_else(|| self.clock_service.date_now());
        let stats = self
            .get_or_create(store_id, date, Authentication::Full, tx.clone().into())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(stats)
    }

    async fn update(
        &self,
        id: Uuid,
        budget_allocated: Option<Decimal>,
        notes: Option<Arc<str>>,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<WeeklyStats, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(MANAGER_PRIVILEGE, context)
            .await?;
        let stats = self
            .weekly_stats_dao
            .find_by_id(id, tx.clone())
            .await?
            .as_ref()
            .map(WeeklyStats::from)
            .ok_or(ServiceError::EntityNotFound(EntityKind::WeeklyStats, id))?;

        let stats = match budget_allocated {
            Some(budget_allocated) => stats.with_budget(budget_allocated),
            None => stats,
        };
        let stats = WeeklyStats {
            notes: notes.or(stats.notes.clone()),
            version: self
                .uuid_service
                .new_uuid("WeeklyStatsService::update version"),
            ..stats
        };
        self.weekly_stats_dao
            .update(
                &WeeklyStatsEntity::try_from(&stats)?,
                WEEKLY_STATS_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(stats)
    }

    async fn history(
        &self,
        store_id: Uuid,
        weeks: Option<u8>,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[WeeklyStats]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(MANAGER_PRIVILEGE, context)
            .await?;
        let (from, to) = StoreWeek::range_ending_at(
            self.clock_service.date_now(),
            weeks.unwrap_or(DEFAULT_HISTORY_WEEKS),
        );
        let history = self
            .weekly_stats_dao
            .find_by_store_between(store_id, from, to, tx.clone())
            .await?
            .iter()
            .map(WeeklyStats::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(history)
    }
}
