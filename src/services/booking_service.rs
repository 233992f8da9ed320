//! Course booking and credit accounting.
//!
//! Remaining credit is never stored: it is the sum of a user's purchased
//! credits minus their active bookings, recomputed on every call. A
//! booking is checked and inserted inside one transaction holding row
//! locks on the course and the booker, and the partial unique index on
//! active `(user_id, course_id)` pairs backs up the duplicate check.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::booking::month_window;
use crate::domain::{Booking, BookingRecord, CreditBalance, MonthlyRevenue};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

pub const MSG_COURSE_NOT_FOUND: &str = "Course not found";
pub const MSG_ALREADY_BOOKED: &str = "Course has already been booked";
pub const MSG_NO_CREDIT: &str = "No remaining credit";
pub const MSG_COURSE_FULL: &str = "Course is full";
pub const MSG_NOT_BOOKED: &str = "Course booking not found";

/// The caller's bookings together with their credit position.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingOverview {
    pub credit_remain: i64,
    pub credit_usage: i64,
    pub course_booking: Vec<BookingRecord>,
}

#[async_trait]
pub trait BookingService: Send + Sync {
    /// Book a seat on a course for the caller
    async fn book(&self, user_id: Uuid, course_id: Uuid) -> AppResult<Booking>;

    /// Cancel the caller's active booking on a course
    async fn cancel(&self, user_id: Uuid, course_id: Uuid) -> AppResult<()>;

    /// Purchased credits minus active bookings
    async fn remaining_credit(&self, user_id: Uuid) -> AppResult<CreditBalance>;

    /// Bookings list with balance
    async fn overview(&self, user_id: Uuid) -> AppResult<BookingOverview>;

    /// Revenue of a coach's courses over one calendar month (UTC)
    async fn coach_monthly_revenue(
        &self,
        coach_user_id: Uuid,
        year: i32,
        month: u32,
    ) -> AppResult<MonthlyRevenue>;
}

pub struct BookingManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> BookingManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> BookingService for BookingManager<U> {
    async fn book(&self, user_id: Uuid, course_id: Uuid) -> AppResult<Booking> {
        let result = with_transaction!(self.uow, |ctx| {
            // Lock order is always course then user
            let course = ctx
                .courses()
                .lock_by_id(course_id)
                .await?
                .ok_or_not_found(MSG_COURSE_NOT_FOUND)?;
            ctx.users()
                .lock_by_id(user_id)
                .await?
                .ok_or(AppError::InvalidToken)?;

            if ctx.bookings().find_active(user_id, course_id).await?.is_some() {
                return Err(AppError::bad_request(MSG_ALREADY_BOOKED));
            }

            let purchased = ctx.credits().total_purchased_credits(user_id).await?;
            let used = ctx.bookings().count_active_by_user(user_id).await?;
            if !CreditBalance::new(purchased, used as i64).can_book() {
                return Err(AppError::bad_request(MSG_NO_CREDIT));
            }

            let participants = ctx.bookings().count_active_by_course(course_id).await?;
            if participants >= course.max_participants.max(0) as u64 {
                return Err(AppError::bad_request(MSG_COURSE_FULL));
            }

            ctx.bookings().create(user_id, course_id).await
        });

        match result {
            Ok(booking) => {
                tracing::info!(%user_id, %course_id, booking_id = %booking.id, "course booked");
                Ok(booking)
            }
            Err(e) if e.is_unique_violation() => {
                tracing::warn!(%user_id, %course_id, "booking rejected: concurrent duplicate");
                Err(AppError::bad_request(MSG_ALREADY_BOOKED))
            }
            Err(e) => {
                tracing::warn!(%user_id, %course_id, error = %e, "booking rejected");
                Err(e)
            }
        }
    }

    async fn cancel(&self, user_id: Uuid, course_id: Uuid) -> AppResult<()> {
        let cancelled = self
            .uow
            .bookings()
            .cancel(user_id, course_id, Utc::now())
            .await?;

        if !cancelled {
            tracing::warn!(%user_id, %course_id, "cancel rejected: no active booking");
            return Err(AppError::bad_request(MSG_NOT_BOOKED));
        }

        tracing::info!(%user_id, %course_id, "booking cancelled");
        Ok(())
    }

    async fn remaining_credit(&self, user_id: Uuid) -> AppResult<CreditBalance> {
        let credits = self.uow.credits();
        let bookings = self.uow.bookings();
        let (purchased, used) = futures::try_join!(
            credits.total_purchased_credits(user_id),
            bookings.count_active_by_user(user_id),
        )?;
        let balance = CreditBalance::new(purchased, used as i64);

        if balance.remain < 0 {
            tracing::error!(
                %user_id,
                purchased,
                used,
                "credit invariant violated: more active bookings than purchased credits"
            );
        }
        Ok(balance)
    }

    async fn overview(&self, user_id: Uuid) -> AppResult<BookingOverview> {
        let bookings = self.uow.bookings();
        let (balance, course_booking) = futures::try_join!(
            self.remaining_credit(user_id),
            bookings.list_for_user(user_id),
        )?;

        Ok(BookingOverview {
            credit_remain: balance.remain,
            credit_usage: balance.used,
            course_booking,
        })
    }

    async fn coach_monthly_revenue(
        &self,
        coach_user_id: Uuid,
        year: i32,
        month: u32,
    ) -> AppResult<MonthlyRevenue> {
        let (start, end) =
            month_window(year, month).ok_or_else(|| AppError::validation("Invalid month"))?;

        let course_ids: Vec<Uuid> = self
            .uow
            .courses()
            .list_by_owner(coach_user_id)
            .await?
            .into_iter()
            .map(|course| course.id)
            .collect();

        if course_ids.is_empty() {
            return Ok(MonthlyRevenue::default());
        }

        let (course_count, participants) = self
            .uow
            .bookings()
            .window_stats(&course_ids, start, end)
            .await?;
        let (total_price, total_credits) = self.uow.credits().catalog_totals().await?;

        Ok(MonthlyRevenue::from_bookings(
            course_count,
            participants,
            total_price,
            total_credits,
        ))
    }
}
