// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Focus-driven loading for list and overview views.
//!
//! A view re-fetches whenever it gains focus. Each fetch runs under a
//! [`LoadTicket`]; losing focus or starting a newer fetch cancels the old
//! ticket, and a result arriving under a cancelled ticket is dropped instead
//! of overwriting what the view shows.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::aggregate::{Summary, aggregate};
use crate::error::StoreResult;
use crate::models::{Car, ExpenseWithLabels};
use crate::session::Session;
use crate::store::RecordStore;

/// What a view needs fetched when it gains focus.
pub trait Loader {
    type Output;

    fn load(&self, store: &dyn RecordStore, session: &Session) -> StoreResult<Self::Output>;
}

/// Spending overview: all expenses, aggregated.
pub struct OverviewLoader;

impl Loader for OverviewLoader {
    type Output = Summary;

    fn load(&self, store: &dyn RecordStore, session: &Session) -> StoreResult<Summary> {
        let expenses = store.fetch_user_expenses(session)?;
        Ok(aggregate(&expenses))
    }
}

/// Expense list, optionally limited to one car.
pub struct ExpenseListLoader {
    pub car_id: Option<i64>,
}

impl Loader for ExpenseListLoader {
    type Output = Vec<ExpenseWithLabels>;

    fn load(&self, store: &dyn RecordStore, session: &Session) -> StoreResult<Self::Output> {
        store.list_expenses(session, self.car_id)
    }
}

pub struct CarListLoader;

impl Loader for CarListLoader {
    type Output = Vec<Car>;

    fn load(&self, store: &dyn RecordStore, session: &Session) -> StoreResult<Vec<Car>> {
        store.list_cars(session)
    }
}

#[derive(Debug, Clone)]
pub struct LoadTicket {
    generation: u64,
    cancelled: Arc<AtomicBool>,
}

impl LoadTicket {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Applied {
    /// The result replaced the view's data.
    Updated,
    /// The fetch failed; previous data is still shown.
    Failed,
    /// The ticket was cancelled or superseded; nothing changed.
    Stale,
}

pub struct View<L: Loader> {
    loader: L,
    data: Option<L::Output>,
    phase: Phase,
    generation: u64,
    current: Option<LoadTicket>,
    last_error: Option<String>,
}

impl<L: Loader> View<L> {
    pub fn new(loader: L) -> Self {
        View {
            loader,
            data: None,
            phase: Phase::Idle,
            generation: 0,
            current: None,
            last_error: None,
        }
    }

    pub fn data(&self) -> Option<&L::Output> {
        self.data.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Starts a fetch. Any fetch still in flight is cancelled.
    pub fn focus(&mut self) -> LoadTicket {
        if let Some(prev) = self.current.take() {
            prev.cancel();
        }
        self.generation += 1;
        let ticket = LoadTicket {
            generation: self.generation,
            cancelled: Arc::new(AtomicBool::new(false)),
        };
        self.current = Some(ticket.clone());
        self.phase = Phase::Loading;
        ticket
    }

    /// The view went away; whatever is in flight must not land.
    pub fn blur(&mut self) {
        if let Some(t) = self.current.take() {
            t.cancel();
        }
        if self.phase == Phase::Loading {
            self.phase = if self.data.is_some() {
                Phase::Loaded
            } else {
                Phase::Idle
            };
        }
    }

    /// Runs the loader for `ticket`. Does not touch the view.
    pub fn fetch(
        &self,
        ticket: &LoadTicket,
        store: &dyn RecordStore,
        session: &Session,
    ) -> StoreResult<L::Output> {
        tracing::trace!(generation = ticket.generation, "fetching");
        self.loader.load(store, session)
    }

    pub fn apply(&mut self, ticket: LoadTicket, result: StoreResult<L::Output>) -> Applied {
        let live = !ticket.is_cancelled() && ticket.generation == self.generation;
        if !live {
            tracing::debug!(generation = ticket.generation, "discarding stale response");
            return Applied::Stale;
        }
        self.current = None;
        self.phase = Phase::Loaded;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.last_error = None;
                Applied::Updated
            }
            Err(e) => {
                tracing::info!(error = %e, "fetch failed, keeping previous data");
                self.last_error = Some(e.to_string());
                Applied::Failed
            }
        }
    }

    /// Focus, fetch and apply in one go.
    pub fn refresh(&mut self, store: &dyn RecordStore, session: &Session) -> Applied {
        let ticket = self.focus();
        let result = self.fetch(&ticket, store, session);
        self.apply(ticket, result)
    }

    /// Like [`View::refresh`] but hands the store error back to the caller.
    pub fn load(&mut self, store: &dyn RecordStore, session: &Session) -> StoreResult<()> {
        let ticket = self.focus();
        match self.fetch(&ticket, store, session) {
            Ok(data) => {
                self.apply(ticket, Ok(data));
                Ok(())
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                self.blur();
                Err(e)
            }
        }
    }
}
