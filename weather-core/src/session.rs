//! Displayed weather state and the "which resolution is current" guard.
//!
//! Each resolution gets a fresh [`ResolutionId`]. A result is applied only if
//! its id is still the latest one begun; anything older is dropped silently.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::{
    model::{ResolutionOutcome, WeatherRequest, WeatherSnapshot},
    pipeline::Resolver,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ResolutionId(u64);

impl ResolutionId {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WeatherView {
    Idle,
    Loading { id: ResolutionId },
    Ready {
        id: ResolutionId,
        snapshot: WeatherSnapshot,
    },
    Unavailable { id: ResolutionId, message: String },
}

#[derive(Debug)]
struct Inner {
    latest: u64,
    view: WeatherView,
}

#[derive(Debug)]
pub struct WeatherSession {
    inner: Mutex<Inner>,
}

impl Default for WeatherSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherSession {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                latest: 0,
                view: WeatherView::Idle,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a new resolution, superseding any in flight, and shows "loading".
    pub fn begin(&self) -> ResolutionId {
        let mut inner = self.lock();
        inner.latest += 1;
        let id = ResolutionId(inner.latest);
        inner.view = WeatherView::Loading { id };
        id
    }

    /// Applies `outcome` if `id` is still current and still loading. Returns
    /// whether it was applied; each resolution changes the view at most once.
    pub fn complete(&self, id: ResolutionId, outcome: ResolutionOutcome) -> bool {
        let mut inner = self.lock();
        if id.0 != inner.latest {
            tracing::debug!(
                id = id.0,
                latest = inner.latest,
                "discarding stale weather result"
            );
            return false;
        }
        if !matches!(inner.view, WeatherView::Loading { .. }) {
            tracing::debug!(id = id.0, "resolution already completed");
            return false;
        }

        inner.view = match outcome {
            ResolutionOutcome::Success(snapshot) => WeatherView::Ready { id, snapshot },
            ResolutionOutcome::Failure { reason } => WeatherView::Unavailable {
                id,
                message: reason,
            },
        };
        true
    }

    /// Navigating away: any in-flight result becomes stale.
    pub fn leave(&self) {
        let mut inner = self.lock();
        inner.latest += 1;
        inner.view = WeatherView::Idle;
    }

    /// Id of the resolution being shown or loaded; `None` while idle.
    pub fn current(&self) -> Option<ResolutionId> {
        match self.lock().view {
            WeatherView::Idle => None,
            WeatherView::Loading { id }
            | WeatherView::Ready { id, .. }
            | WeatherView::Unavailable { id, .. } => Some(id),
        }
    }

    pub fn view(&self) -> WeatherView {
        self.lock().view.clone()
    }

    /// begin, resolve, complete. Returns whether the result was displayed.
    pub async fn show(&self, resolver: &Resolver, request: &WeatherRequest) -> bool {
        let id = self.begin();
        let resolved = resolver.resolve_detailed(request).await;
        self.complete(id, resolved.outcome)
    }
}
