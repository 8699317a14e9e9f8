//! Catalog backend readiness gate.
//!
//! The catalog store owns a [`ReadinessReporter`] and pushes connection state
//! transitions through it. Everything that reads or writes the catalog holds a
//! [`ReadinessGate`] and consults it before doing any work: writes fail fast
//! with [`AppError::BackendUnavailable`], reads degrade to empty results.
//!
//! State propagates through a `tokio::sync::watch` channel, so the gate is
//! eventually consistent with the real connection and never blocks.

use crate::error::AppError;
use std::sync::Arc;
use tokio::sync::watch;

/// Connection state of the catalog backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendState {
    Connected,
    Disconnected,
    Error,
}

impl BackendState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendState::Connected => "connected",
            BackendState::Disconnected => "disconnected",
            BackendState::Error => "error",
        }
    }
}

/// Create a linked reporter/gate pair starting in `initial`.
pub fn readiness_channel(initial: BackendState) -> (ReadinessReporter, ReadinessGate) {
    let (tx, rx) = watch::channel(initial);
    (
        ReadinessReporter { tx: Arc::new(tx) },
        ReadinessGate { rx },
    )
}

/// Write side of the gate, held by the catalog store and its connection monitor.
#[derive(Clone, Debug)]
pub struct ReadinessReporter {
    tx: Arc<watch::Sender<BackendState>>,
}

impl ReadinessReporter {
    /// Record the current backend state. Only actual transitions are logged and
    /// wake subscribers.
    pub fn report(&self, state: BackendState) {
        let mut previous = state;
        let changed = self.tx.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            previous = *current;
            *current = state;
            true
        });

        if !changed {
            return;
        }

        match state {
            BackendState::Connected => tracing::info!(
                from = previous.as_str(),
                to = state.as_str(),
                "Catalog backend connected"
            ),
            BackendState::Disconnected | BackendState::Error => tracing::warn!(
                from = previous.as_str(),
                to = state.as_str(),
                "Catalog backend became unavailable"
            ),
        }
    }

    /// New read handle observing this reporter.
    pub fn gate(&self) -> ReadinessGate {
        ReadinessGate {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read side of the gate.
#[derive(Clone, Debug)]
pub struct ReadinessGate {
    rx: watch::Receiver<BackendState>,
}

impl ReadinessGate {
    /// Gate pinned to a single state, for backends without a connection lifecycle.
    pub fn fixed(state: BackendState) -> Self {
        let (_reporter, gate) = readiness_channel(state);
        gate
    }

    pub fn state(&self) -> BackendState {
        *self.rx.borrow()
    }

    pub fn is_ready(&self) -> bool {
        self.state() == BackendState::Connected
    }

    /// Fail with `BackendUnavailable` unless the catalog is connected.
    pub fn ensure_ready(&self) -> Result<(), AppError> {
        match self.state() {
            BackendState::Connected => Ok(()),
            other => Err(AppError::BackendUnavailable(format!(
                "catalog backend is {}",
                other.as_str()
            ))),
        }
    }
}
