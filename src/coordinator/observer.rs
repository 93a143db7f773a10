use tokio::sync::mpsc;

use crate::{
    coordinator::actor::{Command, QueueEvent},
    domain::entities::transaction::{QueueError, Transaction},
};

/// Ingress handle through which a [`PaymentQueue`] implementation delivers
/// events into the coordinator.
///
/// Events are marshaled onto the coordinator's single coordination context;
/// order within and across calls is preserved. All methods are cheap,
/// non-blocking, and safe to call from any thread. Events delivered after
/// the coordinator has shut down are dropped.
///
/// [`PaymentQueue`]: crate::domain::collaborators::payment_queue::PaymentQueue
#[derive(Clone)]
pub struct QueueObserver {
    events: mpsc::UnboundedSender<Command>,
}

impl QueueObserver {
    pub(crate) fn new(events: mpsc::UnboundedSender<Command>) -> Self {
        Self { events }
    }

    /// One batch of transaction state changes, in queue delivery order.
    pub fn updated_transactions(&self, transactions: Vec<Transaction>) {
        let _ = self
            .events
            .send(Command::QueueEvent(QueueEvent::UpdatedTransactions(
                transactions,
            )));
    }

    /// All completed transactions were replayed; the active restore session
    /// (if any) resolves successfully.
    pub fn restore_completed_transactions_finished(&self) {
        let _ = self
            .events
            .send(Command::QueueEvent(QueueEvent::RestoreFinished));
    }

    /// The restore operation failed; the active restore session (if any)
    /// resolves with the error.
    pub fn restore_completed_transactions_failed(&self, error: QueueError) {
        let _ = self
            .events
            .send(Command::QueueEvent(QueueEvent::RestoreFailed(error)));
    }
}
