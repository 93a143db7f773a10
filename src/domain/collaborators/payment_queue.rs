use crate::{
    coordinator::observer::QueueObserver,
    domain::entities::{payment::Payment, transaction::Transaction},
};

/// The external purchase queue.
///
/// The queue owns the payment/transaction lifecycle out of process. Calls
/// into it are fire-and-forget; outcomes come back asynchronously through
/// the [`QueueObserver`] registered with [`PaymentQueue::add_observer`], in
/// whatever order the queue chooses.
pub trait PaymentQueue: Send + Sync + 'static {
    /// Whether the current device/account is capable of making payments.
    fn can_make_payments(&self) -> bool;

    /// Registers the observer that receives transaction state changes and
    /// restore terminal events. Called once when the coordinator starts.
    fn add_observer(&self, observer: QueueObserver);

    /// Unregisters the observer. Called once when the coordinator shuts
    /// down.
    fn remove_observer(&self);

    /// Submits a payment. A transaction for the payment's product
    /// identifier is later delivered through the observer.
    fn submit(&self, payment: Payment);

    /// Asks the queue to replay all completed transactions as `Restored`
    /// events, followed by exactly one restore terminal event.
    fn restore_completed_transactions(&self, application_username: Option<&str>);

    /// Acknowledges a terminal transaction, removing it from the queue.
    fn finish(&self, transaction: &Transaction);
}
