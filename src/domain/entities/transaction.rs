use std::fmt;

use chrono::{DateTime, Utc};

/// State of a transaction as reported by the external purchase queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Purchasing,
    Purchased,
    Failed,
    Restored,
    Deferred,
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionState::Purchasing => "purchasing",
            TransactionState::Purchased => "purchased",
            TransactionState::Failed => "failed",
            TransactionState::Restored => "restored",
            TransactionState::Deferred => "deferred",
        };
        f.write_str(s)
    }
}

/// A transaction observed on the external purchase queue.
///
/// The queue owns the transaction lifecycle; the coordinator only observes
/// transactions and acknowledges the terminal ones.
#[derive(Debug, Clone)]
pub struct Transaction {
    /// Identifier assigned by the queue once the transaction completes.
    pub transaction_id: Option<String>,
    pub state: TransactionState,
    pub product_id: String,
    pub transaction_date: Option<DateTime<Utc>>,
    /// Attached by the queue for transactions in the `Failed` state.
    pub error: Option<QueueError>,
    /// For restored purchases, a back-reference to the original transaction.
    pub original: Option<Box<Transaction>>,
}

impl Transaction {
    pub fn new(state: TransactionState, product_id: impl Into<String>) -> Self {
        Self {
            transaction_id: None,
            state,
            product_id: product_id.into(),
            transaction_date: None,
            error: None,
            original: None,
        }
    }
}

/// An error produced by the external purchase queue, attached to failed
/// transactions and restore failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueError {
    pub code: i64,
    pub message: String,
}

impl QueueError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Placeholder for failed transactions the queue delivered without an
    /// attached error.
    pub fn unknown() -> Self {
        Self::new(0, "unknown queue error")
    }
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}
