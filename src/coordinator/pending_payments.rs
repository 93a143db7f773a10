use std::collections::{HashMap, VecDeque};

use tokio::sync::oneshot;

use crate::{domain::entities::transaction::Transaction, errors::IapError};

pub(crate) type PaymentReply = oneshot::Sender<Result<Transaction, IapError>>;

/// Tracks outstanding payment submissions, keyed by product identifier.
///
/// The correlation key is the product identifier, not a per-submission
/// token: when two payments for the same product are outstanding at once,
/// the first queue event satisfies the first-registered entry. That FIFO
/// tie-break reproduces the upstream queue contract and is an ambiguity,
/// not a per-submission guarantee.
#[derive(Default)]
pub(crate) struct PendingPaymentTracker {
    pending: HashMap<String, VecDeque<PaymentReply>>,
}

impl PendingPaymentTracker {
    pub fn register(&mut self, product_id: String, reply: PaymentReply) {
        self.pending.entry(product_id).or_default().push_back(reply);
    }

    /// Removes and returns the oldest pending entry for the product, if any.
    fn pop(&mut self, product_id: &str) -> Option<PaymentReply> {
        let entries = self.pending.get_mut(product_id)?;
        let reply = entries.pop_front();
        if entries.is_empty() {
            self.pending.remove(product_id);
        }
        reply
    }

    /// Resolves the oldest pending payment for the transaction's product
    /// with the transaction itself. No-op when nothing is pending for that
    /// product, which is normal for restore-only transactions.
    pub fn resolve_success(&mut self, transaction: Transaction) {
        match self.pop(&transaction.product_id) {
            Some(reply) => {
                let _ = reply.send(Ok(transaction));
            }
            None => tracing::debug!(
                product_id = %transaction.product_id,
                state = %transaction.state,
                "no pending payment for transaction"
            ),
        }
    }

    pub fn resolve_failure(&mut self, product_id: &str, error: IapError) {
        match self.pop(product_id) {
            Some(reply) => {
                let _ = reply.send(Err(error));
            }
            None => tracing::debug!(%product_id, "no pending payment for failed transaction"),
        }
    }

    #[cfg(test)]
    pub fn is_pending(&self, product_id: &str) -> bool {
        self.pending.contains_key(product_id)
    }
}
