use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    coordinator::{
        catalog_queries::{CatalogReply, ProductQueryRegistry, QueryId},
        pending_payments::{PaymentReply, PendingPaymentTracker},
        restore_session::{RestoreReply, RestoreSessionSlot},
    },
    domain::{
        collaborators::{payment_queue::PaymentQueue, product_catalog::ProductCatalog},
        entities::{
            payment::Payment,
            product::Catalog,
            transaction::{QueueError, Transaction, TransactionState},
        },
    },
    errors::IapError,
};

pub(crate) enum Command {
    FetchProducts {
        product_ids: BTreeSet<String>,
        reply: CatalogReply,
    },
    Purchase {
        payment: Payment,
        reply: PaymentReply,
    },
    Restore {
        application_username: Option<String>,
        reply: RestoreReply,
    },
    /// A catalog response arriving from its network task, marshaled back
    /// into the coordination context.
    CatalogOutcome {
        query_id: QueryId,
        outcome: Result<Catalog, IapError>,
    },
    QueueEvent(QueueEvent),
    Shutdown,
}

pub(crate) enum QueueEvent {
    UpdatedTransactions(Vec<Transaction>),
    RestoreFinished,
    RestoreFailed(QueueError),
}

/// The single coordination context.
///
/// Owns every piece of mutable coordinator state; all mutations happen on
/// this task, in command arrival order.
pub(crate) struct CoordinatorActor<Q, C> {
    queue: Arc<Q>,
    catalog: Arc<C>,
    commands: mpsc::UnboundedReceiver<Command>,
    /// Sender cloned into catalog network tasks so their outcomes re-enter
    /// this context.
    loopback: mpsc::UnboundedSender<Command>,
    queries: ProductQueryRegistry,
    payments: PendingPaymentTracker,
    restore: RestoreSessionSlot,
}

impl<Q: PaymentQueue, C: ProductCatalog> CoordinatorActor<Q, C> {
    pub fn new(
        queue: Arc<Q>,
        catalog: Arc<C>,
        commands: mpsc::UnboundedReceiver<Command>,
        loopback: mpsc::UnboundedSender<Command>,
    ) -> Self {
        Self {
            queue,
            catalog,
            commands,
            loopback,
            queries: ProductQueryRegistry::default(),
            payments: PendingPaymentTracker::default(),
            restore: RestoreSessionSlot::default(),
        }
    }

    pub async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            match command {
                Command::FetchProducts { product_ids, reply } => {
                    self.start_catalog_query(product_ids, reply)
                }
                Command::Purchase { payment, reply } => self.submit_payment(payment, reply),
                Command::Restore {
                    application_username,
                    reply,
                } => self.start_restore(application_username, reply),
                Command::CatalogOutcome { query_id, outcome } => {
                    self.resolve_catalog_query(query_id, outcome)
                }
                Command::QueueEvent(event) => self.handle_queue_event(event),
                Command::Shutdown => break,
            }
        }
        self.queue.remove_observer();
        tracing::debug!("coordinator stopped");
    }

    fn start_catalog_query(&mut self, product_ids: BTreeSet<String>, reply: CatalogReply) {
        let query_id = self.queries.register(product_ids.clone(), reply);
        let catalog = Arc::clone(&self.catalog);
        let loopback = self.loopback.clone();
        tokio::spawn(async move {
            let outcome = catalog.query(product_ids).await;
            // Fails only when the actor is gone, taking the query with it.
            let _ = loopback.send(Command::CatalogOutcome { query_id, outcome });
        });
    }

    fn resolve_catalog_query(&mut self, query_id: QueryId, outcome: Result<Catalog, IapError>) {
        let Some(query) = self.queries.remove(query_id) else {
            return;
        };
        if let Ok(catalog) = &outcome {
            if !catalog.invalid_product_ids.is_empty() {
                tracing::warn!(
                    invalid_product_ids = ?catalog.invalid_product_ids,
                    "catalog reported invalid product identifiers"
                );
            }
            let unanswered: Vec<&String> = query
                .requested_ids
                .iter()
                .filter(|id| {
                    !catalog.products.iter().any(|p| &p.product_id == *id)
                        && !catalog.invalid_product_ids.contains(*id)
                })
                .collect();
            if !unanswered.is_empty() {
                tracing::debug!(?unanswered, "requested identifiers absent from response");
            }
        }
        query.resolve(outcome);
    }

    fn submit_payment(&mut self, payment: Payment, reply: PaymentReply) {
        if !self.queue.can_make_payments() {
            let _ = reply.send(Err(IapError::CannotMakePayments));
            return;
        }
        self.payments.register(payment.product_id.clone(), reply);
        self.queue.submit(payment);
    }

    fn start_restore(&mut self, application_username: Option<String>, reply: RestoreReply) {
        match self.restore.begin(reply) {
            Ok(()) => self
                .queue
                .restore_completed_transactions(application_username.as_deref()),
            Err(reply) => {
                let _ = reply.send(Err(IapError::RestoreAlreadyInProgress));
            }
        }
    }

    fn handle_queue_event(&mut self, event: QueueEvent) {
        match event {
            QueueEvent::UpdatedTransactions(batch) => self.process_transaction_batch(batch),
            QueueEvent::RestoreFinished => self.restore.finish(),
            QueueEvent::RestoreFailed(error) => self.restore.fail(error),
        }
    }

    /// The transaction state machine. Terminal transactions are finished
    /// on the queue before any caller sees them.
    fn process_transaction_batch(&mut self, batch: Vec<Transaction>) {
        self.restore.clear_accumulated();
        for transaction in batch {
            match transaction.state {
                TransactionState::Purchasing => {
                    tracing::debug!(product_id = %transaction.product_id, "transaction in flight");
                }
                TransactionState::Purchased => {
                    self.queue.finish(&transaction);
                    self.payments.resolve_success(transaction);
                }
                TransactionState::Restored => {
                    self.queue.finish(&transaction);
                    self.restore.accumulate(transaction.clone());
                    self.payments.resolve_success(transaction);
                }
                TransactionState::Failed => {
                    self.queue.finish(&transaction);
                    let error = transaction.error.clone().unwrap_or_else(QueueError::unknown);
                    self.payments
                        .resolve_failure(&transaction.product_id, IapError::TransactionFailed(error));
                }
                TransactionState::Deferred => {
                    tracing::info!(
                        product_id = %transaction.product_id,
                        "transaction deferred, awaiting external approval"
                    );
                }
            }
        }
    }
}
