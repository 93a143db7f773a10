use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::{
    config::CoordinatorConfig,
    coordinator::{
        actor::{Command, CoordinatorActor},
        observer::QueueObserver,
        verifier::ReceiptVerifier,
    },
    data::datasources::receipt_verification_datasource::{
        ReceiptVerificationDatasource, ReceiptVerificationDatasourceImpl,
    },
    domain::{
        collaborators::{
            payment_queue::PaymentQueue, product_catalog::ProductCatalog,
            receipt_store::ReceiptStore,
        },
        entities::{
            payment::Payment,
            product::{Catalog, Product},
            transaction::Transaction,
        },
    },
    errors::IapError,
};

/// Handle to a running purchase transaction coordinator.
///
/// All purchase, catalog, and restore state lives on a single coordination
/// task spawned by [`IapCoordinator::start`]; this handle is a cheap clone
/// that sends commands to it and awaits their outcomes. Receipt
/// verification is self-contained and bypasses that task entirely.
pub struct IapCoordinator<S, D = ReceiptVerificationDatasourceImpl> {
    commands: mpsc::UnboundedSender<Command>,
    verifier: Arc<ReceiptVerifier<S, D>>,
}

impl<S, D> Clone for IapCoordinator<S, D> {
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
            verifier: Arc::clone(&self.verifier),
        }
    }
}

impl<S: ReceiptStore> IapCoordinator<S> {
    /// Spawns the coordination task, subscribes it to the queue, and
    /// returns a handle to it. Must be called within a tokio runtime.
    pub fn start<Q: PaymentQueue, C: ProductCatalog>(
        queue: Arc<Q>,
        catalog: Arc<C>,
        receipt_store: S,
        config: CoordinatorConfig,
    ) -> Self {
        let datasource = ReceiptVerificationDatasourceImpl::new(&config);
        Self::start_with_datasource(queue, catalog, receipt_store, datasource)
    }
}

impl<S: ReceiptStore, D: ReceiptVerificationDatasource> IapCoordinator<S, D> {
    /// As [`IapCoordinator::start`], with a caller-supplied verification
    /// datasource.
    pub fn start_with_datasource<Q: PaymentQueue, C: ProductCatalog>(
        queue: Arc<Q>,
        catalog: Arc<C>,
        receipt_store: S,
        datasource: D,
    ) -> Self {
        let (commands, mailbox) = mpsc::unbounded_channel();
        queue.add_observer(QueueObserver::new(commands.clone()));
        let actor = CoordinatorActor::new(queue, catalog, mailbox, commands.clone());
        tokio::spawn(actor.run());
        Self {
            commands,
            verifier: Arc::new(ReceiptVerifier::with_datasource(receipt_store, datasource)),
        }
    }

    /// Fetches metadata for a set of product identifiers. One outstanding
    /// query per call; concurrent calls are independent.
    pub async fn fetch_products(
        &self,
        product_ids: BTreeSet<String>,
    ) -> Result<Catalog, IapError> {
        let (reply, outcome) = oneshot::channel();
        self.send(Command::FetchProducts { product_ids, reply })?;
        outcome.await.map_err(|_| IapError::CoordinatorStopped)?
    }

    /// Fetches a single product; zero results is [`IapError::ProductNotFound`].
    pub async fn fetch_product(&self, product_id: &str) -> Result<Product, IapError> {
        let mut ids = BTreeSet::new();
        ids.insert(product_id.to_owned());
        let catalog = self.fetch_products(ids).await?;
        catalog
            .products
            .into_iter()
            .next()
            .ok_or_else(|| IapError::ProductNotFound(product_id.to_owned()))
    }

    /// Submits a payment to the queue and resolves with the terminal
    /// transaction for it. Fails with [`IapError::CannotMakePayments`]
    /// before touching the queue when payments are disabled.
    pub async fn purchase(&self, payment: Payment) -> Result<Transaction, IapError> {
        let (reply, outcome) = oneshot::channel();
        self.send(Command::Purchase { payment, reply })?;
        outcome.await.map_err(|_| IapError::CoordinatorStopped)?
    }

    /// Resolves a product identifier through the catalog and purchases it.
    /// No payment is registered when the identifier resolves to nothing.
    pub async fn purchase_product_id(&self, product_id: &str) -> Result<Transaction, IapError> {
        let product = self.fetch_product(product_id).await?;
        self.purchase(Payment::for_product(&product)).await
    }

    /// Replays completed transactions and resolves with those restored
    /// before the terminal restore event. At most one session may be in
    /// flight.
    pub async fn restore_purchases(
        &self,
        application_username: Option<&str>,
    ) -> Result<Vec<Transaction>, IapError> {
        let (reply, outcome) = oneshot::channel();
        self.send(Command::Restore {
            application_username: application_username.map(str::to_owned),
            reply,
        })?;
        outcome.await.map_err(|_| IapError::CoordinatorStopped)?
    }

    /// Verifies the locally stored receipt. See [`ReceiptVerifier::verify`].
    pub async fn verify_receipt(&self, use_production: bool) -> Result<serde_json::Value, IapError> {
        self.verifier.verify(use_production).await
    }

    pub fn verifier(&self) -> &ReceiptVerifier<S, D> {
        &self.verifier
    }

    /// Stops the coordination task and unsubscribes from the queue.
    /// Operations issued afterwards fail with
    /// [`IapError::CoordinatorStopped`]; operations already in flight are
    /// resolved the same way when their reply channel closes.
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }

    fn send(&self, command: Command) -> Result<(), IapError> {
        self.commands
            .send(command)
            .map_err(|_| IapError::CoordinatorStopped)
    }
}
