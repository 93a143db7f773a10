#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use iap_coordinator::coordinator::observer::QueueObserver;
use iap_coordinator::domain::collaborators::{
    payment_queue::PaymentQueue, product_catalog::ProductCatalog, receipt_store::ReceiptStore,
};
use iap_coordinator::domain::entities::payment::Payment;
use iap_coordinator::domain::entities::product::{Catalog, Product};
use iap_coordinator::domain::entities::transaction::{QueueError, Transaction, TransactionState};
use iap_coordinator::errors::IapError;

/// One event the fake queue emits through its observer.
pub enum QueueScript {
    Transactions(Vec<Transaction>),
    RestoreFinished,
    RestoreFailed(QueueError),
}

/// In-process stand-in for the external purchase queue. Every `submit` or
/// restore call pops one pre-scripted event sequence and replays it through
/// the registered observer; unscripted calls emit nothing, leaving the
/// caller pending so tests can drive the observer by hand.
pub struct ScriptedQueue {
    can_pay: bool,
    observer: Mutex<Option<QueueObserver>>,
    pub submitted: Mutex<Vec<Payment>>,
    pub finished: Mutex<Vec<Transaction>>,
    pub restore_calls: Mutex<Vec<Option<String>>>,
    on_submit: Mutex<VecDeque<Vec<QueueScript>>>,
    on_restore: Mutex<VecDeque<Vec<QueueScript>>>,
}

impl ScriptedQueue {
    pub fn new(can_pay: bool) -> Self {
        Self {
            can_pay,
            observer: Mutex::new(None),
            submitted: Mutex::new(Vec::new()),
            finished: Mutex::new(Vec::new()),
            restore_calls: Mutex::new(Vec::new()),
            on_submit: Mutex::new(VecDeque::new()),
            on_restore: Mutex::new(VecDeque::new()),
        }
    }

    pub fn script_submit(&self, events: Vec<QueueScript>) {
        self.on_submit.lock().unwrap().push_back(events);
    }

    pub fn script_restore(&self, events: Vec<QueueScript>) {
        self.on_restore.lock().unwrap().push_back(events);
    }

    pub fn observer(&self) -> QueueObserver {
        self.observer
            .lock()
            .unwrap()
            .clone()
            .expect("no observer registered")
    }

    pub fn has_observer(&self) -> bool {
        self.observer.lock().unwrap().is_some()
    }

    pub fn submitted_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }

    pub fn finished_product_ids(&self) -> Vec<String> {
        self.finished
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.product_id.clone())
            .collect()
    }

    fn play(&self, events: Vec<QueueScript>) {
        let observer = self.observer();
        for event in events {
            match event {
                QueueScript::Transactions(batch) => observer.updated_transactions(batch),
                QueueScript::RestoreFinished => observer.restore_completed_transactions_finished(),
                QueueScript::RestoreFailed(error) => {
                    observer.restore_completed_transactions_failed(error)
                }
            }
        }
    }
}

impl PaymentQueue for ScriptedQueue {
    fn can_make_payments(&self) -> bool {
        self.can_pay
    }

    fn add_observer(&self, observer: QueueObserver) {
        *self.observer.lock().unwrap() = Some(observer);
    }

    fn remove_observer(&self) {
        *self.observer.lock().unwrap() = None;
    }

    fn submit(&self, payment: Payment) {
        self.submitted.lock().unwrap().push(payment);
        if let Some(events) = self.on_submit.lock().unwrap().pop_front() {
            self.play(events);
        }
    }

    fn restore_completed_transactions(&self, application_username: Option<&str>) {
        self.restore_calls
            .lock()
            .unwrap()
            .push(application_username.map(str::to_owned));
        if let Some(events) = self.on_restore.lock().unwrap().pop_front() {
            self.play(events);
        }
    }

    fn finish(&self, transaction: &Transaction) {
        self.finished.lock().unwrap().push(transaction.clone());
    }
}

/// Catalog fake keyed by the requested identifier set, so concurrent
/// queries resolve deterministically regardless of task scheduling.
#[derive(Default)]
pub struct ScriptedCatalog {
    responses: Mutex<HashMap<String, Result<Catalog, IapError>>>,
    pub queries: Mutex<Vec<BTreeSet<String>>>,
}

impl ScriptedCatalog {
    pub fn script(&self, requested_ids: &[&str], response: Result<Catalog, IapError>) {
        self.responses
            .lock()
            .unwrap()
            .insert(Self::key_of(requested_ids.iter().map(|s| s.to_string())), response);
    }

    fn key_of(ids: impl Iterator<Item = String>) -> String {
        let set: BTreeSet<String> = ids.collect();
        set.into_iter().collect::<Vec<_>>().join(",")
    }
}

#[async_trait]
impl ProductCatalog for ScriptedCatalog {
    async fn query(&self, product_ids: BTreeSet<String>) -> Result<Catalog, IapError> {
        self.queries.lock().unwrap().push(product_ids.clone());
        self.responses
            .lock()
            .unwrap()
            .remove(&Self::key_of(product_ids.into_iter()))
            .expect("unscripted catalog query")
    }
}

pub struct StaticReceiptStore(pub Option<Vec<u8>>);

impl ReceiptStore for StaticReceiptStore {
    fn receipt_data(&self) -> Option<Vec<u8>> {
        self.0.clone()
    }
}

pub fn product(product_id: &str) -> Product {
    Product {
        product_id: product_id.to_owned(),
        localized_title: format!("{product_id} title"),
        localized_description: format!("{product_id} description"),
        price_micros: 990_000,
        currency_iso_4217: "USD".to_owned(),
    }
}

pub fn catalog_of(products: &[&str], invalid: &[&str]) -> Catalog {
    Catalog {
        products: products.iter().map(|id| product(id)).collect(),
        invalid_product_ids: invalid.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn transaction(state: TransactionState, product_id: &str) -> Transaction {
    Transaction::new(state, product_id)
}

/// A real transport error to thread through the catalog fake.
pub async fn transport_error() -> IapError {
    IapError::Transport(
        reqwest::Client::new()
            .get("http://127.0.0.1:9/unreachable")
            .timeout(Duration::from_millis(200))
            .send()
            .await
            .expect_err("connection should fail"),
    )
}

/// Polls until the condition holds, failing the test after a bounded wait.
pub async fn wait_until(description: &str, condition: impl Fn() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition never met: {description}");
}
