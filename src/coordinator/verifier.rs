use base64::{prelude::BASE64_STANDARD, Engine as _};

use crate::{
    data::datasources::receipt_verification_datasource::{
        ReceiptVerificationDatasource, ReceiptVerificationDatasourceImpl,
    },
    config::CoordinatorConfig,
    domain::{
        collaborators::receipt_store::ReceiptStore,
        entities::verification::VerificationEnvironment,
    },
    errors::IapError,
};

/// Receipt accepted by the verification endpoint.
const STATUS_VALID: i64 = 0;
/// Sandbox receipt submitted to the production endpoint.
const STATUS_SANDBOX_RECEIPT_ON_PRODUCTION: i64 = 21007;
/// Production receipt submitted to the sandbox endpoint.
const STATUS_PRODUCTION_RECEIPT_ON_SANDBOX: i64 = 21008;

/// One submission of the receipt to one environment. `redirected` bounds
/// the environment redirect protocol to a single hop.
struct VerificationAttempt {
    environment: VerificationEnvironment,
    redirected: bool,
}

/// Posts the locally stored receipt to the verification endpoint and
/// interprets the response, following at most one sandbox/production
/// redirect (status 21007/21008).
pub struct ReceiptVerifier<S, D = ReceiptVerificationDatasourceImpl> {
    store: S,
    datasource: D,
}

impl<S: ReceiptStore> ReceiptVerifier<S> {
    pub fn new(store: S, config: &CoordinatorConfig) -> Self {
        Self::with_datasource(store, ReceiptVerificationDatasourceImpl::new(config))
    }
}

impl<S: ReceiptStore, D: ReceiptVerificationDatasource> ReceiptVerifier<S, D> {
    pub fn with_datasource(store: S, datasource: D) -> Self {
        Self { store, datasource }
    }

    /// Verifies the stored receipt against the production or sandbox
    /// endpoint. On success resolves with the endpoint's parsed JSON
    /// payload; when the server signals an environment mismatch, the
    /// outcome of the single redirected attempt is forwarded unchanged.
    pub async fn verify(&self, use_production: bool) -> Result<serde_json::Value, IapError> {
        let environment = if use_production {
            VerificationEnvironment::Production
        } else {
            VerificationEnvironment::Sandbox
        };
        self.attempt(VerificationAttempt {
            environment,
            redirected: false,
        })
        .await
    }

    async fn attempt(&self, attempt: VerificationAttempt) -> Result<serde_json::Value, IapError> {
        let receipt = self
            .store
            .receipt_data()
            .ok_or(IapError::ReceiptDataNotFound)?;
        let encoded = BASE64_STANDARD.encode(receipt);

        let body = self
            .datasource
            .post_receipt(attempt.environment, &encoded)
            .await?;
        if body.is_empty() {
            return Err(IapError::EmptyVerificationResponse);
        }
        let json: serde_json::Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(_) => return Err(IapError::MalformedVerificationResponse),
        };
        if !json.is_object() {
            return Err(IapError::MalformedVerificationResponse);
        }

        let Some(status) = json.get("status").and_then(serde_json::Value::as_i64) else {
            return Err(IapError::VerificationRejected(json));
        };
        match (status, attempt.environment, attempt.redirected) {
            (STATUS_VALID, _, _) => Ok(json),
            (
                STATUS_SANDBOX_RECEIPT_ON_PRODUCTION,
                VerificationEnvironment::Production,
                false,
            )
            | (STATUS_PRODUCTION_RECEIPT_ON_SANDBOX, VerificationEnvironment::Sandbox, false) => {
                let target = attempt.environment.other();
                tracing::warn!(
                    status,
                    from = %attempt.environment,
                    to = %target,
                    "receipt belongs to the other environment, retrying"
                );
                Box::pin(self.attempt(VerificationAttempt {
                    environment: target,
                    redirected: true,
                }))
                .await
            }
            _ => Err(IapError::VerificationRejected(json)),
        }
    }
}
