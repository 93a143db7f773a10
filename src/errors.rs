use thiserror::Error;

use crate::domain::entities::transaction::QueueError;

/// Failures surfaced to the caller that originated an operation.
///
/// No failure is fatal to the coordinator itself: a failed operation clears
/// only its own pending entry, and the coordinator remains usable for
/// subsequent calls.
#[derive(Error, Debug)]
pub enum IapError {
    #[error("the current device or account is not allowed to make payments")]
    CannotMakePayments,

    #[error("product not found: {0}")]
    ProductNotFound(String),

    #[error("no receipt data found in the local receipt store")]
    ReceiptDataNotFound,

    #[error("verification endpoint returned an empty response body")]
    EmptyVerificationResponse,

    #[error("verification endpoint returned a response that is not a JSON object")]
    MalformedVerificationResponse,

    /// The verification endpoint answered with a nonzero status that is not
    /// an environment redirect. Carries the raw response payload.
    #[error("receipt verification rejected: {0}")]
    VerificationRejected(serde_json::Value),

    #[error("transaction failed: {0}")]
    TransactionFailed(QueueError),

    #[error("restore completed transactions failed: {0}")]
    RestoreFailed(QueueError),

    #[error("a restore purchases session is already in progress")]
    RestoreAlreadyInProgress,

    #[error("the coordinator has been shut down")]
    CoordinatorStopped,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
