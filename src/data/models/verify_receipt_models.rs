use serde::Serialize;

/// Request body for the receipt verification endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct VerifyReceiptRequestModel {
    #[serde(rename = "receipt-data")]
    pub receipt_data: String,
}
