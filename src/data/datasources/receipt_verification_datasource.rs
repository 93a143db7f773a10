use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::{
    config::CoordinatorConfig,
    data::models::verify_receipt_models::VerifyReceiptRequestModel,
    domain::entities::verification::VerificationEnvironment,
    errors::IapError,
};

/// Posts a base64-encoded receipt to one of the verification endpoints and
/// returns the raw response body.
///
/// Interpretation of the body (status codes, redirects) happens in the
/// verifier; this layer only moves bytes.
#[async_trait]
pub trait ReceiptVerificationDatasource: Send + Sync + 'static {
    async fn post_receipt(
        &self,
        environment: VerificationEnvironment,
        receipt_base64: &str,
    ) -> Result<String, IapError>;
}

pub struct ReceiptVerificationDatasourceImpl {
    client: reqwest::Client,
    sandbox_url: String,
    production_url: String,
}

impl ReceiptVerificationDatasourceImpl {
    pub fn new(config: &CoordinatorConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            sandbox_url: config.sandbox_verify_url.clone(),
            production_url: config.production_verify_url.clone(),
        }
    }

    fn url(&self, environment: VerificationEnvironment) -> &str {
        match environment {
            VerificationEnvironment::Sandbox => &self.sandbox_url,
            VerificationEnvironment::Production => &self.production_url,
        }
    }
}

#[async_trait]
impl ReceiptVerificationDatasource for ReceiptVerificationDatasourceImpl {
    async fn post_receipt(
        &self,
        environment: VerificationEnvironment,
        receipt_base64: &str,
    ) -> Result<String, IapError> {
        let body = serde_json::to_vec(&VerifyReceiptRequestModel {
            receipt_data: receipt_base64.to_owned(),
        })?;
        let response = self
            .client
            .post(self.url(environment))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        if !response.status().is_success() {
            tracing::debug!(
                %environment,
                status = %response.status(),
                "verification endpoint returned non-success HTTP status"
            );
        }
        Ok(response.text().await?)
    }
}
