/// Endpoints used for receipt verification.
///
/// The defaults point at the App Store endpoints; tests and self-hosted
/// verifiers override them.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub sandbox_verify_url: String,
    pub production_verify_url: String,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            sandbox_verify_url: "https://sandbox.itunes.apple.com/verifyReceipt".to_owned(),
            production_verify_url: "https://buy.itunes.apple.com/verifyReceipt".to_owned(),
        }
    }
}
