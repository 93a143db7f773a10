use crate::domain::entities::product::Product;

/// A payment to be submitted to the external purchase queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub product_id: String,
    pub quantity: u32,
    pub application_username: Option<String>,
    pub simulates_ask_to_buy_in_sandbox: bool,
}

impl Payment {
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            quantity: 1,
            application_username: None,
            simulates_ask_to_buy_in_sandbox: false,
        }
    }

    pub fn for_product(product: &Product) -> Self {
        Self::new(product.product_id.clone())
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_application_username(mut self, username: impl Into<String>) -> Self {
        self.application_username = Some(username.into());
        self
    }

    pub fn with_simulated_ask_to_buy(mut self, simulate: bool) -> Self {
        self.simulates_ask_to_buy_in_sandbox = simulate;
        self
    }
}
