pub mod data {
    pub mod datasources {
        pub mod receipt_verification_datasource;
    }
    pub(crate) mod models {
        pub(crate) mod verify_receipt_models;
    }
}

pub mod domain {
    pub mod collaborators {
        pub mod payment_queue;
        pub mod product_catalog;
        pub mod receipt_store;
    }
    pub mod entities {
        pub mod payment;
        pub mod product;
        pub mod transaction;
        pub mod verification;
    }
}

pub mod coordinator {
    pub(crate) mod actor;
    pub(crate) mod catalog_queries;
    pub(crate) mod pending_payments;
    pub(crate) mod restore_session;

    pub mod handle;
    pub mod observer;
    pub mod verifier;
}

pub mod config;
pub mod errors;
