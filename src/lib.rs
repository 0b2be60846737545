//! Client library for the Welqo residential access-control backend.
//!
//! Residents issue time-limited QR access passes for their visitors, guards
//! validate scanned passes against the backend, and owners/managers pull
//! statistics and reports. This crate wraps the remote REST API and carries
//! the browser-side bookkeeping of the original application: local storage,
//! a 24h soft session, cookie-consent gating, the non-authoritative JWT
//! expiry probe and the QR pass rendering.
//!
//! The backend owns every business rule. Nothing derived locally (token
//! expiry, pass status) ever grants physical access; guards re-validate
//! every scan through the validation endpoint.

pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod token;

pub mod models {
    pub mod consent;
    pub mod grant;
    pub mod report;
    pub mod session;
    pub mod user;
}

pub mod api {
    pub mod http;
    pub mod owner;
    pub mod resident;
}

pub mod services {
    pub mod access;
    pub mod auth;
    pub mod cookies;
    pub mod session;
}

pub mod validation {
    pub mod auth;
}

pub use config::Config;
pub use error::{ClientError, Result};
