//! Certificate issuance over AWS Private CA.
//!
//! Two independent issuers are provided. [`PcaIssuer`] generates a CSR
//! locally, has the private authority sign it and waits for issuance.
//! [`AcmIssuer`] lets the certificate manager request certificates chained
//! to the authority and export them with their key.
//!
//! Both hold only the authority ARN and their service clients, so they are
//! cheap to clone and safe to call concurrently.

mod bundle;
pub mod client;
pub mod csr;
pub mod error;
pub mod issuer;
pub mod types;

pub use error::FacadeError;
pub use issuer::{AcmIssuer, PcaIssuer};
