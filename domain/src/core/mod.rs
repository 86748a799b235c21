//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors and their classification

pub mod error;
