//! Client side of the dashboard API.
//!
//! [`TemplateService`] is the contract the preview orchestration consumes;
//! [`LeadgenClient`] implements it over HTTP.

pub mod client;
pub mod error;
pub(crate) mod retry;
pub mod service;
pub mod types;

pub use client::{ClientSettings, LeadgenClient};
pub use error::ClientError;
pub use service::TemplateService;
