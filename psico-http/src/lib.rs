//! psico-http: tenant-aware HTTP client for the Psico clinic backend.

pub mod base_url;
pub mod client;
pub mod config;
pub mod pagination;
pub mod resources;

pub use base_url::{BaseUrlBuilder, ProductionRouting};
pub use client::{ApiClient, ApiClientBuilder, Download, TENANT_HEADER};
pub use config::ClientConfig;
pub use pagination::{Page, Paginated};
