// officely-api: Async Rust client for the office resource REST backend

pub mod auth;
pub mod client;
pub mod error;
pub mod pagination;
pub mod transport;

pub use auth::Credentials;
pub use client::{ApiClient, paths};
pub use error::Error;
pub use pagination::{Direction, Page, PageLinks, PageRequest, Sort};
pub use transport::{TlsMode, TransportConfig};
