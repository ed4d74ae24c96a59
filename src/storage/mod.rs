//! Azure Blob Storage access
//!
//! Connection string parsing, Shared Key signing and the download client.

pub mod client;
pub mod connection;
pub mod signing;

// Re-export commonly used items
pub use client::{BlobClient, FetchBlob};
pub use connection::{ConnectionString, Credential, StorageLocation};
