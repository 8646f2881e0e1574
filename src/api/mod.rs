//! # API Module
//!
//! HTTP interface over the collection store. Paths below are relative to the
//! configured API prefix (`/api` by default).
//!
//! ## Endpoints Overview
//!
//! ### Collection Operations
//! - `GET /{collection}` - List every item (always 200, `[]` when empty)
//! - `POST /{collection}` - Create an item under the next id
//! - `GET /{collection}/{id}` - Get one item
//! - `PATCH /{collection}/{id}` - Merge fields into an item (`PUT` is an alias)
//! - `DELETE /{collection}/{id}` - Delete an item
//!
//! ### System Essentials
//! - `GET /` - Service info and stored collection names
//! - `GET /health` - Health check (outside the prefix)

pub mod handlers;
pub mod server;

// Re-export commonly used items
pub use server::{create_app, start_server};
