//! Typed client for the community REST API.

pub mod account;
pub mod admin;
pub mod client;
pub mod error;
pub mod portal;

pub use account::ProfilePicture;
pub use client::ApiClient;
pub use error::{ensure_auth_any, ApiError, Navigation};
pub use portal::{BoardQuery, GalleryQuery};
