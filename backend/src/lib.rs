//! Podu upload backend
//!
//! Issues presigned object-storage URLs for image uploads.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod media_storage;
pub mod routes;
pub mod server;
pub mod types;
