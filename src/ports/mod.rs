//! Seams between the icon workflow and the outside world.
//!
//! The only port is the provider's image API; its HTTP implementation is in
//! `adapters::live`.

pub mod image_api;

pub use image_api::{ApiFuture, ImageApi, ProviderRequest, ProviderResponse};
