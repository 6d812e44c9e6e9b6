//! HTTP implementation of the gateway traits.

mod api;
mod client;

pub use api::HttpApi;
pub use client::{Client, ClientConfig};
