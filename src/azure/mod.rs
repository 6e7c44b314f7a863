mod client;
pub(crate) mod common;
mod source;

pub use client::{AzureClient, AzureClientBuilder};
pub use source::AzureSource;
