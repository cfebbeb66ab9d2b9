use anyhow::{Context, Result};
use rquest::Client;
use rquest_util::Emulation;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientType {
    Standard,
    HeavyEmulation,
}

/// Factory for an HTTP client, optionally impersonating a desktop browser for sites
/// that turn away plain clients.
pub fn create_client(client_type: ClientType, timeout: Duration) -> Result<Client> {
    let builder = Client::builder().timeout(timeout);

    match client_type {
        ClientType::HeavyEmulation => builder
            .emulation(Emulation::Firefox136)
            .build()
            .context("Failed to build browser-emulating rquest client"),
        ClientType::Standard => builder
            .build()
            .context("Failed to build standard rquest client"),
    }
}
