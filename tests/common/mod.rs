//! Integration test common infrastructure.
//!
//! Provides utilities for spawning test servers, creating HTTP clients,
//! and reading back what the server wrote to disk.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use server::TestServer;
