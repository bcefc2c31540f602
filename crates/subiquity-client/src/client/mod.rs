//! Typed facade over the backend HTTP API.
//!
//! One async method per endpoint, grouped by area in the submodules. Every
//! method takes `&self` and performs exactly one round trip, so callers may
//! run any number of them concurrently. Long-poll endpoints (`wait = true`)
//! have no client-side deadline; wrap the call in `tokio::time::timeout` or
//! drop the future to give up.

use hyper::Method;

use crate::endpoint::Endpoint;
use crate::transport::{Call, Transport};

pub mod active_directory;
pub mod identity;
pub mod keyboard;
pub mod meta;
pub mod network;
pub mod packages;
pub mod storage;
pub mod system;

/// Client for the installer backend.
#[derive(Debug, Default)]
pub struct SubiquityClient {
    transport: Transport,
}

impl SubiquityClient {
    /// A client whose transport is not open yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// A client with its transport opened on `endpoint`.
    pub fn connect(endpoint: Endpoint) -> Self {
        let mut client = Self::new();
        client.open(endpoint);
        client
    }

    pub fn open(&mut self, endpoint: Endpoint) {
        self.transport.open(endpoint);
    }

    pub fn close(&mut self) {
        self.transport.close();
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    fn get<'a>(&'a self, name: &'static str, path: &'a str) -> Call<'a> {
        self.transport.call(name, Method::GET, path)
    }

    fn post<'a>(&'a self, name: &'static str, path: &'a str) -> Call<'a> {
        self.transport.call(name, Method::POST, path)
    }
}
