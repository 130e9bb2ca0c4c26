#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! # playdeck-client
//!
//! Native implementations of the `playdeck-core` network seams:
//!
//! - [`HttpTransport`]: JSON over HTTP with reqwest
//! - [`WsConnector`]: terminal sockets with tokio-tungstenite
//! - [`ClientConfig`]: defaults, config file and environment
//!
//! ## Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use playdeck_client::{ClientConfig, HttpTransport};
//! use playdeck_core::{ResourceDescriptor, ResourceFetcher, Server};
//!
//! let config = ClientConfig::load(None)?;
//! let transport = Rc::new(HttpTransport::new(&config)?);
//! let servers = ResourceFetcher::<Server>::new(transport, ResourceDescriptor::SERVERS);
//! servers.refresh().await;
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod terminal;

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use http::HttpTransport;
pub use terminal::{WsConnector, WsSocket};
