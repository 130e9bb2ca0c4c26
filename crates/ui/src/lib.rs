//! Leptos 0.7 CSR dashboard for Playdeck
//!
//! Browser front end for the same views the console uses: every page mounts
//! one or more `playdeck-core` fetchers through [`hooks::use_remote_list`]
//! and renders their [`playdeck_core::TableModel`].
//!
//! ## Module Structure
//! - `api`: backend URLs and the `gloo-net` HTTP transport
//! - `socket`: `gloo-net` WebSocket adapter for terminals
//! - `hooks`: reactive wrappers around fetchers
//! - `components`: tables, filter tabs, search box and modal
//! - `pages`: one component per route
//! - `router`: route definitions

#![forbid(unsafe_code)]

pub mod api;
pub mod app;
pub mod components;
pub mod hooks;
pub mod pages;
pub mod router;
pub mod socket;

// Re-export main App component for convenience - Trunk will auto-mount it
pub use app::App;

#[cfg(test)]
mod tests;
