#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! # playdeck-core
//!
//! Platform independent half of Playdeck, the client for an Ansible-style
//! server automation backend.
//!
//! Every page of the dashboard and every console command is the same
//! pattern instantiated per resource:
//!
//! - a [`ResourceFetcher`] tracks `Loading / Loaded / Failed` for one
//!   collection, discarding responses that arrive out of order
//! - a [`FilteredList`] narrows the collection by a category and a search
//!   needle, and [`TableModel`] turns it into rows
//! - a [`NameResolver`] joins foreign keys to display names, one request per
//!   unique id
//! - a [`MutationDispatcher`] sends create/delete actions
//! - a [`LiveStreamView`] owns one terminal socket
//!
//! Network access goes through the [`Transport`] and [`SocketConnector`]
//! traits; `playdeck-client` implements them natively and the dashboard
//! implements them in the browser. Futures are `?Send` and state lives in
//! `RefCell`s, so everything runs on a single-threaded executor.
//!
//! ## Example
//!
//! ```ignore
//! use playdeck_core::{ResourceDescriptor, ResourceFetcher, Server};
//!
//! let servers = ResourceFetcher::<Server>::new(transport, ResourceDescriptor::SERVERS);
//! servers.refresh().await;
//! let model = TableModel::from_resource(&servers.state(), "servers", |items| {
//!     FilteredList::new(ServerField::Environment)
//!         .with_selection(Selection::only("production"))
//!         .apply(items)
//! });
//! ```

pub mod descriptor;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod models;
pub mod mutation;
pub mod render;
pub mod resolver;
pub mod resource;
pub mod result;
pub mod stream;
pub mod transport;

// Re-export commonly used items
pub use descriptor::ResourceDescriptor;
pub use error::Error;
pub use fetcher::{ResourceFetcher, fetch_entity};
pub use filter::{
    Categorized, FilteredList, LogField, ScheduleField, Searchable, Selection, ServerField,
    category_counts, filter_by,
};
pub use models::{
    Configuration, ConfigurationOrder, Environment, ExecutionLog, ExecutionStatus, Frequency,
    NewConfiguration, NewSchedule, NewServer, NewTemplate, PlaybookUpload, Schedule,
    ScheduleStatus, Secret, Server, ServerStatus, Template, TemplateName,
};
pub use mutation::{CommandRequest, ModalState, Mutation, MutationDispatcher, RefreshPolicy};
pub use render::{ListView, LogRow, TableLine, TableModel, TableRow};
pub use resolver::{NameEntry, NameResolver};
pub use resource::{Applied, Generation, RequestToken, Resource, ResourceSlot};
pub use result::{Result, ResultExt};
pub use stream::{
    CONNECTION_CLOSED_MARKER, Frame, LiveStreamView, SendOutcome, Socket, SocketConnector,
    StreamCommand, StreamEvent, StreamState, TeardownHandle, TerminalCredentials, TerminalTarget,
};
pub use transport::Transport;

#[cfg(test)]
mod tests;
