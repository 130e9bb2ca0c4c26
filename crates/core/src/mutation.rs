//! Create and delete actions issued from forms.
//!
//! A mutation is validated, sent, and on a 2xx response the originating modal
//! closes. Whether the list behind the modal is re-fetched is decided by
//! [`RefreshPolicy`].

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;
use crate::fetcher::ResourceFetcher;
use crate::models::{NewConfiguration, NewSchedule, NewServer, NewTemplate, PlaybookUpload};
use crate::result::Result;
use crate::transport::Transport;

/// Payload for `POST /commands/execute`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub server_ids: Vec<i64>,
    pub command: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
    Delete,
}

/// Every write the dashboard can issue.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    UploadPlaybook(PlaybookUpload),
    CreateTemplate(NewTemplate),
    DeleteTemplate(i64),
    CreateConfiguration(NewConfiguration),
    DeleteConfiguration(i64),
    ExecuteCommand(CommandRequest),
    CreateSchedule(NewSchedule),
    CreateServer(NewServer),
}

impl Mutation {
    /// Short name used in logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::UploadPlaybook(_) => "upload playbook",
            Self::CreateTemplate(_) => "create template",
            Self::DeleteTemplate(_) => "delete template",
            Self::CreateConfiguration(_) => "create configuration",
            Self::DeleteConfiguration(_) => "delete configuration",
            Self::ExecuteCommand(_) => "execute command",
            Self::CreateSchedule(_) => "create schedule",
            Self::CreateServer(_) => "create server",
        }
    }

    #[must_use]
    pub const fn method(&self) -> Method {
        match self {
            Self::DeleteTemplate(_) | Self::DeleteConfiguration(_) => Method::Delete,
            _ => Method::Post,
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::UploadPlaybook(_) => "/templates/upload".to_string(),
            Self::CreateTemplate(_) => "/templates/create".to_string(),
            Self::DeleteTemplate(id) => format!("/templates/delete/{id}"),
            Self::CreateConfiguration(_) => "/configurations/create".to_string(),
            Self::DeleteConfiguration(id) => format!("/configurations/delete/{id}"),
            Self::ExecuteCommand(_) => "/commands/execute".to_string(),
            Self::CreateSchedule(_) => "/schedules/create".to_string(),
            Self::CreateServer(_) => "/servers/create".to_string(),
        }
    }

    /// JSON body; `Value::Null` for deletes.
    ///
    /// # Errors
    ///
    /// Returns `Error::Decode` if the payload cannot be serialized.
    pub fn body(&self) -> Result<Value> {
        let value = match self {
            Self::UploadPlaybook(upload) => serde_json::to_value(upload),
            Self::CreateTemplate(template) => serde_json::to_value(template),
            Self::CreateConfiguration(config) => serde_json::to_value(config),
            Self::ExecuteCommand(request) => serde_json::to_value(request),
            Self::CreateSchedule(schedule) => serde_json::to_value(schedule.clone().described()),
            Self::CreateServer(server) => serde_json::to_value(server),
            Self::DeleteTemplate(_) | Self::DeleteConfiguration(_) => Ok(Value::Null),
        };
        value.map_err(|e| Error::decode(self.label(), e.to_string()))
    }

    /// Check the form input before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::UploadPlaybook(upload) => {
                require(&upload.name, "playbook name")?;
                if upload.file_name.is_empty() {
                    return Err(Error::validation("a playbook file is required"));
                }
                if !upload.has_yaml_extension() {
                    return Err(Error::validation("playbook file must be .yml or .yaml"));
                }
                require(&upload.content, "playbook content")
            }
            Self::CreateTemplate(template) => {
                require(&template.name, "template name")?;
                if template.configurations.is_empty() {
                    return Err(Error::validation("select at least one configuration"));
                }
                Ok(())
            }
            Self::CreateConfiguration(config) => {
                require(&config.name, "command name")?;
                require(&config.module, "module")?;
                require(&config.configuration, "command")
            }
            Self::ExecuteCommand(request) => {
                require(&request.command, "command")?;
                if request.server_ids.is_empty() {
                    return Err(Error::validation("select at least one server"));
                }
                Ok(())
            }
            Self::CreateSchedule(schedule) => schedule.validate(),
            Self::CreateServer(server) => {
                require(&server.name, "server name")?;
                require(&server.ip_address, "IP address")
            }
            Self::DeleteTemplate(_) | Self::DeleteConfiguration(_) => Ok(()),
        }
    }
}

fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

/// Whether the list behind a form is re-fetched after a successful
/// mutation. Nothing is re-fetched unless a page opts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    #[default]
    None,
    Refetch,
}

/// Open/submitting/error state of a form modal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModalState {
    pub open: bool,
    pub submitting: bool,
    pub error: Option<String>,
}

impl ModalState {
    pub fn open(&mut self) {
        *self = Self {
            open: true,
            ..Self::default()
        };
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    /// Mark a submission as started. Returns `false` when one is already
    /// running.
    pub fn begin_submit(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        self.error = None;
        true
    }

    /// Close on success; stay open with the message on failure.
    pub fn finish(&mut self, outcome: &Result<Value>) {
        self.submitting = false;
        match outcome {
            Ok(_) => self.open = false,
            Err(e) => self.error = Some(e.to_string()),
        }
    }
}

/// Sends validated mutations through a transport.
#[derive(Clone)]
pub struct MutationDispatcher {
    transport: Rc<dyn Transport>,
}

impl MutationDispatcher {
    pub fn new(transport: Rc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Validate then send.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` without sending anything, or the
    /// transport error of a failed request.
    pub async fn dispatch(&self, mutation: &Mutation) -> Result<Value> {
        mutation.validate()?;
        let path = mutation.path();
        tracing::info!(action = mutation.label(), path = %path, "dispatching mutation");

        let result = match mutation.method() {
            Method::Post => self.transport.post(&path, mutation.body()?).await,
            Method::Delete => self.transport.delete(&path).await,
        };
        if let Err(e) = &result {
            tracing::warn!(action = mutation.label(), error = %e, "mutation failed");
        }
        result
    }

    /// Dispatch, then re-fetch `list` when the policy asks for it and the
    /// mutation succeeded.
    ///
    /// # Errors
    ///
    /// Same as [`MutationDispatcher::dispatch`].
    pub async fn dispatch_then_refresh<T>(
        &self,
        mutation: &Mutation,
        policy: RefreshPolicy,
        list: &ResourceFetcher<T>,
    ) -> Result<Value>
    where
        T: serde::de::DeserializeOwned + Clone,
    {
        let value = self.dispatch(mutation).await?;
        if policy == RefreshPolicy::Refetch {
            list.refresh().await;
        }
        Ok(value)
    }

    /// Drive a modal through one submission.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` when a submission is already running,
    /// otherwise the outcome of [`MutationDispatcher::dispatch`].
    pub async fn submit(&self, modal: &mut ModalState, mutation: &Mutation) -> Result<Value> {
        if !modal.begin_submit() {
            return Err(Error::validation("a submission is already in progress"));
        }
        let outcome = self.dispatch(mutation).await;
        modal.finish(&outcome);
        outcome
    }
}
