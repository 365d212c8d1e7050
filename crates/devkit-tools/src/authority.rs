//! The tool authority - sole owner of the active tool
//!
//! The authority validates switch requests, mutates the registry, and
//! broadcasts every accepted change to all subscribed mirrors. It is the
//! only writer of the active tool, so it needs no locking: in-process
//! callers reach it through an [`AuthorityHandle`] that forwards requests
//! to a single task.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::link::AuthorityLink;
use crate::policy::{AllowAll, SwitchPolicy};
use crate::protocol::{AuthorityRequest, RequestEnvelope, ResponseEnvelope};
use crate::registry::{ToolConfig, ToolDescriptor, ToolRegistry};
use crate::settings::SyncSettings;
use crate::{Error, Result};

pub struct Authority {
    registry: ToolRegistry,
    policy: Box<dyn SwitchPolicy>,
    events: broadcast::Sender<ToolDescriptor>,
}

impl Authority {
    pub fn new(registry: ToolRegistry, settings: SyncSettings) -> Self {
        let (events, _) = broadcast::channel(settings.broadcast_capacity.max(1));
        Self {
            registry,
            policy: Box::new(AllowAll),
            events,
        }
    }

    /// Replace the switch policy (builder pattern).
    pub fn with_policy(mut self, policy: impl SwitchPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn active_tool(&self) -> &ToolDescriptor {
        self.registry.active()
    }

    /// `GET_AI_TOOL_CONFIG`
    pub fn config(&self) -> ToolConfig {
        self.registry.to_config()
    }

    /// Subscribe to `AI_TOOL_CHANGED`.
    pub fn subscribe(&self) -> broadcast::Receiver<ToolDescriptor> {
        self.events.subscribe()
    }

    /// `SET_AI_TOOL`
    ///
    /// Returns `false` without touching anything when `tool_id` is unknown
    /// or the policy declines. Otherwise activates the tool, broadcasts it
    /// once to every subscriber, and returns `true`.
    pub fn set_tool(&mut self, tool_id: &str) -> bool {
        let Some(requested) = self.registry.get(tool_id) else {
            tracing::info!(tool = %tool_id, "Rejected switch to unknown tool");
            return false;
        };
        if !self.policy.permits(self.registry.active(), requested) {
            tracing::info!(tool = %tool_id, "Switch declined by policy");
            return false;
        }

        let Some(tool) = self.registry.activate(tool_id).cloned() else {
            return false;
        };
        // No subscribers is not an error
        let mirrors = self.events.send(tool.clone()).unwrap_or(0);
        tracing::info!(tool = %tool.id, mirrors, "Active tool changed");
        true
    }

    pub fn handle(&mut self, request: AuthorityRequest) -> Result<Value> {
        match request {
            AuthorityRequest::GetConfig => Ok(serde_json::to_value(self.config())?),
            AuthorityRequest::SetTool(id) => Ok(Value::Bool(self.set_tool(&id))),
        }
    }

    /// Handle one raw JSON request line and return the response line.
    ///
    /// Malformed JSON is an error; unknown channels and bad payloads are
    /// answered with an error response that echoes the request id.
    pub fn handle_message(&mut self, message: &str) -> Result<String> {
        let request: RequestEnvelope = serde_json::from_str(message)?;
        tracing::debug!(channel = %request.channel, "Received request");

        let response = match request.decode().and_then(|r| self.handle(r)) {
            Ok(result) => ResponseEnvelope::success(request.id, &request.channel, result),
            Err(e) => ResponseEnvelope::error(request.id, &request.channel, e.to_string()),
        };

        serde_json::to_string(&response).map_err(Error::from)
    }

    /// Move the authority onto its own task and return a handle to it.
    ///
    /// The task stops once every handle has been dropped.
    pub fn spawn(self) -> AuthorityHandle {
        let (commands, mut rx) = mpsc::unbounded_channel();
        let events = self.events.clone();
        let mut authority = self;

        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    Command::GetConfig { reply } => {
                        let _ = reply.send(authority.config());
                    }
                    Command::SetTool { tool_id, reply } => {
                        let _ = reply.send(authority.set_tool(&tool_id));
                    }
                    Command::Message { line, reply } => {
                        let _ = reply.send(authority.handle_message(&line));
                    }
                }
            }
            tracing::debug!("Tool authority stopped");
        });

        AuthorityHandle { commands, events }
    }
}

enum Command {
    GetConfig {
        reply: oneshot::Sender<ToolConfig>,
    },
    SetTool {
        tool_id: String,
        reply: oneshot::Sender<bool>,
    },
    Message {
        line: String,
        reply: oneshot::Sender<Result<String>>,
    },
}

/// Cloneable in-process link to a spawned [`Authority`].
#[derive(Clone)]
pub struct AuthorityHandle {
    commands: mpsc::UnboundedSender<Command>,
    events: broadcast::Sender<ToolDescriptor>,
}

impl AuthorityHandle {
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    /// [`Authority::handle_message`] on the authority's task.
    pub async fn handle_message(&self, message: &str) -> Result<String> {
        let line = message.to_string();
        self.request(|reply| Command::Message { line, reply }).await?
    }

    async fn request<T, F>(&self, make: F) -> Result<T>
    where
        T: Send,
        F: FnOnce(oneshot::Sender<T>) -> Command + Send,
    {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(make(reply))
            .map_err(|_| Error::AuthorityUnavailable)?;
        rx.await.map_err(|_| Error::AuthorityUnavailable)
    }
}

#[async_trait]
impl AuthorityLink for AuthorityHandle {
    async fn get_config(&self) -> Result<ToolConfig> {
        self.request(|reply| Command::GetConfig { reply }).await
    }

    async fn set_tool(&self, tool_id: &str) -> Result<bool> {
        let tool_id = tool_id.to_string();
        self.request(|reply| Command::SetTool { tool_id, reply })
            .await
    }

    fn subscribe(&self) -> broadcast::Receiver<ToolDescriptor> {
        self.events.subscribe()
    }
}
