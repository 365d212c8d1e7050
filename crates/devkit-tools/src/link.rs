//! Connection from a mirror to the authority

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::Result;
use crate::registry::{ToolConfig, ToolDescriptor};

/// Request/response and broadcast access to a tool authority.
///
/// Implemented by [`AuthorityHandle`](crate::AuthorityHandle) for
/// in-process use and by [`RemoteAuthority`](crate::RemoteAuthority) for
/// an authority in another process.
#[async_trait]
pub trait AuthorityLink: Send + Sync {
    /// `GET_AI_TOOL_CONFIG`
    async fn get_config(&self) -> Result<ToolConfig>;

    /// `SET_AI_TOOL`. `Ok(false)` means the authority declined.
    async fn set_tool(&self, tool_id: &str) -> Result<bool>;

    /// Subscribe to `AI_TOOL_CHANGED`.
    fn subscribe(&self) -> broadcast::Receiver<ToolDescriptor>;
}
