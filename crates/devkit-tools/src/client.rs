//! JSON-lines link to an authority served by another process

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, BufReader};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::{Mutex, broadcast, oneshot};
use tokio::task::JoinHandle;

use crate::link::AuthorityLink;
use crate::protocol::{Channel, RequestEnvelope, ResponseEnvelope, ServerMessage};
use crate::registry::{ToolConfig, ToolDescriptor};
use crate::server::write_line;
use crate::settings::SyncSettings;
use crate::{Error, Result};

/// In-flight requests by id. `None` once the connection has closed.
type Pending = Arc<Mutex<Option<HashMap<u64, oneshot::Sender<ResponseEnvelope>>>>>;

/// [`AuthorityLink`] over a JSON-lines connection to an
/// [`AuthorityServer`](crate::AuthorityServer).
///
/// Responses are matched to requests by id, so concurrent requests may
/// share one connection. `AI_TOOL_CHANGED` lines go to every subscriber.
pub struct RemoteAuthority {
    writer: Mutex<Box<dyn AsyncWrite + Send + Unpin>>,
    pending: Pending,
    next_id: AtomicU64,
    events: broadcast::Receiver<ToolDescriptor>,
    reader: JoinHandle<()>,
}

impl RemoteAuthority {
    /// Connect to an authority listening on `addr`.
    pub async fn connect(addr: impl ToSocketAddrs, settings: SyncSettings) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        let (reader, writer) = stream.into_split();
        Ok(Self::new(reader, writer, settings))
    }

    /// Speak the protocol over an already open connection.
    ///
    /// Spawns the task that reads `reader`, so this must be called within
    /// a Tokio runtime.
    pub fn new<R, W>(reader: R, writer: W, settings: SyncSettings) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let (sender, events) = broadcast::channel(settings.broadcast_capacity.max(1));
        let pending: Pending = Arc::new(Mutex::new(Some(HashMap::new())));
        let reader = tokio::spawn(read_messages(BufReader::new(reader), pending.clone(), sender));

        Self {
            writer: Mutex::new(Box::new(writer)),
            pending,
            next_id: AtomicU64::new(1),
            events,
            reader,
        }
    }

    async fn request(&self, channel: Channel, payload: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (reply, response) = oneshot::channel();
        match self.pending.lock().await.as_mut() {
            Some(pending) => pending.insert(id, reply),
            None => return Err(Error::AuthorityUnavailable),
        };

        let line = serde_json::to_string(&RequestEnvelope::new(id, channel, payload))?;
        let written = {
            let mut writer = self.writer.lock().await;
            write_line(&mut *writer, &line).await
        };
        if let Err(e) = written {
            tracing::warn!(error = %e, channel = channel.as_str(), "Could not reach tool authority");
            if let Some(pending) = self.pending.lock().await.as_mut() {
                pending.remove(&id);
            }
            return Err(Error::AuthorityUnavailable);
        }

        let response = response.await.map_err(|_| Error::AuthorityUnavailable)?;
        match (response.result, response.error) {
            (_, Some(message)) => Err(Error::RemoteFailure {
                channel: response.channel,
                message,
            }),
            (result, None) => Ok(result.unwrap_or(Value::Null)),
        }
    }
}

impl Drop for RemoteAuthority {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

#[async_trait]
impl AuthorityLink for RemoteAuthority {
    async fn get_config(&self) -> Result<ToolConfig> {
        let result = self.request(Channel::GetAiToolConfig, Value::Null).await?;
        Ok(serde_json::from_value(result)?)
    }

    async fn set_tool(&self, tool_id: &str) -> Result<bool> {
        let result = self
            .request(Channel::SetAiTool, Value::String(tool_id.to_string()))
            .await?;
        result.as_bool().ok_or_else(|| Error::InvalidPayload {
            channel: Channel::SetAiTool.as_str().to_string(),
            message: format!("expected a boolean result, got {}", result),
        })
    }

    fn subscribe(&self) -> broadcast::Receiver<ToolDescriptor> {
        self.events.resubscribe()
    }
}

/// Route incoming lines until the connection closes, then fail every
/// request still waiting and close the broadcast channel.
async fn read_messages<R>(reader: R, pending: Pending, events: broadcast::Sender<ToolDescriptor>)
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Tool authority connection failed");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<ServerMessage>(line) {
            Ok(ServerMessage::Broadcast(envelope)) => {
                // No subscribers is not an error
                let _ = events.send(envelope.payload);
            }
            Ok(ServerMessage::Response(response)) => {
                let Some(id) = response.id.as_ref().and_then(Value::as_u64) else {
                    tracing::warn!(error = ?response.error, "Response without a request id");
                    continue;
                };
                let waiting = pending.lock().await.as_mut().and_then(|p| p.remove(&id));
                match waiting {
                    Some(reply) => {
                        let _ = reply.send(response);
                    }
                    None => tracing::debug!(id, "Response to an abandoned request"),
                }
            }
            Err(e) => tracing::warn!(error = %e, "Unreadable line from tool authority"),
        }
    }

    tracing::debug!("Tool authority connection closed");
    pending.lock().await.take();
}
