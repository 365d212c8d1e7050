//! JSON-lines server exposing an [`Authority`] to other processes
//!
//! Every peer gets its own `AI_TOOL_CHANGED` subscription, so a switch
//! requested by one peer reaches all of them.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use crate::Result;
use crate::authority::{Authority, AuthorityHandle};
use crate::link::AuthorityLink;
use crate::protocol::{BroadcastEnvelope, ResponseEnvelope};
use crate::registry::ToolDescriptor;

/// Serves any number of peers: requests in, responses and
/// `AI_TOOL_CHANGED` out.
///
/// Cheap to clone; clones share the same authority.
#[derive(Clone)]
pub struct AuthorityServer {
    handle: AuthorityHandle,
}

impl AuthorityServer {
    /// Spawn `authority` on its own task. Must be called within a Tokio runtime.
    pub fn new(authority: Authority) -> Self {
        Self {
            handle: authority.spawn(),
        }
    }

    pub fn handle(&self) -> &AuthorityHandle {
        &self.handle
    }

    /// Serve a single peer over stdin/stdout until stdin closes.
    pub async fn run(&self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();

        tracing::info!("Tool authority ready on stdio");
        self.serve(stdin, stdout).await
    }

    /// Accept peers from `listener` and serve each on its own task.
    ///
    /// Runs until accepting fails.
    pub async fn listen(&self, listener: TcpListener) -> Result<()> {
        tracing::info!(addr = ?listener.local_addr().ok(), "Tool authority listening");

        loop {
            let (stream, peer) = listener.accept().await?;
            tracing::info!(%peer, "Peer connected");

            let server = self.clone();
            tokio::spawn(async move {
                let (reader, writer) = stream.into_split();
                if let Err(e) = server.serve(BufReader::new(reader), writer).await {
                    tracing::warn!(%peer, error = %e, "Peer connection failed");
                }
                tracing::info!(%peer, "Peer disconnected");
            });
        }
    }

    /// Serve one peer until `reader` reaches end of input.
    ///
    /// Each request line yields one response line. Broadcasts caused by
    /// the request follow its response; broadcasts caused by other peers
    /// are forwarded as they happen.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut events = self.handle.subscribe();
        let mut lines = reader.lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    let response = self.respond(line).await?;
                    write_line(&mut writer, &response).await?;

                    loop {
                        match events.try_recv() {
                            Ok(tool) => write_broadcast(&mut writer, tool).await?,
                            Err(TryRecvError::Lagged(skipped)) => {
                                tracing::warn!(skipped, "Dropped tool broadcasts");
                            }
                            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                        }
                    }
                }
                event = events.recv() => match event {
                    Ok(tool) => write_broadcast(&mut writer, tool).await?,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Dropped tool broadcasts");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }

        tracing::info!("Peer closed input, stopping");
        Ok(())
    }

    async fn respond(&self, line: &str) -> Result<String> {
        match self.handle.handle_message(line).await {
            Ok(response) => Ok(response),
            Err(crate::Error::Json(e)) => {
                tracing::warn!(error = %e, "Malformed request");
                let response = ResponseEnvelope::error(None, "", format!("Parse error: {}", e));
                Ok(serde_json::to_string(&response)?)
            }
            Err(e) => Err(e),
        }
    }
}

async fn write_broadcast<W: AsyncWrite + Unpin>(writer: &mut W, tool: ToolDescriptor) -> Result<()> {
    let line = serde_json::to_string(&BroadcastEnvelope::tool_changed(tool))?;
    write_line(writer, &line).await
}

pub(crate) async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
