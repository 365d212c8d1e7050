//! Cross-process message types
//!
//! Every message is one JSON object per line.
//!
//! | Channel | Direction | Payload |
//! |---|---|---|
//! | `GET_AI_TOOL_CONFIG` | mirror -> authority | none -> `ToolConfig` |
//! | `SET_AI_TOOL` | mirror -> authority | tool id -> `bool` |
//! | `AI_TOOL_CHANGED` | authority -> mirrors | `ToolDescriptor` |

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::registry::ToolDescriptor;
use crate::{Error, Result};

/// Named message channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    GetAiToolConfig,
    SetAiTool,
    AiToolChanged,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetAiToolConfig => "GET_AI_TOOL_CONFIG",
            Self::SetAiTool => "SET_AI_TOOL",
            Self::AiToolChanged => "AI_TOOL_CHANGED",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "GET_AI_TOOL_CONFIG" => Some(Self::GetAiToolConfig),
            "SET_AI_TOOL" => Some(Self::SetAiTool),
            "AI_TOOL_CHANGED" => Some(Self::AiToolChanged),
            _ => None,
        }
    }
}

/// Raw request as received from a mirror
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub channel: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,
}

impl RequestEnvelope {
    pub fn new(id: impl Into<Value>, channel: Channel, payload: Value) -> Self {
        Self {
            id: Some(id.into()),
            channel: channel.as_str().to_string(),
            payload,
        }
    }

    /// Decode into a typed request.
    pub fn decode(&self) -> Result<AuthorityRequest> {
        match Channel::parse(&self.channel) {
            Some(Channel::GetAiToolConfig) => Ok(AuthorityRequest::GetConfig),
            Some(Channel::SetAiTool) => match &self.payload {
                Value::String(id) => Ok(AuthorityRequest::SetTool(id.clone())),
                other => Err(Error::InvalidPayload {
                    channel: self.channel.clone(),
                    message: format!("expected a tool id string, got {}", other),
                }),
            },
            Some(Channel::AiToolChanged) => Err(Error::InvalidPayload {
                channel: self.channel.clone(),
                message: "broadcast-only channel".to_string(),
            }),
            None => Err(Error::UnknownChannel(self.channel.clone())),
        }
    }
}

/// Typed request handled by the authority
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorityRequest {
    GetConfig,
    SetTool(String),
}

/// Response to a request, echoing its id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub channel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseEnvelope {
    pub fn success(id: Option<Value>, channel: &str, result: Value) -> Self {
        Self {
            id,
            channel: channel.to_string(),
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, channel: &str, message: String) -> Self {
        Self {
            id,
            channel: channel.to_string(),
            result: None,
            error: Some(message),
        }
    }
}

/// `AI_TOOL_CHANGED` notification pushed to every mirror
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastEnvelope {
    pub channel: Channel,
    pub payload: ToolDescriptor,
}

impl BroadcastEnvelope {
    pub fn tool_changed(tool: ToolDescriptor) -> Self {
        Self {
            channel: Channel::AiToolChanged,
            payload: tool,
        }
    }
}

/// Any line a mirror receives from a served authority
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    /// Tried first: an error response on `AI_TOOL_CHANGED` has no payload
    Broadcast(BroadcastEnvelope),
    Response(ResponseEnvelope),
}
