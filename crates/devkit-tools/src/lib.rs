//! Active coding-assistant selection for devkit
//!
//! One process hosts the [`Authority`], the single owner of the active
//! tool. Any number of UI processes hold a [`Mirror`]: a cache of the
//! authority's choice plus selector view-state that rolls back when a
//! switch is declined.
//!
//! # Channels
//!
//! - `GET_AI_TOOL_CONFIG`: initial sync, answered with a [`ToolConfig`]
//! - `SET_AI_TOOL`: switch attempt, answered with `true`/`false`
//! - `AI_TOOL_CHANGED`: broadcast of the new [`ToolDescriptor`] to every mirror
//!
//! In-process mirrors talk to a spawned authority through an
//! [`AuthorityHandle`]. Other processes connect a [`RemoteAuthority`] to
//! the JSON-lines protocol served by [`AuthorityServer`], which accepts any
//! number of peers.

pub mod authority;
pub mod client;
pub mod error;
pub mod link;
pub mod logging;
pub mod mirror;
pub mod policy;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod settings;

pub use authority::{Authority, AuthorityHandle};
pub use client::RemoteAuthority;
pub use error::{Error, Result};
pub use link::AuthorityLink;
pub use mirror::{
    FALLBACK_START_COMMAND, Mirror, SelectorOption, SelectorView, SwitchOutcome, ToolCache,
};
pub use policy::{AllowAll, LockedPolicy, SwitchPolicy};
pub use protocol::{
    AuthorityRequest, BroadcastEnvelope, Channel, RequestEnvelope, ResponseEnvelope, ServerMessage,
};
pub use registry::{
    BUILTIN_COUNT, DEFAULT_TOOL, ToolConfig, ToolDescriptor, ToolFeature, ToolRegistry,
    builtin_descriptors, default_descriptor,
};
pub use server::AuthorityServer;
pub use settings::{DEFAULT_BROADCAST_CAPACITY, DEFAULT_SWITCH_TIMEOUT, SyncSettings};
