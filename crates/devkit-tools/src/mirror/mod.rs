//! UI-side mirror of the active tool
//!
//! A [`Mirror`] caches the authority's active tool and keeps selector
//! view-state consistent with it. Two handlers drive all state changes:
//!
//! - [`Mirror::apply_broadcast`] installs a confirmed tool from
//!   `AI_TOOL_CHANGED`. It is the only path that updates the cache.
//! - [`Mirror::revert_on_rejection`] puts the selector back on the last
//!   confirmed tool after a declined or unanswered switch.
//!
//! Both are idempotent and give the same result in either order, so the
//! broadcast and the direct response may arrive interleaved arbitrarily.

mod cache;
mod view;

pub use cache::{FALLBACK_START_COMMAND, ToolCache};
pub use view::{SelectorOption, SelectorView};

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use crate::Result;
use crate::link::AuthorityLink;
use crate::registry::ToolDescriptor;
use crate::settings::SyncSettings;

/// How a switch request was resolved by the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    Accepted,
    Rejected,
    /// No response within the configured switch timeout
    TimedOut,
}

impl SwitchOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

type ToolListener = Box<dyn Fn(&ToolDescriptor) + Send + Sync>;

pub struct Mirror<L: AuthorityLink> {
    link: L,
    settings: SyncSettings,
    events: broadcast::Receiver<ToolDescriptor>,
    cache: ToolCache,
    view: SelectorView,
    listeners: Vec<ToolListener>,
}

impl<L: AuthorityLink> Mirror<L> {
    /// Subscribe to broadcasts and perform the initial `GET_AI_TOOL_CONFIG`.
    ///
    /// The subscription is taken first so no change between the two calls
    /// is missed.
    pub async fn connect(link: L, settings: SyncSettings) -> Result<Self> {
        let events = link.subscribe();
        let config = link.get_config().await?;
        tracing::debug!(
            tool = %config.active_tool.id,
            available = config.available_tools.len(),
            "Mirror synced"
        );

        let view = SelectorView::from_config(&config);
        let mut cache = ToolCache::new();
        cache.replace(config.active_tool);

        Ok(Self {
            link,
            settings,
            events,
            cache,
            view,
            listeners: Vec::new(),
        })
    }

    /// Register a callback run after every applied broadcast.
    pub fn on_tool_change(&mut self, listener: impl Fn(&ToolDescriptor) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn cache(&self) -> &ToolCache {
        &self.cache
    }

    pub fn view(&self) -> &SelectorView {
        &self.view
    }

    pub fn current_tool(&self) -> Option<&ToolDescriptor> {
        self.cache.current_tool()
    }

    pub fn start_command(&self) -> &str {
        self.cache.start_command()
    }

    pub fn command(&self, action: &str) -> Option<&str> {
        self.cache.command(action)
    }

    pub fn supports_feature(&self, feature: &str) -> bool {
        self.cache.supports_feature(feature)
    }

    /// The user picked `tool_id` in the selector.
    ///
    /// Only the control moves; the cache waits for the broadcast.
    pub fn select(&mut self, tool_id: &str) {
        self.view.assume(tool_id);
    }

    /// Ask the authority to switch to `tool_id` and settle the selector.
    ///
    /// A rejected or timed-out switch is reverted and reported through the
    /// outcome; neither is retried. Broadcasts already queued when the
    /// response arrives are applied before returning.
    pub async fn request_switch(&mut self, tool_id: &str) -> Result<SwitchOutcome> {
        self.select(tool_id);

        let response =
            tokio::time::timeout(self.settings.switch_timeout, self.link.set_tool(tool_id)).await;
        let outcome = match response {
            Ok(Ok(true)) => SwitchOutcome::Accepted,
            Ok(Ok(false)) => SwitchOutcome::Rejected,
            Ok(Err(e)) => {
                self.revert_on_rejection(tool_id);
                self.pump();
                return Err(e);
            }
            Err(_) => {
                tracing::warn!(
                    tool = %tool_id,
                    timeout_ms = self.settings.switch_timeout.as_millis() as u64,
                    "Switch request timed out"
                );
                SwitchOutcome::TimedOut
            }
        };

        self.settle(tool_id, outcome);
        self.pump();
        Ok(outcome)
    }

    /// Apply the direct response for a switch to `tool_id`.
    pub fn settle(&mut self, tool_id: &str, outcome: SwitchOutcome) {
        match outcome {
            SwitchOutcome::Accepted => self.acknowledge(tool_id),
            SwitchOutcome::Rejected | SwitchOutcome::TimedOut => self.revert_on_rejection(tool_id),
        }
    }

    /// The authority accepted `tool_id`; the broadcast does the rest.
    pub fn acknowledge(&mut self, tool_id: &str) {
        self.view.clear_pending(tool_id);
    }

    /// Handle `AI_TOOL_CHANGED`.
    pub fn apply_broadcast(&mut self, tool: ToolDescriptor) {
        tracing::debug!(tool = %tool.id, "Applying tool change");
        self.view.show(&tool);
        self.cache.replace(tool);

        if let Some(tool) = self.cache.current_tool() {
            for listener in &self.listeners {
                listener(tool);
            }
        }
    }

    /// Undo the optimistic selection of `tool_id`.
    ///
    /// Has no effect if the selector already moved elsewhere or `tool_id`
    /// has since been confirmed.
    pub fn revert_on_rejection(&mut self, tool_id: &str) {
        let confirmed = self.cache.current_id();
        if self.view.selected.as_deref() == Some(tool_id) && confirmed != Some(tool_id) {
            tracing::debug!(tool = %tool_id, confirmed = ?confirmed, "Reverting selector");
            self.view.selected = confirmed.map(str::to_string);
        }
        self.view.clear_pending(tool_id);
    }

    /// Apply every broadcast already queued. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.events.try_recv() {
                Ok(tool) => {
                    self.apply_broadcast(tool);
                    applied += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Mirror fell behind tool broadcasts");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        applied
    }

    /// Wait for the next broadcast and apply it.
    ///
    /// Returns `None` once the authority has gone away.
    pub async fn next_change(&mut self) -> Option<ToolDescriptor> {
        loop {
            match self.events.recv().await {
                Ok(tool) => {
                    self.apply_broadcast(tool.clone());
                    return Some(tool);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Mirror fell behind tool broadcasts");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
