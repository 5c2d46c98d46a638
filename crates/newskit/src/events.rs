//! Publish lifecycle notifications
//!
//! Interested parties implement [`PublishObserver`] and register with
//! a [`PublishEvents`] dispatcher; the push side calls the `notify_*`
//! methods after the remote operation succeeded. Observers run in
//! registration order. All methods default to no-ops so implementors
//! only write the ones they care about; `alter_settings` is the single
//! place an observer may change behavior, everything else is
//! informational.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::entity::{ContentEntity, EntityRef};
use crate::settings::{ChannelId, PublishSettings};

/// Which save operation triggered a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishOp {
    Insert,
    Update,
}

impl PublishOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishOp::Insert => "insert",
            PublishOp::Update => "update",
        }
    }
}

/// When a settings adjustment runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsPhase {
    /// Right before the entity is pushed to its channels
    PrePublish,

    /// Right before the settings are persisted
    PreSave,
}

/// A published (inserted or updated) remote article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleEvent {
    /// Remote article id
    pub article_id: String,

    /// Remote article revision id
    pub article_revision_id: String,

    /// Channel the article was pushed to
    pub channel_id: ChannelId,

    /// The entity revision that was exported
    pub entity: EntityRef,

    /// Extension-defined payload that traveled with the push
    pub data: serde_json::Value,
}

/// A remote article that was deleted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleDeleted {
    pub article_id: String,
    pub channel_id: ChannelId,
    pub entity: EntityRef,
}

/// Observer of publish lifecycle events
pub trait PublishObserver: Send + Sync {
    /// A new article was created on the remote side
    fn article_inserted(&self, _event: &ArticleEvent) {}

    /// An existing article was updated on the remote side
    fn article_updated(&self, _event: &ArticleEvent) {}

    /// An article was deleted on the remote side
    fn article_deleted(&self, _event: &ArticleDeleted) {}

    /// Adjust an entity's publish settings before they take effect
    fn alter_settings(
        &self,
        _settings: &mut PublishSettings,
        _entity: &ContentEntity,
        _op: PublishOp,
        _phase: SettingsPhase,
    ) {
    }
}

/// Dispatcher fanning events out to registered observers in
/// registration order
#[derive(Default, Clone)]
pub struct PublishEvents {
    observers: Vec<Arc<dyn PublishObserver>>,
}

impl PublishEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: Arc<dyn PublishObserver>) {
        self.observers.push(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn notify_inserted(&self, event: &ArticleEvent) {
        for observer in &self.observers {
            observer.article_inserted(event);
        }
    }

    pub fn notify_updated(&self, event: &ArticleEvent) {
        for observer in &self.observers {
            observer.article_updated(event);
        }
    }

    pub fn notify_deleted(&self, event: &ArticleDeleted) {
        for observer in &self.observers {
            observer.article_deleted(event);
        }
    }

    /// Run the settings adjustment chain. Each observer sees the
    /// settings as left by the previous one.
    pub fn alter_settings(
        &self,
        settings: &mut PublishSettings,
        entity: &ContentEntity,
        op: PublishOp,
        phase: SettingsPhase,
    ) {
        for observer in &self.observers {
            observer.alter_settings(settings, entity, op, phase);
        }
    }
}
