//! Per-entity publish settings

use serde::{Deserialize, Serialize};

/// Identifier of a publishing channel
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub String);

impl From<String> for ChannelId {
    fn from(s: String) -> Self {
        ChannelId(s)
    }
}

impl From<&str> for ChannelId {
    fn from(s: &str) -> Self {
        ChannelId(s.to_string())
    }
}

impl AsRef<str> for ChannelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of a section within a channel
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionId(pub String);

impl From<String> for SectionId {
    fn from(s: String) -> Self {
        SectionId(s)
    }
}

impl From<&str> for SectionId {
    fn from(s: &str) -> Self {
        SectionId(s.to_string())
    }
}

impl AsRef<str> for SectionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// What happens to an entity when it is saved: whether it gets pushed,
/// and where to. Observers may adjust these right before publishing or
/// saving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishSettings {
    /// Push the entity to its channels on save
    pub publish_flag: bool,

    /// Treat the push as a preview visible only to channel members
    pub is_preview: bool,

    /// Channels the entity gets pushed to
    pub channels: Vec<ChannelId>,

    /// Sections the entity is filed under
    pub sections: Vec<SectionId>,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            publish_flag: false,
            is_preview: true,
            channels: Vec::new(),
            sections: Vec::new(),
        }
    }
}

impl PublishSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel(mut self, channel: impl Into<ChannelId>) -> Self {
        self.channels.push(channel.into());
        self
    }

    pub fn with_section(mut self, section: impl Into<SectionId>) -> Self {
        self.sections.push(section.into());
        self
    }

    pub fn publishable(mut self) -> Self {
        self.publish_flag = true;
        self
    }
}
