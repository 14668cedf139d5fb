// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Contains [`Event`], a discrete occurrence recorded with [`Client::event`].
//!
//! [`Client::event`]: crate::Client::event

use jiff::Timestamp;

use crate::Tags;

/// A discrete occurrence with a title and a descriptive text.
///
/// The optional metadata is carried as-is. Sinks that have no use for it (like the logger sink)
/// ignore it, sinks that speak an event-aware protocol (like DogStatsD) encode it.
///
/// ```
/// # use tally_core::{AlertType, Event, Priority};
/// let event = Event::new("deploy finished", "version 1.2.3 is live")
///     .with_alert_type(AlertType::Success)
///     .with_priority(Priority::Low)
///     .with_aggregation_key("deploys");
/// assert_eq!(event.title, "deploy finished");
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub struct Event {
    /// Short title of the event.
    pub title: String,
    /// Body of the event.
    pub text: String,
    /// When the event happened. Omitted from the encoded event when absent.
    pub timestamp: Option<Timestamp>,
    /// Host the event is about.
    pub hostname: Option<String>,
    /// Key used by backends to group related events.
    pub aggregation_key: Option<String>,
    /// Priority of the event.
    pub priority: Option<Priority>,
    /// Name of the system that emitted the event.
    pub source_type_name: Option<String>,
    /// Severity of the event.
    pub alert_type: Option<AlertType>,
    /// Tags that only apply to this event. They are merged over the client's tags by sinks that
    /// support per-event tags.
    pub tags: Tags,
}

impl Event {
    /// Create an event with a title and text and no metadata.
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            timestamp: None,
            hostname: None,
            aggregation_key: None,
            priority: None,
            source_type_name: None,
            alert_type: None,
            tags: Tags::new(),
        }
    }

    /// Set the time the event happened.
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set the host the event is about.
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Set the aggregation key.
    pub fn with_aggregation_key(mut self, key: impl Into<String>) -> Self {
        self.aggregation_key = Some(key.into());
        self
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the source type name.
    pub fn with_source_type_name(mut self, source: impl Into<String>) -> Self {
        self.source_type_name = Some(source.into());
        self
    }

    /// Set the alert type.
    pub fn with_alert_type(mut self, alert_type: AlertType) -> Self {
        self.alert_type = Some(alert_type);
        self
    }

    /// Set the tags that only apply to this event.
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }
}

/// Priority of an [`Event`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Priority {
    /// Normal priority
    #[default]
    Normal,
    /// Low priority
    Low,
}

impl Priority {
    /// Wire name of the priority.
    pub const fn as_str(self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::Low => "low",
        }
    }
}

/// Severity of an [`Event`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AlertType {
    /// Informational
    #[default]
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
    /// Success
    Success,
}

impl AlertType {
    /// Wire name of the alert type.
    pub const fn as_str(self) -> &'static str {
        match self {
            AlertType::Info => "info",
            AlertType::Warning => "warning",
            AlertType::Error => "error",
            AlertType::Success => "success",
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    #[test]
    fn new_event_has_no_metadata() {
        let event = Event::new("title", "desc");
        check!(event.title == "title");
        check!(event.text == "desc");
        check!(event.timestamp.is_none());
        check!(event.priority.is_none());
        check!(event.alert_type.is_none());
        check!(event.tags.is_empty());
    }

    #[test]
    fn builders_set_metadata() {
        let ts = Timestamp::from_second(1_700_000_000).unwrap();
        let event = Event::new("t", "d")
            .with_timestamp(ts)
            .with_hostname("host-1")
            .with_aggregation_key("agg")
            .with_priority(Priority::Low)
            .with_source_type_name("cron")
            .with_alert_type(AlertType::Warning)
            .with_tags(Tags::from([("k", "v")]));
        check!(event.timestamp == Some(ts));
        check!(event.hostname.as_deref() == Some("host-1"));
        check!(event.aggregation_key.as_deref() == Some("agg"));
        check!(event.priority == Some(Priority::Low));
        check!(event.source_type_name.as_deref() == Some("cron"));
        check!(event.alert_type == Some(AlertType::Warning));
        check!(event.tags.get("k") == Some("v"));
    }

    #[test]
    fn wire_names() {
        check!(Priority::default().as_str() == "normal");
        check!(Priority::Low.as_str() == "low");
        check!(AlertType::default().as_str() == "info");
        check!(AlertType::Error.as_str() == "error");
        check!(AlertType::Success.as_str() == "success");
        check!(AlertType::Warning.as_str() == "warning");
    }
}
