// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! DogStatsD datagram encoding.
//!
//! [`MetricLine`] and [`EventLine`] render one datagram each through [`fmt::Display`]. Nothing here
//! does I/O, so the encoding can be checked (or reused) without a socket.

use std::fmt::{self, Write};

use tally_core::{Event, MetricKind, SignedDuration, Tags};

/// The value of one metric operation.
///
/// Non-finite gauge and histogram values render as `NaN` or `inf`, which the agent rejects.
/// [`StatsdClient`](crate::StatsdClient) never encodes them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MetricValue {
    /// A counter delta
    Count(i64),
    /// An absolute gauge level
    Gauge(f64),
    /// A distribution sample
    Histogram(f64),
    /// An elapsed time, encoded in fractional milliseconds
    Timing(SignedDuration),
}

impl MetricValue {
    /// The kind of operation that produced this value.
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricValue::Count(_) => MetricKind::Count,
            MetricValue::Gauge(_) => MetricKind::Gauge,
            MetricValue::Histogram(_) => MetricKind::Histogram,
            MetricValue::Timing(_) => MetricKind::Timing,
        }
    }

    /// The datagram type marker, e.g. `c` for counters.
    pub fn type_marker(&self) -> &'static str {
        match self {
            MetricValue::Count(_) => "c",
            MetricValue::Gauge(_) => "g",
            MetricValue::Histogram(_) => "h",
            MetricValue::Timing(_) => "ms",
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `{}` on f64 never switches to exponent notation, which the agent can't parse
        match self {
            MetricValue::Count(v) => write!(f, "{v}"),
            MetricValue::Gauge(v) | MetricValue::Histogram(v) => write!(f, "{v}"),
            MetricValue::Timing(d) => write!(f, "{}", d.as_millis_f64()),
        }
    }
}

/// One metric datagram: `<namespace><name>:<value>|<type>[|@<rate>][|#<tags>]`.
///
/// ```
/// # use tally_core::Tags;
/// # use tally_statsd::datagram::{MetricLine, MetricValue};
/// let tags = Tags::from([("env", "prod")]);
/// let line = MetricLine {
///     namespace: "app.",
///     name: "requests",
///     value: MetricValue::Count(3),
///     rate: Some(0.5),
///     tags: &tags,
/// };
/// assert_eq!(line.to_string(), "app.requests:3|c|@0.5|#env:prod");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MetricLine<'a> {
    /// Prefix prepended verbatim to the name.
    pub namespace: &'a str,
    /// Metric name.
    pub name: &'a str,
    /// Metric value.
    pub value: MetricValue,
    /// Sample rate annotation. `None` when the operation was not sampled.
    pub rate: Option<f64>,
    /// Tags, rendered sorted by key.
    pub tags: &'a Tags,
}

impl fmt::Display for MetricLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace)?;
        write_sanitized(f, self.name, &[':', '|', '@', '#'])?;
        write!(f, ":{}|{}", self.value, self.value.type_marker())?;
        if let Some(rate) = self.rate {
            write!(f, "|@{rate}")?;
        }
        write_tags(f, self.tags)
    }
}

/// One event datagram: `_e{<title len>,<text len>}:<title>|<text>` followed by the event's
/// optional fields and tags.
///
/// Lengths are in bytes, measured after escaping newlines in the title and text. The optional
/// string fields have newlines and `|` replaced with `_`.
#[derive(Clone, Copy, Debug)]
pub struct EventLine<'a> {
    /// The event to encode.
    pub event: &'a Event,
    /// Tags, already merged with the event's own tags.
    pub tags: &'a Tags,
}

impl fmt::Display for EventLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let event = self.event;
        let title = event.title.replace('\n', "\\n");
        let text = event.text.replace('\n', "\\n");
        write!(
            f,
            "_e{{{},{}}}:{}|{}",
            title.len(),
            text.len(),
            title,
            text
        )?;
        if let Some(timestamp) = event.timestamp {
            write!(f, "|d:{}", timestamp.as_second())?;
        }
        if let Some(hostname) = &event.hostname {
            f.write_str("|h:")?;
            write_sanitized(f, hostname, &['|'])?;
        }
        if let Some(key) = &event.aggregation_key {
            f.write_str("|k:")?;
            write_sanitized(f, key, &['|'])?;
        }
        if let Some(priority) = event.priority {
            write!(f, "|p:{}", priority.as_str())?;
        }
        if let Some(source) = &event.source_type_name {
            f.write_str("|s:")?;
            write_sanitized(f, source, &['|'])?;
        }
        if let Some(alert_type) = event.alert_type {
            write!(f, "|t:{}", alert_type.as_str())?;
        }
        write_tags(f, self.tags)
    }
}

fn write_tags(f: &mut fmt::Formatter<'_>, tags: &Tags) -> fmt::Result {
    for (i, (key, value)) in tags.iter().enumerate() {
        f.write_str(if i == 0 { "|#" } else { "," })?;
        write_sanitized(f, key, &[',', '|', ':'])?;
        if !value.is_empty() {
            f.write_char(':')?;
            write_sanitized(f, value, &[',', '|'])?;
        }
    }
    Ok(())
}

/// Write `s`, replacing protocol delimiters and newlines with `_`.
fn write_sanitized(f: &mut fmt::Formatter<'_>, s: &str, reserved: &[char]) -> fmt::Result {
    if !s.contains(|c: char| c == '\n' || reserved.contains(&c)) {
        return f.write_str(s);
    }
    for c in s.chars() {
        if c == '\n' || reserved.contains(&c) {
            f.write_char('_')?;
        } else {
            f.write_char(c)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rstest::rstest;
    use tally_core::{AlertType, Priority};

    use super::*;

    fn metric(value: MetricValue, rate: Option<f64>, tags: &Tags) -> String {
        MetricLine {
            namespace: "",
            name: "m",
            value,
            rate,
            tags,
        }
        .to_string()
    }

    #[rstest]
    #[case(MetricValue::Count(1), "m:1|c")]
    #[case(MetricValue::Count(-3), "m:-3|c")]
    #[case(MetricValue::Gauge(1024.0), "m:1024|g")]
    #[case(MetricValue::Gauge(0.25), "m:0.25|g")]
    #[case(MetricValue::Gauge(1e21), "m:1000000000000000000000|g")]
    #[case(MetricValue::Histogram(123.0), "m:123|h")]
    #[case(MetricValue::Timing(SignedDuration::from_secs(2)), "m:2000|ms")]
    #[case(MetricValue::Timing(SignedDuration::from_micros(1500)), "m:1.5|ms")]
    fn values(#[case] value: MetricValue, #[case] expected: &str) {
        assert_eq!(metric(value, None, &Tags::new()), expected);
    }

    #[test]
    fn kinds() {
        assert_eq!(MetricValue::Count(0).kind(), MetricKind::Count);
        assert_eq!(MetricValue::Gauge(0.0).kind(), MetricKind::Gauge);
        assert_eq!(MetricValue::Histogram(0.0).kind(), MetricKind::Histogram);
        assert_eq!(
            MetricValue::Timing(SignedDuration::ZERO).kind(),
            MetricKind::Timing
        );
    }

    #[test]
    fn rate_and_tags() {
        let tags = Tags::from([("b", "2"), ("a", "1")]);
        assert_eq!(
            metric(MetricValue::Count(1), Some(0.1), &tags),
            "m:1|c|@0.1|#a:1,b:2"
        );
    }

    #[test]
    fn empty_tag_values_render_as_bare_keys() {
        let tags = Tags::from([("canary", ""), ("env", "prod")]);
        assert_eq!(
            metric(MetricValue::Count(1), None, &tags),
            "m:1|c|#canary,env:prod"
        );
    }

    #[test]
    fn delimiters_are_replaced() {
        let tags = Tags::from([("a,b", "c|d"), ("url", "http://x")]);
        let line = MetricLine {
            namespace: "ns.",
            name: "weird:name|x",
            value: MetricValue::Gauge(1.0),
            rate: None,
            tags: &tags,
        };
        assert_eq!(
            line.to_string(),
            "ns.weird_name_x:1|g|#a_b:c_d,url:http://x"
        );
    }

    #[test]
    fn minimal_event() {
        let event = Event::new("title", "desc");
        let line = EventLine {
            event: &event,
            tags: &Tags::new(),
        };
        assert_eq!(line.to_string(), "_e{5,4}:title|desc");
    }

    #[test]
    fn event_text_newlines_are_escaped_and_counted() {
        let event = Event::new("t", "a\nb");
        let line = EventLine {
            event: &event,
            tags: &Tags::new(),
        };
        assert_eq!(line.to_string(), "_e{1,4}:t|a\\nb");
    }

    #[test]
    fn event_title_newlines_are_escaped_and_counted() {
        let event = Event::new("line1\nline2", "desc");
        let line = EventLine {
            event: &event,
            tags: &Tags::new(),
        };
        let encoded = line.to_string();
        assert_eq!(encoded, "_e{12,4}:line1\\nline2|desc");
        assert!(!encoded.contains('\n'));
    }

    #[test]
    fn event_fields_cannot_break_the_datagram() {
        let event = Event::new("t", "x")
            .with_hostname("a\nb|c")
            .with_aggregation_key("k|1")
            .with_source_type_name("ci\n");
        let line = EventLine {
            event: &event,
            tags: &Tags::new(),
        };
        let encoded = line.to_string();
        assert_eq!(encoded, "_e{1,1}:t|x|h:a_b_c|k:k_1|s:ci_");
        assert!(!encoded.contains('\n'));
    }

    #[test]
    fn event_lengths_are_bytes() {
        let event = Event::new("héllo", "ü");
        let line = EventLine {
            event: &event,
            tags: &Tags::new(),
        };
        assert_eq!(line.to_string(), "_e{6,2}:héllo|ü");
    }

    #[test]
    fn full_event() {
        let event = Event::new("deploy", "done")
            .with_timestamp(Timestamp::from_second(1_700_000_000).unwrap())
            .with_hostname("host-1")
            .with_aggregation_key("deploys")
            .with_priority(Priority::Low)
            .with_source_type_name("ci")
            .with_alert_type(AlertType::Success);
        let tags = Tags::from([("env", "prod")]);
        let line = EventLine {
            event: &event,
            tags: &tags,
        };
        assert_eq!(
            line.to_string(),
            "_e{6,4}:deploy|done|d:1700000000|h:host-1|k:deploys|p:low|s:ci|t:success|#env:prod"
        );
    }
}
