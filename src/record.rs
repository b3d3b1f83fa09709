// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Log record and severity level.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use jiff::Timestamp;

/// The verbosity level of a log record.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// The uppercase name of the level.
    pub fn name(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The payload of a log record.
#[derive(Clone, Debug)]
pub struct Record {
    // the time at which the record was created
    timestamp: Timestamp,

    // the metadata
    level: Level,
    category: Vec<String>,

    // the payload
    message: Vec<String>,

    // structural logging
    properties: BTreeMap<String, serde_json::Value>,
}

impl Record {
    /// Returns a new builder.
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    /// The time at which the record was created.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// The verbosity level of the record.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The category of the logger that emitted the record.
    pub fn category(&self) -> &[String] {
        &self.category
    }

    /// The parts of the message body.
    pub fn message_parts(&self) -> &[String] {
        &self.message
    }

    /// The message body, with parts joined by a single space.
    pub fn message(&self) -> Cow<'_, str> {
        match self.message.as_slice() {
            [part] => Cow::Borrowed(part),
            parts => Cow::Owned(parts.join(" ")),
        }
    }

    /// The structured properties attached to the record.
    pub fn properties(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.properties
    }
}

/// Builder for [`Record`].
#[derive(Debug)]
pub struct RecordBuilder {
    record: Record,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        RecordBuilder {
            record: Record {
                timestamp: Timestamp::now(),
                level: Level::Info,
                category: Vec::new(),
                message: Vec::new(),
                properties: BTreeMap::new(),
            },
        }
    }
}

impl RecordBuilder {
    /// Set [`timestamp`](Record::timestamp).
    pub fn timestamp(mut self, timestamp: Timestamp) -> Self {
        self.record.timestamp = timestamp;
        self
    }

    /// Set [`timestamp`](Record::timestamp) from milliseconds since the Unix epoch.
    ///
    /// Out-of-range inputs are clamped to the representable range.
    pub fn timestamp_millis(mut self, millis: i64) -> Self {
        self.record.timestamp = Timestamp::from_millisecond(millis).unwrap_or(if millis < 0 {
            Timestamp::MIN
        } else {
            Timestamp::MAX
        });
        self
    }

    /// Set [`level`](Record::level).
    pub fn level(mut self, level: Level) -> Self {
        self.record.level = level;
        self
    }

    /// Set [`category`](Record::category).
    pub fn category<I>(mut self, category: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.record.category = category.into_iter().map(Into::into).collect();
        self
    }

    /// Set [`message`](Record::message) to a single part.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.record.message = vec![message.into()];
        self
    }

    /// Set [`message_parts`](Record::message_parts).
    pub fn message_parts<I>(mut self, parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.record.message = parts.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a structured property.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.record.properties.insert(key.into(), value.into());
        self
    }

    /// Invoke the builder and return a `Record`.
    pub fn build(self) -> Record {
        self.record
    }
}
