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

use jiff::TimestampDisplayWithOffset;
use jiff::tz::TimeZone;
use serde::Serialize;
use serde_json::Map;

use crate::layout::Layout;
use crate::record::Record;

/// A layout that formats log records as single-line JSON objects.
///
/// Output format:
///
/// ```json
/// {"timestamp":"2025-01-19T14:30:45.123+00:00","level":"INFO","category":["app","server"],"message":"Hello!","properties":{"user":"alice"}}
/// ```
///
/// Timestamps are rendered with millisecond precision, in UTC unless a timezone is set with
/// [`timezone`](JsonLayout::timezone). Empty properties are omitted. Each record ends with a
/// newline.
///
/// # Examples
///
/// ```
/// use datesink::layout::JsonLayout;
///
/// let layout = JsonLayout::default();
/// ```
#[derive(Default, Debug, Clone)]
pub struct JsonLayout {
    tz: Option<TimeZone>,
}

impl JsonLayout {
    /// Set the timezone for timestamps.
    ///
    /// # Examples
    ///
    /// ```
    /// use datesink::layout::JsonLayout;
    /// use jiff::tz::TimeZone;
    ///
    /// let layout = JsonLayout::default().timezone(TimeZone::system());
    /// ```
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
struct RecordLine<'a> {
    #[serde(serialize_with = "serialize_timestamp")]
    timestamp: TimestampDisplayWithOffset,
    level: &'a str,
    category: &'a [String],
    message: &'a str,
    #[serde(skip_serializing_if = "Map::is_empty")]
    properties: Map<String, serde_json::Value>,
}

fn serialize_timestamp<S>(
    timestamp: &TimestampDisplayWithOffset,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&format_args!("{timestamp:.3}"))
}

impl Layout for JsonLayout {
    fn format(&self, record: &Record) -> anyhow::Result<Vec<u8>> {
        let tz = self.tz.clone().unwrap_or(TimeZone::UTC);
        let offset = tz.to_offset(record.timestamp());
        let timestamp = record.timestamp().display_with_offset(offset);

        let properties = record
            .properties()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect::<Map<String, serde_json::Value>>();

        let message = record.message();
        let line = RecordLine {
            timestamp,
            level: record.level().name(),
            category: record.category(),
            message: &message,
            properties,
        };

        let mut bytes = serde_json::to_vec(&line)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}
