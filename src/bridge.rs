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

//! A bridge to convert records of the `log` crate.

use crate::record::Level;
use crate::record::Record;

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warn,
            log::Level::Info => Self::Info,
            log::Level::Debug => Self::Debug,
            log::Level::Trace => Self::Trace,
        }
    }
}

/// Converts a [`log::Record`] into a [`Record`] accepted by [`Sink::emit`](crate::Sink::emit).
///
/// The record target becomes the category, split on `::`. Key-values become JSON properties,
/// falling back to their string rendition when no primitive conversion applies. The timestamp is
/// taken at conversion time, as `log` records carry none.
///
/// # Examples
///
/// ```
/// use log::Level;
///
/// let record = datesink::bridge::record_from_log(
///     &log::Record::builder()
///         .level(Level::Info)
///         .target("app::server")
///         .args(format_args!("listening"))
///         .build(),
/// );
/// assert_eq!(record.category(), ["app", "server"]);
/// assert_eq!(record.message(), "listening");
/// ```
pub fn record_from_log(record: &log::Record<'_>) -> Record {
    let mut builder = Record::builder()
        .level(record.level().into())
        .message(record.args().to_string())
        .category(record.target().split("::"));

    struct KeyValueVisitor<'a> {
        kvs: &'a mut Vec<(String, serde_json::Value)>,
    }

    impl<'kvs> log::kv::VisitSource<'kvs> for KeyValueVisitor<'_> {
        fn visit_pair(
            &mut self,
            key: log::kv::Key<'kvs>,
            value: log::kv::Value<'kvs>,
        ) -> Result<(), log::kv::Error> {
            self.kvs.push((key.to_string(), json_value(&value)));
            Ok(())
        }
    }

    let mut kvs = Vec::new();
    let mut visitor = KeyValueVisitor { kvs: &mut kvs };
    // visiting plain key-value pairs never fails
    let _ = record.key_values().visit(&mut visitor);

    for (key, value) in kvs {
        builder = builder.property(key, value);
    }
    builder.build()
}

fn json_value(value: &log::kv::Value<'_>) -> serde_json::Value {
    if let Some(value) = value.to_bool() {
        return value.into();
    }
    if let Some(value) = value.to_i64() {
        return value.into();
    }
    if let Some(value) = value.to_u64() {
        return value.into();
    }
    if let Some(value) = value.to_f64() {
        return value.into();
    }
    if let Some(value) = value.to_borrowed_str() {
        return value.into();
    }
    value.to_string().into()
}
