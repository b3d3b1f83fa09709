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

//! datesink is a buffered, date-rotating file sink for log records: each record is routed to a
//! file whose path is derived from the record timestamp, so log files partition themselves by
//! date.
//!
//! # Overview
//!
//! A [`Sink`] is created from a path template such as `"logs/app-<year>-<month>-<day>.log"`.
//! Emitting a record resolves the placeholders against the record timestamp and appends the
//! formatted record to the resulting file. When the resolved path changes between records, the
//! buffered content is flushed to the previous file first, then the sink starts the new one.
//!
//! Records are buffered in a background worker thread and written out when the buffered content
//! exceeds a size threshold, when the periodic flush interval elapses, on explicit
//! [`Sink::flush`], and on close.
//!
//! # Examples
//!
//! ```no_run
//! use datesink::Level;
//! use datesink::Record;
//! use datesink::Sink;
//!
//! let sink = Sink::builder("logs/app-<year>-<month>-<day>.log").build()?;
//!
//! sink.emit(
//!     &Record::builder()
//!         .level(Level::Info)
//!         .category(["app", "server"])
//!         .message("Hello datesink!")
//!         .build(),
//! )?;
//!
//! sink.flush()?;
//! sink.close();
//! # Ok::<(), anyhow::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod bridge;
pub mod fs;
pub mod layout;
pub mod template;

pub use fs::FileWriter;
pub use layout::Layout;

mod record;
pub use record::*;

mod sink;
pub use sink::*;

mod worker;
