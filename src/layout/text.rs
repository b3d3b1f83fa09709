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

use crate::layout::Layout;
use crate::record::Record;

/// A layout that formats log records as plain text.
///
/// Output format:
///
/// ```text
/// 2025-01-19T14:30:45.123Z [ERROR] Hello error!
/// 2025-01-19T14:30:45.124Z [WARN] Hello warn!
/// 2025-01-19T14:30:45.125Z [INFO] Hello info!
/// ```
///
/// Timestamps are rendered in UTC with millisecond precision. Message parts are joined with a
/// single space. Each record ends with a newline.
///
/// # Examples
///
/// ```
/// use datesink::layout::TextLayout;
///
/// let layout = TextLayout::default();
/// ```
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct TextLayout {}

impl Layout for TextLayout {
    fn format(&self, record: &Record) -> anyhow::Result<Vec<u8>> {
        let time = record.timestamp();
        let level = record.level();
        let message = record.message();
        Ok(format!("{time:.3} [{level}] {message}\n").into_bytes())
    }
}
