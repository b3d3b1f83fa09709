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

use std::fmt::Debug;
use std::fmt::Formatter;

use crate::layout::Layout;
use crate::record::Record;

type FormatFunction = dyn Fn(&Record) -> anyhow::Result<Vec<u8>> + Send + Sync + 'static;

/// A layout backed by a custom format function.
///
/// The format function accepts a [`&Record`][Record] and returns the bytes appended to
/// the log file, including any trailing record separator. For example:
///
/// ```
/// use datesink::Record;
/// use datesink::layout::CustomLayout;
///
/// let layout = CustomLayout::new(|record: &Record| {
///     Ok(format!("{} - {}\n", record.level(), record.message()).into_bytes())
/// });
/// ```
pub struct CustomLayout {
    f: Box<FormatFunction>,
}

impl Debug for CustomLayout {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "CustomLayout {{ ... }}")
    }
}

impl CustomLayout {
    /// Creates a new `CustomLayout` with the given format function.
    pub fn new(
        layout: impl Fn(&Record) -> anyhow::Result<Vec<u8>> + Send + Sync + 'static,
    ) -> Self {
        CustomLayout {
            f: Box::new(layout),
        }
    }
}

impl Layout for CustomLayout {
    fn format(&self, record: &Record) -> anyhow::Result<Vec<u8>> {
        (self.f)(record)
    }
}
