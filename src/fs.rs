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

//! Filesystem access used by the sink to persist log content.

use std::fmt;
use std::fs;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;

/// The filesystem operations the sink needs to persist log content.
///
/// The default implementation is [`StdFileWriter`]. Supplying a custom implementation via
/// [`SinkBuilder::file_writer`](crate::SinkBuilder::file_writer) is mainly useful for tests and
/// for capturing output somewhere other than the local filesystem.
pub trait FileWriter: fmt::Debug + Send + 'static {
    /// Creates the directory and all of its missing parents.
    fn ensure_dir(&self, dir: &Path) -> io::Result<()>;

    /// Appends `bytes` to the file at `path`, creating the file if it does not exist.
    fn append(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

impl<T: FileWriter> From<T> for Box<dyn FileWriter> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

/// A [`FileWriter`] backed by the standard filesystem.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct StdFileWriter {}

impl FileWriter for StdFileWriter {
    fn ensure_dir(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)
    }

    fn append(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut file = OpenOptions::new().append(true).create(true).open(path)?;
        file.write_all(bytes)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::fs::FileWriter;
    use crate::fs::StdFileWriter;

    #[test]
    fn test_append_creates_and_extends_the_file() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");

        let writer = StdFileWriter::default();
        writer.append(&path, b"first\n").unwrap();
        writer.append(&path, b"second\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_ensure_dir_creates_missing_parents() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let dir = temp_dir.path().join("2025").join("01").join("19");

        let writer = StdFileWriter::default();
        writer.ensure_dir(&dir).unwrap();
        writer.ensure_dir(&dir).unwrap();

        assert!(dir.is_dir());
    }
}
