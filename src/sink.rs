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

use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Context;
use crossbeam_channel::Sender;
use jiff::tz::TimeZone;

use crate::fs::FileWriter;
use crate::fs::StdFileWriter;
use crate::layout::Layout;
use crate::layout::TextLayout;
use crate::record::Record;
use crate::template;
use crate::worker::Message;
use crate::worker::Worker;

const DEFAULT_BUFFER_SIZE: usize = 8192;
const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_THREAD_NAME: &str = "datesink-worker";

/// A buffered file sink that routes each log record to a date-stamped file.
///
/// The file path is resolved from a template such as `"logs/app-<year>-<month>-<day>.log"`
/// against the record timestamp. Formatted records are handed to a background worker thread that
/// buffers, rotates, and appends to files, so [`emit`](Sink::emit) never blocks on file I/O.
///
/// Dropping the sink (or calling [`close`](Sink::close)) flushes all remaining content and joins
/// the worker thread.
///
/// # Examples
///
/// ```no_run
/// use datesink::Record;
/// use datesink::Sink;
///
/// let sink = Sink::builder("logs/app-<year>-<month>-<day>.log").build()?;
/// sink.emit(&Record::builder().message("Hello datesink!").build())?;
/// sink.close();
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct Sink {
    template: String,
    tz: Option<TimeZone>,
    layout: Box<dyn Layout>,
    state: SinkState,
}

impl Sink {
    /// Creates a new [`SinkBuilder`] for the given path template.
    ///
    /// The template may contain the `<year>`, `<month>`, `<day>`, `<hour>`, `<minute>`,
    /// `<second>`, and `<week>` placeholders; see
    /// [`template::resolve_path`](crate::template::resolve_path).
    #[must_use]
    pub fn builder(template: impl Into<String>) -> SinkBuilder {
        SinkBuilder::new(template)
    }

    /// Formats a record and enqueues it for the worker thread.
    ///
    /// The file path is resolved from the record timestamp, so records crossing a date boundary
    /// rotate the sink onto a new file.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout fails or if the worker thread has stopped.
    pub fn emit(&self, record: &Record) -> anyhow::Result<()> {
        let path = template::resolve_path(&self.template, record.timestamp(), self.tz.as_ref());
        let bytes = self.layout.format(record)?;
        self.state.send(Message::Record { path, bytes })
    }

    /// Flushes all buffered content and waits until it reached the file writer.
    ///
    /// # Errors
    ///
    /// Returns an error if a write fails. The unwritten content stays buffered and is retried on
    /// the next flush.
    pub fn flush(&self) -> anyhow::Result<()> {
        let (done, wait) = crossbeam_channel::bounded(1);
        self.state.send(Message::Flush { done })?;
        wait.recv().context("sink worker dropped the flush request")?
    }

    /// Closes the sink, flushing all remaining content.
    ///
    /// This is the same as dropping the sink, made explicit.
    pub fn close(self) {}
}

#[derive(Debug)]
struct SinkState(Option<State>);

#[derive(Debug)]
struct State {
    sender: Sender<Message>,
    handle: JoinHandle<()>,
}

impl SinkState {
    fn new(sender: Sender<Message>, handle: JoinHandle<()>) -> Self {
        Self(Some(State { sender, handle }))
    }

    fn send(&self, message: Message) -> anyhow::Result<()> {
        // SAFETY: state is always Some before dropped.
        let State { sender, handle: _ } = self.0.as_ref().unwrap();
        sender.send(message).context("failed to send log message")
    }
}

impl Drop for SinkState {
    fn drop(&mut self) {
        // SAFETY: state is always Some before dropped.
        let State { sender, handle } = self.0.take().unwrap();

        // drop our sender; the worker flushes what is left and breaks its loop
        drop(sender);

        // wait for the worker to finish
        handle.join().expect("failed to join sink worker thread");
    }
}

/// A builder for configuring a [`Sink`].
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
///
/// use datesink::Sink;
///
/// let sink = Sink::builder("logs/app-<year>-<week>.log")
///     .buffer_size(16 * 1024)
///     .flush_interval(Duration::from_secs(1))
///     .timezone("Asia/Tokyo")
///     .build()?;
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct SinkBuilder {
    template: String,
    layout: Box<dyn Layout>,
    buffer_size: usize,
    flush_interval: Duration,
    timezone: Option<String>,
    file_writer: Box<dyn FileWriter>,
    thread_name: String,
}

impl SinkBuilder {
    fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            layout: Box::new(TextLayout::default()),
            buffer_size: DEFAULT_BUFFER_SIZE,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            timezone: None,
            file_writer: Box::new(StdFileWriter::default()),
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }

    /// Sets the layout that formats records into bytes.
    ///
    /// Defaults to [`TextLayout`].
    pub fn layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Sets the buffer size in bytes.
    ///
    /// A flush is triggered whenever at least this much content is buffered. Zero makes the sink
    /// flush after every record. Defaults to 8192.
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Sets the interval of the periodic background flush.
    ///
    /// [`Duration::ZERO`] disables the periodic flush and makes the sink flush after every record
    /// instead. Defaults to 5 seconds.
    pub fn flush_interval(mut self, flush_interval: Duration) -> Self {
        self.flush_interval = flush_interval;
        self
    }

    /// Sets the timezone in which path templates are resolved, by IANA name.
    ///
    /// An empty name keeps the default. Unknown names make [`build`](SinkBuilder::build) fail.
    /// Defaults to the system timezone.
    pub fn timezone(mut self, timezone: impl Into<String>) -> Self {
        let timezone = timezone.into();
        self.timezone = if timezone.is_empty() {
            None
        } else {
            Some(timezone)
        };
        self
    }

    /// Sets the file writer that persists log content.
    ///
    /// Defaults to [`StdFileWriter`].
    pub fn file_writer(mut self, file_writer: impl Into<Box<dyn FileWriter>>) -> Self {
        self.file_writer = file_writer.into();
        self
    }

    /// Sets the name of the background worker thread.
    pub fn thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }

    /// Builds the [`Sink`], spawning its worker thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured timezone is unknown or if the worker thread cannot be
    /// spawned.
    pub fn build(self) -> anyhow::Result<Sink> {
        let tz = match &self.timezone {
            Some(name) => {
                let tz = TimeZone::get(name).with_context(|| format!("unknown timezone: {name}"))?;
                Some(tz)
            }
            None => None,
        };

        let (sender, receiver) = crossbeam_channel::unbounded();
        let worker = Worker::new(receiver, self.file_writer, self.buffer_size, self.flush_interval);
        let handle = thread::Builder::new()
            .name(self.thread_name)
            .spawn(move || worker.run())
            .context("failed to spawn sink worker thread")?;

        Ok(Sink {
            template: self.template,
            tz,
            layout: self.layout,
            state: SinkState::new(sender, handle),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::Sink;

    #[test]
    fn test_unknown_timezone_is_rejected() {
        let err = Sink::builder("app.log")
            .timezone("Not/AZone")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("unknown timezone: Not/AZone"));
    }

    #[test]
    fn test_empty_timezone_keeps_the_default() {
        // no records are emitted, so nothing is ever written
        let sink = Sink::builder("app.log").timezone("").build().unwrap();
        sink.close();
    }
}
