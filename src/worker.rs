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

use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;
use std::time::Instant;

use anyhow::Context;
use crossbeam_channel::Receiver;
use crossbeam_channel::RecvTimeoutError;
use crossbeam_channel::Sender;

use crate::fs::FileWriter;

#[derive(Debug)]
pub(crate) enum Message {
    Record { path: String, bytes: Vec<u8> },
    Flush { done: Sender<anyhow::Result<()>> },
}

/// Buffered content destined for a single file.
#[derive(Debug)]
struct Chunk {
    path: String,
    bytes: Vec<u8>,
}

pub(crate) struct Worker {
    receiver: Receiver<Message>,
    writer: Box<dyn FileWriter>,
    buffer_size: usize,
    flush_interval: Option<Duration>,

    // Chunks are kept per path so that a failed flush can never end up misfiling content:
    // whatever could not be written stays queued under its own path, ahead of newer content.
    pending: VecDeque<Chunk>,
    pending_bytes: usize,
    current_path: Option<String>,
    deadline: Option<Instant>,
}

impl Worker {
    pub(crate) fn new(
        receiver: Receiver<Message>,
        writer: Box<dyn FileWriter>,
        buffer_size: usize,
        flush_interval: Duration,
    ) -> Self {
        Self {
            receiver,
            writer,
            buffer_size,
            flush_interval: (!flush_interval.is_zero()).then_some(flush_interval),
            pending: VecDeque::new(),
            pending_bytes: 0,
            current_path: None,
            deadline: None,
        }
    }

    pub(crate) fn run(mut self) {
        loop {
            let message = match self.deadline {
                Some(deadline) => match self.receiver.recv_deadline(deadline) {
                    Ok(message) => message,
                    Err(RecvTimeoutError::Timeout) => {
                        self.on_timer();
                        continue;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                },
                None => match self.receiver.recv() {
                    Ok(message) => message,
                    Err(_) => break,
                },
            };

            match message {
                Message::Record { path, bytes } => self.ingest(path, bytes),
                Message::Flush { done } => {
                    let result = self.flush();
                    let _ = done.send(result);
                }
            }
        }

        // all senders are gone; write out whatever is left
        if let Err(err) = self.flush() {
            eprintln!("failed to flush remaining log content: {err:#}");
        }
    }

    fn ingest(&mut self, path: String, bytes: Vec<u8>) {
        match &self.current_path {
            Some(current) if *current != path => {
                // Content for the previous file must reach it before the new file is started.
                if let Err(err) = self.flush() {
                    eprintln!("failed to flush log content on rotation: {err:#}");
                }
                self.current_path = Some(path.clone());
            }
            None => self.current_path = Some(path.clone()),
            _ => {}
        }

        self.pending_bytes += bytes.len();
        match self.pending.back_mut() {
            Some(chunk) if chunk.path == path => chunk.bytes.extend_from_slice(&bytes),
            _ => self.pending.push_back(Chunk { path, bytes }),
        }

        if self.deadline.is_none() {
            self.arm_timer();
        }

        // A zero flush interval means write-through: flush after every record.
        if self.pending_bytes >= self.buffer_size || self.flush_interval.is_none() {
            if let Err(err) = self.flush() {
                eprintln!("failed to flush log content: {err:#}");
            }
        }
    }

    fn on_timer(&mut self) {
        if self.pending.is_empty() {
            // lapse until the next record arms the timer again
            self.deadline = None;
            return;
        }
        if let Err(err) = self.flush() {
            eprintln!("failed to flush log content: {err:#}");
        }
        self.arm_timer();
    }

    fn arm_timer(&mut self) {
        if let Some(interval) = self.flush_interval {
            self.deadline = Some(Instant::now() + interval);
        }
    }

    /// Writes out pending chunks front to back. On failure the failed chunk and everything
    /// behind it stay queued, to be retried by the next flush.
    fn flush(&mut self) -> anyhow::Result<()> {
        while let Some(chunk) = self.pending.front() {
            let path = Path::new(&chunk.path);
            if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                self.writer.ensure_dir(dir).with_context(|| {
                    format!("failed to create log directory: {}", dir.display())
                })?;
            }
            self.writer
                .append(path, &chunk.bytes)
                .with_context(|| format!("failed to append to log file: {}", path.display()))?;
            if let Some(chunk) = self.pending.pop_front() {
                self.pending_bytes -= chunk.bytes.len();
            }
        }
        Ok(())
    }
}
