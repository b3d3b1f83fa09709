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

use std::fs;
use std::path::Path;
use std::time::Duration;

use datesink::Record;
use datesink::Sink;
use datesink::layout::CustomLayout;
use jiff::Timestamp;
use rand::Rng;
use rand::distr::Alphanumeric;
use tempfile::TempDir;

fn ts(input: &str) -> Timestamp {
    input.parse().unwrap()
}

fn message_only_layout() -> CustomLayout {
    CustomLayout::new(|record: &Record| Ok(format!("{}\n", record.message()).into_bytes()))
}

fn sink_for(temp_dir: &TempDir, template: &str) -> Sink {
    Sink::builder(temp_dir.path().join(template).display().to_string())
        .layout(message_only_layout())
        .timezone("UTC")
        .build()
        .unwrap()
}

#[test]
fn test_records_cross_the_date_boundary_into_separate_files() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let sink = sink_for(&temp_dir, "app-<year>-<month>-<day>.log");

    let record = |time: &str, message: &str| {
        Record::builder().timestamp(ts(time)).message(message).build()
    };
    sink.emit(&record("2025-01-19T23:59:59Z", "late")).unwrap();
    sink.emit(&record("2025-01-20T00:00:01Z", "early")).unwrap();
    sink.close();

    let old_day = fs::read_to_string(temp_dir.path().join("app-2025-01-19.log")).unwrap();
    let new_day = fs::read_to_string(temp_dir.path().join("app-2025-01-20.log")).unwrap();
    assert_eq!(old_day, "late\n");
    assert_eq!(new_day, "early\n");
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 2);
}

#[test]
fn test_rotation_back_to_a_previous_file_appends() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let sink = sink_for(&temp_dir, "app-<year>-<month>-<day>.log");

    let record = |time: &str, message: &str| {
        Record::builder().timestamp(ts(time)).message(message).build()
    };
    sink.emit(&record("2025-01-19T10:00:00Z", "one")).unwrap();
    sink.emit(&record("2025-01-20T10:00:00Z", "two")).unwrap();
    sink.emit(&record("2025-01-19T11:00:00Z", "three")).unwrap();
    sink.close();

    let old_day = fs::read_to_string(temp_dir.path().join("app-2025-01-19.log")).unwrap();
    let new_day = fs::read_to_string(temp_dir.path().join("app-2025-01-20.log")).unwrap();
    assert_eq!(old_day, "one\nthree\n");
    assert_eq!(new_day, "two\n");
}

#[test]
fn test_nested_directories_are_created_on_demand() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let sink = sink_for(&temp_dir, "<year>/<month>/<day>/app.log");

    sink.emit(
        &Record::builder()
            .timestamp(ts("2025-01-19T14:30:45Z"))
            .message("nested")
            .build(),
    )
    .unwrap();
    sink.close();

    let path: &Path = &temp_dir.path().join("2025").join("01").join("19").join("app.log");
    assert_eq!(fs::read_to_string(path).unwrap(), "nested\n");
}

#[test]
fn test_random_payloads_keep_order_within_a_file() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    // a small buffer so that threshold flushes interleave with the final close flush
    let sink = Sink::builder(temp_dir.path().join("app-<year>.log").display().to_string())
        .layout(message_only_layout())
        .timezone("UTC")
        .buffer_size(256)
        .flush_interval(Duration::from_secs(3600))
        .build()
        .unwrap();

    let mut expected = String::new();
    for i in 0..200 {
        let line = format!("{i:03} {}", generate_random_string());
        expected.push_str(&line);
        expected.push('\n');
        sink.emit(
            &Record::builder()
                .timestamp(ts("2025-01-19T14:30:45Z"))
                .message(line)
                .build(),
        )
        .unwrap();
    }
    sink.close();

    let content = fs::read_to_string(temp_dir.path().join("app-2025.log")).unwrap();
    assert_eq!(content, expected);
}

fn generate_random_string() -> String {
    let mut rng = rand::rng();
    let len = rng.random_range(5..=40);
    std::iter::repeat(())
        .map(|()| rng.sample(Alphanumeric))
        .map(char::from)
        .take(len)
        .collect()
}
