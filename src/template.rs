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

//! Resolution of date-stamped file paths from templates.

use jiff::Timestamp;
use jiff::tz::TimeZone;

/// The date fields substituted into a path template.
///
/// [`year`](DateComponents::year) is the calendar year rendered as-is; every other field is a
/// zero-padded two-digit decimal string.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DateComponents {
    pub year: String,
    pub month: String,
    pub day: String,
    pub hour: String,
    pub minute: String,
    pub second: String,
    pub week: String,
}

impl DateComponents {
    /// Computes the date components of `timestamp` as wall-clock time in `tz`.
    ///
    /// If `tz` is `None`, the system timezone is used.
    pub fn new(timestamp: Timestamp, tz: Option<&TimeZone>) -> Self {
        let date = match tz {
            Some(tz) => timestamp.to_zoned(tz.clone()),
            None => timestamp.to_zoned(TimeZone::system()),
        };

        // Weeks are plain 7-day windows counted from January 1st, not ISO 8601 weeks.
        let week = (date.day_of_year() + 6) / 7;

        DateComponents {
            year: date.year().to_string(),
            month: format!("{:02}", date.month()),
            day: format!("{:02}", date.day()),
            hour: format!("{:02}", date.hour()),
            minute: format!("{:02}", date.minute()),
            second: format!("{:02}", date.second()),
            week: format!("{week:02}"),
        }
    }

    fn substitutions(&self) -> [(&'static str, &str); 7] {
        [
            ("<year>", &self.year),
            ("<month>", &self.month),
            ("<day>", &self.day),
            ("<hour>", &self.hour),
            ("<minute>", &self.minute),
            ("<second>", &self.second),
            ("<week>", &self.week),
        ]
    }
}

/// Resolves a path template against the given timestamp.
///
/// Every occurrence of `<year>`, `<month>`, `<day>`, `<hour>`, `<minute>`, `<second>`, and
/// `<week>` is replaced with the corresponding field of [`DateComponents`]. Unknown placeholders
/// are left untouched.
///
/// # Examples
///
/// ```
/// use datesink::template::resolve_path;
/// use jiff::tz::TimeZone;
///
/// let timestamp = "2025-01-19T14:30:45Z".parse().unwrap();
/// let path = resolve_path("logs/app-<year>-<month>-<day>.log", timestamp, Some(&TimeZone::UTC));
/// assert_eq!(path, "logs/app-2025-01-19.log");
/// ```
pub fn resolve_path(template: &str, timestamp: Timestamp, tz: Option<&TimeZone>) -> String {
    let components = DateComponents::new(timestamp, tz);
    let mut path = template.to_string();
    for (token, value) in components.substitutions() {
        if path.contains(token) {
            path = path.replace(token, value);
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use jiff::tz::TimeZone;

    use crate::template::DateComponents;
    use crate::template::resolve_path;

    fn ts(input: &str) -> Timestamp {
        input.parse().unwrap()
    }

    #[test]
    fn test_resolve_date_placeholders() {
        let path = resolve_path(
            "logs/app-<year>-<month>-<day>.log",
            ts("2025-01-19T14:30:45Z"),
            Some(&TimeZone::UTC),
        );
        assert_eq!(path, "logs/app-2025-01-19.log");
    }

    #[test]
    fn test_resolve_placeholders_in_directory_components() {
        let path = resolve_path(
            "logs/<year>/<month>/<day>/app-<hour>.log",
            ts("2025-01-19T14:30:45Z"),
            Some(&TimeZone::UTC),
        );
        assert_eq!(path, "logs/2025/01/19/app-14.log");
    }

    #[test]
    fn test_resolve_time_placeholders() {
        let path = resolve_path(
            "logs/<hour>-<minute>-<second>.log",
            ts("2025-01-19T07:05:09Z"),
            Some(&TimeZone::UTC),
        );
        assert_eq!(path, "logs/07-05-09.log");
    }

    #[test]
    fn test_week_is_a_seven_day_window_from_january_first() {
        // January 19 is day 19 of the year: ceil(19 / 7) == 3.
        let week = |input: &str| resolve_path("<week>", ts(input), Some(&TimeZone::UTC));
        assert_eq!(week("2025-01-19T14:30:45Z"), "03");
        assert_eq!(week("2025-01-01T00:00:00Z"), "01");
        assert_eq!(week("2025-01-07T23:59:59Z"), "01");
        assert_eq!(week("2025-01-08T00:00:00Z"), "02");
        assert_eq!(week("2025-12-31T23:59:59Z"), "53");
    }

    #[test]
    fn test_repeated_and_unknown_placeholders() {
        let path = resolve_path(
            "<year>/<year>-<month>/<unknown>.log",
            ts("2025-01-19T14:30:45Z"),
            Some(&TimeZone::UTC),
        );
        assert_eq!(path, "2025/2025-01/<unknown>.log");
    }

    #[test]
    fn test_template_without_placeholders_is_unchanged() {
        let path = resolve_path("logs/app.log", ts("2025-01-19T14:30:45Z"), Some(&TimeZone::UTC));
        assert_eq!(path, "logs/app.log");
    }

    #[test]
    fn test_resolve_in_alternate_timezone() {
        // 23:30 UTC on the 19th is already 08:30 on the 20th in Tokyo.
        let tz = TimeZone::get("Asia/Tokyo").unwrap();
        let path = resolve_path(
            "logs/app-<year>-<month>-<day>-<hour>.log",
            ts("2025-01-19T23:30:00Z"),
            Some(&tz),
        );
        assert_eq!(path, "logs/app-2025-01-20-08.log");
    }

    #[test]
    fn test_components_are_zero_padded() {
        let components = DateComponents::new(ts("2025-03-05T04:08:02Z"), Some(&TimeZone::UTC));
        assert_eq!(components.year, "2025");
        assert_eq!(components.month, "03");
        assert_eq!(components.day, "05");
        assert_eq!(components.hour, "04");
        assert_eq!(components.minute, "08");
        assert_eq!(components.second, "02");
        assert_eq!(components.week, "10");
    }
}
