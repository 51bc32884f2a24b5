// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time range and day-set extraction for schedule phrases.
//!
//! Times are normalized to 24-hour `HH:MM:SS`. Unspecified parts fall back to
//! a 09:00-17:00 Monday-to-Friday block.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::days::WEEKDAYS;

pub const DEFAULT_START_TIME: &str = "09:00:00";
pub const DEFAULT_END_TIME: &str = "17:00:00";

/// Time range and days requested by a schedule phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntities {
    pub start_time: String,
    pub end_time: String,
    /// Ascending, deduplicated, 0 = Sunday.
    pub days: Vec<u8>,
}

impl Default for ScheduleEntities {
    fn default() -> Self {
        Self {
            start_time: DEFAULT_START_TIME.to_string(),
            end_time: DEFAULT_END_TIME.to_string(),
            days: WEEKDAYS.to_vec(),
        }
    }
}

/// A named time-range pattern.
pub struct TimeRule {
    pub name: &'static str,
    regex: Regex,
    convert: fn(&Captures) -> Option<(String, String)>,
}

impl TimeRule {
    /// Applies this rule alone.
    pub fn extract(&self, text: &str) -> Option<(String, String)> {
        self.regex
            .captures_iter(text)
            .find_map(|caps| (self.convert)(&caps))
    }
}

/// A named day-set pattern.
pub struct DayRule {
    pub name: &'static str,
    regex: Regex,
    convert: fn(&str, &Regex) -> Option<Vec<u8>>,
}

impl DayRule {
    /// Applies this rule alone.
    pub fn extract(&self, text: &str) -> Option<Vec<u8>> {
        (self.convert)(text, &self.regex)
    }
}

const RANGE_SEP: &str = r"\s*(?:a|-|–|hasta)\s*";
const MERIDIEM: &str = r"(a\.?\s?m\.?|p\.?\s?m\.?)";

fn num(caps: &Captures, idx: usize) -> Option<u32> {
    caps.get(idx).and_then(|m| m.as_str().parse().ok())
}

fn minutes(caps: &Captures, idx: usize) -> Option<u32> {
    match caps.get(idx) {
        Some(m) => m.as_str().parse().ok().filter(|m| *m < 60),
        None => Some(0),
    }
}

fn is_pm(caps: &Captures, idx: usize) -> bool {
    caps.get(idx)
        .is_some_and(|m| m.as_str().to_lowercase().starts_with('p'))
}

/// 12-hour clock to 24-hour: 12 AM is 00, 12 PM is 12.
fn to_24h(hour: u32, pm: bool) -> Option<u32> {
    if !(1..=12).contains(&hour) {
        return None;
    }
    Some(match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    })
}

fn fmt_time(hour: u32, minute: u32) -> String {
    format!("{hour:02}:{minute:02}:00")
}

/// Converts a range written without AM/PM markers. An end hour that does not
/// follow the start on a 24-hour clock is read as afternoon (`de 9 a 5`).
fn plain_range(sh: u32, sm: u32, eh: u32, em: u32) -> Option<(String, String)> {
    if sh > 23 || eh > 23 {
        return None;
    }
    let eh = if eh <= sh && eh < 12 { eh + 12 } else { eh };
    Some((fmt_time(sh, sm), fmt_time(eh, em)))
}

/// Start hour's AM/PM when only the end carries one. `de 2 a 6pm` is all
/// afternoon, `de 11 a 2pm` starts in the morning.
fn inherit_pm(start: u32, end: u32, end_pm: bool) -> bool {
    if !end_pm {
        return false;
    }
    match (start, end) {
        (12, _) => true,
        (_, 12) => false,
        (s, e) => s <= e,
    }
}

fn convert_meridiem(caps: &Captures) -> Option<(String, String)> {
    let start_hour = num(caps, 1)?;
    let end_hour = num(caps, 4)?;
    let end_pm = is_pm(caps, 6);
    let start_pm = match caps.get(3) {
        Some(_) => is_pm(caps, 3),
        None => inherit_pm(start_hour, end_hour, end_pm),
    };
    let start = to_24h(start_hour, start_pm)?;
    let end = to_24h(end_hour, end_pm)?;
    Some((
        fmt_time(start, minutes(caps, 2)?),
        fmt_time(end, minutes(caps, 5)?),
    ))
}

fn convert_from_to(caps: &Captures) -> Option<(String, String)> {
    plain_range(
        num(caps, 1)?,
        minutes(caps, 2)?,
        num(caps, 3)?,
        minutes(caps, 4)?,
    )
}

fn convert_clock_range(caps: &Captures) -> Option<(String, String)> {
    plain_range(
        num(caps, 1)?,
        minutes(caps, 2)?,
        num(caps, 3)?,
        minutes(caps, 4)?,
    )
}

fn convert_bare_range(caps: &Captures) -> Option<(String, String)> {
    plain_range(num(caps, 1)?, 0, num(caps, 2)?, 0)
}

static TIME_RULES: LazyLock<Vec<TimeRule>> = LazyLock::new(|| {
    vec![
        TimeRule {
            name: "meridiem",
            regex: Regex::new(&format!(
                r"(?i)\b(\d{{1,2}})(?::(\d{{2}}))?\s*(?:{MERIDIEM})?{RANGE_SEP}(?:las\s+)?(\d{{1,2}})(?::(\d{{2}}))?\s*{MERIDIEM}"
            ))
            .unwrap(),
            convert: convert_meridiem,
        },
        TimeRule {
            name: "from_to",
            regex: Regex::new(
                r"(?i)\bde(?:sde)?\s+(?:las\s+)?(\d{1,2})(?::(\d{2}))?\s+(?:a|hasta)\s+(?:las\s+)?(\d{1,2})(?::(\d{2}))?\b",
            )
            .unwrap(),
            convert: convert_from_to,
        },
        TimeRule {
            name: "clock_range",
            regex: Regex::new(&format!(
                r"(?i)\b(\d{{1,2}}):(\d{{2}}){RANGE_SEP}(\d{{1,2}}):(\d{{2}})\b"
            ))
            .unwrap(),
            convert: convert_clock_range,
        },
        TimeRule {
            name: "bare_range",
            regex: Regex::new(r"(?i)\b(\d{1,2})\s*(?:a|-|hasta)\s*(\d{1,2})\b").unwrap(),
            convert: convert_bare_range,
        },
    ]
});

fn every_day(text: &str, re: &Regex) -> Option<Vec<u8>> {
    re.is_match(text).then(|| (0..=6).collect())
}

fn weekend(text: &str, re: &Regex) -> Option<Vec<u8>> {
    re.is_match(text).then(|| vec![0, 6])
}

const DAY_NAME: &str = r"domingos?|lunes|martes|mi[ée]rcoles|jueves|viernes|s[áa]bados?";

static DAY_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)\b({DAY_NAME})\b")).unwrap());

/// Inclusive spans such as `de lunes a viernes`, wrapping past Saturday.
/// Day names outside any span are added as single days.
fn day_spans(text: &str, re: &Regex) -> Option<Vec<u8>> {
    let mut days = Vec::new();
    let mut rest = String::with_capacity(text.len());
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let (Some(whole), Some(from), Some(to)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let (Some(mut day), Some(end)) = (
            day_number(&from.as_str().to_lowercase()),
            day_number(&to.as_str().to_lowercase()),
        ) else {
            continue;
        };
        days.push(day);
        while day != end {
            day = (day + 1) % 7;
            days.push(day);
        }
        rest.push_str(&text[last..whole.start()]);
        last = whole.end();
    }
    if days.is_empty() {
        return None;
    }
    rest.push_str(&text[last..]);
    days.extend(named_days(&rest, &DAY_NAME_RE).unwrap_or_default());
    days.sort_unstable();
    days.dedup();
    Some(days)
}

fn named_days(text: &str, re: &Regex) -> Option<Vec<u8>> {
    let mut days: Vec<u8> = re
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| day_number(&m.as_str().to_lowercase()))
        .collect();
    days.sort_unstable();
    days.dedup();
    (!days.is_empty()).then_some(days)
}

fn day_number(name: &str) -> Option<u8> {
    match name {
        "domingo" | "domingos" => Some(0),
        "lunes" => Some(1),
        "martes" => Some(2),
        "miércoles" | "miercoles" => Some(3),
        "jueves" => Some(4),
        "viernes" => Some(5),
        "sábado" | "sabado" | "sábados" | "sabados" => Some(6),
        _ => None,
    }
}

static DAY_RULES: LazyLock<Vec<DayRule>> = LazyLock::new(|| {
    vec![
        DayRule {
            name: "every_day",
            regex: Regex::new(r"(?i)\btodos\s+los\s+d[ií]as\b|\bcada\s+d[ií]a\b|\bdiario\b").unwrap(),
            convert: every_day,
        },
        DayRule {
            name: "weekend",
            regex: Regex::new(r"(?i)\bfin(?:es)?\s+de\s+semana\b").unwrap(),
            convert: weekend,
        },
        DayRule {
            name: "day_range",
            regex: Regex::new(&format!(
                r"(?i)\b({DAY_NAME})\s+(?:a|al|hasta)\s+(?:el\s+)?({DAY_NAME})\b"
            ))
            .unwrap(),
            convert: day_spans,
        },
        DayRule {
            name: "day_names",
            regex: DAY_NAME_RE.clone(),
            convert: named_days,
        },
    ]
});

/// Looks up a time rule by name.
pub fn time_rule(name: &str) -> Option<&'static TimeRule> {
    TIME_RULES.iter().find(|r| r.name == name)
}

/// Looks up a day rule by name.
pub fn day_rule(name: &str) -> Option<&'static DayRule> {
    DAY_RULES.iter().find(|r| r.name == name)
}

/// First time range any rule finds, as `(start, end)`.
pub fn extract_time_range(message: &str) -> Option<(String, String)> {
    TIME_RULES.iter().find_map(|rule| rule.extract(message))
}

/// Days the message names explicitly, or `None` when it names none.
pub fn extract_days(message: &str) -> Option<Vec<u8>> {
    DAY_RULES.iter().find_map(|rule| rule.extract(message))
}

/// Extracts a full schedule request, filling defaults for missing parts.
pub fn extract_schedule(message: &str) -> ScheduleEntities {
    let defaults = ScheduleEntities::default();
    let (start_time, end_time) = extract_time_range(message)
        .unwrap_or((defaults.start_time, defaults.end_time));
    let days = extract_days(message).unwrap_or(defaults.days);
    ScheduleEntities {
        start_time,
        end_time,
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn range(s: &str, e: &str) -> Option<(String, String)> {
        Some((s.to_string(), e.to_string()))
    }

    #[test]
    fn meridiem_hours() {
        let rule = time_rule("meridiem").unwrap();
        assert_eq!(rule.extract("9am a 5pm"), range("09:00:00", "17:00:00"));
        assert_eq!(rule.extract("12am a 12pm"), range("00:00:00", "12:00:00"));
        assert_eq!(rule.extract("de 8 a.m. hasta 2 p.m."), range("08:00:00", "14:00:00"));
        assert_eq!(rule.extract("13pm a 5pm"), None);
    }

    #[test]
    fn meridiem_clock() {
        let rule = time_rule("meridiem").unwrap();
        assert_eq!(rule.extract("8:30am - 4:45pm"), range("08:30:00", "16:45:00"));
        assert_eq!(rule.extract("12:15am a 12:30pm"), range("00:15:00", "12:30:00"));
        assert_eq!(rule.extract("8:75am a 4:00pm"), None);
    }

    #[test]
    fn start_inherits_the_end_meridiem() {
        let rule = time_rule("meridiem").unwrap();
        assert_eq!(rule.extract("de 2 a 6pm"), range("14:00:00", "18:00:00"));
        assert_eq!(rule.extract("de 11 a 2pm"), range("11:00:00", "14:00:00"));
        assert_eq!(rule.extract("de 12 a 3pm"), range("12:00:00", "15:00:00"));
        assert_eq!(rule.extract("de 10 a 12pm"), range("10:00:00", "12:00:00"));
        assert_eq!(rule.extract("7 a 11am"), range("07:00:00", "11:00:00"));
        assert_eq!(rule.extract("de 2 a las 6 p.m."), range("14:00:00", "18:00:00"));
    }

    #[test]
    fn hours_and_clock_times_mix() {
        let rule = time_rule("meridiem").unwrap();
        assert_eq!(rule.extract("9am a 5:30pm"), range("09:00:00", "17:30:00"));
        assert_eq!(rule.extract("8:15am - 4pm"), range("08:15:00", "16:00:00"));
        assert_eq!(rule.extract("de 1:30 a 4pm"), range("13:30:00", "16:00:00"));
    }

    #[test]
    fn one_sided_meridiem_beats_defaults() {
        let s = extract_schedule("crear horario de 2 a 6pm");
        assert_eq!((s.start_time.as_str(), s.end_time.as_str()), ("14:00:00", "18:00:00"));
        let s = extract_schedule("crear horario 9am a 5:30pm");
        assert_eq!((s.start_time.as_str(), s.end_time.as_str()), ("09:00:00", "17:30:00"));
    }

    #[test]
    fn from_to_phrase() {
        let rule = time_rule("from_to").unwrap();
        assert_eq!(rule.extract("de 9 a 17"), range("09:00:00", "17:00:00"));
        assert_eq!(rule.extract("de 9 a 5"), range("09:00:00", "17:00:00"));
        assert_eq!(rule.extract("desde las 7:30 hasta las 15"), range("07:30:00", "15:00:00"));
    }

    #[test]
    fn clock_range_24h() {
        let rule = time_rule("clock_range").unwrap();
        assert_eq!(rule.extract("08:00 a 16:30"), range("08:00:00", "16:30:00"));
        assert_eq!(rule.extract("25:00 a 16:30"), None);
    }

    #[test]
    fn bare_numbers() {
        let rule = time_rule("bare_range").unwrap();
        assert_eq!(rule.extract("horario 10 a 18"), range("10:00:00", "18:00:00"));
        assert_eq!(rule.extract("8-4"), range("08:00:00", "16:00:00"));
    }

    #[test]
    fn chain_prefers_meridiem_over_plain() {
        // "de 9am a 5pm" also fits the plain `de X a Y` shape only if the
        // meridiem rule did not run first.
        assert_eq!(
            extract_time_range("crear horario de 9am a 5pm"),
            range("09:00:00", "17:00:00")
        );
        assert_eq!(
            extract_time_range("9:00am a 1:30pm"),
            range("09:00:00", "13:30:00")
        );
    }

    #[test]
    fn schedule_defaults() {
        let s = extract_schedule("crear horario");
        assert_eq!(s, ScheduleEntities::default());
        assert_eq!(s.days, vec![1, 2, 3, 4, 5]);
        assert_eq!(s.start_time, "09:00:00");
        assert_eq!(s.end_time, "17:00:00");
    }

    #[test]
    fn day_rules_individually() {
        assert_eq!(
            day_rule("every_day").unwrap().extract("todos los días"),
            Some(vec![0, 1, 2, 3, 4, 5, 6])
        );
        assert_eq!(
            day_rule("every_day").unwrap().extract("todos los dias"),
            Some(vec![0, 1, 2, 3, 4, 5, 6])
        );
        assert_eq!(
            day_rule("weekend").unwrap().extract("el fin de semana"),
            Some(vec![0, 6])
        );
        assert_eq!(
            day_rule("day_names").unwrap().extract("lunes, Miércoles y miercoles"),
            Some(vec![1, 3])
        );
        assert_eq!(day_rule("day_names").unwrap().extract("mañana"), None);
    }

    #[test]
    fn day_ranges_are_inclusive() {
        let rule = day_rule("day_range").unwrap();
        assert_eq!(rule.extract("de lunes a viernes"), Some(vec![1, 2, 3, 4, 5]));
        assert_eq!(rule.extract("martes hasta el jueves"), Some(vec![2, 3, 4]));
        assert_eq!(rule.extract("de viernes a lunes"), Some(vec![0, 1, 5, 6]));
        assert_eq!(rule.extract("de lunes a miércoles y el sábado"), Some(vec![1, 2, 3, 6]));
        assert_eq!(rule.extract("lunes y viernes"), None);
    }

    #[test]
    fn range_outranks_single_names() {
        assert_eq!(
            extract_days("crear horario de 9 a 5 de lunes a viernes"),
            Some(vec![1, 2, 3, 4, 5])
        );
        assert_eq!(extract_days("el lunes y el viernes"), Some(vec![1, 5]));
        let s = extract_schedule("crear horario de 9 a 5 de lunes a viernes");
        assert_eq!((s.start_time.as_str(), s.end_time.as_str()), ("09:00:00", "17:00:00"));
    }

    #[test]
    fn every_day_outranks_names() {
        assert_eq!(
            extract_days("todos los días menos el lunes"),
            Some(vec![0, 1, 2, 3, 4, 5, 6])
        );
        assert_eq!(extract_days("fin de semana y viernes"), Some(vec![0, 6]));
    }

    #[test]
    fn full_schedule_request() {
        let s = extract_schedule("crear horario sábado y domingo de 10am a 2pm");
        assert_eq!(s.days, vec![0, 6]);
        assert_eq!(s.start_time, "10:00:00");
        assert_eq!(s.end_time, "14:00:00");
    }

    proptest! {
        #[test]
        fn every_day_keyword_maps_to_one_day(
            name in "(domingo|lunes|martes|miércoles|miercoles|jueves|viernes|sábado|sabado)"
        ) {
            let days = extract_days(&format!("el {name}")).unwrap();
            prop_assert_eq!(days.len(), 1);
            prop_assert!(days[0] <= 6);
        }

        #[test]
        fn extraction_is_total_and_stable(s in ".*") {
            let first = extract_schedule(&s);
            let second = extract_schedule(&s);
            prop_assert!(first.days.iter().all(|d| *d <= 6));
            prop_assert!(!first.days.is_empty());
            prop_assert_eq!(first, second);
        }
    }
}
