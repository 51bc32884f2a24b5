// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Spanish day-of-week names. Numbering follows 0 = Sunday.

const DAY_NAMES: [&str; 7] = [
    "Domingo",
    "Lunes",
    "Martes",
    "Miércoles",
    "Jueves",
    "Viernes",
    "Sábado",
];

/// Monday through Friday.
pub const WEEKDAYS: [u8; 5] = [1, 2, 3, 4, 5];

/// Days cleared by a deletion request that names none.
pub const DEFAULT_DELETE_DAYS: [u8; 4] = [2, 3, 4, 5];

/// Returns the Spanish name for `day` (0 = Sunday), or `None` when out of range.
pub fn day_name(day: u8) -> Option<&'static str> {
    DAY_NAMES.get(usize::from(day)).copied()
}

/// Joins day names as `"Lunes, Martes y Miércoles"`.
pub fn join_day_names(days: &[u8]) -> String {
    let names: Vec<&str> = days.iter().filter_map(|d| day_name(*d)).collect();
    match names.as_slice() {
        [] => String::new(),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{} y {}", init.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_cover_the_week() {
        assert_eq!(day_name(0), Some("Domingo"));
        assert_eq!(day_name(3), Some("Miércoles"));
        assert_eq!(day_name(6), Some("Sábado"));
        assert_eq!(day_name(7), None);
    }

    #[test]
    fn joins_with_spanish_conjunction() {
        assert_eq!(join_day_names(&[1]), "Lunes");
        assert_eq!(join_day_names(&[1, 2]), "Lunes y Martes");
        assert_eq!(join_day_names(&DEFAULT_DELETE_DAYS), "Martes, Miércoles, Jueves y Viernes");
        assert_eq!(join_day_names(&[]), "");
    }
}
