//! Render order for each data kind.
//!
//! | Kind | Rule |
//! |------|------|
//! | Experience | year descending, then id descending; entries without id keep fixture order and follow those with one |
//! | Experience groups | one group per year, descending; entries keep the order above |
//! | Academic | startYear descending; unparseable years last |
//! | Skills | fixture order |
//!
//! All sorts are stable, so equal keys keep fixture order.

use crate::types::{AcademicEntry, ExperienceEntry};
use std::cmp::Reverse;
use std::collections::BTreeMap;

pub fn sort_experience(mut entries: Vec<ExperienceEntry>) -> Vec<ExperienceEntry> {
    entries.sort_by_key(|e| (Reverse(e.year()), Reverse(e.id)));
    entries
}

/// Experience entries sharing a year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearGroup {
    /// `None` collects entries with no usable year; that group comes last.
    pub year: Option<i64>,
    pub entries: Vec<ExperienceEntry>,
}

/// Partition entries by year, newest first, keeping the incoming order inside
/// each group.
pub fn group_by_year(entries: Vec<ExperienceEntry>) -> Vec<YearGroup> {
    let mut groups: BTreeMap<Reverse<Option<i64>>, Vec<ExperienceEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(Reverse(entry.year())).or_default().push(entry);
    }
    groups
        .into_iter()
        .map(|(Reverse(year), entries)| YearGroup { year, entries })
        .collect()
}

/// The experience transform: sort, then group.
pub fn experience_groups(entries: Vec<ExperienceEntry>) -> Vec<YearGroup> {
    group_by_year(sort_experience(entries))
}

pub fn sort_academic(mut entries: Vec<AcademicEntry>) -> Vec<AcademicEntry> {
    entries.sort_by_key(|e| Reverse(e.start_year.number));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::YearValue;
    use serde_json::json;

    fn job(company: &str, year: i64, id: Option<i64>) -> ExperienceEntry {
        ExperienceEntry {
            company: company.to_string(),
            declared_year: Some(year),
            id,
            ..Default::default()
        }
    }

    fn school(name: &str, start: i64) -> AcademicEntry {
        AcademicEntry {
            school: name.to_string(),
            start_year: YearValue::from_value(&json!(start)),
            ..Default::default()
        }
    }

    fn companies(entries: &[ExperienceEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.company.as_str()).collect()
    }

    #[test]
    fn experience_sorted_by_year_then_id() {
        let sorted = sort_experience(vec![
            job("old", 2019, Some(1)),
            job("new-low", 2022, Some(2)),
            job("new-high", 2022, Some(5)),
            job("mid", 2020, Some(3)),
        ]);
        assert_eq!(companies(&sorted), vec!["new-high", "new-low", "mid", "old"]);
    }

    #[test]
    fn experience_without_id_keeps_insertion_order() {
        let sorted = sort_experience(vec![
            job("first", 2021, None),
            job("second", 2021, None),
            job("with-id", 2021, Some(1)),
        ]);
        assert_eq!(companies(&sorted), vec!["with-id", "first", "second"]);
    }

    #[test]
    fn groups_are_descending_by_year() {
        let groups = experience_groups(vec![
            job("a", 2019, Some(1)),
            job("b", 2023, Some(2)),
            job("c", 2021, Some(3)),
            job("d", 2023, Some(4)),
        ]);
        let years: Vec<Option<i64>> = groups.iter().map(|g| g.year).collect();
        assert_eq!(years, vec![Some(2023), Some(2021), Some(2019)]);
        assert_eq!(companies(&groups[0].entries), vec!["d", "b"]);
    }

    #[test]
    fn grouping_keeps_incoming_order_within_year() {
        let groups = group_by_year(vec![
            job("x", 2020, Some(1)),
            job("y", 2020, Some(9)),
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(companies(&groups[0].entries), vec!["x", "y"]);
    }

    #[test]
    fn entries_without_year_group_last() {
        let undated = ExperienceEntry {
            company: "undated".to_string(),
            ..Default::default()
        };
        let groups = experience_groups(vec![undated, job("dated", 2015, None)]);
        assert_eq!(groups[0].year, Some(2015));
        assert_eq!(groups[1].year, None);
    }

    #[test]
    fn academic_sorted_by_start_year_desc() {
        let sorted = sort_academic(vec![school("B", 2018), school("A", 2020)]);
        let names: Vec<&str> = sorted.iter().map(|e| e.school.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn academic_without_year_sorts_last() {
        let mut unknown = school("?", 0);
        unknown.start_year = YearValue::from_value(&json!("soon"));
        let sorted = sort_academic(vec![unknown, school("A", 2001)]);
        assert_eq!(sorted[0].school, "A");
        assert_eq!(sorted[1].school, "?");
    }
}
