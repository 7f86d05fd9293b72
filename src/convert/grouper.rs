//! Partitioning contacts by category.

use crate::domain::ContactRecord;
use std::collections::HashMap;

/// All contacts sharing one category value, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    category: String,
    records: Vec<ContactRecord>,
}

impl CategoryGroup {
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn records(&self) -> &[ContactRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Incremental grouper keeping categories in order of first appearance.
///
/// Categories compare by exact string equality.
#[derive(Debug, Default)]
pub struct ContactGrouper {
    groups: Vec<CategoryGroup>,
    positions: HashMap<String, usize>,
    total: usize,
}

impl ContactGrouper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to its category's group, opening the group if needed.
    pub fn push(&mut self, record: ContactRecord) {
        let position = match self.positions.get(record.category()) {
            Some(&position) => position,
            None => {
                let position = self.groups.len();
                self.positions
                    .insert(record.category().to_string(), position);
                self.groups.push(CategoryGroup {
                    category: record.category().to_string(),
                    records: Vec::new(),
                });
                position
            }
        };

        self.groups[position].records.push(record);
        self.total += 1;
    }

    /// Number of records pushed so far.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn into_groups(self) -> Vec<CategoryGroup> {
        self.groups
    }
}

impl Extend<ContactRecord> for ContactGrouper {
    fn extend<I: IntoIterator<Item = ContactRecord>>(&mut self, iter: I) {
        for record in iter {
            self.push(record);
        }
    }
}

/// Group a finished sequence of records.
pub fn group_contacts(records: impl IntoIterator<Item = ContactRecord>) -> Vec<CategoryGroup> {
    let mut grouper = ContactGrouper::new();
    grouper.extend(records);
    grouper.into_groups()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, category: &str) -> ContactRecord {
        ContactRecord::new(name, "912", category).unwrap()
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        let groups = group_contacts(vec![
            record("Ann", "A"),
            record("Bob", "B"),
            record("Cid", "A"),
        ]);

        let categories: Vec<&str> = groups.iter().map(|g| g.category()).collect();
        assert_eq!(categories, vec!["A", "B"]);

        let names: Vec<&str> = groups[0].records().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["Ann", "Cid"]);
        assert_eq!(groups[1].len(), 1);
    }

    #[test]
    fn test_category_match_is_exact() {
        let groups = group_contacts(vec![
            record("Ann", "work"),
            record("Bob", "Work"),
            record("Cid", "work "),
        ]);
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        let grouper = ContactGrouper::new();
        assert!(grouper.is_empty());
        assert!(grouper.into_groups().is_empty());
    }

    #[test]
    fn test_len_counts_records_not_groups() {
        let mut grouper = ContactGrouper::new();
        grouper.push(record("Ann", "A"));
        grouper.push(record("Bob", "A"));
        assert_eq!(grouper.len(), 2);
        assert_eq!(grouper.into_groups().len(), 1);
    }
}
