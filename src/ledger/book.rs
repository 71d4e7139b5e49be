use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::record::Record;

/// The cleaned ledger: records in input order, grouped on demand by date.
#[derive(Debug, Default)]
pub struct Ledger {
    pub records: Vec<Record>,
}

impl Ledger {
    pub fn new() -> Ledger {
        Ledger { records: Vec::new() }
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Maps every distinct date to the indices of its records, ascending by
    /// date. Indices keep the input order within a day.
    pub fn daily_groups(&self) -> BTreeMap<NaiveDate, Vec<usize>> {
        let mut groups: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();
        for (index, record) in self.records.iter().enumerate() {
            groups.entry(*record.date()).or_default().push(index);
        }

        groups
    }

    pub fn records_at<'a>(&'a self, indices: &'a [usize]) -> impl Iterator<Item = &'a Record> + 'a {
        indices.iter().filter_map(|&index| self.records.get(index))
    }
}

impl FromIterator<Record> for Ledger {
    fn from_iter<T: IntoIterator<Item = Record>>(iter: T) -> Self {
        Ledger {
            records: iter.into_iter().collect(),
        }
    }
}
