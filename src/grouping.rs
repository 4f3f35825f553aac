use std::fmt;

use ahash::AHashMap;

use crate::age::{assign_age_group, AgeGroup};
use crate::record::{Medal, Record, Sex};

/// Record attributes a view can be grouped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupField {
    Year,
    Sex,
    Sport,
    Event,
    Noc,
    Region,
    Medal,
    AgeGroup,
    Name,
}

impl GroupField {
    pub fn column_name(&self) -> &'static str {
        match self {
            GroupField::Year => "Year",
            GroupField::Sex => "Sex",
            GroupField::Sport => "Sport",
            GroupField::Event => "Event",
            GroupField::Noc => "NOC",
            GroupField::Region => "Region",
            GroupField::Medal => "Medal",
            GroupField::AgeGroup => "Age Group",
            GroupField::Name => "Name",
        }
    }

    /// Key value for `record`, or `None` when the record cannot take part
    /// in a view keyed on this field (no age group, no sex, unknown region).
    pub fn extract(&self, record: &Record) -> Option<KeyValue> {
        match self {
            GroupField::Year => Some(KeyValue::Year(record.year)),
            GroupField::Sex => record.sex.map(KeyValue::Sex),
            GroupField::Sport => Some(KeyValue::Text(record.sport.clone())),
            GroupField::Event => Some(KeyValue::Text(record.event.clone())),
            GroupField::Noc => Some(KeyValue::Text(record.noc.clone())),
            GroupField::Region => record.region.clone().map(KeyValue::Text),
            GroupField::Medal => Some(KeyValue::Medal(record.medal)),
            GroupField::AgeGroup => assign_age_group(record).map(|(g, _)| KeyValue::AgeGroup(g)),
            GroupField::Name => Some(KeyValue::Text(record.name.clone())),
        }
    }
}

/// One component of a grouping key. Variants of a given column are always
/// the same, so the derived ordering sorts each column naturally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyValue {
    Year(i32),
    Ordinal(u32),
    Sex(Sex),
    Medal(Medal),
    AgeGroup(AgeGroup),
    Text(String),
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Year(y) => write!(f, "{y}"),
            KeyValue::Ordinal(n) => write!(f, "{n}"),
            KeyValue::Sex(s) => f.write_str(s.as_str()),
            KeyValue::Medal(m) => f.write_str(m.as_str()),
            KeyValue::AgeGroup(g) => f.write_str(g.label()),
            KeyValue::Text(t) => f.write_str(t),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedRow {
    pub key: Vec<KeyValue>,
    pub count: u64,
}

/// Counts per observed key combination, sorted ascending by key.
///
/// Combinations that never occur are absent, not zero: a consumer that
/// needs a dense grid has to reindex explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedCounts {
    columns: Vec<&'static str>,
    rows: Vec<GroupedRow>,
}

impl GroupedCounts {
    /// Counts occurrences of each key tuple yielded by `keys`.
    pub fn from_keys<I>(columns: Vec<&'static str>, keys: I) -> Self
    where
        I: IntoIterator<Item = Vec<KeyValue>>,
    {
        let mut counts: AHashMap<Vec<KeyValue>, u64> = AHashMap::new();
        for key in keys {
            debug_assert_eq!(key.len(), columns.len());
            *counts.entry(key).or_default() += 1;
        }

        let mut rows: Vec<GroupedRow> = counts
            .into_iter()
            .map(|(key, count)| GroupedRow { key, count })
            .collect();
        rows.sort_by(|a, b| a.key.cmp(&b.key));

        GroupedCounts { columns, rows }
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    pub fn rows(&self) -> &[GroupedRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.rows.iter().map(|r| r.count).sum()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| *c == name)
    }

    /// Count for an exact key, `None` when the combination was never observed.
    pub fn get(&self, key: &[KeyValue]) -> Option<u64> {
        self.rows
            .binary_search_by(|row| row.key.as_slice().cmp(key))
            .ok()
            .map(|i| self.rows[i].count)
    }
}

/// Groups `records` by the full `fields` tuple and counts each group.
pub fn group_and_count(records: &[&Record], fields: &[GroupField]) -> GroupedCounts {
    let columns = fields.iter().map(GroupField::column_name).collect();
    let keys = records.iter().filter_map(|record| {
        fields
            .iter()
            .map(|field| field.extract(record))
            .collect::<Option<Vec<KeyValue>>>()
    });
    GroupedCounts::from_keys(columns, keys)
}
