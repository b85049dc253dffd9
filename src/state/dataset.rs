//! Extracted dataset and duplicate detection

use std::collections::HashSet;

/// One structured nutrition record extracted from a search result
///
/// All fields are kept as the backend rendered them; the core performs no
/// numeric parsing or unit validation. `name` is the unique key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodRecord {
    /// Display name of the item (unique key)
    pub name: String,

    /// Protein content as shown
    pub proteins: String,

    /// Carbohydrate content as shown
    pub carbs: String,

    /// Fat content as shown
    pub fats: String,

    /// Fiber content as shown
    pub fiber: String,

    /// Serving / portion details as shown
    pub details: String,
}

/// Insertion-ordered collection of records, unique by name
///
/// Invariant: no two records share a name. Duplicate inserts are rejected,
/// first-write-wins; the existing record is never updated or merged.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<FoodRecord>,
    names: HashSet<String>,
}

impl Dataset {
    /// Creates an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a record with this name has already been captured
    pub fn is_duplicate(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Appends a record if its name is new
    ///
    /// Returns true if the record was inserted, false if a record with the
    /// same name already exists (in which case the new record is discarded).
    pub fn insert(&mut self, record: FoodRecord) -> bool {
        if self.names.contains(&record.name) {
            return false;
        }
        self.names.insert(record.name.clone());
        self.records.push(record);
        true
    }

    /// Number of captured records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no record has been captured yet
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The records in insertion order
    pub fn records(&self) -> &[FoodRecord] {
        &self.records
    }
}

impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl Eq for Dataset {}

impl FromIterator<FoodRecord> for Dataset {
    /// Collects records, dropping any whose name was already seen
    fn from_iter<I: IntoIterator<Item = FoodRecord>>(iter: I) -> Self {
        let mut dataset = Dataset::new();
        for record in iter {
            dataset.insert(record);
        }
        dataset
    }
}
