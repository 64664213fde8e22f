//! Historical rename tracking
//!
//! A lineage is the rename history of one symbol: a chain of records
//! `A -> B` (since v1), `B -> C` (since v2), ... with strictly increasing
//! versions. Resolving any name of a lineage against a running version
//! yields the name that symbol carries in that version, so callers may write
//! either the oldest or the newest name.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::version::PlatformVersion;

/// Kind of symbol a rename applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolCategory {
    /// Class binary names
    Class,
    /// Field names
    Field,
    /// Method names
    Method,
    /// Enum constant names
    Constant,
}

impl fmt::Display for SymbolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SymbolCategory::Class => "class",
            SymbolCategory::Field => "field",
            SymbolCategory::Method => "method",
            SymbolCategory::Constant => "constant",
        })
    }
}

/// One rename taking effect at `since`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameRecord {
    /// Symbol category
    pub category: SymbolCategory,
    /// Name before the change
    pub from: String,
    /// Name after the change
    pub to: String,
    /// First version carrying `to`
    pub since: PlatformVersion,
}

impl RenameRecord {
    /// Create a record
    pub fn new(
        category: SymbolCategory,
        from: impl Into<String>,
        to: impl Into<String>,
        since: PlatformVersion,
    ) -> Self {
        Self {
            category,
            from: from.into(),
            to: to.into(),
            since,
        }
    }
}

/// Errors raised while registering rename records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenameError {
    /// A lineage must contain at least one record
    #[error("Empty rename lineage")]
    Empty,

    /// Records of a lineage must carry strictly increasing versions
    #[error("Rename {from} -> {to} at {since} does not follow the previous rename at {previous}")]
    NonMonotonicVersion {
        /// Old name of the offending record
        from: String,
        /// New name of the offending record
        to: String,
        /// Version of the offending record
        since: PlatformVersion,
        /// Version of the record before it
        previous: PlatformVersion,
    },

    /// Each record must start from the name the previous one produced
    #[error("Broken rename chain: expected a rename from {expected}, found one from {found}")]
    BrokenChain {
        /// Name produced by the previous record
        expected: String,
        /// Name the offending record starts from
        found: String,
    },

    /// A name may belong to a single lineage per category
    #[error("{category} name {name} already belongs to another rename lineage")]
    Conflict {
        /// Symbol category
        category: SymbolCategory,
        /// Conflicting name
        name: String,
    },

    /// All records of a lineage must share one category
    #[error("Mixed categories in rename lineage: {expected} and {found}")]
    MixedCategories {
        /// Category of the first record
        expected: SymbolCategory,
        /// Category of the offending record
        found: SymbolCategory,
    },
}

/// Rename history for every tracked symbol
#[derive(Debug, Clone, Default)]
pub struct RenameTable {
    lineages: Vec<Vec<RenameRecord>>,
    index: FxHashMap<(SymbolCategory, String), usize>,
}

impl RenameTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a complete lineage, oldest record first
    pub fn register(
        &mut self,
        records: impl IntoIterator<Item = RenameRecord>,
    ) -> Result<(), RenameError> {
        let records: Vec<RenameRecord> = records.into_iter().collect();
        let first = records.first().ok_or(RenameError::Empty)?;
        let category = first.category;

        for pair in records.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            validate_step(prev, next)?;
        }
        for record in &records {
            if record.category != category {
                return Err(RenameError::MixedCategories {
                    expected: category,
                    found: record.category,
                });
            }
        }
        for name in lineage_names(&records) {
            if self.index.contains_key(&(category, name.to_string())) {
                return Err(RenameError::Conflict {
                    category,
                    name: name.to_string(),
                });
            }
        }

        let slot = self.lineages.len();
        for name in lineage_names(&records) {
            self.index.insert((category, name.to_string()), slot);
        }
        tracing::debug!(
            %category,
            origin = %first.from,
            renames = records.len(),
            "registered rename lineage"
        );
        self.lineages.push(records);
        Ok(())
    }

    /// Record a single rename, extending the lineage whose newest name is `from`
    pub fn rename(
        &mut self,
        category: SymbolCategory,
        from: impl Into<String>,
        to: impl Into<String>,
        since: PlatformVersion,
    ) -> Result<(), RenameError> {
        let record = RenameRecord::new(category, from, to, since);
        let existing = self.index.get(&(category, record.from.clone())).copied();
        match existing {
            Some(slot) => {
                let lineage = &self.lineages[slot];
                if let Some(last) = lineage.last() {
                    validate_step(last, &record)?;
                }
                if let Some(&other) = self.index.get(&(category, record.to.clone())) {
                    if other != slot {
                        return Err(RenameError::Conflict {
                            category,
                            name: record.to,
                        });
                    }
                }
                self.index.insert((category, record.to.clone()), slot);
                self.lineages[slot].push(record);
                Ok(())
            }
            None => self.register([record]),
        }
    }

    /// Name `name` carries at `running`. Names of no lineage are returned unchanged.
    pub fn resolve(&self, category: SymbolCategory, name: &str, running: PlatformVersion) -> String {
        let Some(lineage) = self.lineage(category, name) else {
            return name.to_string();
        };
        let mut effective = lineage[0].from.as_str();
        for record in lineage {
            if record.since <= running {
                effective = record.to.as_str();
            }
        }
        effective.to_string()
    }

    /// Lineage containing `name`, oldest record first
    pub fn lineage(&self, category: SymbolCategory, name: &str) -> Option<&[RenameRecord]> {
        self.index
            .get(&(category, name.to_string()))
            .and_then(|slot| self.lineages.get(*slot))
            .map(Vec::as_slice)
    }

    /// Number of lineages
    pub fn len(&self) -> usize {
        self.lineages.len()
    }

    /// Whether no lineage is registered
    pub fn is_empty(&self) -> bool {
        self.lineages.is_empty()
    }
}

fn validate_step(prev: &RenameRecord, next: &RenameRecord) -> Result<(), RenameError> {
    if next.from != prev.to {
        return Err(RenameError::BrokenChain {
            expected: prev.to.clone(),
            found: next.from.clone(),
        });
    }
    if next.since <= prev.since {
        return Err(RenameError::NonMonotonicVersion {
            from: next.from.clone(),
            to: next.to.clone(),
            since: next.since,
            previous: prev.since,
        });
    }
    Ok(())
}

fn lineage_names(records: &[RenameRecord]) -> impl Iterator<Item = &str> {
    records
        .first()
        .map(|r| r.from.as_str())
        .into_iter()
        .chain(records.iter().map(|r| r.to.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(minor: u32) -> PlatformVersion {
        PlatformVersion::minor(minor)
    }

    fn sample() -> RenameTable {
        let mut table = RenameTable::new();
        table
            .register([
                RenameRecord::new(SymbolCategory::Field, "a", "b", v(9)),
                RenameRecord::new(SymbolCategory::Field, "b", "c", v(13)),
            ])
            .unwrap();
        table
    }

    #[test]
    fn test_single_rename() {
        let mut table = RenameTable::new();
        table.rename(SymbolCategory::Field, "OLD", "NEW", v(13)).unwrap();
        assert_eq!(table.resolve(SymbolCategory::Field, "OLD", v(12)), "OLD");
        assert_eq!(table.resolve(SymbolCategory::Field, "NEW", v(12)), "OLD");
        assert_eq!(table.resolve(SymbolCategory::Field, "OLD", v(14)), "NEW");
        assert_eq!(table.resolve(SymbolCategory::Field, "NEW", v(13)), "NEW");
    }

    #[test]
    fn test_chain_resolution() {
        let table = sample();
        for name in ["a", "b", "c"] {
            assert_eq!(table.resolve(SymbolCategory::Field, name, v(8)), "a");
            assert_eq!(table.resolve(SymbolCategory::Field, name, v(12)), "b");
            assert_eq!(table.resolve(SymbolCategory::Field, name, v(20)), "c");
        }
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let table = sample();
        for minor in [8, 9, 12, 13, 20] {
            let once = table.resolve(SymbolCategory::Field, "a", v(minor));
            let twice = table.resolve(SymbolCategory::Field, &once, v(minor));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_unknown_names_pass_through() {
        let table = sample();
        assert_eq!(table.resolve(SymbolCategory::Field, "z", v(20)), "z");
        assert_eq!(table.resolve(SymbolCategory::Method, "a", v(20)), "a");
    }

    #[test]
    fn test_rename_extends_lineage() {
        let mut table = sample();
        table.rename(SymbolCategory::Field, "c", "d", v(20)).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.resolve(SymbolCategory::Field, "a", v(21)), "d");
    }

    #[test]
    fn test_non_monotonic_versions_rejected() {
        let mut table = RenameTable::new();
        let err = table
            .register([
                RenameRecord::new(SymbolCategory::Method, "x", "y", v(13)),
                RenameRecord::new(SymbolCategory::Method, "y", "z", v(13)),
            ])
            .unwrap_err();
        assert!(matches!(err, RenameError::NonMonotonicVersion { .. }));
        assert!(table.is_empty());
    }

    #[test]
    fn test_broken_chain_rejected() {
        let mut table = RenameTable::new();
        let err = table
            .register([
                RenameRecord::new(SymbolCategory::Method, "x", "y", v(9)),
                RenameRecord::new(SymbolCategory::Method, "q", "z", v(13)),
            ])
            .unwrap_err();
        assert_eq!(
            err,
            RenameError::BrokenChain {
                expected: "y".to_string(),
                found: "q".to_string(),
            }
        );
    }

    #[test]
    fn test_conflicting_lineages_rejected() {
        let mut table = sample();
        let err = table
            .register([RenameRecord::new(SymbolCategory::Field, "q", "b", v(20))])
            .unwrap_err();
        assert!(matches!(err, RenameError::Conflict { .. }));
    }
}
