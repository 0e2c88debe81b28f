//! Per-column domain statistics and their calculators.
//!
//! A calculator maps one chunk's valid rows to an immutable [`Domain`];
//! `merge` combines two partial domains of the same column into the domain
//! of the concatenated chunks. Merging is associative and commutative, with
//! the empty-chunk domain as identity, so partial results can be folded in
//! any grouping.

use std::collections::BTreeSet;

use crate::chunk::{ColumnChunk, F64Chunk, Utf8Chunk};
use crate::types::ColumnType;
use coltab_result::{Error, Result};

/// Accumulated statistics of one column.
#[derive(Debug, Clone, PartialEq)]
pub enum Domain {
    F64(F64Domain),
    Utf8(Utf8Domain),
}

impl Domain {
    pub fn num_missing(&self) -> u64 {
        match self {
            Domain::F64(d) => d.num_missing,
            Domain::Utf8(d) => d.num_missing,
        }
    }

    pub fn num_non_missing(&self) -> u64 {
        match self {
            Domain::F64(d) => d.num_non_missing,
            Domain::Utf8(d) => d.num_non_missing,
        }
    }

    pub fn as_f64(&self) -> Result<&F64Domain> {
        match self {
            Domain::F64(d) => Ok(d),
            Domain::Utf8(_) => Err(Error::type_mismatch("f64", "utf8")),
        }
    }

    pub fn as_utf8(&self) -> Result<&Utf8Domain> {
        match self {
            Domain::Utf8(d) => Ok(d),
            Domain::F64(_) => Err(Error::type_mismatch("utf8", "f64")),
        }
    }
}

/// Missing/non-missing counts plus the observed value range.
///
/// `bounds` is `None` until the first non-missing value is seen, which
/// makes the empty domain the merge identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct F64Domain {
    num_missing: u64,
    num_non_missing: u64,
    bounds: Option<(f64, f64)>,
}

impl F64Domain {
    pub fn num_missing(&self) -> u64 {
        self.num_missing
    }

    pub fn num_non_missing(&self) -> u64 {
        self.num_non_missing
    }

    pub fn minimum(&self) -> Option<f64> {
        self.bounds.map(|(min, _)| min)
    }

    pub fn maximum(&self) -> Option<f64> {
        self.bounds.map(|(_, max)| max)
    }
}

/// Missing/non-missing counts plus a capped distinct-value set.
///
/// The set is kept in lexicographic order. Once its size exceeds the
/// calculator threshold it is discarded for good: `has_values()` turns
/// false and every merge the domain participates in is discarded too.
#[derive(Debug, Clone, PartialEq)]
pub struct Utf8Domain {
    num_missing: u64,
    num_non_missing: u64,
    values: Option<BTreeSet<String>>,
}

impl Utf8Domain {
    pub fn num_missing(&self) -> u64 {
        self.num_missing
    }

    pub fn num_non_missing(&self) -> u64 {
        self.num_non_missing
    }

    /// Whether the distinct-value set survived the threshold.
    pub fn has_values(&self) -> bool {
        self.values.is_some()
    }

    pub fn values(&self) -> Option<&BTreeSet<String>> {
        self.values.as_ref()
    }
}

/// Calculator for floating point columns.
///
/// NaN compares false under both `<` and `>`, so it never becomes a bound
/// but still counts as non-missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct F64DomainCalculator;

impl F64DomainCalculator {
    pub fn apply(&self, chunk: &F64Chunk) -> F64Domain {
        let mut num_missing = 0u64;
        let mut bounds: Option<(f64, f64)> = None;
        for i in 0..chunk.num_values() {
            if chunk.is_missing(i) {
                num_missing += 1;
                continue;
            }
            let v = chunk.value(i);
            match bounds {
                None => bounds = Some((v, v)),
                Some((ref mut min, ref mut max)) => {
                    // Two independent comparisons: a value can tie the
                    // minimum and still have to update the maximum.
                    if v < *min {
                        *min = v;
                    }
                    if v > *max {
                        *max = v;
                    }
                }
            }
        }
        F64Domain {
            num_missing,
            num_non_missing: chunk.num_values() as u64 - num_missing,
            bounds,
        }
    }

    pub fn merge(&self, a: &F64Domain, b: &F64Domain) -> F64Domain {
        let bounds = match (a.bounds, b.bounds) {
            (Some((amin, amax)), Some((bmin, bmax))) => {
                let min = if bmin < amin { bmin } else { amin };
                let max = if bmax > amax { bmax } else { amax };
                Some((min, max))
            }
            (Some(x), None) | (None, Some(x)) => Some(x),
            (None, None) => None,
        };
        F64Domain {
            num_missing: a.num_missing + b.num_missing,
            num_non_missing: a.num_non_missing + b.num_non_missing,
            bounds,
        }
    }
}

/// Calculator for text columns with a distinct-value threshold.
#[derive(Debug, Clone, Copy)]
pub struct Utf8DomainCalculator {
    threshold: usize,
}

impl Utf8DomainCalculator {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn apply(&self, chunk: &Utf8Chunk) -> Utf8Domain {
        let mut num_missing = 0u64;
        let mut values: Option<BTreeSet<String>> = Some(BTreeSet::new());
        for i in 0..chunk.num_values() {
            if chunk.is_missing(i) {
                num_missing += 1;
            } else if let Some(set) = values.as_mut() {
                set.insert(chunk.value(i).to_string());
                if set.len() > self.threshold {
                    values = None;
                }
            }
        }
        Utf8Domain {
            num_missing,
            num_non_missing: chunk.num_values() as u64 - num_missing,
            values,
        }
    }

    pub fn merge(&self, a: &Utf8Domain, b: &Utf8Domain) -> Utf8Domain {
        let values = match (&a.values, &b.values) {
            (Some(x), Some(y)) => {
                let mut union = x.clone();
                union.extend(y.iter().cloned());
                if union.len() > self.threshold {
                    None
                } else {
                    Some(union)
                }
            }
            _ => None,
        };
        Utf8Domain {
            num_missing: a.num_missing + b.num_missing,
            num_non_missing: a.num_non_missing + b.num_non_missing,
            values,
        }
    }
}

/// Closed dispatch from a column type to its calculator.
#[derive(Debug, Clone, Copy)]
pub enum DomainCalculator {
    F64(F64DomainCalculator),
    Utf8(Utf8DomainCalculator),
}

impl DomainCalculator {
    /// Calculator for `column_type`, or `None` for types without domain
    /// tracking (struct columns).
    pub fn for_type(column_type: &ColumnType, distinct_threshold: usize) -> Option<Self> {
        match column_type {
            ColumnType::F64 => Some(DomainCalculator::F64(F64DomainCalculator)),
            ColumnType::Utf8 => Some(DomainCalculator::Utf8(Utf8DomainCalculator::new(
                distinct_threshold,
            ))),
            ColumnType::Struct(_) => None,
        }
    }

    /// Compute the domain of one chunk's valid rows.
    pub fn apply(&self, chunk: &ColumnChunk) -> Result<Domain> {
        match self {
            DomainCalculator::F64(calc) => Ok(Domain::F64(calc.apply(chunk.as_f64()?))),
            DomainCalculator::Utf8(calc) => Ok(Domain::Utf8(calc.apply(chunk.as_utf8()?))),
        }
    }

    /// Combine two partial domains of the same column.
    pub fn merge(&self, a: &Domain, b: &Domain) -> Result<Domain> {
        match self {
            DomainCalculator::F64(calc) => Ok(Domain::F64(calc.merge(a.as_f64()?, b.as_f64()?))),
            DomainCalculator::Utf8(calc) => {
                Ok(Domain::Utf8(calc.merge(a.as_utf8()?, b.as_utf8()?)))
            }
        }
    }
}
