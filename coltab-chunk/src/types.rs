//! Column type descriptors.

use std::fmt;

/// Semantic type of a column.
///
/// This is the dispatch key for chunk construction and domain-calculator
/// selection. The set is closed: every dispatch site is an exhaustive
/// `match`, so a new variant cannot be added without updating them all.
///
/// Struct columns own their ordered child types and may nest arbitrarily.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    /// 64-bit floating point.
    F64,
    /// UTF-8 text.
    Utf8,
    /// Composite column with named-by-position child columns.
    Struct(Vec<ColumnType>),
}

impl ColumnType {
    /// Child types of a struct column, `None` for leaf types.
    pub fn children(&self) -> Option<&[ColumnType]> {
        match self {
            ColumnType::Struct(children) => Some(children),
            _ => None,
        }
    }

    /// Short static name, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::F64 => "f64",
            ColumnType::Utf8 => "utf8",
            ColumnType::Struct(_) => "struct",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Struct(children) => {
                write!(f, "struct<")?;
                for (i, c) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{c}")?;
                }
                write!(f, ">")
            }
            other => f.write_str(other.name()),
        }
    }
}
