//! The data-source capability and the bundled in-memory table.

use crate::value::Value;

/// Column access required of a tabular data source.
///
/// The engine needs exactly two operations: enumerating the available
/// column names and materializing one column as a fixed-length,
/// randomly-addressable slice. Row iteration protocols and type metadata
/// are deliberately not part of the contract, which keeps the engine
/// agnostic to where the data actually lives.
///
/// Implementations must treat their data as immutable for the duration of
/// a run; the engine reads columns from multiple worker threads.
pub trait DataSource: Send + Sync {
    /// The identifiers of every column this source can provide.
    fn column_names(&self) -> Vec<String>;

    /// The values of the named column, or `None` if it does not exist.
    ///
    /// All columns of one source must have the same length.
    fn column(&self, name: &str) -> Option<&[Value]>;
}

/// An insertion-ordered, in-memory column table.
///
/// Useful for tests and for callers that already hold their data in
/// memory. Anything convertible to [`Value`] can be loaded, including
/// `Option`s for nullable columns.
///
/// # Examples
///
/// ```rust
/// use rowguard::source::{DataSource, MemorySource};
///
/// let data = MemorySource::new()
///     .with_column("a", [1, -2, 3])
///     .with_column("label", ["x", "y", "z"]);
///
/// assert_eq!(data.column_names(), vec!["a", "label"]);
/// assert_eq!(data.row_count(), 3);
/// assert!(data.column("missing").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    columns: Vec<(String, Vec<Value>)>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column, replacing any existing column of the same name.
    pub fn with_column<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let name = name.into();
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if let Some(slot) = self.columns.iter_mut().find(|(existing, _)| *existing == name) {
            slot.1 = values;
        } else {
            self.columns.push((name, values));
        }
        self
    }

    /// Number of rows, taken from the first column (0 when empty).
    pub fn row_count(&self) -> usize {
        self.columns.first().map(|(_, values)| values.len()).unwrap_or(0)
    }
}

impl DataSource for MemorySource {
    fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|(name, _)| name.clone()).collect()
    }

    fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, values)| values.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_keep_insertion_order() {
        let data = MemorySource::new()
            .with_column("b", [1, 2])
            .with_column("a", [3, 4]);
        assert_eq!(data.column_names(), vec!["b", "a"]);
    }

    #[test]
    fn test_with_column_replaces_existing() {
        let data = MemorySource::new()
            .with_column("a", [1, 2])
            .with_column("a", [9]);
        assert_eq!(data.column("a"), Some(&[Value::Int(9)][..]));
        assert_eq!(data.column_names().len(), 1);
    }

    #[test]
    fn test_nullable_column() {
        let data = MemorySource::new().with_column("a", [Some(1), None, Some(3)]);
        assert_eq!(
            data.column("a"),
            Some(&[Value::Int(1), Value::Null, Value::Int(3)][..])
        );
    }

    #[test]
    fn test_empty_source() {
        let data = MemorySource::new();
        assert_eq!(data.row_count(), 0);
        assert!(data.column_names().is_empty());
    }
}
