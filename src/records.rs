//! Ordered name/value record table.
//!
//! One abstraction backs query parameters, request headers, and response
//! headers: an append-only list of string pairs with a fixed capacity.
//! Lookup is a linear scan returning the first match, so duplicate names
//! are legal and earlier entries shadow later ones.

use thiserror::Error;

/// Capacity of every record table the engine creates.
pub(crate) const DEFAULT_CAPACITY: usize = 100;

/// Error returned by [`Records::push`] when the table is at capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("record table full (capacity {capacity})")]
pub struct RecordsFull {
    /// The bound that was hit.
    pub capacity: usize,
}

/// An append-only, bounded table of name/value string pairs.
///
/// Entries keep insertion order and are never removed or overwritten.
/// Names are compared byte-for-byte; `Content-Type` and `content-type`
/// are different records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Records {
    entries: Vec<(String, String)>,
    capacity: usize,
}

impl Records {
    pub(crate) fn new(capacity: usize) -> Self {
        Self { entries: Vec::new(), capacity }
    }

    /// Appends a record. No uniqueness check is made.
    ///
    /// Fails when the table already holds `capacity` entries; the table is
    /// left untouched.
    pub fn push(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), RecordsFull> {
        if self.entries.len() >= self.capacity {
            return Err(RecordsFull { capacity: self.capacity });
        }
        self.entries.push((name.into(), value.into()));
        Ok(())
    }

    /// Returns the value of the first record named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The bound this table was created with.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_wins_over_duplicates() {
        let mut records = Records::new(10);
        records.push("Accept", "text/html").unwrap();
        records.push("Accept", "application/json").unwrap();

        assert_eq!(records.get("Accept"), Some("text/html"));
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let mut records = Records::new(10);
        records.push("Content-Type", "application/json").unwrap();

        assert_eq!(records.get("Content-Type"), Some("application/json"));
        assert_eq!(records.get("content-type"), None);
    }

    #[test]
    fn missing_name_is_none() {
        let records = Records::new(10);
        assert_eq!(records.get("anything"), None);
        assert!(records.is_empty());
    }

    #[test]
    fn push_past_capacity_fails_and_leaves_table_intact() {
        let mut records = Records::new(2);
        for i in 0..records.capacity() {
            records.push(format!("k{i}"), i.to_string()).unwrap();
        }

        let err = records.push("extra", "x").unwrap_err();
        assert_eq!(err, RecordsFull { capacity: records.capacity() });
        assert_eq!(records.len(), records.capacity());
        assert_eq!(records.get("extra"), None);
        assert_eq!(records.get("k1"), Some("1"));
    }

    #[test]
    fn iterates_in_insertion_order() {
        let mut records = Records::new(10);
        records.push("z", "26").unwrap();
        records.push("a", "1").unwrap();
        records.push("m", "13").unwrap();

        let order: Vec<_> = records.iter().collect();
        assert_eq!(order, vec![("z", "26"), ("a", "1"), ("m", "13")]);
    }
}
