//! Searchable-field configuration for the list filter.

use std::fmt;

/// Reads one searchable field from a record. Absent optional fields yield `None`.
pub type FieldAccessor<T> = fn(&T) -> Option<&str>;

/// The named fields of `T` the filter matches against.
pub struct SearchFields<T> {
    fields: Vec<(&'static str, FieldAccessor<T>)>,
}

impl<T> SearchFields<T> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Adds a searchable field.
    pub fn field(mut self, name: &'static str, accessor: FieldAccessor<T>) -> Self {
        self.fields.push((name, accessor));
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    /// Returns true if any searchable field of `item` contains `needle`.
    ///
    /// `needle` must already be lowercased; field values are lowercased here.
    pub fn matches(&self, item: &T, needle: &str) -> bool {
        self.fields.iter().any(|(_, accessor)| {
            accessor(item).is_some_and(|value| value.to_lowercase().contains(needle))
        })
    }

    /// Returns the subsequence of `items` matching `query`, in order.
    ///
    /// The empty query keeps everything. Whitespace is matched like any other text.
    pub fn filter(&self, items: &[T], query: &str) -> Vec<T>
    where
        T: Clone,
    {
        if query.is_empty() {
            return items.to_vec();
        }
        let needle = query.to_lowercase();
        items
            .iter()
            .filter(|item| self.matches(item, &needle))
            .cloned()
            .collect()
    }
}

impl<T> Default for SearchFields<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SearchFields<T> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
        }
    }
}

impl<T> fmt::Debug for SearchFields<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
