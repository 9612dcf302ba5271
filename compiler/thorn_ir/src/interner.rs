//! String interner for identifier storage.
//!
//! Provides O(1) interning and lookup. The analysis core is a pure,
//! single-threaded computation per match site, so no sharding or locking
//! is needed; the embedding compiler owns one interner per analysis input.

use rustc_hash::FxHashMap;

use crate::Name;

/// String interner backing [`Name`] identifiers.
///
/// Index 0 is the pre-interned empty string ([`Name::EMPTY`]).
pub struct StringInterner {
    map: FxHashMap<String, u32>,
    strings: Vec<String>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned.
    pub fn new() -> Self {
        let mut interner = Self {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(64),
        };
        interner.intern("");
        interner
    }

    /// Intern a string, returning its `Name`.
    ///
    /// Interning the same string twice returns the same `Name`.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` distinct strings are interned.
    pub fn intern(&mut self, s: &str) -> Name {
        if let Some(&idx) = self.map.get(s) {
            return Name::from_raw(idx);
        }
        let idx = u32::try_from(self.strings.len()).unwrap_or_else(|_| {
            panic!("interner exceeded capacity: {} strings", self.strings.len())
        });
        self.strings.push(s.to_owned());
        self.map.insert(s.to_owned(), idx);
        Name::from_raw(idx)
    }

    /// Look up the string for a `Name`.
    ///
    /// Returns the empty string for a `Name` that was not produced by this
    /// interner, rather than panicking — diagnostics should degrade, not
    /// abort.
    pub fn lookup(&self, name: Name) -> &str {
        self.strings
            .get(name.raw() as usize)
            .map_or("", String::as_str)
    }

    /// Number of interned strings (including the empty string).
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the interner holds only the pre-interned empty string.
    pub fn is_empty(&self) -> bool {
        self.strings.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_is_idempotent() {
        let mut interner = StringInterner::new();
        let a = interner.intern("foo");
        let b = interner.intern("foo");
        assert_eq!(a, b);
        assert_eq!(interner.lookup(a), "foo");
    }

    #[test]
    fn distinct_strings_get_distinct_names() {
        let mut interner = StringInterner::new();
        let a = interner.intern("foo");
        let b = interner.intern("bar");
        assert_ne!(a, b);
    }

    #[test]
    fn empty_string_is_pre_interned() {
        let mut interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(interner.lookup(Name::EMPTY), "");
    }

    #[test]
    fn unknown_name_degrades_to_empty() {
        let interner = StringInterner::new();
        assert_eq!(interner.lookup(Name::from_raw(999)), "");
    }
}
