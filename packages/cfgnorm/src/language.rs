use std::fmt::Display;

pub const EPSILON: &str = "ε";

/// An opaque grammar symbol identifier. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    /// # Panics
    ///
    /// If `s` is empty. Grammar constructors reject blank names with
    /// [`GrammarError::EmptySymbol`](crate::error::GrammarError::EmptySymbol) before getting here.
    pub fn new(s: impl Into<String>) -> Self {
        let s = s.into();
        assert!(!s.is_empty(), "symbols cannot be empty");
        Symbol(s)
    }

    pub fn is_single_char(&self) -> bool {
        self.0.chars().count() == 1
    }
}

impl AsRef<Symbol> for Symbol {
    fn as_ref(&self) -> &Symbol {
        self
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered sequence of symbols. The empty word is the empty string `ε`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Word<T>(pub Vec<T>);

impl<T> Word<T> {
    pub fn new(symbols: impl IntoIterator<Item = T>) -> Self {
        Word(symbols.into_iter().collect())
    }

    pub fn empty() -> Self {
        Word(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }
}

impl<T: AsRef<Symbol>> Display for Word<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return f.write_str(EPSILON);
        }

        // Multi-character names would be ambiguous when glued together.
        let separator = if self.0.iter().all(|s| s.as_ref().is_single_char()) {
            ""
        } else {
            " "
        };

        let mut first = true;
        for symbol in &self.0 {
            if !first {
                f.write_str(separator)?;
            }
            first = false;
            write!(f, "{}", symbol.as_ref())?;
        }

        Ok(())
    }
}

impl<'a, T> IntoIterator for &'a Word<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
