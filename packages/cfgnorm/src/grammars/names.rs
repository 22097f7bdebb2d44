use indexmap::IndexSet;

use crate::language::Symbol;

/// Hands out fresh symbol names from a single monotonically increasing counter.
///
/// Every name the grammar already uses is reserved up front, and every name handed out is
/// reserved afterwards, so a generated name never collides with a terminal, a nonterminal, or a
/// previously generated name.
#[derive(Debug, Clone)]
pub struct NameGenerator {
    next_id: usize,
    taken: IndexSet<Symbol>,
}

impl NameGenerator {
    pub fn new(taken: impl IntoIterator<Item = Symbol>) -> Self {
        Self {
            next_id: 1,
            taken: taken.into_iter().collect(),
        }
    }

    pub fn is_taken(&self, symbol: &Symbol) -> bool {
        self.taken.contains(symbol)
    }

    /// `{prefix}{n}` for the next counter value `n` not already taken.
    pub fn generate(&mut self, prefix: &str) -> Symbol {
        loop {
            let candidate = Symbol::new(format!("{}{}", prefix, self.next_id));
            self.next_id += 1;

            if self.taken.insert(candidate.clone()) {
                log::trace!("allocated fresh symbol {}", candidate);
                return candidate;
            }
        }
    }

    /// `base` followed by as many primes as needed to be unused.
    pub fn prime(&mut self, base: &Symbol) -> Symbol {
        let mut candidate = format!("{}'", base);
        while self.taken.contains(&Symbol::new(candidate.as_str())) {
            candidate.push('\'');
        }

        let symbol = Symbol::new(candidate);
        self.taken.insert(symbol.clone());
        symbol
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn skips_names_already_in_use() {
        let mut names = NameGenerator::new(["X1", "X3"].map(Symbol::new));

        assert_eq!(names.generate("X"), Symbol::new("X2"));
        assert_eq!(names.generate("X"), Symbol::new("X4"));
    }

    #[test]
    fn counter_is_shared_between_prefixes() {
        let mut names = NameGenerator::new([]);

        assert_eq!(names.generate("T"), Symbol::new("T1"));
        assert_eq!(names.generate("X"), Symbol::new("X2"));
        assert!(names.is_taken(&Symbol::new("T1")));
    }

    #[test]
    fn primes_until_free() {
        let mut names = NameGenerator::new(["S", "S'"].map(Symbol::new));

        assert_eq!(names.prime(&Symbol::new("S")), Symbol::new("S''"));
    }
}
