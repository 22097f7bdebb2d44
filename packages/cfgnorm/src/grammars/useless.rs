use std::collections::VecDeque;

use indexmap::IndexSet;
use itertools::Itertools;

use crate::grammars::{context_free::ContextFreeGrammar, types::NonTerminal};

impl ContextFreeGrammar {
    /// Nonterminals reachable from the start symbol, in breadth-first order.
    pub fn accessible_non_terminals(&self) -> IndexSet<NonTerminal> {
        let mut accessible = IndexSet::from([self.start_symbol.clone()]);
        let mut queue = VecDeque::from([self.start_symbol.clone()]);

        while let Some(nt) = queue.pop_front() {
            let Some(rhs) = self.productions.get(&nt) else {
                continue;
            };

            for next_nt in rhs.iter().flat_map(|word| word.non_terminals()) {
                if accessible.insert(next_nt.clone()) {
                    queue.push_back(next_nt.clone());
                }
            }
        }

        accessible
    }

    pub fn eliminate_inaccessible_symbols(&mut self) {
        let accessible = self.accessible_non_terminals();
        self.log_removed("inaccessible", &accessible);
        self.retain_non_terminals(&accessible);
    }

    /// Nonterminals that derive at least one word made of terminals only.
    pub fn productive_non_terminals(&self) -> IndexSet<NonTerminal> {
        let mut productive = IndexSet::new();

        loop {
            let mut changed = false;

            for (lhs, rhs) in &self.productions {
                if productive.contains(lhs) {
                    continue;
                }

                let is_lhs_productive = rhs
                    .iter()
                    .any(|word| word.non_terminals().all(|nt| productive.contains(nt)));

                if is_lhs_productive {
                    productive.insert(lhs.clone());
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }

        productive
    }

    /// Removes unproductive nonterminals along with every production that mentions one.
    ///
    /// The start symbol always survives; if it is unproductive it is left without productions
    /// and the grammar generates the empty language.
    pub fn eliminate_non_productive_symbols(&mut self) {
        let productive = self.productive_non_terminals();
        self.log_removed("non-productive", &productive);

        let start_index = self.non_terminals.get_index_of(&self.start_symbol);
        self.retain_non_terminals(&productive);

        if let Some(index) = start_index.filter(|_| !productive.contains(&self.start_symbol)) {
            log::debug!("start symbol {} generates no terminal word", self.start_symbol);

            let index = index.min(self.non_terminals.len());
            self.non_terminals
                .shift_insert(index, self.start_symbol.clone());
            self.productions
                .shift_insert(index, self.start_symbol.clone(), IndexSet::new());
        }
    }

    fn log_removed(&self, kind: &str, kept: &IndexSet<NonTerminal>) {
        if log::log_enabled!(log::Level::Debug) {
            let removed = self
                .non_terminals
                .iter()
                .filter(|nt| !kept.contains(*nt))
                .join(", ");

            if !removed.is_empty() {
                log::debug!("removing {} nonterminals: {}", kind, removed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::grammars::{
        fixtures::{grammar, lab_grammar},
        normalize::Stage,
        types::Grammar,
    };

    fn names(set: &IndexSet<NonTerminal>) -> Vec<String> {
        set.iter().map(ToString::to_string).sorted().collect()
    }

    #[test]
    fn lab_grammar_cannot_reach_c() {
        let mut grammar = lab_grammar();

        assert_eq!(names(&grammar.accessible_non_terminals()), vec!["A", "B", "S"]);

        grammar.eliminate_inaccessible_symbols();

        assert_eq!(names(grammar.non_terminals()), vec!["A", "B", "S"]);
        assert_eq!(grammar.productions().len(), 3);
    }

    #[test]
    fn unreachable_empty_rule_is_dropped() {
        let mut grammar = grammar("S", &["S → a", "B → ε"]);
        grammar.eliminate_inaccessible_symbols();

        assert!(!grammar.non_terminals().contains(&NonTerminal::new("B")));
        assert!(grammar
            .check_invariants(Stage::InaccessibleElimination)
            .is_ok());
    }

    #[test]
    fn productivity_needs_a_terminal_derivation() {
        let grammar = grammar("S", &["S → AB | a", "A → aA", "B → b | BC", "C → c"]);

        assert_eq!(names(&grammar.productive_non_terminals()), vec!["B", "C", "S"]);
    }

    #[test]
    fn dropping_unproductive_symbols_drops_their_uses() {
        let mut grammar = grammar("S", &["S → AB | a", "A → aA", "B → b"]);
        grammar.eliminate_non_productive_symbols();

        assert_eq!(names(grammar.non_terminals()), vec!["B", "S"]);
        assert_eq!(grammar.to_string(), "S → a\nB → b\n");
        assert!(grammar
            .check_invariants(Stage::NonProductiveElimination)
            .is_ok());
    }

    #[test]
    fn unproductive_start_symbol_is_kept_empty() {
        let mut grammar = grammar("S", &["S → aS"]);
        grammar.eliminate_non_productive_symbols();

        assert_eq!(names(grammar.non_terminals()), vec!["S"]);
        assert_eq!(grammar.production_count(), 0);
        assert_eq!(grammar.to_string(), "S → ∅\n");
    }
}
