use indexmap::{indexset, IndexSet};
use itertools::Itertools;

use crate::{
    grammars::{
        context_free::ContextFreeGrammar,
        normalize::EmptyWordPolicy,
        types::{NonTerminal, Production, ProductionSymbol},
    },
    language::Word,
};

impl ContextFreeGrammar {
    /// Nonterminals that derive the empty word in zero or more steps.
    pub fn nullable_non_terminals(&self) -> IndexSet<NonTerminal> {
        let mut nullable = self
            .productions
            .iter()
            .filter(|(_, rhs)| rhs.iter().any(Word::is_empty))
            .map(|(lhs, _)| lhs.clone())
            .collect::<IndexSet<_>>();

        loop {
            let mut changed = false;

            for (lhs, rhs) in &self.productions {
                if nullable.contains(lhs) {
                    continue;
                }

                let is_lhs_nullable = rhs.iter().any(|word| {
                    word.iter().all(|symbol| {
                        symbol
                            .as_non_terminal()
                            .is_some_and(|nt| nullable.contains(nt))
                    })
                });

                if is_lhs_nullable {
                    nullable.insert(lhs.clone());
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }

        nullable
    }

    /// Removes every empty production.
    ///
    /// Each production is replaced by all of its variants with some subset of its nullable
    /// occurrences erased, so a production with `k` nullable occurrences yields up to `2^k`
    /// variants. Whether the start symbol keeps deriving the empty word is decided by `policy`.
    pub fn eliminate_erasing_productions(&mut self, policy: EmptyWordPolicy) {
        let nullable = self.nullable_non_terminals();
        log::debug!("nullable nonterminals: {{{}}}", nullable.iter().join(", "));

        for rhs in self.productions.values_mut() {
            let mut next_productions = IndexSet::new();

            for word in rhs.iter() {
                next_productions.extend(erase_nullable_occurrences(word, &nullable));
            }

            *rhs = next_productions;
        }

        if policy == EmptyWordPolicy::PreserveAtStart && nullable.contains(&self.start_symbol) {
            self.preserve_empty_word();
        }
    }

    /// Adds `S → ε`, moving to a fresh start symbol first if `S` occurs on a right-hand side.
    fn preserve_empty_word(&mut self) {
        let is_start_on_rhs = self
            .iter_productions()
            .any(|(_, word)| word.non_terminals().any(|nt| nt == &self.start_symbol));

        if !is_start_on_rhs {
            if let Some(rhs) = self.productions.get_mut(&self.start_symbol) {
                rhs.insert(Word::empty());
            }
            return;
        }

        let new_start_symbol = NonTerminal(self.names.prime(&self.start_symbol.0));
        log::debug!(
            "start symbol {} is nullable and recursive, introducing {}",
            self.start_symbol,
            new_start_symbol
        );

        self.non_terminals.shift_insert(0, new_start_symbol.clone());
        self.productions.shift_insert(
            0,
            new_start_symbol.clone(),
            indexset! {
                Word(vec![ProductionSymbol::NonTerminal(self.start_symbol.clone())]),
                Word::empty(),
            },
        );
        self.start_symbol = new_start_symbol;
    }
}

fn erase_nullable_occurrences(
    word: &Production,
    nullable: &IndexSet<NonTerminal>,
) -> Vec<Production> {
    let positions = word
        .iter()
        .positions(|symbol| {
            symbol
                .as_non_terminal()
                .is_some_and(|nt| nullable.contains(nt))
        })
        .collect::<Vec<_>>();

    positions
        .into_iter()
        .powerset()
        .filter_map(|erased| {
            let variant = word
                .iter()
                .enumerate()
                .filter(|(i, _)| !erased.contains(i))
                .map(|(_, symbol)| symbol.clone())
                .collect::<Vec<_>>();

            (!variant.is_empty()).then_some(Word(variant))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::grammars::{
        fixtures::{grammar, lab_grammar},
        types::Grammar,
    };

    fn names(set: &IndexSet<NonTerminal>) -> Vec<String> {
        set.iter().map(ToString::to_string).sorted().collect()
    }

    #[test]
    fn finds_direct_and_indirect_nullables() {
        let grammar = grammar("S", &["S → AB | a", "A → ε | a", "B → A | b", "C → c"]);

        assert_eq!(names(&grammar.nullable_non_terminals()), vec!["A", "B", "S"]);
    }

    #[test]
    fn lab_grammar_has_one_nullable() {
        assert_eq!(names(&lab_grammar().nullable_non_terminals()), vec!["B"]);
    }

    #[test]
    fn expands_every_subset_of_nullable_occurrences() {
        let mut grammar = lab_grammar();
        grammar.eliminate_erasing_productions(EmptyWordPolicy::Discard);

        let a = grammar.productions_of(&NonTerminal::new("A")).unwrap();
        let rendered = a.iter().map(ToString::to_string).sorted().collect::<Vec<_>>();

        assert_eq!(rendered, vec!["aBdA", "aBdAB", "adA", "adAB", "d", "dS"]);
        assert_eq!(
            grammar
                .productions_of(&NonTerminal::new("S"))
                .unwrap()
                .iter()
                .map(ToString::to_string)
                .sorted()
                .collect::<Vec<_>>(),
            vec!["A", "d", "dB"]
        );
    }

    #[test]
    fn leaves_no_empty_productions() {
        let mut grammar = grammar("S", &["S → AA | ε", "A → ε | aA"]);
        grammar.eliminate_erasing_productions(EmptyWordPolicy::Discard);

        assert!(grammar.iter_productions().all(|(_, word)| !word.is_empty()));
        assert!(grammar.erasing_productions().is_empty());
    }

    #[test]
    fn preserves_empty_word_on_start_symbol() {
        let mut grammar = grammar("S", &["S → aA", "A → ε | b"]);
        grammar.eliminate_erasing_productions(EmptyWordPolicy::PreserveAtStart);

        // S is not nullable here.
        assert!(grammar.erasing_productions().is_empty());

        let mut grammar = grammar_with_nullable_start();
        grammar.eliminate_erasing_productions(EmptyWordPolicy::PreserveAtStart);

        assert_eq!(grammar.start_symbol(), &NonTerminal::new("S"));
        assert_eq!(
            grammar.erasing_productions().into_owned(),
            indexset! {NonTerminal::new("S")}
        );
    }

    fn grammar_with_nullable_start() -> ContextFreeGrammar {
        grammar("S", &["S → AB", "A → a | ε", "B → b | ε"])
    }

    #[test]
    fn recursive_nullable_start_gets_a_fresh_start() {
        let mut grammar = grammar("S", &["S → aSb | ε"]);
        grammar.eliminate_erasing_productions(EmptyWordPolicy::PreserveAtStart);

        assert_eq!(grammar.start_symbol(), &NonTerminal::new("S'"));
        assert_eq!(grammar.to_string(), "S' → S | ε\nS → aSb | ab\n");
        assert!(grammar.check_invariants(crate::grammars::normalize::Stage::EpsilonElimination).is_ok());
    }
}
