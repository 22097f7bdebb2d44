use derive_more::Display;

use crate::{
    error::GrammarError,
    grammars::{chomsky_normal_form::ChomskyNormalFormGrammar, context_free::ContextFreeGrammar},
};

/// One step of the normalization pipeline, in the order the steps run.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    #[display("eliminating epsilon productions")]
    EpsilonElimination,
    #[display("eliminating renaming productions")]
    UnitElimination,
    #[display("eliminating inaccessible symbols")]
    InaccessibleElimination,
    #[display("eliminating non-productive symbols")]
    NonProductiveElimination,
    #[display("converting to Chomsky normal form")]
    Binarization,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::EpsilonElimination,
        Stage::UnitElimination,
        Stage::InaccessibleElimination,
        Stage::NonProductiveElimination,
        Stage::Binarization,
    ];
}

/// What happens to the empty word when the start symbol is nullable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyWordPolicy {
    /// The normalized grammar generates the original language minus the empty word.
    #[default]
    Discard,
    /// The normalized grammar keeps `S → ε` on its (possibly fresh) start symbol.
    PreserveAtStart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizationOptions {
    pub empty_word: EmptyWordPolicy,
    /// Check the grammar invariants after every stage and fail on the first broken one.
    pub verify_invariants: bool,
}

impl Default for NormalizationOptions {
    fn default() -> Self {
        Self {
            empty_word: EmptyWordPolicy::Discard,
            verify_invariants: true,
        }
    }
}

impl ContextFreeGrammar {
    pub fn apply_stage(&mut self, stage: Stage, options: &NormalizationOptions) {
        match stage {
            Stage::EpsilonElimination => self.eliminate_erasing_productions(options.empty_word),
            Stage::UnitElimination => self.eliminate_unit_productions(),
            Stage::InaccessibleElimination => self.eliminate_inaccessible_symbols(),
            Stage::NonProductiveElimination => self.eliminate_non_productive_symbols(),
            Stage::Binarization => {
                self.isolate_terminals();
                self.binarize();
            }
        }
    }

    pub fn to_chomsky_normal_form(
        &mut self,
        options: &NormalizationOptions,
    ) -> Result<(), GrammarError> {
        self.to_chomsky_normal_form_with(options, |_, _| {})
    }

    /// Runs every [`Stage`] once, in order, calling `observer` with the grammar after each one.
    pub fn to_chomsky_normal_form_with<F>(
        &mut self,
        options: &NormalizationOptions,
        mut observer: F,
    ) -> Result<(), GrammarError>
    where
        F: FnMut(Stage, &ContextFreeGrammar),
    {
        for stage in Stage::ALL {
            self.apply_stage(stage, options);

            log::debug!(
                "after {}: {} nonterminals, {} productions",
                stage,
                self.non_terminals.len(),
                self.production_count()
            );

            if options.verify_invariants {
                self.check_invariants(stage)?;
            }

            observer(stage, self);
        }

        if options.verify_invariants && !self.is_chomsky_normal_form() {
            return Err(GrammarError::InvariantViolation {
                stage: Stage::Binarization,
                reason: "result is not in Chomsky normal form".to_owned(),
            });
        }

        Ok(())
    }
}

impl ChomskyNormalFormGrammar {
    pub fn from_context_free_grammar(
        cfg: &ContextFreeGrammar,
        options: &NormalizationOptions,
    ) -> Result<Self, GrammarError> {
        let mut cfg = cfg.clone();
        cfg.to_chomsky_normal_form(options)?;

        Self::try_from(&cfg)
    }
}

#[cfg(test)]
mod tests {
    use enumflags2::BitFlags;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::grammars::{
        fixtures::{grammar, lab_grammar},
        properties::GrammarProperty,
        types::{Grammar, NonTerminal},
    };

    #[test]
    fn lab_grammar_reaches_normal_form() {
        let mut grammar = lab_grammar();
        assert_eq!(grammar.non_terminals().len(), 4);

        grammar
            .to_chomsky_normal_form(&NormalizationOptions::default())
            .unwrap();

        assert!(grammar.is_chomsky_normal_form());
        assert!(!grammar.non_terminals().contains(&NonTerminal::new("C")));
    }

    #[test]
    fn observer_sees_every_stage_in_order() {
        let mut grammar = lab_grammar();
        let mut seen = Vec::new();

        grammar
            .to_chomsky_normal_form_with(&NormalizationOptions::default(), |stage, grammar| {
                seen.push((stage, grammar.properties()));
            })
            .unwrap();

        assert_eq!(
            seen.iter().map(|(stage, _)| *stage).collect::<Vec<_>>(),
            Stage::ALL.to_vec()
        );

        let expected = [
            GrammarProperty::EpsilonFree,
            GrammarProperty::UnitFree,
            GrammarProperty::Accessible,
            GrammarProperty::Productive,
            GrammarProperty::ChomskyNormalForm,
        ];
        for ((stage, properties), property) in seen.iter().zip(expected) {
            assert!(
                properties.contains(property),
                "{} should hold after {}",
                property,
                stage
            );
        }
    }

    #[test]
    fn normalized_lab_grammar_keeps_its_language() {
        let cnf = ChomskyNormalFormGrammar::from_context_free_grammar(
            &lab_grammar(),
            &NormalizationOptions::default(),
        )
        .unwrap();

        for word in ["d", "dd", "da", "add", "ddd", "aadd"] {
            assert!(cnf.accepts_text(word), "{} should be accepted", word);
        }
        for word in ["", "a", "aa", "ad", "dad"] {
            assert!(!cnf.accepts_text(word), "{} should be rejected", word);
        }
    }

    #[test]
    fn unreachable_erasable_symbol_disappears() {
        let mut grammar = grammar("S", &["S → aS | a", "B → ε"]);
        grammar
            .to_chomsky_normal_form(&NormalizationOptions::default())
            .unwrap();

        assert!(!grammar.non_terminals().contains(&NonTerminal::new("B")));
        assert!(grammar.is_chomsky_normal_form());
    }

    #[test]
    fn long_production_becomes_four_binary_rules() {
        let mut grammar = grammar(
            "A",
            &["A → BCDEF", "B → b", "C → c", "D → d", "E → e", "F → f"],
        );
        grammar
            .to_chomsky_normal_form(&NormalizationOptions::default())
            .unwrap();

        let binary_rules = grammar
            .iter_productions()
            .filter(|(_, word)| word.len() == 2)
            .count();

        assert_eq!(binary_rules, 4);
        assert_eq!(grammar.non_terminals().len(), 9);
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        let mut grammar = lab_grammar();
        let options = NormalizationOptions::default();
        grammar.to_chomsky_normal_form(&options).unwrap();
        let once = grammar.to_string();

        grammar.to_chomsky_normal_form(&options).unwrap();

        assert!(grammar.is_chomsky_normal_form());
        assert_eq!(grammar.to_string(), once);
    }

    #[test]
    fn empty_word_is_discarded_by_default() {
        let cnf = ChomskyNormalFormGrammar::from_context_free_grammar(
            &grammar("S", &["S → aSb | ε"]),
            &NormalizationOptions::default(),
        )
        .unwrap();

        assert!(!cnf.accepts_text(""));
        assert!(cnf.accepts_text("ab"));
        assert!(cnf.accepts_text("aabb"));
        assert!(!cnf.accepts_text("abb"));
    }

    #[test]
    fn empty_word_can_be_preserved() {
        let options = NormalizationOptions {
            empty_word: EmptyWordPolicy::PreserveAtStart,
            ..Default::default()
        };
        let mut grammar = grammar("S", &["S → aSb | ε"]);
        grammar.to_chomsky_normal_form(&options).unwrap();

        assert_eq!(grammar.start_symbol(), &NonTerminal::new("S'"));
        assert!(grammar.is_chomsky_normal_form());

        let cnf = ChomskyNormalFormGrammar::try_from(&grammar).unwrap();
        assert!(cnf.accepts_text(""));
        assert!(cnf.accepts_text("aaabbb"));
        assert!(!cnf.accepts_text("ba"));
    }

    #[test]
    fn fresh_names_skip_declared_symbols() {
        let options = NormalizationOptions {
            empty_word: EmptyWordPolicy::PreserveAtStart,
            ..Default::default()
        };
        let mut grammar = grammar(
            "S",
            &["S → aSb | T1 X2 S' | ε", "T1 → c", "X2 → d", "S' → e"],
        );
        grammar.to_chomsky_normal_form(&options).unwrap();

        assert_eq!(grammar.start_symbol(), &NonTerminal::new("S''"));
        assert!(grammar.is_chomsky_normal_form());

        let alternatives = |name: &str| {
            grammar
                .productions_of(&NonTerminal::new(name))
                .map(|rhs| rhs.iter().map(ToString::to_string).collect::<Vec<_>>())
        };
        assert_eq!(alternatives("T1"), Some(vec!["c".to_owned()]));
        assert_eq!(alternatives("X2"), Some(vec!["d".to_owned()]));
        assert_eq!(alternatives("S'"), Some(vec!["e".to_owned()]));

        let declared = ["S", "S'", "S''", "T1", "X2"].map(NonTerminal::new);
        let fresh = grammar
            .non_terminals()
            .iter()
            .filter(|nt| !declared.contains(nt))
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        assert!(!fresh.is_empty());
        assert!(fresh
            .iter()
            .all(|name| name.starts_with('T') || name.starts_with('X')));

        let cnf = ChomskyNormalFormGrammar::try_from(&grammar).unwrap();
        for word in ["", "ab", "cde", "acdeb", "aabb"] {
            assert!(cnf.accepts_text(word), "{:?} should be accepted", word);
        }
        for word in ["cd", "ba", "ace"] {
            assert!(!cnf.accepts_text(word), "{:?} should be rejected", word);
        }
    }

    #[test]
    fn empty_language_keeps_start_symbol() {
        let mut grammar = grammar("S", &["S → aS | SS"]);
        grammar
            .to_chomsky_normal_form(&NormalizationOptions::default())
            .unwrap();

        assert_eq!(grammar.non_terminals().len(), 1);
        assert_eq!(grammar.production_count(), 0);

        let mut expected = BitFlags::all();
        expected.remove(GrammarProperty::Productive);
        assert_eq!(grammar.properties(), expected);
    }
}
