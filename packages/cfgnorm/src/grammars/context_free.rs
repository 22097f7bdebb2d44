use std::{borrow::Cow, fmt::Display};

use indexmap::{IndexMap, IndexSet};

use crate::{
    error::GrammarError,
    grammars::{
        names::NameGenerator,
        normalize::Stage,
        types::{Grammar, NonTerminal, Production, ProductionSymbol, Terminal},
    },
    language::{Symbol, Word, EPSILON},
};

/// A context-free grammar `(N, T, P, S)`.
///
/// The key set of `productions` is always exactly `non_terminals`, and every symbol on a
/// right-hand side is declared. Empty productions are stored as the empty word.
#[derive(Debug, Clone)]
pub struct ContextFreeGrammar {
    pub(super) start_symbol: NonTerminal,
    pub(super) non_terminals: IndexSet<NonTerminal>,
    pub(super) terminals: IndexSet<Terminal>,
    pub(super) productions: IndexMap<NonTerminal, IndexSet<Production>>,
    pub(super) names: NameGenerator,
}

impl Grammar<Production> for ContextFreeGrammar {
    fn start_symbol(&self) -> &NonTerminal {
        &self.start_symbol
    }

    fn terminals(&self) -> Cow<'_, IndexSet<Terminal>> {
        Cow::Borrowed(&self.terminals)
    }

    fn erasing_productions(&self) -> Cow<'_, IndexSet<NonTerminal>> {
        Cow::Owned(
            self.productions
                .iter()
                .filter(|(_, rhs)| rhs.iter().any(Word::is_empty))
                .map(|(lhs, _)| lhs.clone())
                .collect(),
        )
    }

    fn productions(&self) -> &IndexMap<NonTerminal, IndexSet<Production>> {
        &self.productions
    }
}

impl ContextFreeGrammar {
    /// Builds a grammar from already tagged symbols.
    ///
    /// Nonterminals without productions get an empty production set.
    pub fn new<P>(
        start_symbol: NonTerminal,
        non_terminals: impl IntoIterator<Item = NonTerminal>,
        terminals: impl IntoIterator<Item = Terminal>,
        productions: impl IntoIterator<Item = (NonTerminal, P)>,
    ) -> Result<Self, GrammarError>
    where
        P: IntoIterator<Item = Production>,
    {
        let non_terminals = non_terminals.into_iter().collect::<IndexSet<_>>();
        let terminals = terminals.into_iter().collect::<IndexSet<_>>();

        if let Some(t) = terminals
            .iter()
            .find(|t| non_terminals.contains(&NonTerminal(t.0.clone())))
        {
            return Err(GrammarError::AmbiguousSymbol(t.to_string()));
        }

        if !non_terminals.contains(&start_symbol) {
            return Err(GrammarError::UnknownStartSymbol(start_symbol.to_string()));
        }

        let mut rules = non_terminals
            .iter()
            .map(|nt| (nt.clone(), IndexSet::new()))
            .collect::<IndexMap<_, _>>();

        for (lhs, rhs) in productions {
            let Some(entry) = rules.get_mut(&lhs) else {
                return Err(GrammarError::UndeclaredNonTerminal(lhs.to_string()));
            };

            for word in rhs {
                if let Some(symbol) = word.iter().find(|symbol| match symbol {
                    ProductionSymbol::Terminal(t) => !terminals.contains(t),
                    ProductionSymbol::NonTerminal(nt) => !non_terminals.contains(nt),
                }) {
                    return Err(GrammarError::undeclared(symbol, &lhs, &word));
                }

                entry.insert(word);
            }
        }

        let names = NameGenerator::new(
            non_terminals
                .iter()
                .map(|nt| nt.0.clone())
                .chain(terminals.iter().map(|t| t.0.clone())),
        );

        Ok(Self {
            start_symbol,
            non_terminals,
            terminals,
            productions: rules,
            names,
        })
    }

    /// Builds a grammar from symbol names, resolving every right-hand side symbol against the
    /// declared alphabets.
    ///
    /// An alternative containing whitespace is split on it; otherwise every character is one
    /// symbol. `ε` or an empty string is the empty production.
    pub fn from_definition(
        start_symbol: &str,
        non_terminals: &[&str],
        terminals: &[&str],
        rules: &[(&str, &[&str])],
    ) -> Result<Self, GrammarError> {
        let start_symbol = NonTerminal::new(named(start_symbol, "the start symbol")?);
        let non_terminal_set = non_terminals
            .iter()
            .map(|&name| named(name, "a nonterminal").map(NonTerminal::new))
            .collect::<Result<IndexSet<_>, _>>()?;
        let terminal_set = terminals
            .iter()
            .map(|&name| named(name, "a terminal").map(Terminal::new))
            .collect::<Result<IndexSet<_>, _>>()?;

        let mut productions = Vec::with_capacity(rules.len());

        for &(lhs, alternatives) in rules {
            let lhs = NonTerminal::new(named(lhs, "a left-hand side")?);
            let mut words = Vec::with_capacity(alternatives.len());

            for alternative in alternatives {
                let word = split_alternative(alternative)
                    .into_iter()
                    .map(|name| {
                        let symbol = Symbol::new(name);
                        if non_terminal_set.contains(&NonTerminal(symbol.clone())) {
                            Ok(ProductionSymbol::NonTerminal(NonTerminal(symbol)))
                        } else if terminal_set.contains(&Terminal(symbol.clone())) {
                            Ok(ProductionSymbol::Terminal(Terminal(symbol)))
                        } else {
                            Err(GrammarError::UndeclaredSymbol {
                                symbol: symbol.to_string(),
                                lhs: lhs.to_string(),
                                production: alternative.to_string(),
                            })
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                words.push(Word(word));
            }

            productions.push((lhs, words));
        }

        Self::new(
            start_symbol,
            non_terminal_set,
            terminal_set,
            productions,
        )
    }

    pub fn non_terminals(&self) -> &IndexSet<NonTerminal> {
        &self.non_terminals
    }

    pub fn productions_of(&self, non_terminal: &NonTerminal) -> Option<&IndexSet<Production>> {
        self.productions.get(non_terminal)
    }

    pub fn production_count(&self) -> usize {
        self.productions.values().map(IndexSet::len).sum()
    }

    pub fn iter_productions(&self) -> impl Iterator<Item = (&NonTerminal, &Production)> {
        self.productions
            .iter()
            .flat_map(|(lhs, rhs)| rhs.iter().map(move |word| (lhs, word)))
    }

    /// Verifies the structural invariants every stage has to preserve.
    pub fn check_invariants(&self, stage: Stage) -> Result<(), GrammarError> {
        let violation = |reason: String| GrammarError::InvariantViolation { stage, reason };

        if !self.non_terminals.contains(&self.start_symbol) {
            return Err(violation(format!(
                "start symbol {} is not a nonterminal",
                self.start_symbol
            )));
        }

        if self.productions.len() != self.non_terminals.len()
            || self
                .non_terminals
                .iter()
                .any(|nt| !self.productions.contains_key(nt))
        {
            return Err(violation(
                "production map keys differ from the nonterminal set".to_owned(),
            ));
        }

        if let Some(t) = self
            .terminals
            .iter()
            .find(|t| self.non_terminals.contains(&NonTerminal(t.0.clone())))
        {
            return Err(violation(format!("{} is both terminal and nonterminal", t)));
        }

        for (lhs, word) in self.iter_productions() {
            for symbol in word {
                let declared = match symbol {
                    ProductionSymbol::Terminal(t) => self.terminals.contains(t),
                    ProductionSymbol::NonTerminal(nt) => self.non_terminals.contains(nt),
                };

                if !declared {
                    return Err(violation(format!(
                        "{} → {} references undeclared symbol {}",
                        lhs, word, symbol
                    )));
                }
            }
        }

        Ok(())
    }

    pub(super) fn fresh_non_terminal(
        &mut self,
        prefix: &str,
        productions: IndexSet<Production>,
    ) -> NonTerminal {
        let nt = NonTerminal(self.names.generate(prefix));
        self.non_terminals.insert(nt.clone());
        self.productions.insert(nt.clone(), productions);
        nt
    }

    /// Drops every nonterminal outside `keep`, its rules, and every production that mentions it.
    pub(super) fn retain_non_terminals(&mut self, keep: &IndexSet<NonTerminal>) {
        self.non_terminals.retain(|nt| keep.contains(nt));
        self.productions.retain(|nt, _| keep.contains(nt));

        for rhs in self.productions.values_mut() {
            rhs.retain(|word| word.non_terminals().all(|nt| keep.contains(nt)));
        }
    }
}

impl Display for ContextFreeGrammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.rules())
    }
}

/// `name` unless it is blank, in which case `role` says where the blank name was given.
pub(super) fn named<'a>(name: &'a str, role: &str) -> Result<&'a str, GrammarError> {
    if name.trim().is_empty() {
        return Err(GrammarError::EmptySymbol(role.to_owned()));
    }

    Ok(name)
}

pub(super) fn split_alternative(alternative: &str) -> Vec<&str> {
    let alternative = alternative.trim();

    if alternative.is_empty() || alternative == EPSILON {
        Vec::new()
    } else if alternative.contains(char::is_whitespace) {
        alternative.split_whitespace().collect()
    } else {
        alternative
            .char_indices()
            .map(|(i, c)| &alternative[i..i + c.len_utf8()])
            .collect()
    }
}
