use std::{borrow::Cow, fmt::Display, hash::Hash};

use derive_more::{Display, From};
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;

use crate::language::{Symbol, Word, EPSILON};

#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Terminal(pub Symbol);

#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonTerminal(pub Symbol);

impl Terminal {
    pub fn new(name: impl Into<String>) -> Self {
        Terminal(Symbol::new(name))
    }
}

impl NonTerminal {
    pub fn new(name: impl Into<String>) -> Self {
        NonTerminal(Symbol::new(name))
    }
}

#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, From)]
pub enum ProductionSymbol {
    Terminal(Terminal),
    NonTerminal(NonTerminal),
}

impl ProductionSymbol {
    pub fn as_non_terminal(&self) -> Option<&NonTerminal> {
        match self {
            ProductionSymbol::NonTerminal(nt) => Some(nt),
            ProductionSymbol::Terminal(_) => None,
        }
    }

    pub fn as_terminal(&self) -> Option<&Terminal> {
        match self {
            ProductionSymbol::Terminal(t) => Some(t),
            ProductionSymbol::NonTerminal(_) => None,
        }
    }
}

impl AsRef<Symbol> for Terminal {
    fn as_ref(&self) -> &Symbol {
        &self.0
    }
}

impl AsRef<Symbol> for NonTerminal {
    fn as_ref(&self) -> &Symbol {
        &self.0
    }
}

impl AsRef<Symbol> for ProductionSymbol {
    fn as_ref(&self) -> &Symbol {
        match self {
            ProductionSymbol::Terminal(t) => t.as_ref(),
            ProductionSymbol::NonTerminal(nt) => nt.as_ref(),
        }
    }
}

/// A right-hand side of a production.
pub type Production = Word<ProductionSymbol>;

impl Production {
    /// The single nonterminal of a unit production, if this is one.
    pub fn as_unit(&self) -> Option<&NonTerminal> {
        match self.0.as_slice() {
            [symbol] => symbol.as_non_terminal(),
            _ => None,
        }
    }

    pub fn non_terminals(&self) -> impl Iterator<Item = &NonTerminal> {
        self.0.iter().filter_map(ProductionSymbol::as_non_terminal)
    }
}

pub trait ProductionWord: Display + Clone + Eq + Hash {
    fn to_word(&self) -> Production;
}

impl ProductionWord for Production {
    fn to_word(&self) -> Production {
        self.clone()
    }
}

pub trait Grammar<R: ProductionWord> {
    fn start_symbol(&self) -> &NonTerminal;
    fn terminals(&self) -> Cow<'_, IndexSet<Terminal>>;
    fn erasing_productions(&self) -> Cow<'_, IndexSet<NonTerminal>>;
    fn productions(&self) -> &IndexMap<NonTerminal, IndexSet<R>>;

    /// One `A → x | y` line per nonterminal, in declaration order.
    fn rules(&self) -> String {
        let erasing_productions = self.erasing_productions();
        let mut rules = String::new();

        for (lhs, rhs) in self.productions() {
            let mut alternatives = rhs
                .iter()
                .filter(|word| !word.to_word().is_empty())
                .map(ToString::to_string)
                .collect::<Vec<_>>();

            if erasing_productions.contains(lhs) {
                alternatives.push(EPSILON.to_owned());
            }

            if alternatives.is_empty() {
                rules += &format!("{} → ∅\n", lhs);
            } else {
                rules += &format!("{} → {}\n", lhs, alternatives.join(" | "));
            }
        }

        rules
    }

    /// The formal tuple `G = (N, T, P, S)` followed by the rules, one per line.
    ///
    /// The start symbol is listed first; the other symbols are sorted by name.
    fn definition(&self) -> String {
        let start_symbol = self.start_symbol();
        let non_terminals = std::iter::once(start_symbol)
            .chain(
                self.productions()
                    .keys()
                    .filter(|nt| *nt != start_symbol)
                    .sorted(),
            )
            .join(", ");
        let terminals = self.terminals().iter().sorted().join(", ");

        let body = self
            .rules()
            .lines()
            .map(|line| format!("  {}\n", line))
            .collect::<String>();

        format!(
            "G = ({{{}}}, {{{}}}, P, {})\n\nP = {{\n{}}}\n",
            non_terminals, terminals, start_symbol, body
        )
    }
}
