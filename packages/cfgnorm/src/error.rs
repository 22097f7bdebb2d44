use thiserror::Error;

use crate::grammars::{
    normalize::Stage,
    types::{NonTerminal, Production},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("start symbol {0} is not a declared nonterminal")]
    UnknownStartSymbol(String),
    #[error("empty symbol name given as {0}")]
    EmptySymbol(String),
    #[error("symbol {0} is declared both as a terminal and as a nonterminal")]
    AmbiguousSymbol(String),
    #[error("productions are given for {0}, which is not a declared nonterminal")]
    UndeclaredNonTerminal(String),
    #[error("symbol {symbol} in production {lhs} → {production} is neither a declared terminal nor a declared nonterminal")]
    UndeclaredSymbol {
        symbol: String,
        lhs: String,
        production: String,
    },
    #[error("invalid rule notation in {line:?}: {message}")]
    Notation { line: String, message: String },
    #[error("grammar invariant broken after {stage}: {reason}")]
    InvariantViolation { stage: Stage, reason: String },
    #[error("production {lhs} → {production} is not in Chomsky normal form")]
    NotInNormalForm { lhs: String, production: String },
}

impl GrammarError {
    pub(crate) fn undeclared(symbol: impl ToString, lhs: &NonTerminal, production: &Production) -> Self {
        GrammarError::UndeclaredSymbol {
            symbol: symbol.to_string(),
            lhs: lhs.to_string(),
            production: production.to_string(),
        }
    }
}
