pub use enumflags2::BitFlags;

pub use crate::{
    error::GrammarError,
    grammars::{
        chomsky_normal_form::{terminals_of, ChomskyNormalFormGrammar, CnfWord, CykTable},
        context_free::ContextFreeGrammar,
        normalize::{EmptyWordPolicy, NormalizationOptions, Stage},
        properties::GrammarProperty,
        types::{Grammar, NonTerminal, Production, ProductionSymbol, ProductionWord, Terminal},
    },
    language::{Symbol, Word, EPSILON},
};
