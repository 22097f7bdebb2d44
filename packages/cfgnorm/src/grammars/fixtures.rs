use crate::{grammars::context_free::ContextFreeGrammar, language::EPSILON};

/// `S → dB | A`, `A → d | dS | aBdAB`, `B → a | dA | A | ε`, `C → Aa`.
pub(crate) fn lab_grammar() -> ContextFreeGrammar {
    ContextFreeGrammar::from_definition(
        "S",
        &["S", "A", "B", "C"],
        &["a", "d"],
        &[
            ("S", &["dB", "A"]),
            ("A", &["d", "dS", "aBdAB"]),
            ("B", &["a", "dA", "A", EPSILON]),
            ("C", &["Aa"]),
        ],
    )
    .unwrap()
}

pub(crate) fn grammar(start: &str, productions: &[&str]) -> ContextFreeGrammar {
    ContextFreeGrammar::from_productions(start, productions).unwrap()
}
