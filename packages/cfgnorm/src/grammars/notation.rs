use indexmap::IndexSet;
use winnow::{
    ascii::space0,
    combinator::{alt, delimited, eof, separated, terminated},
    error::{ContextError, ErrMode},
    token::take_while,
    Parser,
};

use crate::{
    error::GrammarError,
    grammars::{
        context_free::{named, split_alternative, ContextFreeGrammar},
        types::{NonTerminal, Production, ProductionSymbol, Terminal},
    },
    language::Word,
};

type NotationResult<T> = Result<T, ErrMode<ContextError>>;

fn left_hand_side<'s>(input: &mut &'s str) -> NotationResult<&'s str> {
    delimited(
        space0,
        take_while(1.., |c: char| {
            !c.is_whitespace() && c != '|' && c != '-' && c != '→'
        }),
        space0,
    )
    .parse_next(input)
}

fn arrow<'s>(input: &mut &'s str) -> NotationResult<&'s str> {
    alt(("→", "->")).parse_next(input)
}

fn alternatives<'s>(input: &mut &'s str) -> NotationResult<Vec<&'s str>> {
    terminated(
        separated(1.., take_while(0.., |c: char| c != '|'), '|'),
        eof,
    )
    .parse_next(input)
}

/// `A → x | y | ε` (or `A -> ...`) split into its left-hand side and raw alternatives.
fn rule<'s>(input: &mut &'s str) -> NotationResult<(&'s str, Vec<&'s str>)> {
    let lhs = left_hand_side.parse_next(input)?;
    arrow.parse_next(input)?;
    let alternatives = alternatives.parse_next(input)?;

    Ok((lhs, alternatives))
}

fn is_non_terminal_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

impl ContextFreeGrammar {
    /// Builds a grammar from rules written as `A → aB | b | ε`.
    ///
    /// Left-hand sides and symbols starting with an uppercase letter are nonterminals, everything
    /// else is a terminal. Alternatives are split into symbols the same way as in
    /// [`ContextFreeGrammar::from_definition`].
    pub fn from_productions<S: AsRef<str>>(
        start_symbol: &str,
        productions: &[S],
    ) -> Result<Self, GrammarError> {
        let start_symbol = NonTerminal::new(named(start_symbol, "the start symbol")?);
        let mut non_terminals = IndexSet::from([start_symbol.clone()]);
        let mut terminals = IndexSet::new();
        let mut rules = Vec::with_capacity(productions.len());

        for line in productions {
            let line = line.as_ref();
            let (lhs, alternatives) =
                rule.parse(line).map_err(|error| GrammarError::Notation {
                    line: line.to_owned(),
                    message: error.to_string(),
                })?;

            let lhs = NonTerminal::new(lhs);
            non_terminals.insert(lhs.clone());

            let mut words = Vec::with_capacity(alternatives.len());
            for alternative in alternatives {
                if alternative.trim().is_empty() {
                    return Err(GrammarError::Notation {
                        line: line.to_owned(),
                        message: "empty alternative, write ε for the empty word".to_owned(),
                    });
                }

                let word: Production = Word::new(split_alternative(alternative).into_iter().map(
                    |name| {
                        if is_non_terminal_name(name) {
                            let nt = NonTerminal::new(name);
                            non_terminals.insert(nt.clone());
                            ProductionSymbol::NonTerminal(nt)
                        } else {
                            let t = Terminal::new(name);
                            terminals.insert(t.clone());
                            ProductionSymbol::Terminal(t)
                        }
                    },
                ));

                words.push(word);
            }

            rules.push((lhs, words));
        }

        Self::new(start_symbol, non_terminals, terminals, rules)
    }
}
