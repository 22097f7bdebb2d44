use std::{borrow::Cow, fmt::Display};

use indexmap::{indexset, IndexMap, IndexSet};
use itertools::Itertools;
use tabled::{builder::Builder, settings::Style};

use crate::{
    error::GrammarError,
    grammars::{
        context_free::{split_alternative, ContextFreeGrammar},
        types::{Grammar, NonTerminal, Production, ProductionSymbol, ProductionWord, Terminal},
    },
    language::Word,
};

impl ContextFreeGrammar {
    /// Replaces every terminal inside a right-hand side of length two or more with a fresh
    /// nonterminal that derives exactly that terminal. One fresh nonterminal per terminal.
    pub fn isolate_terminals(&mut self) {
        let embedded_terminals = self
            .iter_productions()
            .filter(|(_, word)| word.len() >= 2)
            .flat_map(|(_, word)| word.iter().filter_map(ProductionSymbol::as_terminal))
            .cloned()
            .collect::<IndexSet<_>>();

        let mut replacements = IndexMap::with_capacity(embedded_terminals.len());
        for t in embedded_terminals {
            let nt = self.fresh_non_terminal(
                "T",
                indexset! {Word(vec![ProductionSymbol::Terminal(t.clone())])},
            );
            log::trace!("{} stands in for terminal {}", nt, t);
            replacements.insert(t, nt);
        }

        for rhs in self.productions.values_mut() {
            *rhs = rhs
                .iter()
                .map(|word| {
                    if word.len() < 2 {
                        return word.clone();
                    }

                    Word::new(word.iter().map(|symbol| match symbol {
                        ProductionSymbol::Terminal(t) => {
                            ProductionSymbol::NonTerminal(replacements[t].clone())
                        }
                        ProductionSymbol::NonTerminal(_) => symbol.clone(),
                    }))
                })
                .collect();
        }
    }

    /// Splits every right-hand side longer than two symbols into a left-branching chain of
    /// fresh binary nonterminals.
    pub fn binarize(&mut self) {
        let productions = std::mem::take(&mut self.productions);
        let mut binarized = IndexMap::with_capacity(productions.len());

        for (lhs, rhs) in productions {
            let rhs = rhs
                .into_iter()
                .map(|word| self.split_long_production(word))
                .collect::<IndexSet<_>>();

            binarized.insert(lhs, rhs);
        }

        // The chains allocated while splitting.
        binarized.extend(std::mem::take(&mut self.productions));

        self.productions = binarized;
    }

    fn split_long_production(&mut self, word: Production) -> Production {
        let mut symbols = word.0;

        while symbols.len() > 2 {
            let pair = symbols.drain(..2).collect::<Vec<_>>();
            let nt = self.fresh_non_terminal("X", indexset! {Word(pair)});
            symbols.insert(0, ProductionSymbol::NonTerminal(nt));
        }

        Word(symbols)
    }

    /// Whether every production is `A → BC`, `A → a`, or `S → ε` for the start symbol `S`.
    pub fn is_chomsky_normal_form(&self) -> bool {
        self.iter_productions()
            .all(|(lhs, word)| is_cnf_production(lhs, word, &self.start_symbol))
    }
}

fn is_cnf_production(lhs: &NonTerminal, word: &Production, start_symbol: &NonTerminal) -> bool {
    match word.0.as_slice() {
        [] => lhs == start_symbol,
        [ProductionSymbol::Terminal(_)] => true,
        [ProductionSymbol::NonTerminal(_), ProductionSymbol::NonTerminal(_)] => true,
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CnfWord {
    Terminal(Terminal),
    NonTerminals(NonTerminal, NonTerminal),
}

impl Display for CnfWord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_word())
    }
}

impl CnfWord {
    /// `None` unless `word` is a single terminal or a pair of nonterminals.
    pub fn from_production(word: &Production) -> Option<Self> {
        match word.0.as_slice() {
            [ProductionSymbol::Terminal(t)] => Some(Self::Terminal(t.clone())),
            [ProductionSymbol::NonTerminal(left), ProductionSymbol::NonTerminal(right)] => {
                Some(Self::NonTerminals(left.clone(), right.clone()))
            }
            _ => None,
        }
    }
}

impl ProductionWord for CnfWord {
    fn to_word(&self) -> Production {
        match self {
            CnfWord::Terminal(t) => Word::new([t.clone().into()]),
            CnfWord::NonTerminals(left, right) => {
                Word::new([left.clone().into(), right.clone().into()])
            }
        }
    }
}

/// A grammar whose shape is guaranteed to be Chomsky normal form by its types.
#[derive(Debug, Clone)]
pub struct ChomskyNormalFormGrammar {
    start_symbol: NonTerminal,
    is_start_symbol_erasable: bool,
    terminals: IndexSet<Terminal>,
    productions: IndexMap<NonTerminal, IndexSet<CnfWord>>,
}

impl Grammar<CnfWord> for ChomskyNormalFormGrammar {
    fn start_symbol(&self) -> &NonTerminal {
        &self.start_symbol
    }

    fn terminals(&self) -> Cow<'_, IndexSet<Terminal>> {
        Cow::Borrowed(&self.terminals)
    }

    fn erasing_productions(&self) -> Cow<'_, IndexSet<NonTerminal>> {
        Cow::Owned(if self.is_start_symbol_erasable {
            indexset! {self.start_symbol.clone()}
        } else {
            IndexSet::new()
        })
    }

    fn productions(&self) -> &IndexMap<NonTerminal, IndexSet<CnfWord>> {
        &self.productions
    }
}

impl TryFrom<&ContextFreeGrammar> for ChomskyNormalFormGrammar {
    type Error = GrammarError;

    fn try_from(cfg: &ContextFreeGrammar) -> Result<Self, Self::Error> {
        let mut cnf = Self {
            start_symbol: cfg.start_symbol.clone(),
            is_start_symbol_erasable: false,
            terminals: cfg.terminals.clone(),
            productions: IndexMap::with_capacity(cfg.productions.len()),
        };

        for (lhs, rhs) in &cfg.productions {
            let entry = cnf.productions.entry(lhs.clone()).or_default();

            for word in rhs {
                if word.is_empty() && lhs == &cfg.start_symbol {
                    cnf.is_start_symbol_erasable = true;
                    continue;
                }

                let cnf_word = CnfWord::from_production(word).ok_or_else(|| {
                    GrammarError::NotInNormalForm {
                        lhs: lhs.to_string(),
                        production: word.to_string(),
                    }
                })?;
                entry.insert(cnf_word);
            }
        }

        Ok(cnf)
    }
}

impl ChomskyNormalFormGrammar {
    pub fn is_start_symbol_erasable(&self) -> bool {
        self.is_start_symbol_erasable
    }

    /// Runs the Cocke–Younger–Kasami algorithm on `word`.
    pub fn cyk(&self, word: &[Terminal]) -> CykTable {
        let n = word.len();
        let mut cells = vec![vec![IndexSet::new(); n]; n];

        let (terminal_rules, pair_rules): (Vec<_>, Vec<_>) = self
            .productions
            .iter()
            .flat_map(|(lhs, rhs)| rhs.iter().map(move |body| (lhs, body)))
            .partition(|(_, body)| matches!(body, CnfWord::Terminal(_)));

        for (i, symbol) in word.iter().enumerate() {
            for &(lhs, body) in &terminal_rules {
                if matches!(body, CnfWord::Terminal(t) if t == symbol) {
                    cells[i][i].insert(lhs.clone());
                }
            }
        }

        for span in 2..=n {
            for i in 0..=n - span {
                let j = i + span - 1;
                let mut derived = IndexSet::new();

                for k in i..j {
                    for &(lhs, body) in &pair_rules {
                        if let CnfWord::NonTerminals(left, right) = body {
                            if cells[i][k].contains(left) && cells[k + 1][j].contains(right) {
                                derived.insert(lhs.clone());
                            }
                        }
                    }
                }

                cells[i][j] = derived;
            }
        }

        CykTable {
            cells,
            word: Word::new(word.iter().cloned()).to_string(),
            start_symbol: self.start_symbol.clone(),
            is_start_symbol_erasable: self.is_start_symbol_erasable,
        }
    }

    pub fn accepts(&self, word: &[Terminal]) -> bool {
        self.cyk(word).is_word_in_language()
    }

    /// Like [`accepts`](Self::accepts), splitting `text` into terminals the way rule
    /// alternatives are split.
    pub fn accepts_text(&self, text: &str) -> bool {
        self.accepts(&terminals_of(text))
    }
}

/// Splits `text` into terminals: on whitespace if it contains any, otherwise per character.
pub fn terminals_of(text: &str) -> Vec<Terminal> {
    split_alternative(text)
        .into_iter()
        .map(Terminal::new)
        .collect()
}

/// Cell `(i, j)` holds every nonterminal deriving the terminals `i..=j` of the word.
#[derive(Debug, Clone)]
pub struct CykTable {
    cells: Vec<Vec<IndexSet<NonTerminal>>>,
    word: String,
    start_symbol: NonTerminal,
    is_start_symbol_erasable: bool,
}

impl CykTable {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Zero-based and inclusive on both ends; `i <= j < len()`.
    pub fn cell(&self, i: usize, j: usize) -> &IndexSet<NonTerminal> {
        &self.cells[i][j]
    }

    pub fn is_word_in_language(&self) -> bool {
        match self.cells.len() {
            0 => self.is_start_symbol_erasable,
            n => self.cells[0][n - 1].contains(&self.start_symbol),
        }
    }
}

impl Display for CykTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let accepted = self.is_word_in_language();
        let verdict = if accepted { "accepted" } else { "rejected" };
        let n = self.cells.len();

        if n == 0 {
            return writeln!(
                f,
                "The empty word is {}: {} {} erasable.",
                verdict,
                self.start_symbol,
                if accepted { "is" } else { "is not" }
            );
        }

        writeln!(f, "CYK Table for word \"{}\":", self.word)?;

        // Longest span on top, so the deciding cell V_1,n sits in the first row.
        let mut builder = Builder::default();
        for span in (1..=n).rev() {
            let mut record = vec![format!("length {}", span)];
            record.extend((0..=n - span).map(|i| {
                let j = i + span - 1;
                let cell = &self.cells[i][j];
                let contents = if cell.is_empty() {
                    "∅".to_owned()
                } else {
                    format!("{{{}}}", cell.iter().join(", "))
                };

                format!("V_{},{} = {}", i + 1, j + 1, contents)
            }));
            record.resize(n + 1, String::new());

            builder.push_record(record);
        }

        let mut table = builder.build();
        table.with(Style::rounded());
        writeln!(f, "{}", table)?;

        writeln!(
            f,
            "The word \"{}\" is {}: {} {} in V_1,{}.",
            self.word,
            verdict,
            self.start_symbol,
            if accepted { "is" } else { "is not" },
            n
        )
    }
}
