use anyhow::{Context, Result};
use cfgnorm::grammar::{
    terminals_of, BitFlags, ChomskyNormalFormGrammar, ContextFreeGrammar, EmptyWordPolicy,
    Grammar, GrammarProperty, NormalizationOptions, EPSILON,
};
use clap::Parser;
use log::info;
use tabled::{builder::Builder, settings::Style};

/// Converts a context-free grammar to Chomsky normal form.
///
/// Without any --rule, the grammar
/// S → dB | A, A → d | dS | aBdAB, B → a | dA | A | ε, C → Aa is used.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// A rule such as "S → aSb | ε" (or "S -> aSb | ε"). Repeat for every nonterminal.
    #[arg(short, long = "rule", value_name = "RULE")]
    rules: Vec<String>,

    /// Start symbol of the grammar given with --rule.
    #[arg(short, long, default_value = "S")]
    start: String,

    /// Print the grammar after every stage.
    #[arg(long)]
    steps: bool,

    /// Keep the empty word derivable from the start symbol.
    #[arg(long)]
    preserve_empty: bool,

    /// Print a table of symbol and production counts per stage.
    #[arg(long)]
    summary: bool,

    /// Check a word against the normalized grammar. Repeatable.
    #[arg(short, long = "word", value_name = "WORD")]
    words: Vec<String>,

    /// Print the CYK table for every checked word.
    #[arg(long)]
    cyk_tables: bool,

    /// More logging; repeat for more detail. RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn lab_grammar() -> Result<ContextFreeGrammar> {
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
    .context("building the default grammar")
}

fn read_grammar(args: &Args) -> Result<ContextFreeGrammar> {
    if args.rules.is_empty() {
        return lab_grammar();
    }

    ContextFreeGrammar::from_productions(&args.start, &args.rules)
        .context("reading the grammar rules")
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn describe(properties: BitFlags<GrammarProperty>) -> String {
    if properties.is_empty() {
        return "-".to_owned();
    }

    properties
        .iter()
        .map(|property| property.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut grammar = read_grammar(&args)?;
    let options = NormalizationOptions {
        empty_word: if args.preserve_empty {
            EmptyWordPolicy::PreserveAtStart
        } else {
            EmptyWordPolicy::Discard
        },
        ..Default::default()
    };

    println!("Original grammar:\n{}", grammar.definition());

    let mut summary = Builder::default();
    summary.push_record(["stage", "nonterminals", "productions", "properties"]);
    summary.push_record([
        "original".to_owned(),
        grammar.non_terminals().len().to_string(),
        grammar.production_count().to_string(),
        describe(grammar.properties()),
    ]);

    let mut step = 0;
    grammar.to_chomsky_normal_form_with(&options, |stage, grammar| {
        step += 1;
        info!("finished {}", stage);

        if args.steps {
            println!("{}. After {}:\n{}", step, stage, grammar);
        }

        summary.push_record([
            stage.to_string(),
            grammar.non_terminals().len().to_string(),
            grammar.production_count().to_string(),
            describe(grammar.properties()),
        ]);
    })?;

    println!("Chomsky normal form:\n{}", grammar.definition());
    println!("In Chomsky normal form: {}", grammar.is_chomsky_normal_form());

    if args.summary {
        let mut table = summary.build();
        table.with(Style::rounded());
        println!("\n{}", table);
    }

    if !args.words.is_empty() {
        let cnf = ChomskyNormalFormGrammar::try_from(&grammar)?;

        for word in &args.words {
            let terminals = terminals_of(word);

            if args.cyk_tables {
                println!("\n{}", cnf.cyk(&terminals));
            } else {
                let verdict = if cnf.accepts(&terminals) {
                    "accepted"
                } else {
                    "rejected"
                };
                println!("{:?}: {}", word, verdict);
            }
        }
    }

    Ok(())
}
