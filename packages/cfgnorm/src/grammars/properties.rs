use derive_more::Display;
use enumflags2::{bitflags, BitFlags};

use crate::grammars::context_free::ContextFreeGrammar;

#[bitflags]
#[repr(u8)]
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum GrammarProperty {
    /// No empty production except possibly on the start symbol.
    #[display("ε-free")]
    EpsilonFree = 0b00001,
    #[display("unit-free")]
    UnitFree = 0b00010,
    /// Every nonterminal is reachable from the start symbol.
    #[display("accessible")]
    Accessible = 0b00100,
    /// Every nonterminal derives some terminal word.
    #[display("productive")]
    Productive = 0b01000,
    #[display("Chomsky normal form")]
    ChomskyNormalForm = 0b10000,
}

impl ContextFreeGrammar {
    pub fn properties(&self) -> BitFlags<GrammarProperty> {
        let mut properties = BitFlags::empty();

        if self
            .iter_productions()
            .all(|(lhs, word)| !word.is_empty() || lhs == &self.start_symbol)
        {
            properties |= GrammarProperty::EpsilonFree;
        }

        if self
            .iter_productions()
            .all(|(_, word)| word.as_unit().is_none())
        {
            properties |= GrammarProperty::UnitFree;
        }

        if self.accessible_non_terminals().len() == self.non_terminals.len() {
            properties |= GrammarProperty::Accessible;
        }

        if self.productive_non_terminals().len() == self.non_terminals.len() {
            properties |= GrammarProperty::Productive;
        }

        if self.is_chomsky_normal_form() {
            properties |= GrammarProperty::ChomskyNormalForm;
        }

        properties
    }
}
