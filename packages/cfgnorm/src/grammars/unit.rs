use indexmap::{indexset, IndexMap, IndexSet};

use crate::grammars::{
    context_free::ContextFreeGrammar,
    types::{NonTerminal, Production},
};

impl ContextFreeGrammar {
    /// For every nonterminal `A`, the nonterminals reachable from `A` through unit productions
    /// only, `A` itself included.
    pub fn unit_closures(&self) -> IndexMap<NonTerminal, IndexSet<NonTerminal>> {
        let mut unit_closures = self
            .non_terminals
            .iter()
            .map(|nt| (nt.clone(), indexset! {nt.clone()}))
            .collect::<IndexMap<_, _>>();

        let mut rounds = 0;
        loop {
            let mut changed = false;
            rounds += 1;

            for closure in unit_closures.values_mut() {
                let next_closure = closure
                    .iter()
                    .filter_map(|closure_nt| self.productions.get(closure_nt))
                    .flatten()
                    .filter_map(Production::as_unit)
                    .filter(|nt| !closure.contains(*nt))
                    .cloned()
                    .collect::<Vec<_>>();

                if !next_closure.is_empty() {
                    closure.extend(next_closure);
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }

        log::trace!("unit closures stable after {} rounds", rounds);

        unit_closures
    }

    /// Replaces the productions of every nonterminal with the non-unit productions of its unit
    /// closure. Unit cycles collapse into a shared closure.
    pub fn eliminate_unit_productions(&mut self) {
        let unit_closures = self.unit_closures();

        let productions = unit_closures
            .iter()
            .map(|(nt, closure)| {
                let rhs = closure
                    .iter()
                    .filter_map(|closure_nt| self.productions.get(closure_nt))
                    .flatten()
                    .filter(|word| word.as_unit().is_none())
                    .cloned()
                    .collect::<IndexSet<_>>();

                (nt.clone(), rhs)
            })
            .collect::<IndexMap<_, _>>();

        self.productions = productions;
    }
}
