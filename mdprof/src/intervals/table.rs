use log::warn;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use super::rules::{parse_rules, IntervalRule, RuleId};
use crate::domain::{Address, Categories, RuleError};
use crate::symbolization::SymbolResolver;

/// Compiled interval rules, indexed by breakpoint address
///
/// Built once before reconstruction and never mutated afterwards; the engine
/// keeps its own per-rule open/closed state.
#[derive(Debug, Default, Clone)]
pub struct IntervalRuleTable {
    rules: Vec<IntervalRule>,
    by_address: HashMap<Address, Vec<RuleId>>,
    categories: Categories,
}

impl IntervalRuleTable {
    /// Index rules by every address that can open or close them
    ///
    /// Rules with an empty entry or exit set could never complete and are
    /// dropped with a warning.
    #[must_use]
    pub fn compile(rules: Vec<IntervalRule>, categories: Categories) -> Self {
        let mut kept = Vec::with_capacity(rules.len());
        let mut by_address: HashMap<Address, Vec<RuleId>> = HashMap::new();

        for rule in rules {
            if rule.entry_addresses.is_empty() || rule.exit_addresses.is_empty() {
                warn!("Ignoring interval rule {:?}: empty entry or exit address set", rule.name);
                continue;
            }
            let id = RuleId(kept.len());
            let addresses: BTreeSet<Address> =
                rule.entry_addresses.iter().chain(&rule.exit_addresses).copied().collect();
            for address in addresses {
                by_address.entry(address).or_default().push(id);
            }
            kept.push(rule);
        }

        Self { rules: kept, by_address, categories }
    }

    /// Parse and compile a definition file's contents
    ///
    /// # Errors
    /// Returns an error if a line fails to parse or resolve
    pub fn parse<R: SymbolResolver + ?Sized>(input: &str, symbols: &R) -> Result<Self, RuleError> {
        let (rules, categories) = parse_rules(input, symbols)?;
        Ok(Self::compile(rules, categories))
    }

    /// # Errors
    /// Returns an error if the file cannot be read or fails to parse
    pub fn from_file<P: AsRef<Path>, R: SymbolResolver + ?Sized>(
        path: P,
        symbols: &R,
    ) -> Result<Self, RuleError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::parse(&String::from_utf8_lossy(&bytes), symbols)
    }

    /// Rules that list `address` as an entry, an exit or both, in definition order
    #[must_use]
    pub fn matching(&self, address: Address) -> &[RuleId] {
        self.by_address.get(&address).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn rule(&self, id: RuleId) -> &IntervalRule {
        &self.rules[id.0]
    }

    #[must_use]
    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    /// Every watched address, sorted and de-duplicated
    #[must_use]
    pub fn addresses(&self) -> BTreeSet<Address> {
        self.by_address.keys().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
