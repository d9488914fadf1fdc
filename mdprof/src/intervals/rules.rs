use log::debug;

use crate::domain::{Address, Categories, RuleError, TrackId};
use crate::symbolization::SymbolResolver;

/// Prefix marking labels that exist only to be interval boundaries
const MDP_LABEL_PREFIX: &str = "mdp_label_";

/// Index of a rule inside its [`IntervalRuleTable`](super::IntervalRuleTable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub usize);

/// One manual interval definition with resolved addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalRule {
    pub entry_addresses: Vec<Address>,
    pub exit_addresses: Vec<Address>,
    pub name: String,
    /// Category the interval is drawn on
    pub track: TrackId,
}

impl IntervalRule {
    #[must_use]
    pub fn new(entries: &[u32], exits: &[u32], name: &str, track: TrackId) -> Self {
        Self {
            entry_addresses: entries.iter().copied().map(Address).collect(),
            exit_addresses: exits.iter().copied().map(Address).collect(),
            name: name.to_string(),
            track,
        }
    }

    #[must_use]
    pub fn is_entry(&self, address: Address) -> bool {
        self.entry_addresses.contains(&address)
    }

    #[must_use]
    pub fn is_exit(&self, address: Address) -> bool {
        self.exit_addresses.contains(&address)
    }
}

/// Parse an interval definition file
///
/// Returns the rules in file order together with the category registry that
/// assigned track ids to user categories.
///
/// # Errors
/// Returns an error naming the 1-based line of the first element that does not
/// resolve, or of a rule whose entry or exit list is empty.
pub fn parse_rules<R: SymbolResolver + ?Sized>(
    input: &str,
    symbols: &R,
) -> Result<(Vec<IntervalRule>, Categories), RuleError> {
    let mut rules = Vec::new();
    let mut categories = Categories::new();

    for (n, line) in input.lines().enumerate() {
        let line_no = n + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields[0].is_empty() {
            continue;
        }

        let (entries, exits) = if fields.len() == 1 {
            let stem = fields[0];
            (
                resolve_element(&format!("{stem}_start"), symbols, line_no)?,
                resolve_element(&format!("{stem}_end"), symbols, line_no)?,
            )
        } else {
            (
                resolve_list(fields[0], symbols, line_no, "entry")?,
                resolve_list(fields[1], symbols, line_no, "exit")?,
            )
        };

        let name = match fields.get(2) {
            Some(name) if !name.is_empty() => (*name).to_string(),
            _ if fields.len() == 1 => fields[0].to_string(),
            _ => trimmed.to_string(),
        };
        let track = fields.get(3).map_or(TrackId::MAIN_THREAD, |c| categories.intern(c));

        debug!(
            "Interval rule {name:?} on {}: {} entries, {} exits",
            categories.name(track),
            entries.len(),
            exits.len()
        );
        rules.push(IntervalRule {
            entry_addresses: entries.into_iter().map(Address).collect(),
            exit_addresses: exits.into_iter().map(Address).collect(),
            name,
            track,
        });
    }

    Ok((rules, categories))
}

fn resolve_list<R: SymbolResolver + ?Sized>(
    list: &str,
    symbols: &R,
    line: usize,
    field: &'static str,
) -> Result<Vec<u32>, RuleError> {
    let mut addresses = Vec::new();
    for element in list.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        addresses.extend(resolve_element(element, symbols, line)?);
    }
    if addresses.is_empty() {
        return Err(RuleError::EmptyAddressList { line, field });
    }
    Ok(addresses)
}

/// Exact label, then hex literal, then every `mdp_label_<element>*` label
fn resolve_element<R: SymbolResolver + ?Sized>(
    element: &str,
    symbols: &R,
    line: usize,
) -> Result<Vec<u32>, RuleError> {
    if let Some(address) = symbols.lookup(element) {
        return Ok(vec![address]);
    }

    let digits = element
        .strip_prefix("0x")
        .or_else(|| element.strip_prefix("0X"))
        .or_else(|| element.strip_prefix('$'))
        .unwrap_or(element);
    if let Ok(address) = u32::from_str_radix(digits, 16) {
        return Ok(vec![address]);
    }

    let family = symbols.with_prefix(&format!("{MDP_LABEL_PREFIX}{element}"));
    if family.is_empty() {
        return Err(RuleError::Unresolved { line, element: element.to_string() });
    }
    Ok(family)
}
