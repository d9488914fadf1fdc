use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use super::SymbolResolver;
use crate::domain::SymbolError;

/// asm68k symbol record kinds
const ASM68K_GLOBAL_LABEL: u8 = 2;
const ASM68K_LOCAL_LABEL: u8 = 6;

/// Bytes skipped at the start of an asm68k symbol file
const ASM68K_HEADER_SIZE: usize = 8;

/// Symbol file flavour, detected from the first bytes of the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolDialect {
    Asm68k,
    AsListing,
    Nm,
}

impl SymbolDialect {
    #[must_use]
    pub fn detect(input: &[u8]) -> Self {
        if input.starts_with(b"MND") {
            SymbolDialect::Asm68k
        } else if input.starts_with(b"Segment CODE") {
            SymbolDialect::AsListing
        } else {
            SymbolDialect::Nm
        }
    }
}

/// Immutable address ↔ label table
///
/// Several labels may share one address; the last one read is used for
/// display. Label lookups are exact and case-sensitive.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    address_to_labels: HashMap<u32, Vec<String>>,
    label_to_address: BTreeMap<String, u32>,
}

impl SymbolTable {
    /// Load and parse a symbol file of any supported dialect
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is malformed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SymbolError> {
        let input = fs::read(path.as_ref())?;
        Self::parse(&input)
    }

    /// # Errors
    /// Returns an error if the input is malformed for its detected dialect
    pub fn parse(input: &[u8]) -> Result<Self, SymbolError> {
        let dialect = SymbolDialect::detect(input);
        let table = match dialect {
            SymbolDialect::Asm68k => parse_asm68k(input)?,
            SymbolDialect::AsListing => parse_as_listing(input)?,
            SymbolDialect::Nm => parse_nm(input),
        };
        debug!("Loaded {} symbols ({dialect:?})", table.len());
        Ok(table)
    }

    /// Build a table from (address, label) pairs
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, &'a str)>,
    {
        let mut table = Self::default();
        for (address, label) in pairs {
            table.insert(address, label.to_string());
        }
        table
    }

    pub fn insert(&mut self, address: u32, label: String) {
        self.address_to_labels.entry(address).or_default().push(label.clone());
        self.label_to_address.insert(label, address);
    }

    /// Number of distinct labels
    #[must_use]
    pub fn len(&self) -> usize {
        self.label_to_address.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.label_to_address.is_empty()
    }
}

impl SymbolResolver for SymbolTable {
    fn resolve(&self, address: u32) -> Option<&str> {
        self.address_to_labels.get(&address).and_then(|labels| labels.last()).map(String::as_str)
    }

    fn lookup(&self, label: &str) -> Option<u32> {
        self.label_to_address.get(label).copied()
    }

    fn with_prefix(&self, prefix: &str) -> Vec<u32> {
        self.label_to_address
            .range(prefix.to_string()..)
            .take_while(|(label, _)| label.starts_with(prefix))
            .map(|(_, &address)| address)
            .collect()
    }
}

/// asm68k `/p` dump: 8-byte header, then `address:u32le kind:u8 len:u8 name`
///
/// Local labels follow all global ones and are qualified with the nearest
/// global label below them.
fn parse_asm68k(input: &[u8]) -> Result<SymbolTable, SymbolError> {
    let mut by_address: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    let mut table = SymbolTable::default();
    let mut i = ASM68K_HEADER_SIZE;

    while i < input.len() {
        let record_start = i;
        let fixed = input.get(i..i + 6).ok_or(SymbolError::Truncated { offset: record_start })?;
        let address = u32::from_le_bytes([fixed[0], fixed[1], fixed[2], fixed[3]]);
        let kind = fixed[4];
        let len = fixed[5] as usize;
        i += 6;

        let name_bytes =
            input.get(i..i + len).ok_or(SymbolError::Truncated { offset: record_start })?;
        let name = String::from_utf8_lossy(name_bytes).into_owned();
        i += len;

        let label = match kind {
            ASM68K_GLOBAL_LABEL => name,
            ASM68K_LOCAL_LABEL => {
                let parent = by_address
                    .range(..address)
                    .next_back()
                    .and_then(|(_, labels)| labels.last())
                    .ok_or_else(|| SymbolError::OrphanLocalLabel {
                        label: name.clone(),
                        offset: record_start,
                    })?;
                format!("{parent}{name}")
            }
            _ => {
                return Err(SymbolError::UnknownLabelKind {
                    kind,
                    label: name,
                    offset: record_start,
                })
            }
        };

        by_address.entry(address).or_default().push(label.clone());
        table.insert(address, label);
    }

    Ok(table)
}

/// AS listing: `NAME TYPE VALUE ...` rows after the `Symbols in Segment` banner
fn parse_as_listing(input: &[u8]) -> Result<SymbolTable, SymbolError> {
    let text = String::from_utf8_lossy(input);
    let (_, symbols) =
        text.split_once("Symbols in Segment").ok_or(SymbolError::MissingSymbolSection)?;
    let banner_line = text.lines().take_while(|l| !l.contains("Symbols in Segment")).count() + 1;

    let mut table = SymbolTable::default();
    for (n, line) in symbols.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split_ascii_whitespace();
        let (Some(name), Some(kind)) = (fields.next(), fields.next()) else {
            return Err(SymbolError::MalformedLine {
                line: banner_line + n,
                content: line.to_string(),
            });
        };
        if kind != "Int" {
            continue;
        }
        let Some(value) = fields.next() else {
            return Err(SymbolError::MalformedLine {
                line: banner_line + n,
                content: line.to_string(),
            });
        };
        // Values wider than the address bus are truncated to 32 bits
        if let Ok(address) = u64::from_str_radix(value, 16) {
            #[allow(clippy::cast_possible_truncation)]
            table.insert(address as u32, name.to_string());
        }
    }
    Ok(table)
}

/// `nm` output: `ADDRESS TYPE NAME`; other lines are ignored
fn parse_nm(input: &[u8]) -> SymbolTable {
    let text = String::from_utf8_lossy(input);
    let mut table = SymbolTable::default();
    for line in text.lines() {
        let fields: Vec<_> = line.split_ascii_whitespace().collect();
        if let [address, _, name] = fields.as_slice() {
            if let Ok(address) = u32::from_str_radix(address, 16) {
                table.insert(address, (*name).to_string());
            }
        }
    }
    table
}
