//! Country, manufacturer and product lookup for decoded retail codes
//!
//! Tables are plain `code;name[;extra]` text files loaded once through
//! [`LookupService::load`]. A table that fails to load stays empty and its
//! error is handed back to the caller.

/// Record types and the GS1 check digit
pub mod enrich;
/// Prefix tables
pub mod table;

pub use enrich::{ContentKind, ProductRecord, Resolution, checksum_valid};
pub use table::{PrefixTable, TableEntry};

use crate::error::ScanError;
use crate::models::{DecodedSymbol, SymbolKind};
use std::path::Path;
use tracing::{debug, warn};

/// Resolves decoded symbols against the lookup tables
#[derive(Debug, Clone, Default)]
pub struct LookupService {
    countries: PrefixTable,
    manufacturers: PrefixTable,
    products: PrefixTable,
}

impl LookupService {
    /// Service over already built tables
    pub fn from_tables(
        countries: PrefixTable,
        manufacturers: PrefixTable,
        products: PrefixTable,
    ) -> Self {
        Self {
            countries,
            manufacturers,
            products,
        }
    }

    /// Load all three tables. Every table that fails is left empty and its
    /// error is returned alongside the service.
    pub fn load(countries: &Path, manufacturers: &Path, products: &Path) -> (Self, Vec<ScanError>) {
        let mut errors = Vec::new();
        let mut load = |path: &Path| match PrefixTable::load(path) {
            Ok(table) => {
                debug!(path = %path.display(), entries = table.len(), "lookup table loaded");
                table
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "lookup table unavailable");
                errors.push(err);
                PrefixTable::new()
            }
        };
        let service = Self {
            countries: load(countries),
            manufacturers: load(manufacturers),
            products: load(products),
        };
        (service, errors)
    }

    /// Country table
    pub fn countries(&self) -> &PrefixTable {
        &self.countries
    }

    /// Manufacturer table
    pub fn manufacturers(&self) -> &PrefixTable {
        &self.manufacturers
    }

    /// Product table
    pub fn products(&self) -> &PrefixTable {
        &self.products
    }

    /// Build the business-facing record of a decoded symbol
    pub fn enrich(&self, symbol: &DecodedSymbol) -> ProductRecord {
        let digits = symbol.payload.trim();
        let numeric = !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit());
        let mut record = ProductRecord::not_applicable(symbol);

        match &symbol.kind {
            SymbolKind::Ean13 | SymbolKind::UpcA if numeric && digits.len() >= 12 => {
                record.checksum_valid = Some(checksum_valid(digits));
                let code = if symbol.kind == SymbolKind::UpcA && digits.len() == 12 {
                    format!("0{digits}")
                } else {
                    digits.to_string()
                };
                record.country = self.country(&code[..3]);
                record.manufacturer = resolve_exact(&self.manufacturers, &code[3..7]);
                record.product = self.product(&code, code.get(7..12));
            }
            SymbolKind::Ean8 if numeric && digits.len() == 8 => {
                record.checksum_valid = Some(checksum_valid(digits));
                record.country = self.country(&digits[..3]);
                record.product = self.product(digits, digits.get(2..7));
            }
            SymbolKind::UpcE if numeric && digits.len() == 8 => {
                record.note = Some("UPC-E uses a zero-suppressed format".to_string());
            }
            kind if kind.is_retail() => {
                record.country = Resolution::Unresolved(digits.to_string());
                record.manufacturer = Resolution::Unresolved(digits.to_string());
                record.product = Resolution::Unresolved(digits.to_string());
            }
            SymbolKind::Code128 | SymbolKind::Code39 => {}
            _ => record.content = Some(ContentKind::of(&symbol.payload)),
        }
        record
    }

    fn country(&self, prefix: &str) -> Resolution {
        match self.countries.resolve(prefix) {
            Some(entry) => Resolution::Found(entry.name.clone()),
            None => Resolution::Unresolved(prefix.to_string()),
        }
    }

    fn product(&self, full: &str, item: Option<&str>) -> Resolution {
        if let Some(entry) = self.products.get(full) {
            return Resolution::Found(entry.name.clone());
        }
        match item.and_then(|code| self.products.get(code)) {
            Some(entry) => Resolution::Found(entry.name.clone()),
            None => Resolution::Unresolved(full.to_string()),
        }
    }
}

fn resolve_exact(table: &PrefixTable, code: &str) -> Resolution {
    match table.get(code) {
        Some(entry) => Resolution::Found(entry.name.clone()),
        None => Resolution::Unresolved(code.to_string()),
    }
}
