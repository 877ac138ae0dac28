use crate::models::DecodedSymbol;
use serde::Serialize;

/// Result of resolving one field of a product record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Resolution {
    /// Name found in a table
    Found(String),
    /// The code that had no table entry
    Unresolved(String),
    /// The symbology has no such field
    NotApplicable,
}

impl Resolution {
    /// The resolved name, if any
    pub fn name(&self) -> Option<&str> {
        match self {
            Resolution::Found(name) => Some(name),
            _ => None,
        }
    }
}

/// What a non-retail payload looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContentKind {
    /// Starts with `http`
    Link,
    /// Anything else
    Data,
}

impl ContentKind {
    /// Classify a free-form payload
    pub fn of(payload: &str) -> Self {
        if payload.starts_with("http") {
            ContentKind::Link
        } else {
            ContentKind::Data
        }
    }
}

/// Business-facing view of a decoded symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    /// The symbol the record was built from
    pub symbol: DecodedSymbol,
    /// Country of the GS1 prefix
    pub country: Resolution,
    /// Manufacturer by company prefix
    pub manufacturer: Resolution,
    /// Product by full code or item reference
    pub product: Resolution,
    /// Payload category for 2D and other non-retail codes
    pub content: Option<ContentKind>,
    /// GS1 check digit result for EAN-13, EAN-8 and UPC-A
    pub checksum_valid: Option<bool>,
    /// Free-form remark
    pub note: Option<String>,
}

impl ProductRecord {
    /// Record with every field not applicable
    pub fn not_applicable(symbol: &DecodedSymbol) -> Self {
        Self {
            symbol: symbol.clone(),
            country: Resolution::NotApplicable,
            manufacturer: Resolution::NotApplicable,
            product: Resolution::NotApplicable,
            content: None,
            checksum_valid: None,
            note: None,
        }
    }
}

/// GS1 mod-10 check: the last digit must make the 3/1-weighted sum a
/// multiple of ten. Non-digit input and fewer than two digits are invalid.
pub fn checksum_valid(code: &str) -> bool {
    if code.len() < 2 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let digits: Vec<u32> = code.bytes().map(|b| (b - b'0') as u32).collect();
    let (body, check) = digits.split_at(digits.len() - 1);
    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| if i % 2 == 0 { d * 3 } else { d })
        .sum();
    (10 - sum % 10) % 10 == check[0]
}
