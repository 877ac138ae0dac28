use serde::{Serialize, Serializer};
use std::fmt;

/// Symbology reported by the decode engine
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// EAN-13
    Ean13,
    /// EAN-8
    Ean8,
    /// UPC-A
    UpcA,
    /// UPC-E
    UpcE,
    /// Code 128
    Code128,
    /// Code 39
    Code39,
    /// QR code
    QrCode,
    /// Any other symbology name the engine reports
    Other(String),
    /// Engine output without a `KIND:` prefix
    UnknownFormat,
    /// Empty result; never short-circuits the cascade
    Unknown,
}

impl SymbolKind {
    /// Map an engine symbology name to a kind.
    ///
    /// Matching ignores case, dashes, underscores and spaces, so
    /// "EAN-13", "ean13" and "EAN_13" are the same kind.
    pub fn from_name(name: &str) -> Self {
        let normalized: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_uppercase())
            .collect();
        match normalized.as_str() {
            "" => SymbolKind::Unknown,
            "EAN13" => SymbolKind::Ean13,
            "EAN8" => SymbolKind::Ean8,
            "UPCA" => SymbolKind::UpcA,
            "UPCE" => SymbolKind::UpcE,
            "CODE128" => SymbolKind::Code128,
            "CODE39" => SymbolKind::Code39,
            "QR" | "QRCODE" => SymbolKind::QrCode,
            _ => SymbolKind::Other(name.trim().to_string()),
        }
    }

    /// Canonical display name
    pub fn name(&self) -> &str {
        match self {
            SymbolKind::Ean13 => "EAN-13",
            SymbolKind::Ean8 => "EAN-8",
            SymbolKind::UpcA => "UPC-A",
            SymbolKind::UpcE => "UPC-E",
            SymbolKind::Code128 => "CODE-128",
            SymbolKind::Code39 => "CODE-39",
            SymbolKind::QrCode => "QR-Code",
            SymbolKind::Other(name) => name,
            SymbolKind::UnknownFormat => "Unknown Format",
            SymbolKind::Unknown => "Unknown",
        }
    }

    /// Whether a result of this kind ends the decode cascade
    pub fn is_classifiable(&self) -> bool {
        !matches!(self, SymbolKind::Unknown)
    }

    /// True for the retail symbologies that carry a GS1 prefix
    pub fn is_retail(&self) -> bool {
        matches!(
            self,
            SymbolKind::Ean13 | SymbolKind::Ean8 | SymbolKind::UpcA | SymbolKind::UpcE
        )
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for SymbolKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Decoded barcode, shared by every stage and caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedSymbol {
    /// Symbology
    pub kind: SymbolKind,
    /// Decoded content
    pub payload: String,
    /// Engine output the symbol was parsed from
    pub raw: String,
}

impl DecodedSymbol {
    /// Create a decoded symbol
    pub fn new(kind: SymbolKind, payload: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            kind,
            payload: payload.into(),
            raw: raw.into(),
        }
    }

    /// The empty result
    pub fn unknown() -> Self {
        Self::new(SymbolKind::Unknown, "", "")
    }

    /// Whether this result ends the decode cascade
    pub fn is_classifiable(&self) -> bool {
        self.kind.is_classifiable()
    }
}
