/// Parses raw engine strings into [`DecodedSymbol`]s
use crate::models::{DecodedSymbol, SymbolKind};

/// Turns `"<KIND>: <payload>"` into a typed symbol
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultClassifier;

impl ResultClassifier {
    /// Classify one raw decoder string.
    ///
    /// The kind is the text before the first `:` and the payload is the rest
    /// with a single leading space removed. A string without a colon becomes
    /// [`SymbolKind::UnknownFormat`] carrying the whole string; an empty string
    /// or an empty kind is [`SymbolKind::Unknown`].
    pub fn classify(raw: &str) -> DecodedSymbol {
        if raw.is_empty() {
            return DecodedSymbol::unknown();
        }

        match raw.split_once(':') {
            Some((kind, rest)) => {
                let payload = rest.strip_prefix(' ').unwrap_or(rest);
                DecodedSymbol::new(SymbolKind::from_name(kind), payload, raw)
            }
            None => DecodedSymbol::new(SymbolKind::UnknownFormat, raw, raw),
        }
    }
}
