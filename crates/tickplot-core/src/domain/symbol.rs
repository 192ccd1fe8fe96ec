use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

// RFC 3986 unreserved set
fn is_unreserved(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.' | '_' | '~')
}

/// Ticker as listed in the symbol file, uppercased.
///
/// [`Symbol::parse`] is the check for free-form input: it only admits
/// characters that travel unescaped in a query string. Values read from the
/// symbol list go through [`Symbol::listed`] instead, since membership in that
/// list is the only rule a listed ticker has to satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse free-form input: trimmed, uppercased, URL-unreserved characters only.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let symbol = Self::listed(input)?;

        for (index, ch) in symbol.0.chars().enumerate() {
            if !is_unreserved(ch) {
                return Err(ValidationError::SymbolInvalidChar { ch, index });
            }
        }

        Ok(symbol)
    }

    /// Accept a ticker taken from the symbol list. Only blank values are refused.
    pub fn listed(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    /// Case-insensitive comparison against raw input.
    pub fn matches(&self, input: &str) -> bool {
        self.0 == input.trim().to_uppercase()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_symbol() {
        let parsed = Symbol::parse(" ibm ").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "IBM");
    }

    #[test]
    fn accepts_share_class_suffix() {
        let parsed = Symbol::parse("brk.b").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "BRK.B");
    }

    #[test]
    fn accepts_leading_digit_and_exchange_suffix() {
        let parsed = Symbol::parse("0700.hk").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "0700.HK");
    }

    #[test]
    fn listed_values_keep_characters_free_input_cannot_use() {
        let index = Symbol::listed(" ^gspc ").expect("listed symbol");
        assert_eq!(index.as_str(), "^GSPC");
        assert!(index.matches("^GSPC"));
        assert!(Symbol::parse("^GSPC").is_err());
        assert_eq!(Symbol::listed("  "), Err(ValidationError::EmptySymbol));
    }

    #[test]
    fn rejects_query_injection() {
        let err = Symbol::parse("IBM&apikey=x").expect_err("must fail");
        assert!(matches!(err, ValidationError::SymbolInvalidChar { ch: '&', .. }));
    }
}
