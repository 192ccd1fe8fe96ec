//! Ticker symbol list loaded from a CSV file with a `Symbol` column.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;

use crate::{ChartError, Symbol, ValidationError};

pub const DEFAULT_SYMBOLS_FILE: &str = "stocks.csv";

#[derive(Debug, Deserialize)]
struct SymbolRow {
    #[serde(rename = "Symbol")]
    symbol: String,
}

/// Load the symbol list. A missing file yields an empty list.
pub fn load_symbols(path: impl AsRef<Path>) -> Result<Vec<Symbol>, ChartError> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "symbol list not found; using empty list");
            return Ok(Vec::new());
        }
        Err(error) => return Err(error.into()),
    };

    read_symbols(file)
}

/// Read symbols from any CSV source. Blank rows are skipped; any other value is kept as listed.
pub fn read_symbols<R: Read>(reader: R) -> Result<Vec<Symbol>, ChartError> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut symbols = Vec::new();

    for (index, row) in csv_reader.deserialize::<SymbolRow>().enumerate() {
        let row = row?;
        match Symbol::listed(&row.symbol) {
            Ok(symbol) => symbols.push(symbol),
            Err(error) => {
                // header is line 1
                tracing::warn!(line = index + 2, symbol = %row.symbol, %error, "skipping blank symbol");
            }
        }
    }

    Ok(symbols)
}

/// Resolve form input to a symbol.
///
/// With a non-empty list the input must match a listed value (trimmed,
/// case-insensitive) and nothing else is checked. An empty list falls back to
/// [`Symbol::parse`].
pub fn resolve_symbol(input: &str, known: &[Symbol]) -> Result<Symbol, ValidationError> {
    if known.is_empty() {
        return Symbol::parse(input);
    }

    known
        .iter()
        .find(|symbol| symbol.matches(input))
        .cloned()
        .ok_or_else(|| ValidationError::UnknownSymbol {
            symbol: input.trim().to_owned(),
        })
}
