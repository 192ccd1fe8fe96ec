use serde_json::Value;
use tickplot_core::load_symbols;

use super::CommandOutput;
use crate::cli::Cli;
use crate::error::CliError;

pub fn run(cli: &Cli) -> Result<CommandOutput, CliError> {
    let symbols = load_symbols(&cli.symbols)?;
    if symbols.is_empty() {
        tracing::warn!(path = %cli.symbols.display(), "symbol list is empty or missing; any valid symbol is accepted");
    }

    let lines: Vec<String> = symbols.iter().map(|symbol| symbol.to_string()).collect();
    Ok(CommandOutput {
        data: Value::from(lines.clone()),
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn lists_symbols_from_the_csv() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "Symbol\nIBM\nAAPL").expect("write");

        let path = file.path().to_string_lossy().to_string();
        let cli = Cli::try_parse_from(["tickplot", "--symbols", path.as_str(), "symbols"])
            .expect("must parse");

        let output = run(&cli).expect("must list");
        assert_eq!(output.lines, vec![String::from("IBM"), String::from("AAPL")]);
        assert_eq!(output.data, serde_json::json!(["IBM", "AAPL"]));
    }
}
