use serde_json::json;
use tickplot_core::ChartForm;

use super::{build_service, service_config, CommandOutput};
use crate::cli::{ChartArgs, Cli};
use crate::error::CliError;

pub async fn run(cli: &Cli, args: &ChartArgs) -> Result<CommandOutput, CliError> {
    let mut config = service_config(cli);
    if let Some(output) = &args.output {
        config.chart_path = output.clone();
    }
    let service = build_service(cli, config);

    let form = ChartForm {
        symbol: Some(args.symbol.clone()),
        chart_type: Some(args.chart.clone()),
        time_series: Some(args.series.clone()),
        start_date: Some(args.start.clone()),
        end_date: Some(args.end.clone()),
    };
    let outcome = service.handle(&form).await?;

    let mut lines = vec![format!(
        "{} {} points -> {}",
        outcome.request.symbol,
        outcome.points,
        outcome.chart_path.display()
    )];
    if outcome.fell_back {
        lines.push(format!("range end extended to {}", outcome.end_key));
    }

    Ok(CommandOutput {
        data: json!({
            "symbol": outcome.request.symbol.as_str(),
            "function": outcome.request.function.as_str(),
            "chart": outcome.request.kind.as_str(),
            "start": outcome.request.range.start_key(),
            "end": outcome.end_key,
            "fell_back": outcome.fell_back,
            "points": outcome.points,
            "path": outcome.chart_path.display().to_string(),
        }),
        lines,
    })
}
