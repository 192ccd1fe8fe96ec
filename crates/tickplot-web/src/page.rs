use std::fmt::Write as FmtWrite;

use tickplot_core::chart::escape_markup;
use tickplot_core::{ChartForm, ChartKind, Symbol, TimeSeriesFunction};

/// Everything the page shows for one request.
#[derive(Debug)]
pub struct PageView<'a> {
    pub symbols: &'a [Symbol],
    pub form: &'a ChartForm,
    pub chart: Option<ChartView>,
    pub error: Option<String>,
}

/// A chart written by the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartView {
    pub url: String,
    pub points: usize,
    /// Set when the range was extended to the latest available date.
    pub extended_to: Option<String>,
}

/// Render the full HTML page.
pub fn render_page(view: &PageView<'_>) -> String {
    let mut html = String::with_capacity(8 * 1024 + view.symbols.len() * 48);
    let form = view.form;

    html.push_str(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Stock Data Visualizer</title>
<style>
body { font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif; max-width:960px; margin:0 auto; padding:24px; color:#18181b; }
form { display:grid; grid-template-columns:max-content 1fr; gap:8px 12px; align-items:center; margin-bottom:24px; }
.error { background:#fef2f2; border:1px solid #fecaca; color:#b91c1c; padding:10px 12px; border-radius:6px; margin-bottom:16px; }
.notice { color:#52525b; font-size:0.85rem; }
.chart object { width:100%; max-width:900px; }
</style>
</head>
<body>
<h1>Stock Data Visualizer</h1>
"#,
    );

    if let Some(error) = &view.error {
        write!(html, r#"<div class="error">{}</div>"#, escape_markup(error)).ok();
    }

    html.push_str(r#"<form method="post" action="/">"#);

    // Symbol
    html.push_str(r#"<label for="stock_symbols">Stock symbol</label>"#);
    let selected_symbol = form.symbol.as_deref().map(str::trim).unwrap_or_default();
    if view.symbols.is_empty() {
        write!(
            html,
            r#"<input id="stock_symbols" name="stock_symbols" value="{}" required>"#,
            escape_markup(selected_symbol)
        )
        .ok();
    } else {
        html.push_str(r#"<select id="stock_symbols" name="stock_symbols" required>"#);
        html.push_str(r#"<option value="">Select a symbol</option>"#);
        for symbol in view.symbols {
            write_option(
                &mut html,
                symbol.as_str(),
                symbol.as_str(),
                symbol.as_str().eq_ignore_ascii_case(selected_symbol),
            );
        }
        html.push_str("</select>");
    }

    // Chart type
    html.push_str(r#"<label for="chartType">Chart type</label><select id="chartType" name="chartType" required>"#);
    let selected_kind = form.chart_type.as_deref().unwrap_or_default();
    for kind in ChartKind::ALL {
        let label = match kind {
            ChartKind::Line => "Line",
            ChartKind::Bar => "Bar",
        };
        write_option(
            &mut html,
            kind.as_str(),
            label,
            kind.as_str().eq_ignore_ascii_case(selected_kind.trim()),
        );
    }
    html.push_str("</select>");

    // Time series
    html.push_str(r#"<label for="timeSeries">Time series</label><select id="timeSeries" name="timeSeries" required>"#);
    let selected_function = form
        .time_series
        .as_deref()
        .and_then(|value| value.parse::<TimeSeriesFunction>().ok());
    for function in TimeSeriesFunction::ALL {
        write_option(
            &mut html,
            function.as_str(),
            function.label(),
            selected_function == Some(function),
        );
    }
    html.push_str("</select>");

    // Dates
    write!(
        html,
        r#"<label for="startDate">Start date</label><input type="date" id="startDate" name="startDate" value="{}" required>"#,
        escape_markup(form.start_date.as_deref().unwrap_or_default())
    )
    .ok();
    write!(
        html,
        r#"<label for="endDate">End date</label><input type="date" id="endDate" name="endDate" value="{}" required>"#,
        escape_markup(form.end_date.as_deref().unwrap_or_default())
    )
    .ok();

    html.push_str(r#"<span></span><button type="submit">Generate chart</button></form>"#);

    if let Some(chart) = &view.chart {
        html.push_str(r#"<div class="chart">"#);
        if let Some(end) = &chart.extended_to {
            write!(
                html,
                r#"<p class="notice">No data in the requested range; showing data up to {}.</p>"#,
                escape_markup(end)
            )
            .ok();
        }
        write!(
            html,
            r#"<object type="image/svg+xml" data="{url}" data-points="{points}">Stock price chart</object>"#,
            url = escape_markup(&chart.url),
            points = chart.points
        )
        .ok();
        html.push_str("</div>");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn write_option(html: &mut String, value: &str, label: &str, selected: bool) {
    write!(
        html,
        r#"<option value="{}"{}>{}</option>"#,
        escape_markup(value),
        if selected { " selected" } else { "" },
        escape_markup(label)
    )
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols() -> Vec<Symbol> {
        ["AAPL", "IBM"]
            .into_iter()
            .map(|raw| Symbol::parse(raw).expect("valid"))
            .collect()
    }

    #[test]
    fn empty_form_lists_symbols_and_all_series() {
        let symbols = symbols();
        let form = ChartForm::default();
        let html = render_page(&PageView {
            symbols: &symbols,
            form: &form,
            chart: None,
            error: None,
        });

        assert!(html.contains(r#"<option value="IBM">IBM</option>"#));
        for function in TimeSeriesFunction::ALL {
            assert!(html.contains(function.as_str()));
        }
        assert!(!html.contains(r#"class="error""#));
        assert!(!html.contains("<object"));
    }

    #[test]
    fn submitted_values_stay_selected() {
        let symbols = symbols();
        let form = ChartForm {
            symbol: Some(String::from("ibm")),
            chart_type: Some(String::from("bar")),
            time_series: Some(String::from("TIME_SERIES_MONTHLY")),
            start_date: Some(String::from("2024-01-01")),
            end_date: Some(String::from("2024-03-01")),
        };
        let html = render_page(&PageView {
            symbols: &symbols,
            form: &form,
            chart: None,
            error: None,
        });

        assert!(html.contains(r#"<option value="IBM" selected>"#));
        assert!(html.contains(r#"<option value="bar" selected>"#));
        assert!(html.contains(r#"<option value="TIME_SERIES_MONTHLY" selected>"#));
        assert!(html.contains(r#"value="2024-03-01""#));
    }

    #[test]
    fn missing_symbol_list_falls_back_to_text_input() {
        let form = ChartForm::default();
        let html = render_page(&PageView {
            symbols: &[],
            form: &form,
            chart: None,
            error: None,
        });

        assert!(html.contains(r#"<input id="stock_symbols" name="stock_symbols""#));
    }

    #[test]
    fn error_and_submitted_text_are_escaped() {
        let form = ChartForm {
            start_date: Some(String::from(r#""><script>"#)),
            ..ChartForm::default()
        };
        let html = render_page(&PageView {
            symbols: &[],
            form: &form,
            chart: None,
            error: Some(String::from("<b>bad</b>")),
        });

        assert!(html.contains("&lt;b&gt;bad&lt;/b&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn chart_is_embedded_with_fallback_notice() {
        let form = ChartForm::default();
        let html = render_page(&PageView {
            symbols: &[],
            form: &form,
            chart: Some(ChartView {
                url: String::from("/static/stock_price_chart.svg?v=3"),
                points: 12,
                extended_to: Some(String::from("2024-01-03")),
            }),
            error: None,
        });

        assert!(html.contains(r#"data="/static/stock_price_chart.svg?v=3""#));
        assert!(html.contains("showing data up to 2024-01-03"));
    }
}
