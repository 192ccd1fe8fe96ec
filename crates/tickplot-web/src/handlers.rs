use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::response::Html;
use axum::Form;
use tickplot_core::{ChartForm, Symbol, ValidationError};

use crate::page::{render_page, ChartView, PageView};
use crate::AppState;

pub(crate) async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let (symbols, error) = load_symbols(&state);
    let form = ChartForm::default();

    Html(render_page(&PageView {
        symbols: &symbols,
        form: &form,
        chart: None,
        error,
    }))
}

pub(crate) async fn submit(
    State(state): State<Arc<AppState>>,
    form: Result<Form<ChartForm>, FormRejection>,
) -> Html<String> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => return rejected_form(&state, &rejection),
    };

    let result = state.service().handle(&form).await;
    let (symbols, symbols_error) = load_symbols(&state);

    let (chart, error) = match result {
        Ok(outcome) => {
            let requested_end = outcome.request.range.end_key();
            let chart = ChartView {
                url: state.chart_url(&outcome.chart_path),
                points: outcome.points,
                extended_to: outcome.fell_back.then(|| outcome.end_key.clone()),
            };
            if outcome.fell_back {
                tracing::info!(requested_end = %requested_end, used_end = %outcome.end_key, "range extended to latest data");
            }
            (Some(chart), symbols_error)
        }
        Err(error) => (None, Some(error.to_string())),
    };

    Html(render_page(&PageView {
        symbols: &symbols,
        form: &form,
        chart,
        error,
    }))
}

/// A body that is not a urlencoded form has no usable fields.
fn rejected_form(state: &AppState, rejection: &FormRejection) -> Html<String> {
    tracing::warn!(status = %rejection.status(), %rejection, "form body rejected");
    let (symbols, _) = load_symbols(state);
    let error = ValidationError::MissingField {
        field: "stock_symbols",
    };

    Html(render_page(&PageView {
        symbols: &symbols,
        form: &ChartForm::default(),
        chart: None,
        error: Some(error.to_string()),
    }))
}

pub(crate) async fn health() -> &'static str {
    "ok"
}

fn load_symbols(state: &AppState) -> (Vec<Symbol>, Option<String>) {
    match state.service().symbols() {
        Ok(symbols) => (symbols, None),
        Err(error) => {
            tracing::warn!(code = error.code(), %error, "symbol list unavailable");
            (Vec::new(), Some(error.to_string()))
        }
    }
}
