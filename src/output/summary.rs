use crate::dispatch::{fields, AggregateResponse, NormalizedResult};
use serde_json::Value;
use std::borrow::Cow;

const FALLBACK_TITLE: &str = "Worker";

/// Fold results into one Markdown block, one section per result, in result order.
///
/// A result carrying `review` wins over one carrying `error`; results with
/// neither are left out.
pub fn render_summary(response: &AggregateResponse) -> String {
    response
        .results
        .iter()
        .filter_map(render_section)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_section(result: &NormalizedResult) -> Option<String> {
    if let Some(review) = result.get(fields::REVIEW) {
        let title = result
            .text(fields::WORKER_ID)
            .or_else(|| result.text(fields::MODEL))
            .unwrap_or(Cow::Borrowed(FALLBACK_TITLE));
        return Some(format!("### {}\n{}", title, plain(review)));
    }

    if let Some(error) = result.get(fields::ERROR) {
        let title = result
            .text(fields::WORKER_ID)
            .or_else(|| result.text(fields::WORKER_URL))
            .unwrap_or(Cow::Borrowed(FALLBACK_TITLE));
        return Some(format!("### {}\nError: {}", title, plain(error)));
    }

    None
}

fn plain(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}
