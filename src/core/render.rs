//! HTML fragments for the result and batch panels.
//!
//! Every string that came from the server goes through [`escape_html`], so
//! it shows up as text exactly as sent.

use crate::domain::model::{BatchRow, Prediction, RiskLevel};
use crate::domain::ports::RenderMode;

pub const NO_FACTORS_MESSAGE: &str = "No critical risk factors detected.";

const LOW_RISK_COLOR: &str = "#10b981";
const HIGH_RISK_COLOR: &str = "#ef4444";
const MUTED_COLOR: &str = "#94a3b8";

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub fn risk_class(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => "risk-high",
        RiskLevel::Low => "risk-low",
    }
}

pub fn risk_label(level: RiskLevel) -> String {
    format!("{} Risk", level)
}

pub fn risk_description(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => "Medical consultation strongly recommended.",
        RiskLevel::Low => "Maintain healthy habits.",
    }
}

/// Probability as shown to the user, e.g. `71.3%` or `50%`.
pub fn format_percent(value: f64) -> String {
    format!("{}%", value)
}

fn no_factors() -> String {
    format!(
        "<p class=\"no-factors\" style=\"color:{}\"><i class=\"fa-solid fa-check-circle\"></i> {}</p>",
        LOW_RISK_COLOR, NO_FACTORS_MESSAGE
    )
}

/// Risk factor list. An empty list renders only the affirmation.
pub fn render_factors(factors: &[String], mode: RenderMode) -> String {
    if factors.is_empty() {
        return no_factors();
    }

    match mode {
        RenderMode::Gauge => {
            let mut html = String::from("<h4>⚠️ Primary Contributors:</h4>");
            for (index, factor) in factors.iter().enumerate() {
                html.push_str(&format!(
                    "<div class=\"factor-item\" style=\"animation-delay:{:.1}s\"><i class=\"fa-solid fa-triangle-exclamation\"></i> {}</div>",
                    index as f64 * 0.1,
                    escape_html(factor)
                ));
            }
            html
        }
        RenderMode::Plain => {
            let items: String = factors
                .iter()
                .map(|f| format!("<li>{}</li>", escape_html(f)))
                .collect();
            format!("<h4>Risk Factors:</h4><ul class=\"factor-list\">{}</ul>", items)
        }
    }
}

/// Whole result block for the plain variant.
pub fn render_plain_result(prediction: &Prediction) -> String {
    let level = prediction.risk_level;
    format!(
        "<div class=\"result {class}\"><h3>{label}</h3><p class=\"probability\">Probability: <strong>{percent}</strong></p><p>{desc}</p>{factors}</div>",
        class = risk_class(level),
        label = risk_label(level),
        percent = format_percent(prediction.probability),
        desc = risk_description(level),
        factors = render_factors(&prediction.risk_factors, RenderMode::Plain),
    )
}

fn cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => escape_html(s),
        serde_json::Value::Null => String::new(),
        other => escape_html(&other.to_string()),
    }
}

fn row_class(row: &BatchRow) -> &'static str {
    match row.risk_level.parse::<RiskLevel>() {
        Ok(level) => risk_class(level),
        Err(_) => "risk-unknown",
    }
}

/// Batch table limited to the first `limit` rows, in server order.
pub fn render_batch_table(rows: &[BatchRow], limit: usize, mode: RenderMode) -> String {
    let mut html = String::from(
        "<table class=\"batch-table\" style=\"width:100%;text-align:left;border-collapse:collapse\">\
         <thead><tr><th>Age/Sex</th><th>Risk</th><th>Factors</th></tr></thead><tbody>",
    );

    for row in rows.iter().take(limit) {
        let color = if row.risk_probability > 50.0 {
            HIGH_RISK_COLOR
        } else {
            LOW_RISK_COLOR
        };
        let factors: Vec<String> = row.risk_factors.iter().map(|f| escape_html(f)).collect();
        html.push_str(&format!(
            "<tr class=\"{class}\"><td>{age} / {sex}</td><td style=\"color:{color};font-weight:bold\">{percent}</td><td style=\"font-size:0.85rem;color:{muted}\">{factors}</td></tr>",
            class = row_class(row),
            age = cell(&row.age),
            sex = cell(&row.sex),
            percent = format_percent(row.risk_probability),
            muted = MUTED_COLOR,
            factors = factors.join(", "),
        ));
    }
    html.push_str("</tbody></table>");

    if mode == RenderMode::Gauge && rows.len() > limit {
        html.push_str(&format!(
            "<p class=\"batch-caption\">Showing first {} of {} rows</p>",
            limit,
            rows.len()
        ));
    }
    html
}
