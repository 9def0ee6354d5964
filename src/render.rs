// Markdown rendering of the analyzed statement.
use crate::analyzer::statement::CURRENT_ASSETS_MARKER;
use crate::model::{AnalyzedTable, DerivedMetrics};

/// Six-column markdown table: the three input columns plus the derived
/// percentages. Raw values are integer-grouped, derived columns carry two
/// decimals and a percent sign.
pub fn render_table(table: &AnalyzedTable) -> String {
    let mut out = String::from(
        "| Line item | Prior year | Current year | Growth (%) | Share of assets, prior (%) | Share of assets, current (%) |\n\
         |---|---:|---:|---:|---:|---:|\n",
    );
    for row in &table.rows {
        out.push_str(&format!(
            "| {} | {} | {} | {:.2}% | {:.2}% | {:.2}% |\n",
            row.label,
            group_thousands(row.prior),
            group_thousands(row.current),
            row.growth_pct,
            row.prior_share_pct,
            row.current_share_pct,
        ));
    }
    out
}

/// Summary block with the two current-ratio values and their delta.
pub fn render_metrics(metrics: &DerivedMetrics) -> String {
    let delta = match metrics.delta() {
        Some(delta) => format!("{:+.2}", delta),
        None => "N/A".to_string(),
    };
    format!(
        "Current ratio (prior year):   {}\n\
         Current ratio (current year): {}\n\
         Year-over-year change:        {}\n",
        format_ratio(metrics.current_ratio_prior),
        format_ratio(metrics.current_ratio_current),
        delta,
    )
}

/// Context block handed to the chat model: the full rendered table plus the
/// headline indicators it should comment on.
pub fn build_ai_context(table: &AnalyzedTable) -> String {
    let assets_growth = table
        .rows
        .iter()
        .find(|row| {
            row.label
                .to_lowercase()
                .contains(&CURRENT_ASSETS_MARKER.to_lowercase())
        })
        .map(|row| format!("{:.2}%", row.growth_pct))
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "You are a professional financial analyst. Answer the user's questions \
         based on the financial data below: a balance sheet already analyzed \
         for growth and asset composition, together with the basic liquidity \
         indicators. Keep this context for the whole conversation.\n\n\
         ### Analyzed statement\n{}\n\
         ### Key indicators\n\
         - Current assets growth: {}\n\
         - Current ratio (prior year): {}\n\
         - Current ratio (current year): {}\n",
        render_table(table),
        assets_growth,
        format_ratio(table.metrics.current_ratio_prior),
        format_ratio(table.metrics.current_ratio_current),
    )
}

fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(value) => format!("{:.2}", value),
        None => "N/A".to_string(),
    }
}

/// Rounds to a whole number and inserts comma group separators.
pub fn group_thousands(value: f64) -> String {
    let rounded = value.abs().round() as i64;
    let digits = rounded.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0.0 && rounded != 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
