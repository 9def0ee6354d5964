use crate::model::{
    AnalysisError, AnalyzedRow, AnalyzedTable, DerivedMetrics, RatioWarning, StatementRow, Year,
};

/// Divisor substituted for zero denominators so derived columns stay finite.
/// A zero prior value therefore produces a very large growth figure, not a
/// crash.
pub const ZERO_DIVISOR_EPSILON: f64 = 1e-9;

pub const TOTAL_ASSETS_MARKER: &str = "TOTAL ASSETS";
pub const CURRENT_ASSETS_MARKER: &str = "CURRENT ASSETS";
pub const CURRENT_LIABILITIES_MARKER: &str = "CURRENT LIABILITIES";

pub struct StatementAnalyzer;

impl StatementAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Derives the three per-row columns and the current-ratio metrics.
    /// Fails only when no row matches the total-assets marker; every other
    /// degradation is reported through `warnings`.
    pub fn analyze(&self, rows: &[StatementRow]) -> Result<AnalyzedTable, AnalysisError> {
        let totals =
            find_row(rows, TOTAL_ASSETS_MARKER).ok_or(AnalysisError::MissingTotalAssets)?;
        let prior_total = safe_divisor(totals.prior);
        let current_total = safe_divisor(totals.current);

        let analyzed = rows
            .iter()
            .map(|row| AnalyzedRow {
                label: row.label.clone(),
                prior: row.prior,
                current: row.current,
                growth_pct: (row.current - row.prior) / safe_divisor(row.prior) * 100.0,
                prior_share_pct: row.prior / prior_total * 100.0,
                current_share_pct: row.current / current_total * 100.0,
            })
            .collect();

        let (metrics, warnings) = current_ratio(rows);
        Ok(AnalyzedTable {
            rows: analyzed,
            metrics,
            warnings,
        })
    }
}

/// First row whose label contains `marker`, case-insensitive. When several
/// rows match, the first one wins.
fn find_row<'a>(rows: &'a [StatementRow], marker: &str) -> Option<&'a StatementRow> {
    let needle = marker.to_lowercase();
    rows.iter()
        .find(|row| row.label.to_lowercase().contains(&needle))
}

fn safe_divisor(value: f64) -> f64 {
    if value == 0.0 { ZERO_DIVISOR_EPSILON } else { value }
}

/// Current assets over current liabilities, per year. A missing input row
/// makes both years unavailable; a zero liabilities value makes only that
/// year unavailable.
fn current_ratio(rows: &[StatementRow]) -> (DerivedMetrics, Vec<RatioWarning>) {
    let mut warnings = Vec::new();

    let assets = find_row(rows, CURRENT_ASSETS_MARKER);
    let liabilities = find_row(rows, CURRENT_LIABILITIES_MARKER);

    let (assets, liabilities) = match (assets, liabilities) {
        (Some(assets), Some(liabilities)) => (assets, liabilities),
        (assets, liabilities) => {
            if assets.is_none() {
                warnings.push(RatioWarning::MissingRatioInput(CURRENT_ASSETS_MARKER));
            }
            if liabilities.is_none() {
                warnings.push(RatioWarning::MissingRatioInput(CURRENT_LIABILITIES_MARKER));
            }
            return (
                DerivedMetrics {
                    current_ratio_prior: None,
                    current_ratio_current: None,
                },
                warnings,
            );
        }
    };

    let current_ratio_prior = if liabilities.prior == 0.0 {
        warnings.push(RatioWarning::ZeroDenominator(Year::Prior));
        None
    } else {
        Some(assets.prior / liabilities.prior)
    };
    let current_ratio_current = if liabilities.current == 0.0 {
        warnings.push(RatioWarning::ZeroDenominator(Year::Current));
        None
    } else {
        Some(assets.current / liabilities.current)
    };

    (
        DerivedMetrics {
            current_ratio_prior,
            current_ratio_current,
        },
        warnings,
    )
}
