// Core structs: StatementRow, AnalyzedRow, DerivedMetrics
use thiserror::Error;

/// One line item of the statement after numeric coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementRow {
    pub label: String,
    pub prior: f64,
    pub current: f64,
}

/// A statement row plus the three derived columns.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedRow {
    pub label: String,
    pub prior: f64,
    pub current: f64,
    pub growth_pct: f64,
    pub prior_share_pct: f64,
    pub current_share_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Year {
    Prior,
    Current,
}

impl std::fmt::Display for Year {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Year::Prior => write!(f, "prior year"),
            Year::Current => write!(f, "current year"),
        }
    }
}

/// Liquidity metrics; `None` means the ratio is unavailable for that year.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    pub current_ratio_prior: Option<f64>,
    pub current_ratio_current: Option<f64>,
}

impl DerivedMetrics {
    /// Year-over-year change, only when both ratios were computable.
    pub fn delta(&self) -> Option<f64> {
        match (self.current_ratio_prior, self.current_ratio_current) {
            (Some(prior), Some(current)) => Some(current - prior),
            _ => None,
        }
    }
}

/// Complete analysis output for one uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedTable {
    pub rows: Vec<AnalyzedRow>,
    pub metrics: DerivedMetrics,
    pub warnings: Vec<RatioWarning>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read or parse file: {0}")]
    Csv(#[from] csv::Error),
    #[error("expected at least 3 columns (label, prior year, current year), found {0}")]
    ColumnCount(usize),
    #[error("file contains no data rows")]
    Empty,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("no line item matching 'TOTAL ASSETS' found in the statement")]
    MissingTotalAssets,
}

/// Non-fatal degradations of the current-ratio computation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RatioWarning {
    #[error("line item matching '{0}' is missing; current ratio unavailable")]
    MissingRatioInput(&'static str),
    #[error("current liabilities are zero for the {0}; current ratio unavailable")]
    ZeroDenominator(Year),
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("GEMINI_API_KEY is not set")]
    MissingCredential,
    #[error("Gemini API rejected the request (check your API key or quota): {0}")]
    QuotaOrAuth(String),
    #[error("Gemini API request failed: {0}")]
    Transport(String),
    #[error("Gemini API returned an unexpected payload")]
    InvalidResponse,
}
