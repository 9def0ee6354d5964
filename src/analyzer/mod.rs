// Analyzer module: derives growth, composition and liquidity figures.

pub mod statement;

pub use statement::StatementAnalyzer;
