//! Structured insights derived from a finished analysis: performance and
//! risk ranking, correlation pairs and a diversification verdict.

use crate::engines::metrics::AnalysisReport;
use crate::error::Result;
use polars::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

const STRONG_CORRELATION: f64 = 0.7;
const WEAK_CORRELATION: f64 = 0.3;

#[derive(Debug, Clone, Serialize)]
pub struct CorrelatedPair {
    pub a: String,
    pub b: String,
    pub coefficient: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Insights {
    pub best_performer: Option<(String, f64)>,
    pub worst_performer: Option<(String, f64)>,
    pub most_volatile: Option<(String, f64)>,
    pub least_volatile: Option<(String, f64)>,
    pub best_sharpe: Option<(String, f64)>,
    pub positive_sharpe: usize,
    pub negative_sharpe: usize,
    pub strong_pairs: Vec<CorrelatedPair>,
    pub diversifier_pairs: Vec<CorrelatedPair>,
    pub average_correlation: Option<f64>,
}

impl Insights {
    pub fn from_report(report: &AnalysisReport) -> Result<Self> {
        let mut insights = Insights::default();

        // Final cumulative return per instrument
        let last_row = report.cumulative_returns.height();
        if last_row > 0 {
            let mut finals: Vec<(String, f64)> = Vec::new();
            for name in report.cumulative_returns.get_column_names() {
                let series = report
                    .cumulative_returns
                    .column(name)?
                    .as_materialized_series()
                    .cast(&DataType::Float64)?;
                if let Some(value) = series.f64()?.get(last_row - 1) {
                    if value.is_finite() {
                        finals.push((name.to_string(), value));
                    }
                }
            }
            insights.best_performer = pick(&finals, Ordering::Greater);
            insights.worst_performer = pick(&finals, Ordering::Less);
        }

        // Volatility ranking
        let volatility: Vec<(String, f64)> = report
            .annualized_volatility
            .iter()
            .filter(|(_, v)| v.is_finite())
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        insights.most_volatile = pick(&volatility, Ordering::Greater);
        insights.least_volatile = pick(&volatility, Ordering::Less);

        // Risk-adjusted performance
        let sharpe: Vec<(String, f64)> = report
            .sharpe
            .iter()
            .filter(|(_, v)| v.is_finite())
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        insights.best_sharpe = pick(&sharpe, Ordering::Greater);
        insights.positive_sharpe = sharpe.iter().filter(|(_, v)| *v > 0.0).count();
        insights.negative_sharpe = sharpe.iter().filter(|(_, v)| *v < 0.0).count();

        // Correlation structure, upper triangle only
        if report.correlation.width() > 1 {
            let tickers = report
                .correlation
                .column("ticker")?
                .as_materialized_series()
                .str()?;
            let names: Vec<String> = tickers
                .into_iter()
                .flatten()
                .map(|s| s.to_string())
                .collect();

            let mut sum = 0.0;
            let mut count = 0usize;
            for i in 0..names.len() {
                for j in (i + 1)..names.len() {
                    let coefficient = report
                        .correlation
                        .column(&names[j])?
                        .as_materialized_series()
                        .f64()?
                        .get(i);
                    let coefficient = match coefficient {
                        Some(c) if c.is_finite() => c,
                        _ => continue,
                    };
                    sum += coefficient;
                    count += 1;

                    let pair = CorrelatedPair {
                        a: names[i].clone(),
                        b: names[j].clone(),
                        coefficient,
                    };
                    if coefficient > STRONG_CORRELATION {
                        insights.strong_pairs.push(pair);
                    } else if coefficient < WEAK_CORRELATION {
                        insights.diversifier_pairs.push(pair);
                    }
                }
            }
            if count > 0 {
                insights.average_correlation = Some(sum / count as f64);
            }
        }

        Ok(insights)
    }
}

fn pick(entries: &[(String, f64)], ordering: Ordering) -> Option<(String, f64)> {
    entries
        .iter()
        .max_by(|a, b| {
            let cmp = a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal);
            if ordering == Ordering::Less {
                cmp.reverse()
            } else {
                cmp
            }
        })
        .cloned()
}

impl fmt::Display for Insights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== Performance ==")?;
        if let Some((ticker, value)) = &self.best_performer {
            writeln!(f, "Best performer:  {} ({:+.1}%)", ticker, value * 100.0)?;
        }
        if let Some((ticker, value)) = &self.worst_performer {
            writeln!(f, "Worst performer: {} ({:+.1}%)", ticker, value * 100.0)?;
        }

        writeln!(f, "== Risk ==")?;
        if let Some((ticker, value)) = &self.most_volatile {
            writeln!(f, "Most volatile:  {} ({:.3})", ticker, value)?;
        }
        if let Some((ticker, value)) = &self.least_volatile {
            writeln!(f, "Least volatile: {} ({:.3})", ticker, value)?;
        }

        writeln!(f, "== Risk-adjusted returns ==")?;
        if let Some((ticker, value)) = &self.best_sharpe {
            writeln!(f, "Best Sharpe ratio: {} ({:.2})", ticker, value)?;
        }
        writeln!(
            f,
            "{} instruments with positive, {} with negative risk-adjusted returns",
            self.positive_sharpe, self.negative_sharpe
        )?;

        if !self.strong_pairs.is_empty() {
            writeln!(f, "== Strong correlations (move together) ==")?;
            for pair in self.strong_pairs.iter().take(3) {
                writeln!(f, "{} & {}: {:.2}", pair.a, pair.b, pair.coefficient)?;
            }
        }
        if !self.diversifier_pairs.is_empty() {
            writeln!(f, "== Diversification opportunities ==")?;
            for pair in self.diversifier_pairs.iter().take(3) {
                writeln!(f, "{} & {}: {:.2}", pair.a, pair.b, pair.coefficient)?;
            }
        }

        if let Some(avg) = self.average_correlation {
            let verdict = if avg < 0.4 {
                "excellent diversification"
            } else if avg < 0.7 {
                "good diversification"
            } else {
                "limited diversification, instruments tend to move together"
            };
            writeln!(f, "Average pairwise correlation {:.2}: {}", avg, verdict)?;
        }

        Ok(())
    }
}
