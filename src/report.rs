// SPDX-FileCopyrightText: 2022-2025 RustInFinance
// SPDX-License-Identifier: BSD-3-Clause

use std::path::Path;

use crate::errors::DividendError;
use crate::taxation::TaxedDividend;

pub const SUMMARY_FILE: &str = "summary-dividendes.txt";

/// Shortest representation that reads back to the same value, always with a
/// fractional part e.g. 1000 -> "1000.0"
// Never uses exponent notation, so only matches repr-style output between 1e-4 and 1e16
fn format_usd(value: f64) -> String {
    let s = format!("{value}");
    if value.is_finite() && !s.contains('.') {
        s + ".0"
    } else {
        s
    }
}

/// Two decimals with comma as decimal separator, as in the french forms
fn format_eur(value: f64) -> String {
    format!("{value:.2}").replace('.', ",")
}

pub fn format_dividend(taxed: &TaxedDividend) -> String {
    let mut lines = vec![
        format!(
            "{}: ${} ({:.2}$/€)",
            taxed.record.date.format("%Y-%m-%d 00:00:00"),
            format_usd(taxed.record.amount_usd),
            taxed.euro_dollar
        ),
        format!("Dividende (IK):\t{:.2}€", taxed.amounts.ik),
    ];
    lines.extend(
        taxed
            .amounts
            .ordered()
            .into_iter()
            .map(|(name, value)| format!("{name}\t{}", format_eur(value))),
    );
    lines.join("\n")
}

/// Blocks in the given order separated by an empty line
pub fn assemble_summary(dividends: &[TaxedDividend]) -> String {
    dividends
        .iter()
        .map(format_dividend)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Overwrites any previous summary
pub fn write_summary(path: &Path, summary: &str) -> Result<(), DividendError> {
    std::fs::write(path, summary).map_err(|e| DividendError::io(path, e))?;
    log::info!("Summary written to {}", path.display());
    Ok(())
}
