// SPDX-FileCopyrightText: 2022-2025 RustInFinance
// SPDX-License-Identifier: BSD-3-Clause

mod errors;
mod exchange_rates;
mod logging;
mod report;
mod schwabparser;
mod taxation;

use std::path::{Path, PathBuf};

pub use errors::DividendError;
pub use exchange_rates::{EuroDollarRate, ExchangeRateData, EXCHANGE_RATES_FILE};
pub use logging::{init_logging_infrastructure, ResultExt};
pub use report::SUMMARY_FILE;
pub use schwabparser::DividendRecord;
pub use taxation::{DerivedAmounts, TaxedDividend};

/// Outcome of processing one export
#[derive(Debug)]
pub struct Summary {
    pub text: String,
    pub dividends: usize,
    pub total_paiement: f64,
    pub output: PathBuf,
}

/// Taxes every dividend with the given rates, oldest payment first.
/// Payments of the same day keep their order from the export.
pub fn compute_dividends_taxation(
    mut dividends: Vec<DividendRecord>,
    rates: &dyn EuroDollarRate,
) -> Result<Vec<TaxedDividend>, DividendError> {
    dividends.sort_by_key(|d| d.date);
    dividends
        .iter()
        .map(|d| taxation::compute_dividend_taxation(d, rates))
        .collect()
}

fn sibling(path: &Path, name: &str) -> PathBuf {
    path.with_file_name(name)
}

/// Reads the Schwab export at `schwab_json`, the exchange rates next to it,
/// and writes the summary next to it as well.
/// Nothing is written unless every dividend could be processed.
pub fn run_summary(schwab_json: &Path) -> Result<Summary, DividendError> {
    let schwab_json =
        std::path::absolute(schwab_json).map_err(|e| DividendError::io(schwab_json, e))?;
    log::info!("Processing {}", schwab_json.display());

    let dividends = schwabparser::parse_dividends(&schwab_json)?;
    let rates = ExchangeRateData::from_path(&sibling(&schwab_json, EXCHANGE_RATES_FILE))?;
    let taxed = compute_dividends_taxation(dividends, &rates)?;

    let total_paiement: f64 = taxed.iter().map(|t| t.amounts.paiement).sum();
    log::info!(
        "{} dividends, total to pay: {:.2}€",
        taxed.len(),
        total_paiement
    );

    let text = report::assemble_summary(&taxed);
    let output = sibling(&schwab_json, SUMMARY_FILE);
    report::write_summary(&output, &text)?;

    Ok(Summary {
        text,
        dividends: taxed.len(),
        total_paiement,
        output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const RATES: &str = "Date,USD,JPY,\n\
        2023-06-15,1.0819,151.68,\n\
        2023-03-15,1.10,141.12,\n\
        2023-01-10,1.0745,141.41,\n";

    fn setup(transactions_json: &str) -> Result<(tempfile::TempDir, PathBuf), String> {
        let dir = tempfile::tempdir().map_err(|e| e.to_string())?;
        let input = dir.path().join("transactions.json");
        fs::write(&input, transactions_json).map_err(|e| e.to_string())?;
        fs::write(dir.path().join(EXCHANGE_RATES_FILE), RATES).map_err(|e| e.to_string())?;
        Ok((dir, input))
    }

    const EXPORT: &str = r#"{"Transactions": [
        {"Date": "06/15/2023", "Action": "Dividend", "Symbol": "XYZ", "Amount": "$25.00"},
        {"Date": "03/15/2023", "Action": "NRA Tax Adj", "Amount": "-$150.00"},
        {"Date": "03/15/2023", "Action": "Dividend", "Symbol": "XYZ", "Amount": "$1,000.00"},
        {"Date": "01/10/2023", "Action": "Dividend", "Symbol": "ABC", "Amount": "$7.20"},
        {"Date": "03/15/2023", "Action": "Dividend", "Symbol": "ABC", "Amount": "$3.00"}
    ]}"#;

    #[test]
    fn test_run_summary() -> Result<(), String> {
        let (dir, input) = setup(EXPORT)?;
        let summary = run_summary(&input).map_err(|e| e.to_string())?;

        assert_eq!(summary.dividends, 4);
        assert_eq!(summary.output, dir.path().join(SUMMARY_FILE));
        let written = fs::read_to_string(&summary.output).map_err(|e| e.to_string())?;
        assert_eq!(written, summary.text);

        let headers: Vec<&str> = written
            .split("\n\n")
            .map(|block| block.lines().next().unwrap_or_default())
            .collect();
        assert_eq!(
            headers,
            vec![
                "2023-01-10 00:00:00: $7.2 (1.07$/€)",
                "2023-03-15 00:00:00: $1000.0 (1.10$/€)",
                "2023-03-15 00:00:00: $3.0 (1.10$/€)",
                "2023-06-15 00:00:00: $25.0 (1.08$/€)",
            ]
        );
        assert!(written.contains("Dividende (IK):\t909.09€\npaiement\t272,73\n"));
        Ok(())
    }

    #[test]
    fn test_run_summary_is_idempotent() -> Result<(), String> {
        let (_dir, input) = setup(EXPORT)?;
        let first = run_summary(&input).map_err(|e| e.to_string())?;
        let first_bytes = fs::read(&first.output).map_err(|e| e.to_string())?;
        let second = run_summary(&input).map_err(|e| e.to_string())?;
        let second_bytes = fs::read(&second.output).map_err(|e| e.to_string())?;
        assert_eq!(first_bytes, second_bytes);
        Ok(())
    }

    #[test]
    fn test_no_dividends_gives_empty_summary() -> Result<(), String> {
        let (_dir, input) =
            setup(r#"{"Transactions": [{"Action": "Journal", "Amount": "$1.00"}]}"#)?;
        let summary = run_summary(&input).map_err(|e| e.to_string())?;
        assert_eq!(summary.dividends, 0);
        assert_eq!(summary.total_paiement, 0.0);
        assert_eq!(
            fs::read_to_string(&summary.output).map_err(|e| e.to_string())?,
            ""
        );
        Ok(())
    }

    #[test]
    fn test_bad_date_writes_nothing() -> Result<(), String> {
        let (dir, input) = setup(
            r#"{"Transactions": [
                {"Date": "03/15/2023", "Action": "Dividend", "Amount": "$10.00"},
                {"Date": "2023-03-16", "Action": "Dividend", "Amount": "$10.00"}
            ]}"#,
        )?;
        assert!(matches!(
            run_summary(&input),
            Err(DividendError::Parse { field: "Date", .. })
        ));
        assert!(!dir.path().join(SUMMARY_FILE).exists());
        Ok(())
    }

    #[test]
    fn test_missing_rate_writes_nothing() -> Result<(), String> {
        let (dir, input) = setup(
            r#"{"Transactions": [
                {"Date": "12/01/2023", "Action": "Dividend", "Amount": "$10.00"}
            ]}"#,
        )?;
        assert!(matches!(
            run_summary(&input),
            Err(DividendError::MissingRate(_))
        ));
        assert!(!dir.path().join(SUMMARY_FILE).exists());
        Ok(())
    }

    #[test]
    fn test_missing_rates_file() -> Result<(), String> {
        let (dir, input) = setup(EXPORT)?;
        fs::remove_file(dir.path().join(EXCHANGE_RATES_FILE)).map_err(|e| e.to_string())?;
        assert!(matches!(run_summary(&input), Err(DividendError::Io { .. })));
        Ok(())
    }

    #[test]
    fn test_same_day_keeps_export_order() -> Result<(), String> {
        let mut rates: std::collections::HashMap<chrono::NaiveDate, f64> =
            std::collections::HashMap::new();
        let day = chrono::NaiveDate::from_ymd_opt(2023, 3, 15).unwrap();
        rates.insert(day, 1.0);
        let dividends = vec![
            DividendRecord { date: day, amount_usd: 2.0 },
            DividendRecord { date: day, amount_usd: 1.0 },
        ];
        let taxed = compute_dividends_taxation(dividends, &rates).map_err(|e| e.to_string())?;
        assert_eq!(taxed[0].record.amount_usd, 2.0);
        assert_eq!(taxed[1].record.amount_usd, 1.0);
        Ok(())
    }
}
