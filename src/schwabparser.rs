// SPDX-FileCopyrightText: 2022-2025 RustInFinance
// SPDX-License-Identifier: BSD-3-Clause

use nom::{
    bytes::complete::tag,
    character::complete::{char, one_of},
    combinator::{all_consuming, opt, peek},
    error::Error,
    number::complete::double,
    sequence::tuple,
};
use serde::Deserialize;
use std::path::Path;

use crate::errors::DividendError;

const SCHWAB_DATE_FORMAT: &str = "%m/%d/%Y";
const DIVIDEND_ACTION: &str = "Dividend";

#[derive(Debug, Deserialize)]
struct SchwabExport {
    #[serde(rename = "Transactions")]
    transactions: Vec<SchwabTransaction>,
}

/// One entry of "Transactions". Only dividend entries are required to carry
/// a date and an amount.
#[derive(Debug, Deserialize)]
pub struct SchwabTransaction {
    #[serde(rename = "Action")]
    pub action: String,
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Amount", default)]
    pub amount: Option<String>,
}

/// Dividend payment as reported by the broker, amount in USD.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct DividendRecord {
    pub date: chrono::NaiveDate,
    pub amount_usd: f64,
}

impl DividendRecord {
    pub fn from_transaction(transaction: &SchwabTransaction) -> Result<Self, DividendError> {
        let date_str = transaction
            .date
            .as_deref()
            .ok_or_else(|| DividendError::parse("Date", "", "field is missing"))?;
        let amount_str = transaction
            .amount
            .as_deref()
            .ok_or_else(|| DividendError::parse("Amount", "", "field is missing"))?;

        let date = chrono::NaiveDate::parse_from_str(date_str, SCHWAB_DATE_FORMAT)
            .map_err(|e| DividendError::parse("Date", date_str, e))?;
        let amount_usd = extract_cash(amount_str)?;
        Ok(DividendRecord { date, amount_usd })
    }
}

/// Converts Schwab currency strings e.g. "$1,234.56" or "-$0.40" into a number
pub fn extract_cash(cashline: &str) -> Result<f64, DividendError> {
    // Thousands separators would stop the number parser
    let cashline_string: String = cashline.trim().replace(',', "");
    let mut cash_parser = all_consuming(tuple((
        opt(char::<&str, Error<_>>('-')),
        opt(tag("$")),
        // The sign was taken above, double must not read a second one
        peek(one_of::<&str, &str, Error<_>>("0123456789.")),
        double::<&str, Error<_>>,
    )));

    match cash_parser(cashline_string.as_str()) {
        Ok((_, (sign, _, _, value))) if value.is_finite() => {
            Ok(if sign.is_some() { -value } else { value })
        }
        Ok(_) => Err(DividendError::parse("Amount", cashline, "not a finite number")),
        Err(e) => Err(DividendError::parse("Amount", cashline, e)),
    }
}

/// Reads a Schwab JSON export and returns its dividend payments in file order
pub fn parse_dividends(schwab_json: &Path) -> Result<Vec<DividendRecord>, DividendError> {
    let content =
        std::fs::read_to_string(schwab_json).map_err(|e| DividendError::io(schwab_json, e))?;
    parse_dividends_from_str(&content)
}

pub fn parse_dividends_from_str(content: &str) -> Result<Vec<DividendRecord>, DividendError> {
    let export: SchwabExport = serde_json::from_str(content)?;
    log::info!("Transactions in export: {}", export.transactions.len());

    let dividends = export
        .transactions
        .iter()
        .filter(|t| t.action == DIVIDEND_ACTION)
        .map(DividendRecord::from_transaction)
        .collect::<Result<Vec<_>, _>>()?;
    log::info!("Dividend transactions: {}", dividends.len());
    Ok(dividends)
}
