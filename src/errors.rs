// SPDX-FileCopyrightText: 2022-2025 RustInFinance
// SPDX-License-Identifier: BSD-3-Clause

use std::path::PathBuf;
use thiserror::Error;

/// Every failure is fatal for the run: nothing below is recovered from.
#[derive(Error, Debug)]
pub enum DividendError {
    #[error("Error: unable to parse {field} \"{value}\": {reason}")]
    Parse {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Error: no EUR/USD exchange rate available for {0}")]
    MissingRate(chrono::NaiveDate),

    #[error("Error: invalid EUR/USD exchange rate {rate} for {date}")]
    InvalidRate { date: chrono::NaiveDate, rate: f64 },

    #[error("Error: malformed exchange rates file: {0}")]
    RatesFormat(String),

    #[error("Error: unable to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error: unable to parse transactions JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Error: unable to read exchange rates CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl DividendError {
    pub(crate) fn parse(field: &'static str, value: &str, reason: impl ToString) -> Self {
        DividendError::Parse {
            field,
            value: value.to_owned(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DividendError::Io {
            path: path.into(),
            source,
        }
    }
}
