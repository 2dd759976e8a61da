// SPDX-FileCopyrightText: 2022-2025 RustInFinance
// SPDX-License-Identifier: BSD-3-Clause

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::errors::DividendError;

pub const EXCHANGE_RATES_FILE: &str = "exchange_rates.csv";

const DATE_COLUMN: &str = "Date";
const USD_COLUMN: &str = "USD";
const RATES_DATE_FORMAT: &str = "%Y-%m-%d";
// Weekends and bank holidays leave gaps in the reference rates
const MAX_RATE_GAP_DAYS: i64 = 7;

/// Source of EUR/USD rates (dollars for one euro) keyed by date
pub trait EuroDollarRate {
    fn get_euro_dollar_rate(&self, date: chrono::NaiveDate) -> Result<f64, DividendError>;
}

pub(crate) fn validate_rate(date: chrono::NaiveDate, rate: f64) -> Result<f64, DividendError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(DividendError::InvalidRate { date, rate })
    }
}

/// Exact-date lookup only
impl EuroDollarRate for HashMap<chrono::NaiveDate, f64> {
    fn get_euro_dollar_rate(&self, date: chrono::NaiveDate) -> Result<f64, DividendError> {
        let rate = self.get(&date).ok_or(DividendError::MissingRate(date))?;
        validate_rate(date, *rate)
    }
}

/// EUR/USD reference rates loaded from a CSV in the ECB history layout:
/// a `Date` column (YYYY-MM-DD) and a `USD` column, other currencies ignored.
#[derive(Debug, Default)]
pub struct ExchangeRateData {
    rates: BTreeMap<chrono::NaiveDate, f64>,
}

impl ExchangeRateData {
    pub fn from_path(path: &Path) -> Result<Self, DividendError> {
        let file = std::fs::File::open(path).map_err(|e| DividendError::io(path, e))?;
        let data = Self::from_reader(file)?;
        log::info!(
            "Loaded {} EUR/USD exchange rates from {}",
            data.len(),
            path.display()
        );
        Ok(data)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, DividendError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DividendError::RatesFormat(format!("missing \"{name}\" column")))
        };
        let date_idx = column(DATE_COLUMN)?;
        let usd_idx = column(USD_COLUMN)?;

        let mut rates = BTreeMap::new();
        for record in rdr.records() {
            let record = record?;
            let date_str = record.get(date_idx).unwrap_or_default();
            if date_str.is_empty() {
                continue;
            }
            let date = chrono::NaiveDate::parse_from_str(date_str, RATES_DATE_FORMAT)
                .map_err(|e| DividendError::RatesFormat(format!("date \"{date_str}\": {e}")))?;

            // No fixing published for that day
            let rate_str = record.get(usd_idx).unwrap_or_default();
            if rate_str.is_empty() || rate_str == "N/A" {
                log::debug!("No USD rate for {date}");
                continue;
            }
            let rate = rate_str.parse::<f64>().map_err(|e| {
                DividendError::RatesFormat(format!("rate \"{rate_str}\" for {date}: {e}"))
            })?;
            rates.insert(date, rate);
        }
        Ok(ExchangeRateData { rates })
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Closest published date to `date`, the earlier one on ties
    fn nearest(&self, date: chrono::NaiveDate) -> Option<(chrono::NaiveDate, f64)> {
        let before = self.rates.range(..date).next_back();
        let after = self.rates.range(date..).next();
        let distance = |d: &chrono::NaiveDate| (*d - date).num_days().abs();
        let (found_date, rate) = match (before, after) {
            (Some(b), Some(a)) => {
                if distance(a.0) < distance(b.0) {
                    a
                } else {
                    b
                }
            }
            (Some(b), None) => b,
            (None, Some(a)) => a,
            (None, None) => return None,
        };
        if distance(found_date) > MAX_RATE_GAP_DAYS {
            return None;
        }
        Some((*found_date, *rate))
    }
}

impl EuroDollarRate for ExchangeRateData {
    fn get_euro_dollar_rate(&self, date: chrono::NaiveDate) -> Result<f64, DividendError> {
        if let Some(rate) = self.rates.get(&date) {
            return validate_rate(date, *rate);
        }
        let (rate_date, rate) = self.nearest(date).ok_or(DividendError::MissingRate(date))?;
        log::info!("No EUR/USD rate for {date}, using the one from {rate_date}: {rate}");
        validate_rate(date, rate)
    }
}
