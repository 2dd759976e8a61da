// SPDX-FileCopyrightText: 2022-2025 RustInFinance
// SPDX-License-Identifier: BSD-3-Clause

use crate::errors::DividendError;
use crate::exchange_rates::{validate_rate, EuroDollarRate};
use crate::schwabparser::DividendRecord;

// Percentages applied to the EUR gross dividend (box 2DC / 2CK of the french return)
const IL_RATE: f64 = 12.8;
const PQ_RATE: f64 = 9.2;
const PV_RATE: f64 = 0.5;
const PG_RATE: f64 = 7.5;

/// Order in which amounts are reported
pub const BUCKET_ORDER: [&str; 8] = ["paiement", "IL", "PQ", "PV", "PF", "PG", "PT", "QR"];

/// Round half to even on the exact binary value, two decimals
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// EUR amounts derived from one dividend. Rate based buckets are rounded
/// individually, composite buckets are sums of the rounded ones.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct DerivedAmounts {
    pub ik: f64,
    pub il: f64,
    pub pq: f64,
    pub pv: f64,
    pub pf: f64,
    pub pg: f64,
    pub pt: f64,
    pub qr: f64,
    pub paiement: f64,
}

impl DerivedAmounts {
    pub fn from_base(ik: f64) -> Self {
        let il = round2(ik * IL_RATE / 100.0);
        let pq = round2(ik * PQ_RATE / 100.0);
        let pv = round2(ik * PV_RATE / 100.0);
        let pg = round2(ik * PG_RATE / 100.0);
        let pf = pv + pq;
        let pt = pf + pg;
        let qr = pt + il;
        DerivedAmounts {
            ik,
            il,
            pq,
            pv,
            pf,
            pg,
            pt,
            qr,
            paiement: qr,
        }
    }

    pub fn bucket(&self, name: &str) -> Option<f64> {
        match name {
            "IK" => Some(self.ik),
            "IL" => Some(self.il),
            "PQ" => Some(self.pq),
            "PV" => Some(self.pv),
            "PF" => Some(self.pf),
            "PG" => Some(self.pg),
            "PT" => Some(self.pt),
            "QR" => Some(self.qr),
            "paiement" => Some(self.paiement),
            _ => None,
        }
    }

    /// Buckets in reporting order
    pub fn ordered(&self) -> Vec<(&'static str, f64)> {
        BUCKET_ORDER
            .iter()
            .filter_map(|name| self.bucket(name).map(|v| (*name, v)))
            .collect()
    }
}

/// Dividend with the exchange rate of its date and the derived amounts
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct TaxedDividend {
    pub record: DividendRecord,
    pub euro_dollar: f64,
    pub amounts: DerivedAmounts,
}

pub fn compute_dividend_taxation(
    record: &DividendRecord,
    rates: &dyn EuroDollarRate,
) -> Result<TaxedDividend, DividendError> {
    let euro_dollar = validate_rate(record.date, rates.get_euro_dollar_rate(record.date)?)?;
    let amounts = DerivedAmounts::from_base(record.amount_usd / euro_dollar);
    log::info!(
        "DIVIDEND date: {}, gross: ${}, rate: {euro_dollar}$/€, base: €{:.2}, to pay: €{:.2}",
        record.date,
        record.amount_usd,
        amounts.ik,
        amounts.paiement
    );
    Ok(TaxedDividend {
        record: *record,
        euro_dollar,
        amounts,
    })
}
