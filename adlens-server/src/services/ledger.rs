//! Date-keyed ROI aggregation
//!
//! Merges the spend and sales time series into one per-date ledger and
//! derives profit and ROI. Pure function of its inputs: no I/O, never
//! fails, recomputed per request.

use crate::models::{DailyLedgerEntry, RoiReport, RoiTotals};
use adlens_common::db::models::{SaleRecord, SpendRecord};
use std::collections::BTreeMap;

/// Per-date accumulator while folding the two inputs
#[derive(Debug, Default, Clone, Copy)]
struct DayAccum {
    spend: f64,
    revenue: f64,
}

/// Compute the ROI report from the owner's spend and sales rows.
///
/// Every date present in either input appears exactly once in the output,
/// in ascending date order. Dates are fixed-width `YYYY-MM-DD`, so the
/// BTreeMap's lexical string order is calendar order. Policy on zero-spend
/// days: ROI is 0, not infinite, regardless of revenue.
pub fn compute_roi(spend: &[SpendRecord], sales: &[SaleRecord]) -> RoiReport {
    let mut daily: BTreeMap<&str, DayAccum> = BTreeMap::new();

    for record in spend {
        let accum = daily.entry(record.date.as_str()).or_default();
        accum.spend += sanitize_amount(record.spend_amount);
    }

    for record in sales {
        let accum = daily.entry(record.date.as_str()).or_default();
        accum.revenue += sanitize_amount(record.sale_amount);
    }

    let data: Vec<DailyLedgerEntry> = daily
        .into_iter()
        .map(|(date, accum)| {
            let profit = accum.revenue - accum.spend;
            let roi = if accum.spend > 0.0 {
                (profit / accum.spend * 100.0).round() as i64
            } else {
                0
            };
            DailyLedgerEntry {
                date: date.to_string(),
                spend: accum.spend,
                revenue: accum.revenue,
                profit,
                roi,
            }
        })
        .collect();

    let mut totals = data.iter().fold(RoiTotals::default(), |acc, entry| RoiTotals {
        revenue: acc.revenue + entry.revenue,
        spend: acc.spend + entry.spend,
        profit: acc.profit + entry.profit,
        avg_roi: 0,
    });
    totals.avg_roi = if totals.spend > 0.0 {
        (totals.profit / totals.spend * 100.0).round() as i64
    } else {
        0
    };

    RoiReport {
        success: true,
        data,
        totals,
        message: None,
    }
}

/// Lenient numeric policy: non-finite values count as zero rather than
/// poisoning the whole report.
fn sanitize_amount(amount: f64) -> f64 {
    if amount.is_finite() {
        amount
    } else {
        0.0
    }
}
