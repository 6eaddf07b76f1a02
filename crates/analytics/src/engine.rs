use std::collections::BTreeMap;

use core_types::{BaselineSource, CampaignRecord, NarrativeStatus, Period};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::AnalyticsError;
use crate::period::ReportingWindow;
use crate::report::{ClientReport, DeltaSet, MetricSet, TrendPoint};

/// A stateless calculator deriving per-client performance metrics from
/// marketing activity.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point: builds one `ClientReport` per distinct client
    /// with current-period activity.
    ///
    /// Clients with no records inside the current window are skipped, not
    /// given an empty report. Clients are processed in lexical order so the
    /// output is stable across runs on identical input.
    pub fn analyze(
        &self,
        records: &[CampaignRecord],
        window: &ReportingWindow,
    ) -> Result<Vec<ClientReport>, AnalyticsError> {
        let mut by_company: BTreeMap<&str, Vec<&CampaignRecord>> = BTreeMap::new();
        for record in records {
            by_company.entry(&record.company).or_default().push(record);
        }

        let mut reports = Vec::new();
        for (&company, client_records) in &by_company {
            tracing::debug!(company, "auditing client");

            let current_subset = in_period(client_records, &window.current);
            let Some(current) = aggregate(&current_subset) else {
                tracing::debug!(company, "no current-period activity, skipping");
                continue;
            };

            let previous_subset = in_period(client_records, &window.previous);
            let (previous, baseline) = match aggregate(&previous_subset) {
                Some(metrics) => (metrics, BaselineSource::Observed),
                None => {
                    tracing::warn!(
                        company,
                        "no previous-period records; comparing against sentinel baseline"
                    );
                    (MetricSet::sentinel(), BaselineSource::Sentinel)
                }
            };

            let (best_channel, best_channel_roi) = rank_channels(&current_subset)
                .ok_or_else(|| AnalyticsError::NotEnoughData(format!("channels for {company}")))?;

            reports.push(ClientReport {
                id: Uuid::new_v4(),
                company: company.to_string(),
                delta: compute_delta(&current, &previous),
                current,
                previous,
                baseline,
                best_channel,
                best_channel_roi,
                trend: daily_roi_trend(&current_subset),
                narrative: String::new(),
                narrative_status: NarrativeStatus::Pending,
            });
        }

        Ok(reports)
    }
}

fn in_period<'a>(records: &[&'a CampaignRecord], period: &Period) -> Vec<&'a CampaignRecord> {
    records
        .iter()
        .copied()
        .filter(|r| period.contains(r.date))
        .collect()
}

/// Reduces a record subset to its MetricSet.
///
/// Returns `None` for an empty subset; an absent period is undefined, not
/// zero. Records with an undefined ROI contribute spend and conversion but
/// are excluded from the ROI mean; if no record in the subset has a defined
/// ROI the mean falls back to zero, loudly.
pub fn aggregate(records: &[&CampaignRecord]) -> Option<MetricSet> {
    if records.is_empty() {
        return None;
    }

    let spend = records.iter().map(|r| r.acquisition_cost).sum();

    let roi = mean(records.iter().filter_map(|r| r.roi)).unwrap_or_else(|| {
        tracing::warn!("subset has no defined ROI values; reporting mean ROI as 0");
        Decimal::ZERO
    });

    // mean() is Some here because the subset is non-empty.
    let conversion_pct = mean(records.iter().map(|r| r.conversion_rate))
        .map(|m| m * Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::ZERO);

    Some(MetricSet {
        spend,
        roi,
        conversion_pct,
    })
}

/// Percentage change of every metric dimension between two MetricSets.
pub fn compute_delta(current: &MetricSet, previous: &MetricSet) -> DeltaSet {
    DeltaSet {
        spend_pct: pct_change(current.spend, previous.spend),
        roi_pct: pct_change(current.roi, previous.roi),
        conversion_pct: pct_change(current.conversion_pct, previous.conversion_pct),
    }
}

/// `(curr - prev) / prev * 100`, undefined when the previous value is zero.
fn pct_change(current: Decimal, previous: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    Some((current - previous) / previous * Decimal::ONE_HUNDRED)
}

/// Picks the channel with the highest mean ROI in the subset.
///
/// Ties resolve to the lexicographically smaller channel identifier: groups
/// are visited in ascending channel order and a later channel must strictly
/// beat the incumbent.
pub fn rank_channels(records: &[&CampaignRecord]) -> Option<(String, Decimal)> {
    let mut by_channel: BTreeMap<&str, Vec<Decimal>> = BTreeMap::new();
    for record in records {
        by_channel
            .entry(&record.channel)
            .or_default()
            .extend(record.roi);
    }

    let mut best: Option<(&str, Decimal)> = None;
    for (&channel, rois) in &by_channel {
        let channel_roi = mean(rois.iter().copied()).unwrap_or(Decimal::ZERO);
        if best.is_none_or(|(_, incumbent)| channel_roi > incumbent) {
            best = Some((channel, channel_roi));
        }
    }

    best.map(|(channel, roi)| (channel.to_string(), roi))
}

/// The daily ROI trend over the subset: mean of defined ROI values per
/// observation date, ascending. Days without a defined ROI are omitted.
pub fn daily_roi_trend(records: &[&CampaignRecord]) -> Vec<TrendPoint> {
    let mut by_day: BTreeMap<chrono::NaiveDate, Vec<Decimal>> = BTreeMap::new();
    for record in records {
        by_day.entry(record.date).or_default().extend(record.roi);
    }

    by_day
        .into_iter()
        .filter_map(|(date, rois)| mean(rois.into_iter()).map(|roi| TrendPoint { date, roi }))
        .collect()
}

fn mean(values: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    let mut sum = Decimal::ZERO;
    let mut count = 0u32;
    for value in values {
        sum += value;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / Decimal::from(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn record(
        date: NaiveDate,
        company: &str,
        channel: &str,
        cost: Decimal,
        roi: Option<Decimal>,
        conv: Decimal,
    ) -> CampaignRecord {
        CampaignRecord {
            date,
            company: company.to_string(),
            channel: channel.to_string(),
            acquisition_cost: cost,
            roi,
            conversion_rate: conv,
        }
    }

    fn refs(records: &[CampaignRecord]) -> Vec<&CampaignRecord> {
        records.iter().collect()
    }

    #[test]
    fn spend_is_the_exact_sum_regardless_of_order() {
        let mut records = vec![
            record(d(2024, 3, 1), "Acme", "Search", dec!(100.10), Some(dec!(2)), dec!(0.04)),
            record(d(2024, 3, 2), "Acme", "Search", dec!(250.25), Some(dec!(2)), dec!(0.04)),
            record(d(2024, 3, 3), "Acme", "Social", dec!(49.65), Some(dec!(2)), dec!(0.04)),
        ];
        let forward = aggregate(&refs(&records)).unwrap();
        records.reverse();
        let reversed = aggregate(&refs(&records)).unwrap();

        assert_eq!(forward.spend, dec!(400.00));
        assert_eq!(forward.spend, reversed.spend);
    }

    #[test]
    fn empty_subset_aggregates_to_undefined_not_zero() {
        assert_eq!(aggregate(&[]), None);
    }

    #[test]
    fn undefined_roi_is_excluded_from_the_mean() {
        let records = vec![
            record(d(2024, 3, 1), "Acme", "Search", dec!(100), Some(dec!(3.0)), dec!(0.05)),
            record(d(2024, 3, 2), "Acme", "Search", dec!(100), None, dec!(0.03)),
        ];
        let metrics = aggregate(&refs(&records)).unwrap();
        assert_eq!(metrics.roi, dec!(3.0));
        assert_eq!(metrics.conversion_pct, dec!(4));
    }

    #[test]
    fn delta_is_zero_when_periods_match_exactly() {
        let metrics = MetricSet {
            spend: dec!(500),
            roi: dec!(2.5),
            conversion_pct: dec!(4),
        };
        let delta = compute_delta(&metrics, &metrics);
        assert_eq!(delta.spend_pct, Some(dec!(0)));
        assert_eq!(delta.roi_pct, Some(dec!(0)));
        assert_eq!(delta.conversion_pct, Some(dec!(0)));
    }

    #[test]
    fn delta_flips_sign_when_periods_are_swapped() {
        let a = MetricSet { spend: dec!(150), roi: dec!(3), conversion_pct: dec!(6) };
        let b = MetricSet { spend: dec!(100), roi: dec!(2), conversion_pct: dec!(3) };

        let forward = compute_delta(&a, &b).spend_pct.unwrap();
        let backward = compute_delta(&b, &a).spend_pct.unwrap();
        assert!(forward > Decimal::ZERO);
        assert!(backward < Decimal::ZERO);
        assert_eq!(forward, dec!(50));
    }

    #[test]
    fn delta_against_a_zero_previous_is_undefined() {
        let current = MetricSet { spend: dec!(100), roi: dec!(2), conversion_pct: dec!(4) };
        let previous = MetricSet { spend: dec!(0), roi: dec!(2), conversion_pct: dec!(4) };
        let delta = compute_delta(&current, &previous);
        assert_eq!(delta.spend_pct, None);
        assert_eq!(delta.roi_pct, Some(dec!(0)));
    }

    #[test]
    fn ranker_returns_the_dominant_channel() {
        let records = vec![
            record(d(2024, 3, 1), "Acme", "Email", dec!(10), Some(dec!(1.0)), dec!(0.01)),
            record(d(2024, 3, 1), "Acme", "Search", dec!(10), Some(dec!(4.0)), dec!(0.01)),
            record(d(2024, 3, 2), "Acme", "Search", dec!(10), Some(dec!(2.0)), dec!(0.01)),
        ];
        let (channel, roi) = rank_channels(&refs(&records)).unwrap();
        assert_eq!(channel, "Search");
        assert_eq!(roi, dec!(3.0));
    }

    #[test]
    fn ranker_ties_resolve_to_lexically_smaller_channel() {
        let records = vec![
            record(d(2024, 3, 1), "Acme", "Social", dec!(10), Some(dec!(2.0)), dec!(0.01)),
            record(d(2024, 3, 1), "Acme", "Email", dec!(10), Some(dec!(2.0)), dec!(0.01)),
        ];
        let (channel, _) = rank_channels(&refs(&records)).unwrap();
        assert_eq!(channel, "Email");
    }

    #[test]
    fn trend_series_is_daily_means_in_ascending_date_order() {
        let records = vec![
            record(d(2024, 3, 2), "Acme", "Search", dec!(10), Some(dec!(2.0)), dec!(0.01)),
            record(d(2024, 3, 1), "Acme", "Search", dec!(10), Some(dec!(1.0)), dec!(0.01)),
            record(d(2024, 3, 1), "Acme", "Social", dec!(10), Some(dec!(3.0)), dec!(0.01)),
        ];
        let trend = daily_roi_trend(&refs(&records));
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].date, d(2024, 3, 1));
        assert_eq!(trend[0].roi, dec!(2.0));
        assert_eq!(trend[1].roi, dec!(2.0));
    }

    // The canonical degenerate-previous-period scenario: two current-month
    // records, nothing in the prior month.
    #[test]
    fn client_without_prior_period_compares_against_the_sentinel() {
        let records = vec![
            record(d(2024, 3, 1), "Acme", "Search", dec!(100), Some(dec!(3.0)), dec!(0.04)),
            record(d(2024, 3, 1), "Acme", "Social", dec!(50), Some(dec!(1.5)), dec!(0.02)),
        ];
        let window = ReportingWindow::resolve(d(2024, 3, 31)).unwrap();
        let reports = AnalyticsEngine::new().analyze(&records, &window).unwrap();

        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.best_channel, "Search");
        assert_eq!(report.best_channel_roi, dec!(3.0));
        assert_eq!(report.current.roi, dec!(2.25));
        assert_eq!(report.previous, MetricSet::sentinel());
        assert_eq!(report.baseline, BaselineSource::Sentinel);
        // Deltas against the sentinel are finite but flagged via `baseline`.
        assert_eq!(report.delta.spend_pct, Some(dec!(14900)));
        assert_eq!(report.narrative_status, NarrativeStatus::Pending);
    }

    #[test]
    fn client_with_no_current_activity_is_skipped() {
        let records = vec![
            record(d(2024, 2, 10), "Stale Co", "Search", dec!(100), Some(dec!(2.0)), dec!(0.04)),
            record(d(2024, 3, 5), "Acme", "Search", dec!(100), Some(dec!(2.0)), dec!(0.04)),
        ];
        let window = ReportingWindow::resolve(d(2024, 3, 31)).unwrap();
        let reports = AnalyticsEngine::new().analyze(&records, &window).unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].company, "Acme");
        assert_eq!(reports[0].baseline, BaselineSource::Sentinel);
    }

    #[test]
    fn observed_prior_period_produces_real_deltas() {
        let records = vec![
            record(d(2024, 2, 10), "Acme", "Search", dec!(100), Some(dec!(2.0)), dec!(0.02)),
            record(d(2024, 3, 5), "Acme", "Search", dec!(150), Some(dec!(3.0)), dec!(0.04)),
        ];
        let window = ReportingWindow::resolve(d(2024, 3, 31)).unwrap();
        let reports = AnalyticsEngine::new().analyze(&records, &window).unwrap();

        let report = &reports[0];
        assert_eq!(report.baseline, BaselineSource::Observed);
        assert_eq!(report.delta.spend_pct, Some(dec!(50)));
        assert_eq!(report.delta.roi_pct, Some(dec!(50)));
        assert_eq!(report.delta.conversion_pct, Some(dec!(100)));
    }
}
