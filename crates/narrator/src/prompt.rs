use analytics::ClientReport;
use rust_decimal::Decimal;

/// Builds the strict-truth prompt for one client.
///
/// Every number in the prompt is pre-computed by the analytics engine; the
/// model is asked to describe the trend and recommend a reallocation, never
/// to do arithmetic. Role prompting plus a fixed three-step task keeps the
/// output shape predictable across clients.
pub fn build_prompt(report: &ClientReport, period_label: &str) -> String {
    let spend_trend = match report.delta.spend_pct {
        Some(pct) if pct > Decimal::ZERO => format!("INCREASED {:.1}%", pct.abs()),
        Some(pct) => format!("DECREASED {:.1}%", pct.abs()),
        None => "no prior-period comparison".to_string(),
    };
    let roi_trend = match report.delta.roi_pct {
        Some(pct) if pct > Decimal::ZERO => format!("Trending UP {:.1}%", pct.abs()),
        Some(pct) => format!("Trending DOWN {:.1}%", pct.abs()),
        None => "no prior-period comparison".to_string(),
    };

    format!(
        "ACT AS: A senior account manager at a premium ad agency.\n\
         CLIENT: \"{company}\"\n\
         PERIOD: {period}\n\
         \n\
         ### PERFORMANCE DATA (STRICT TRUTH):\n\
         - Spend: ${spend} ({spend_trend}).\n\
         - ROI: {roi:.2}x ({roi_trend}).\n\
         - Top Channel: {channel} ({channel_roi:.2}x ROI).\n\
         \n\
         ### YOUR TASK:\n\
         Write a short, professional executive recap (one paragraph).\n\
         1. HIGHLIGHT: The ROI trend.\n\
         2. EXPLAIN: Connect the result to the spend or channel performance.\n\
         3. OPTIMIZE: Suggest doubling down on the top channel.\n",
        company = report.company,
        period = period_label,
        spend = format_thousands(report.current.spend),
        roi = report.current.roi,
        channel = report.best_channel,
        channel_roi = report.best_channel_roi,
    )
}

/// Strips the markdown markers models like to emit; the consuming renderer
/// treats narrative text as plain prose.
pub fn sanitize_narrative(raw: &str) -> String {
    raw.replace("**", "").replace("##", "").trim().to_string()
}

/// Renders a spend figure the way it appears in the report: rounded to whole
/// currency units with thousands separators.
pub fn format_thousands(amount: Decimal) -> String {
    let rounded = amount.round();
    let raw = rounded.abs().to_string();
    let mut grouped = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, c) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded.is_sign_negative() {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::{DeltaSet, MetricSet};
    use chrono::NaiveDate;
    use core_types::{BaselineSource, NarrativeStatus};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn report() -> ClientReport {
        ClientReport {
            id: Uuid::new_v4(),
            company: "Acme".to_string(),
            current: MetricSet {
                spend: dec!(12450.40),
                roi: dec!(2.25),
                conversion_pct: dec!(4.2),
            },
            previous: MetricSet {
                spend: dec!(10000),
                roi: dec!(2.5),
                conversion_pct: dec!(4.0),
            },
            baseline: BaselineSource::Observed,
            delta: DeltaSet {
                spend_pct: Some(dec!(24.504)),
                roi_pct: Some(dec!(-10)),
                conversion_pct: Some(dec!(5)),
            },
            best_channel: "Search".to_string(),
            best_channel_roi: dec!(3.0),
            trend: vec![analytics::TrendPoint {
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                roi: dec!(2.25),
            }],
            narrative: String::new(),
            narrative_status: NarrativeStatus::Pending,
        }
    }

    #[test]
    fn prompt_embeds_only_precomputed_facts() {
        let prompt = build_prompt(&report(), "March 2024");
        assert!(prompt.contains("CLIENT: \"Acme\""));
        assert!(prompt.contains("PERIOD: March 2024"));
        assert!(prompt.contains("- Spend: $12,450 (INCREASED 24.5%)."));
        assert!(prompt.contains("- ROI: 2.25x (Trending DOWN 10.0%)."));
        assert!(prompt.contains("- Top Channel: Search (3.00x ROI)."));
    }

    #[test]
    fn prompt_degrades_gracefully_without_a_comparable_baseline() {
        let mut r = report();
        r.delta.spend_pct = None;
        r.delta.roi_pct = None;
        let prompt = build_prompt(&r, "March 2024");
        assert!(prompt.contains("(no prior-period comparison)"));
        assert!(!prompt.contains("INCREASED"));
    }

    #[test]
    fn sanitizer_strips_markdown_markers() {
        assert_eq!(
            sanitize_narrative("## Recap\n**Strong** month."),
            "Recap\nStrong month."
        );
        assert_eq!(sanitize_narrative("plain text"), "plain text");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(format_thousands(dec!(950)), "950");
        assert_eq!(format_thousands(dec!(12450.40)), "12,450");
        assert_eq!(format_thousands(dec!(1234567)), "1,234,567");
        assert_eq!(format_thousands(dec!(-5000)), "-5,000");
    }
}
