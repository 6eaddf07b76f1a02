use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use core_types::CampaignRecord;
use csv::StringRecord;
use rust_decimal::Decimal;

use crate::error::IngestError;

/// Resolved header positions for the required columns. A dataset missing any
/// of these is rejected before analysis starts.
struct ColumnIndex {
    date: usize,
    company: usize,
    channel: usize,
    acquisition_cost: usize,
    roi: usize,
    conversion_rate: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self, IngestError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| IngestError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            date: find("Date")?,
            company: find("Company")?,
            channel: find("Channel_Used")?,
            acquisition_cost: find("Acquisition_Cost")?,
            roi: find("ROI")?,
            conversion_rate: find("Conversion_Rate")?,
        })
    }
}

/// Loads and cleans the marketing dataset from a CSV file.
pub fn load_records(path: &Path) -> Result<Vec<CampaignRecord>, IngestError> {
    let file = File::open(path)?;
    let records = read_records(file)?;
    tracing::info!(count = records.len(), path = %path.display(), "dataset ingested");
    Ok(records)
}

/// Reads and cleans records from any CSV source.
///
/// Cleaning rules mirror what AdTech exports actually look like:
/// - `Acquisition_Cost` may carry a currency symbol and thousands separators
///   ("$1,200.00") and is normalized to a plain decimal; a cell that still
///   fails to parse is a fatal error.
/// - `ROI` is coerced to a decimal; non-numeric cells become `None` so they
///   can be excluded from means instead of poisoning them.
/// - `Date` must parse; a dataset whose dates cannot be read is useless for
///   period-over-period work.
pub fn read_records<R: Read>(source: R) -> Result<Vec<CampaignRecord>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    for (offset, row) in reader.records().enumerate() {
        let row = row?;
        // Header is line 1; data starts on line 2.
        let line = offset as u64 + 2;
        records.push(parse_row(&row, &columns, line)?);
    }

    if records.is_empty() {
        return Err(IngestError::EmptyDataset);
    }

    Ok(records)
}

fn parse_row(
    row: &StringRecord,
    columns: &ColumnIndex,
    line: u64,
) -> Result<CampaignRecord, IngestError> {
    let field = |idx: usize| row.get(idx).unwrap_or_default();

    let date = parse_date(field(columns.date)).ok_or_else(|| IngestError::InvalidField {
        row: line,
        field: "Date",
        value: field(columns.date).to_string(),
    })?;

    let acquisition_cost = normalize_currency(field(columns.acquisition_cost)).ok_or_else(|| {
        IngestError::InvalidField {
            row: line,
            field: "Acquisition_Cost",
            value: field(columns.acquisition_cost).to_string(),
        }
    })?;

    // Non-numeric ROI cells are tolerated: the value becomes undefined and the
    // aggregator excludes it from means.
    let roi = Decimal::from_str(field(columns.roi)).ok();
    if roi.is_none() && !field(columns.roi).is_empty() {
        tracing::debug!(row = line, value = field(columns.roi), "non-numeric ROI cell");
    }

    let conversion_rate =
        Decimal::from_str(field(columns.conversion_rate)).map_err(|_| IngestError::InvalidField {
            row: line,
            field: "Conversion_Rate",
            value: field(columns.conversion_rate).to_string(),
        })?;

    Ok(CampaignRecord {
        date,
        company: field(columns.company).to_string(),
        channel: field(columns.channel).to_string(),
        acquisition_cost,
        roi,
        conversion_rate,
    })
}

/// Strips a leading currency symbol and thousands separators, then parses.
fn normalize_currency(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ','))
        .collect();
    Decimal::from_str(cleaned.trim()).ok()
}

/// Accepts ISO dates and the slash format common in AdTech exports.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .ok()
}
