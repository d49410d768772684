use anyhow::{bail, Context};
use radcore::model::{DoseUnit, MeasurementPoint};
use std::io::Read;

/// Column contract for survey CSV files. Header order is free, but every
/// column must be present.
pub const REQUIRED_COLUMNS: [&str; 5] = ["lat", "lon", "value", "unit", "time"];

/// A row refused at the boundary, with its 1-based file line.
#[derive(Debug, Clone)]
pub struct RowRejection {
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct IngestBatch {
    pub points: Vec<MeasurementPoint>,
    pub rejected: Vec<RowRejection>,
}

/// Field instruments and manual entry both produce "0,12" style decimals.
fn parse_decimal(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    trimmed
        .parse()
        .ok()
        .or_else(|| trimmed.replace(',', ".").parse().ok())
}

/// Validates the fixed column contract, then converts each row into a
/// `MeasurementPoint` or a rejection. A missing column fails the whole
/// file; a malformed row only ever costs that row.
pub fn read_measurements<R: Read>(reader: R) -> anyhow::Result<IngestBatch> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().context("reading csv header")?.clone();
    let mut indices = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, column) in REQUIRED_COLUMNS.iter().enumerate() {
        match headers.iter().position(|header| header.eq_ignore_ascii_case(column)) {
            Some(index) => indices[slot] = index,
            None => bail!("csv is missing required column '{}'", column),
        }
    }

    let mut batch = IngestBatch::default();
    for (row_index, record) in csv_reader.records().enumerate() {
        // The header occupies line 1.
        let line = row_index + 2;
        let record = match record {
            Ok(record) => record,
            Err(error) => {
                batch.rejected.push(RowRejection {
                    line,
                    reason: error.to_string(),
                });
                continue;
            }
        };
        let field = |slot: usize| record.get(indices[slot]).unwrap_or("");

        let Some(lat) = parse_decimal(field(0)) else {
            batch.rejected.push(RowRejection {
                line,
                reason: format!("unparsable latitude '{}'", field(0)),
            });
            continue;
        };
        let Some(lon) = parse_decimal(field(1)) else {
            batch.rejected.push(RowRejection {
                line,
                reason: format!("unparsable longitude '{}'", field(1)),
            });
            continue;
        };
        let Some(value) = parse_decimal(field(2)) else {
            batch.rejected.push(RowRejection {
                line,
                reason: format!("unparsable dose rate '{}'", field(2)),
            });
            continue;
        };
        let unit = match DoseUnit::parse(field(3)) {
            Ok(unit) => unit,
            Err(error) => {
                batch.rejected.push(RowRejection {
                    line,
                    reason: error.to_string(),
                });
                continue;
            }
        };

        batch
            .points
            .push(MeasurementPoint::new(lat, lon, value, unit, field(4)));
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_file_parses_every_row() {
        let data = "lat,lon,value,unit,time\n\
                    50.0,30.0,0.12,µSv/h,2026-02-16 12:00\n\
                    50.1,30.1,0.4,mSv/h,2026-02-16 13:00\n";
        let batch = read_measurements(data.as_bytes()).unwrap();
        assert_eq!(batch.points.len(), 2);
        assert!(batch.rejected.is_empty());
        assert_eq!(batch.points[0].unit, DoseUnit::MicroSievertPerHour);
        assert!(batch.points[0].timestamp.is_some());
    }

    #[test]
    fn header_columns_may_come_in_any_order() {
        let data = "time,unit,value,lon,lat\n\
                    2026-02-16 12:00,mSv/h,0.4,30.0,50.0\n";
        let batch = read_measurements(data.as_bytes()).unwrap();
        assert_eq!(batch.points.len(), 1);
        assert_eq!(batch.points[0].latitude, 50.0);
        assert_eq!(batch.points[0].longitude, 30.0);
    }

    #[test]
    fn missing_required_column_fails_the_file() {
        let data = "lat,lon,value,time\n50.0,30.0,0.12,2026-02-16\n";
        let error = read_measurements(data.as_bytes()).unwrap_err();
        assert!(error.to_string().contains("unit"));
    }

    #[test]
    fn malformed_rows_are_rejected_individually() {
        let data = "lat,lon,value,unit,time\n\
                    50.0,30.0,0.12,µSv/h,2026-02-16 12:00\n\
                    fifty,30.0,0.12,µSv/h,2026-02-16 12:00\n\
                    50.0,30.0,0.12,rem/h,2026-02-16 12:00\n\
                    50.2,30.2,0.2,mSv/h,2026-02-16 12:00\n";
        let batch = read_measurements(data.as_bytes()).unwrap();
        assert_eq!(batch.points.len(), 2);
        assert_eq!(batch.rejected.len(), 2);
        assert_eq!(batch.rejected[0].line, 3);
        assert!(batch.rejected[0].reason.contains("latitude"));
        assert_eq!(batch.rejected[1].line, 4);
        assert!(batch.rejected[1].reason.contains("unknown unit"));
    }

    #[test]
    fn decimal_commas_are_accepted() {
        let data = "lat,lon,value,unit,time\n\"50,45\",\"30,52\",\"0,12\",µSv/h,\n";
        let batch = read_measurements(data.as_bytes()).unwrap();
        assert_eq!(batch.points.len(), 1);
        assert!((batch.points[0].latitude - 50.45).abs() < 1e-12);
        assert!((batch.points[0].raw_value - 0.12).abs() < 1e-12);
    }
}
