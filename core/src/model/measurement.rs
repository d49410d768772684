use crate::prelude::{SurveyError, SurveyResult};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Planar (lat, lon) coordinate. Surveys cover small areas, so the whole
/// pipeline works in the planar approximation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Dose-rate unit accepted at the ingestion boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoseUnit {
    #[serde(rename = "µSv/h")]
    MicroSievertPerHour,
    #[serde(rename = "mSv/h")]
    MilliSievertPerHour,
}

impl DoseUnit {
    /// Multiplier converting a value in this unit to mSv/h.
    pub fn factor_to_msv(self) -> f64 {
        match self {
            DoseUnit::MicroSievertPerHour => 0.001,
            DoseUnit::MilliSievertPerHour => 1.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            DoseUnit::MicroSievertPerHour => "µSv/h",
            DoseUnit::MilliSievertPerHour => "mSv/h",
        }
    }

    /// ASCII-safe label for report targets that cannot render "µ".
    pub fn ascii_label(self) -> &'static str {
        match self {
            DoseUnit::MicroSievertPerHour => "uSv/h",
            DoseUnit::MilliSievertPerHour => "mSv/h",
        }
    }

    /// Parses the canonical symbols plus the aliases found in legacy survey
    /// files (ASCII "uSv/h" and the Cyrillic labels).
    pub fn parse(text: &str) -> SurveyResult<Self> {
        match text.trim() {
            "µSv/h" | "uSv/h" | "мкЗв/год" => Ok(DoseUnit::MicroSievertPerHour),
            "mSv/h" | "мЗв/год" => Ok(DoseUnit::MilliSievertPerHour),
            other => Err(SurveyError::UnknownUnit(other.to_string())),
        }
    }
}

impl std::fmt::Display for DoseUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Timestamp formats seen in survey files, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%d.%m.%Y %H:%M"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y"];

/// Best-effort timestamp parsing; `None` keeps the point usable without a
/// date instead of rejecting it.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in TIMESTAMP_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(timestamp);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Layer bucket for points whose timestamp never parsed.
pub const UNSPECIFIED_DATE_LABEL: &str = "unspecified date";

/// A raw dose-rate measurement as captured in the field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub raw_value: f64,
    pub unit: DoseUnit,
    pub timestamp: Option<NaiveDateTime>,
    pub raw_timestamp_text: String,
}

impl MeasurementPoint {
    pub fn new(
        latitude: f64,
        longitude: f64,
        raw_value: f64,
        unit: DoseUnit,
        raw_timestamp_text: impl Into<String>,
    ) -> Self {
        let raw_timestamp_text = raw_timestamp_text.into();
        let timestamp = parse_timestamp(&raw_timestamp_text);
        Self {
            latitude,
            longitude,
            raw_value,
            unit,
            timestamp,
            raw_timestamp_text,
        }
    }

    /// Calendar-date label used to group map layers by survey day.
    pub fn day_label(&self) -> String {
        match self.timestamp {
            Some(timestamp) => timestamp.date().to_string(),
            None => UNSPECIFIED_DATE_LABEL.to_string(),
        }
    }
}

/// A measurement with its value brought onto the canonical mSv/h scale.
/// Always derived from the raw point, never stored on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalMeasurement {
    pub point: MeasurementPoint,
    pub value_msv_per_hour: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_parse_accepts_canonical_and_legacy_labels() {
        assert_eq!(
            DoseUnit::parse("µSv/h").unwrap(),
            DoseUnit::MicroSievertPerHour
        );
        assert_eq!(
            DoseUnit::parse("uSv/h").unwrap(),
            DoseUnit::MicroSievertPerHour
        );
        assert_eq!(
            DoseUnit::parse("мкЗв/год").unwrap(),
            DoseUnit::MicroSievertPerHour
        );
        assert_eq!(
            DoseUnit::parse(" mSv/h ").unwrap(),
            DoseUnit::MilliSievertPerHour
        );
    }

    #[test]
    fn unit_parse_rejects_anything_else() {
        let err = DoseUnit::parse("rem/h").unwrap_err();
        assert_eq!(err, SurveyError::UnknownUnit("rem/h".to_string()));
    }

    #[test]
    fn ascii_label_strips_the_micro_sign() {
        assert_eq!(DoseUnit::MicroSievertPerHour.ascii_label(), "uSv/h");
        assert_eq!(DoseUnit::MilliSievertPerHour.ascii_label(), "mSv/h");
    }

    #[test]
    fn timestamp_parsing_tries_known_formats() {
        assert!(parse_timestamp("2026-02-16 12:00").is_some());
        assert!(parse_timestamp("2026-02-16 12:00:30").is_some());
        assert!(parse_timestamp("16.02.2026 09:15").is_some());
        assert!(parse_timestamp("2026-02-16").is_some());
        assert!(parse_timestamp("yesterday-ish").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn day_label_falls_back_for_unparsable_timestamps() {
        let dated = MeasurementPoint::new(
            50.0,
            30.0,
            0.1,
            DoseUnit::MilliSievertPerHour,
            "2026-02-16 12:00",
        );
        assert_eq!(dated.day_label(), "2026-02-16");

        let undated =
            MeasurementPoint::new(50.0, 30.0, 0.1, DoseUnit::MilliSievertPerHour, "no idea");
        assert!(undated.timestamp.is_none());
        assert_eq!(undated.day_label(), UNSPECIFIED_DATE_LABEL);
    }
}
