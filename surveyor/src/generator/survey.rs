use chrono::NaiveDate;
use radcore::model::{DoseUnit, MeasurementPoint};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for generating a synthetic survey.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub count: usize,
    pub center_lat: f64,
    pub center_lon: f64,
    pub spread_deg: f64,
    /// Ambient dose rate far from the hot spot, mSv/h.
    pub background_msv: f64,
    /// Peak dose rate at the hot spot, mSv/h.
    pub hotspot_peak_msv: f64,
    pub seed: u64,
    pub survey_date: NaiveDate,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 40,
            center_lat: 50.4501,
            center_lon: 30.5234,
            spread_deg: 0.05,
            background_msv: 0.0001,
            hotspot_peak_msv: 2.0,
            seed: 0,
            survey_date: NaiveDate::from_ymd_opt(2026, 2, 16).expect("valid date"),
        }
    }
}

/// Scatters `count` points around the center with a dose-rate bump at a
/// fixed hot spot. Values are emitted in µSv/h so a run exercises unit
/// normalization end to end. Deterministic for a fixed seed.
pub fn build_survey_points(config: &GeneratorConfig) -> Vec<MeasurementPoint> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let spread = config.spread_deg.max(1e-6);
    let hotspot_lat = config.center_lat + 0.3 * spread;
    let hotspot_lon = config.center_lon - 0.2 * spread;
    let date_label = config.survey_date.format("%Y-%m-%d");

    (0..config.count)
        .map(|index| {
            let lat = config.center_lat + rng.gen_range(-spread..spread);
            let lon = config.center_lon + rng.gen_range(-spread..spread);
            let normalized_dist_sq = ((lat - hotspot_lat) / spread).powi(2)
                + ((lon - hotspot_lon) / spread).powi(2);
            let msv = config.background_msv
                + config.hotspot_peak_msv * (-4.0 * normalized_dist_sq).exp();
            let usv = msv * 1000.0;
            let timestamp = format!("{} 12:{:02}", date_label, index % 60);
            MeasurementPoint::new(lat, lon, usv, DoseUnit::MicroSievertPerHour, timestamp)
        })
        .collect()
}
