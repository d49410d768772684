use crate::map_bridge::model::MapModel;
use crate::workflow::runner::{RunOutcome, Runner};
use radcore::model::{DoseUnit, MeasurementPoint, SurveyReport};
use serde::Deserialize;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

fn map_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Debug)]
struct WarpError;

impl warp::reject::Reject for WarpError {}

/// Raw measurement row accepted over the ingest endpoint.
#[derive(Debug, Deserialize)]
struct IngestRow {
    lat: f64,
    lon: f64,
    value: f64,
    unit: String,
    #[serde(default)]
    time: Option<String>,
}

#[derive(Default)]
struct BridgeState {
    report: Option<SurveyReport>,
    map: MapModel,
}

/// Publishes survey state to the rendering collaborator and accepts fresh
/// payloads from it.
pub struct MapBridge {
    state: Arc<RwLock<BridgeState>>,
}

impl MapBridge {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(BridgeState::default())),
        }
    }

    /// Replaces the published state with a finished run.
    pub fn publish(&self, outcome: &RunOutcome) {
        let mut guard = self.state.write().expect("bridge state poisoned");
        match &outcome.analysis {
            Some(analysis) => {
                guard.map = MapModel::from_report(&analysis.report, outcome.rejected.len());
                guard.report = Some(analysis.report.clone());
                println!(
                    "[MAP] layers: {}, overlays: {}, rejected: {}",
                    guard.map.layers.len(),
                    guard.map.overlays.len(),
                    guard.map.rejected_points
                );
            }
            None => {
                guard.map = MapModel {
                    rejected_points: outcome.rejected.len(),
                    ..MapModel::default()
                };
                guard.report = None;
            }
        }
    }

    pub fn publish_status(&self, message: &str) {
        println!("[MAP] {}", message);
    }

    /// Serves the bridge endpoints on a dedicated thread until the process
    /// exits: GET /report, GET /map, POST /ingest.
    pub fn spawn_http(&self, runner: Arc<Runner>) {
        let state = self.state.clone();
        let state_filter = warp::any().map(move || state.clone());
        let runner_filter = warp::any().map(move || runner.clone());

        let report_route = warp::path("report")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<BridgeState>>| {
                let guard = state.read().expect("bridge state poisoned");
                match &guard.report {
                    Some(report) => warp::reply::json(report),
                    None => warp::reply::json(&json!({"status": "empty"})),
                }
            });

        let map_route = warp::path("map")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<BridgeState>>| {
                warp::reply::json(&state.read().expect("bridge state poisoned").map)
            });

        let ingest_route = warp::path("ingest")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(runner_filter)
            .and_then(
                |rows: Vec<IngestRow>,
                 state: Arc<RwLock<BridgeState>>,
                 runner: Arc<Runner>| async move {
                    let mut points: Vec<MeasurementPoint> = Vec::with_capacity(rows.len());
                    let mut unit_rejects = 0usize;
                    for row in rows {
                        match DoseUnit::parse(&row.unit) {
                            Ok(unit) => points.push(MeasurementPoint::new(
                                row.lat,
                                row.lon,
                                row.value,
                                unit,
                                row.time.unwrap_or_default(),
                            )),
                            Err(_) => unit_rejects += 1,
                        }
                    }

                    match runner.execute(points) {
                        Ok(outcome) => {
                            let rejected = outcome.rejected.len() + unit_rejects;
                            {
                                let mut guard = state.write().expect("bridge state poisoned");
                                match &outcome.analysis {
                                    Some(analysis) => {
                                        guard.map =
                                            MapModel::from_report(&analysis.report, rejected);
                                        guard.report = Some(analysis.report.clone());
                                    }
                                    None => {
                                        guard.map = MapModel {
                                            rejected_points: rejected,
                                            ..MapModel::default()
                                        };
                                        guard.report = None;
                                    }
                                }
                            }
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({
                                    "status": "ok",
                                    "accepted": outcome.accepted,
                                    "rejected": rejected,
                                })),
                                StatusCode::OK,
                            ))
                        }
                        Err(error) => {
                            eprintln!("ingest error: {}", error);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        thread::spawn(move || {
            let routes = report_route.or(map_route).or(ingest_route);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes).run(map_bind_address()).await;
            });
        });
    }

    #[cfg(test)]
    fn snapshot_map(&self) -> MapModel {
        self.state.read().expect("bridge state poisoned").map.clone()
    }
}

impl Default for MapBridge {
    fn default() -> Self {
        Self::new()
    }
}
