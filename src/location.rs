//! User location source for the browse and detail screens.
//!
//! The provider runs as a tokio task and pushes `LocationUpdate`s into a
//! channel; the main loop drains it each frame and hands updates to the core.
//! Nothing in the catalog or auth modules ever calls into this.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::{LocationConfig, LocationMode};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A (latitude, longitude) pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance in kilometres (haversine)
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

/// What the location provider reports
#[derive(Debug, Clone, PartialEq)]
pub enum LocationUpdate {
    Position(Coordinate),
    /// User refused the permission prompt
    Denied,
    Unavailable(String),
}

/// Last known location state, as the frontends see it
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LocationStatus {
    #[default]
    Pending,
    Known(Coordinate),
    Denied,
    Unavailable(String),
}

impl LocationStatus {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            LocationStatus::Known(coord) => Some(*coord),
            _ => None,
        }
    }

    pub fn apply(&mut self, update: LocationUpdate) {
        *self = match update {
            LocationUpdate::Position(coord) => LocationStatus::Known(coord),
            LocationUpdate::Denied => LocationStatus::Denied,
            LocationUpdate::Unavailable(reason) => LocationStatus::Unavailable(reason),
        };
    }

    pub fn describe(&self) -> String {
        match self {
            LocationStatus::Pending => "Locating...".to_string(),
            LocationStatus::Known(c) => format!("{:.4}, {:.4}", c.latitude, c.longitude),
            LocationStatus::Denied => "Location access denied".to_string(),
            LocationStatus::Unavailable(reason) => format!("Location unavailable: {}", reason),
        }
    }
}

/// Simulated location provider driven by `[location]` in config.toml
pub struct LocationProvider;

impl LocationProvider {
    pub fn spawn(
        config: LocationConfig,
        update_tx: mpsc::UnboundedSender<LocationUpdate>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            if config.mode == LocationMode::Disabled {
                tracing::debug!("Location provider disabled");
                return;
            }

            tokio::time::sleep(Duration::from_millis(config.delay_ms)).await;

            let update = match config.mode {
                LocationMode::Fixed => {
                    let coord = Coordinate::new(config.latitude, config.longitude);
                    if coord.is_valid() {
                        LocationUpdate::Position(coord)
                    } else {
                        LocationUpdate::Unavailable(format!(
                            "configured coordinate {}, {} is out of range",
                            config.latitude, config.longitude
                        ))
                    }
                }
                LocationMode::Denied => LocationUpdate::Denied,
                LocationMode::Disabled => return,
            };

            tracing::info!("Location provider reporting {:?}", update);
            if update_tx.send(update).is_err() {
                tracing::debug!("Location receiver dropped before first fix");
            }
        })
    }
}
