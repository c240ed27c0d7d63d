use std::fs;
use std::time::Duration;

use thiserror::Error;

/// Failure to obtain a usable configuration from a file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse configuration file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Static parameters of the installation: fleet size, building height and
/// the simulated timing of the physical process. Fixed once the controller
/// is started.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct FleetConfig {
    pub num_elevators: u8,
    pub num_floors: u8,
    pub capacity: u8,
    pub timing: TimingConfig,
}

/// Durations of the simulated movement and door phases, in seconds.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct TimingConfig {
    pub floor_travel_s: f64,
    pub boarding_dwell_s: f64,
    pub alighting_dwell_s: f64,
    pub dispatch_tick_s: f64,
}

impl Default for FleetConfig {
    fn default() -> FleetConfig {
        FleetConfig {
            num_elevators: 3,
            num_floors: 10,
            capacity: 8,
            timing: TimingConfig::default(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> TimingConfig {
        TimingConfig {
            floor_travel_s: 0.2,
            boarding_dwell_s: 0.3,
            alighting_dwell_s: 0.3,
            dispatch_tick_s: 0.05,
        }
    }
}

impl FleetConfig {
    /// Reads a configuration file in JSON format. Callers fall back to
    /// `FleetConfig::default()` when this fails.
    pub fn load(path: &str) -> Result<FleetConfig, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

impl TimingConfig {
    pub fn floor_travel(&self) -> Duration {
        Duration::from_secs_f64(self.floor_travel_s)
    }

    pub fn boarding_dwell(&self) -> Duration {
        Duration::from_secs_f64(self.boarding_dwell_s)
    }

    pub fn alighting_dwell(&self) -> Duration {
        Duration::from_secs_f64(self.alighting_dwell_s)
    }

    pub fn dispatch_tick(&self) -> Duration {
        Duration::from_secs_f64(self.dispatch_tick_s)
    }
}
