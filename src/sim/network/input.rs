use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationMode {
    SteadyState,
    Transient,
}

/// Airflow-network input payload.
///
/// Implemented by the external network description. Runs never mutate a shared
/// payload: each run clones the base value and overrides the fields it varies.
pub trait NetworkInput: Clone {
    fn set_wind_speed(&mut self, speed_m_s: f64);

    /// Wind direction in degrees clockwise from north.
    fn set_wind_direction(&mut self, direction_deg: f64);

    fn set_mode(&mut self, mode: SimulationMode);

    /// Native input file text.
    fn to_native_string(&self) -> Result<String>;
}

/// Copy of `base` set up for a steady-state run at the given wind.
pub fn steady_variant<I: NetworkInput>(base: &I, speed_m_s: f64, direction_deg: f64) -> I {
    let mut input = base.clone();
    input.set_mode(SimulationMode::SteadyState);
    input.set_wind_speed(speed_m_s);
    input.set_wind_direction(direction_deg);
    input
}

/// Copy of `base` set up for a transient run.
pub fn transient_variant<I: NetworkInput>(base: &I) -> I {
    let mut input = base.clone();
    input.set_mode(SimulationMode::Transient);
    input
}

/// Serializes `input` to `path`.
pub fn write_input<I: NetworkInput>(input: &I, path: &Path) -> Result<()> {
    let text = input.to_native_string()?;
    fs::write(path, text).with_context(|| {
        format!(
            "Failed to write network input '{}'; check that the location is writable",
            path.display()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Weather {
        speed: f64,
        direction: f64,
        mode: SimulationMode,
    }

    impl NetworkInput for Weather {
        fn set_wind_speed(&mut self, speed_m_s: f64) {
            self.speed = speed_m_s;
        }
        fn set_wind_direction(&mut self, direction_deg: f64) {
            self.direction = direction_deg;
        }
        fn set_mode(&mut self, mode: SimulationMode) {
            self.mode = mode;
        }
        fn to_native_string(&self) -> Result<String> {
            Ok(format!("{} {} {:?}", self.speed, self.direction, self.mode))
        }
    }

    #[test]
    fn test_variants_leave_base_untouched() {
        let base = Weather {
            speed: 0.0,
            direction: 0.0,
            mode: SimulationMode::Transient,
        };
        let a = steady_variant(&base, 4.4704, 90.0);
        let b = steady_variant(&base, 8.9408, 180.0);

        assert_eq!(base.speed, 0.0);
        assert_eq!(a.mode, SimulationMode::SteadyState);
        assert_eq!((a.speed, a.direction), (4.4704, 90.0));
        assert_eq!((b.speed, b.direction), (8.9408, 180.0));
        assert_eq!(transient_variant(&a).mode, SimulationMode::Transient);
    }

    #[test]
    fn test_write_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.prj");
        let input = Weather {
            speed: 1.5,
            direction: 45.0,
            mode: SimulationMode::SteadyState,
        };
        write_input(&input, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "1.5 45 SteadyState");
    }

    #[test]
    fn test_write_input_to_missing_dir_fails() {
        let input = Weather {
            speed: 1.0,
            direction: 0.0,
            mode: SimulationMode::SteadyState,
        };
        assert!(write_input(&input, Path::new("/nonexistent/dir/run.prj")).is_err());
    }
}
