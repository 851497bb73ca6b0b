//! Steady-state wind sweep.
//!
//! The grid is every reference speed combined with `n` evenly spaced wind
//! directions starting at 0°. Each grid point is one steady simulation with
//! its own input file; any failure aborts the whole sweep, since the fit needs
//! a complete, equal-sized set of results per speed.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::config::CharacterizationConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::CharacterizationError;
use crate::sim::network::input::{steady_variant, write_input};
use crate::sim::network::{NetworkInput, ResultsReader, SimulationRunner};

pub const DEFAULT_DIRECTION_COUNT: usize = 4;

/// Number of wind directions, always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionCount(usize);

impl DirectionCount {
    pub fn new(n: usize) -> Option<Self> {
        (n >= 1).then_some(Self(n))
    }

    /// Accepts any signed value; non-positive values fall back to the default.
    pub fn from_signed(raw: i64, diagnostics: &mut Diagnostics) -> Self {
        match usize::try_from(raw).ok().and_then(Self::new) {
            Some(n) => n,
            None => Self::corrected(raw.to_string(), diagnostics),
        }
    }

    /// Parses user text; unparsable or non-positive values fall back to the default.
    pub fn parse(raw: &str, diagnostics: &mut Diagnostics) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(n) => Self::from_signed(n, diagnostics),
            Err(_) => Self::corrected(raw.to_string(), diagnostics),
        }
    }

    fn corrected(raw: String, diagnostics: &mut Diagnostics) -> Self {
        diagnostics.push(Diagnostic::DirectionCountCorrected {
            raw,
            used: DEFAULT_DIRECTION_COUNT,
        });
        Self(DEFAULT_DIRECTION_COUNT)
    }

    pub fn get(&self) -> usize {
        self.0
    }

    /// Directions in degrees: `k · 360 / n` for `k = 0..n`.
    pub fn directions(&self) -> Vec<f64> {
        let n = self.0 as f64;
        (0..self.0).map(|k| k as f64 * 360.0 / n).collect()
    }
}

impl Default for DirectionCount {
    fn default() -> Self {
        Self(DEFAULT_DIRECTION_COUNT)
    }
}

/// Direction count as given by the user, before validation.
///
/// Any JSON scalar is accepted; [`RawDirectionCount::resolve`] turns it into a
/// [`DirectionCount`], falling back to the default with a warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDirectionCount {
    Integer(i64),
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawDirectionCount {
    pub fn resolve(&self, diagnostics: &mut Diagnostics) -> DirectionCount {
        match self {
            RawDirectionCount::Integer(n) => DirectionCount::from_signed(*n, diagnostics),
            RawDirectionCount::Number(x) if x.fract() == 0.0 && x.abs() < i64::MAX as f64 => {
                DirectionCount::from_signed(*x as i64, diagnostics)
            }
            RawDirectionCount::Number(x) => DirectionCount::corrected(x.to_string(), diagnostics),
            RawDirectionCount::Text(s) => DirectionCount::parse(s, diagnostics),
            RawDirectionCount::Other(v) => DirectionCount::corrected(v.to_string(), diagnostics),
        }
    }
}

impl Default for RawDirectionCount {
    fn default() -> Self {
        RawDirectionCount::Integer(DEFAULT_DIRECTION_COUNT as i64)
    }
}

impl From<i64> for RawDirectionCount {
    fn from(n: i64) -> Self {
        RawDirectionCount::Integer(n)
    }
}

/// One simulated wind condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    /// m/s
    pub speed: f64,
    /// Degrees clockwise from north.
    pub direction: f64,
}

impl SweepPoint {
    /// Input file name, unique per (speed, direction).
    pub fn file_name(&self, stem: &str, extension: &str) -> String {
        format!("{stem}-{}-{}.{extension}", self.speed, self.direction)
    }
}

/// Cartesian grid of reference speeds × directions.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepGrid {
    speeds: [f64; 2],
    directions: Vec<f64>,
}

impl SweepGrid {
    pub fn new(count: DirectionCount, speeds: [f64; 2]) -> Self {
        Self {
            speeds,
            directions: count.directions(),
        }
    }

    pub fn speeds(&self) -> [f64; 2] {
        self.speeds
    }

    pub fn directions(&self) -> &[f64] {
        &self.directions
    }

    /// All points, speed-major.
    pub fn points(&self) -> Vec<SweepPoint> {
        self.speeds
            .iter()
            .flat_map(|&speed| {
                self.directions
                    .iter()
                    .map(move |&direction| SweepPoint { speed, direction })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.speeds.len() * self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }
}

/// Raw sweep output: for each speed, one per-zone flow vector per direction.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResults {
    pub speeds: [f64; 2],
    pub per_direction: [Vec<Vec<f64>>; 2],
}

/// Runs one steady simulation per grid point.
///
/// `expected_zones` is the network zone count; every run must return exactly
/// that many zone series, each holding a single value.
pub fn run_sweep<I: NetworkInput>(
    grid: &SweepGrid,
    base_input: &I,
    expected_zones: usize,
    runner: &dyn SimulationRunner,
    reader: &dyn ResultsReader,
    config: &CharacterizationConfig,
) -> Result<SweepResults> {
    let mut per_direction: [Vec<Vec<f64>>; 2] = [Vec::new(), Vec::new()];

    for (i, &speed) in grid.speeds.iter().enumerate() {
        for &direction in &grid.directions {
            let point = SweepPoint { speed, direction };
            let input = steady_variant(base_input, speed, direction);
            let path = config
                .work_dir
                .join(point.file_name(&config.sweep_file_stem, &config.input_extension));

            tracing::info!("Writing file {}", path.display());
            write_input(&input, &path)?;

            let results_path = runner.run(&path)?;
            tracing::debug!(speed, direction, "Simulation complete");

            let series = reader.zone_infiltration(&results_path)?;
            if series.len() != expected_zones {
                return Err(CharacterizationError::ResultLengthMismatch {
                    expected: expected_zones,
                    found: series.len(),
                    context: format!("speed {speed}, direction {direction}"),
                }
                .into());
            }

            let mut flows = Vec::with_capacity(series.len());
            for (k, ts) in series.iter().enumerate() {
                if ts.len() != 1 {
                    return Err(CharacterizationError::UnexpectedSeriesShape(format!(
                        "zone {} at speed {speed}, direction {direction} has {} values, expected 1",
                        k + 1,
                        ts.len()
                    ))
                    .into());
                }
                flows.push(ts.values()[0]);
            }
            per_direction[i].push(flows);
        }
    }

    Ok(SweepResults {
        speeds: grid.speeds,
        per_direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_directions_evenly_spaced_for_all_n() {
        for n in 1..=36 {
            let count = DirectionCount::new(n).unwrap();
            let dirs = count.directions();
            assert_eq!(dirs.len(), n);
            assert_eq!(dirs[0], 0.0);
            assert!(dirs.iter().all(|&d| (0.0..360.0).contains(&d)));
            let step = 360.0 / n as f64;
            for w in dirs.windows(2) {
                assert_relative_eq!(w[1] - w[0], step, epsilon = 1e-9);
            }
            let grid = SweepGrid::new(count, [4.4704, 8.9408]);
            assert_eq!(grid.points().len(), 2 * n);
            assert_eq!(grid.len(), 2 * n);
        }
    }

    #[test]
    fn test_points_speed_major() {
        let grid = SweepGrid::new(DirectionCount::new(4).unwrap(), [1.0, 2.0]);
        let pts = grid.points();
        let point = |speed, direction| SweepPoint { speed, direction };
        assert_eq!(pts[0], point(1.0, 0.0));
        assert_eq!(pts[3], point(1.0, 270.0));
        assert_eq!(pts[4], point(2.0, 0.0));
    }

    #[test]
    fn test_bad_direction_count_corrected() {
        for raw in ["0", "-3", "four", ""] {
            let mut diags = Diagnostics::new();
            let count = DirectionCount::parse(raw, &mut diags);
            assert_eq!(count.get(), 4);
            assert_eq!(
                diags.items(),
                &[Diagnostic::DirectionCountCorrected {
                    raw: raw.to_string(),
                    used: 4
                }]
            );
        }

        let mut diags = Diagnostics::new();
        assert_eq!(DirectionCount::parse(" 8 ", &mut diags).get(), 8);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_raw_direction_count_from_json() {
        let cases = [
            ("8", 8, None),
            ("12.0", 12, None),
            ("\"6\"", 6, None),
            ("\"four\"", 4, Some("four")),
            ("2.5", 4, Some("2.5")),
            ("-1", 4, Some("-1")),
            ("null", 4, Some("null")),
        ];
        for (json, used, corrected) in cases {
            let raw: RawDirectionCount = serde_json::from_str(json).unwrap();
            let mut diags = Diagnostics::new();
            assert_eq!(raw.resolve(&mut diags).get(), used, "{json}");
            match corrected {
                Some(text) => assert_eq!(
                    diags.items(),
                    &[Diagnostic::DirectionCountCorrected {
                        raw: text.to_string(),
                        used: 4
                    }]
                ),
                None => assert!(diags.is_empty(), "{json}"),
            }
        }
    }

    #[test]
    fn test_file_names_unique_per_point() {
        let grid = SweepGrid::new(DirectionCount::new(16).unwrap(), [4.4704, 8.9408]);
        let mut names: Vec<String> = grid
            .points()
            .iter()
            .map(|p| p.file_name("temporary", "prj"))
            .collect();
        assert_eq!(names[1], "temporary-4.4704-22.5.prj");
        let n = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), n);
    }
}
