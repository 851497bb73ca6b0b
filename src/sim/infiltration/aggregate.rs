use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::fit::REFERENCE_SPEEDS;
use super::sweep::SweepResults;
use crate::error::CharacterizationError;

/// Per-zone arithmetic mean over direction samples taken at one speed.
///
/// Every sample must have the same length; a mismatch means the simulator
/// output cannot be trusted.
pub fn aggregate_directions(per_direction: &[Vec<f64>]) -> Result<Vec<f64>> {
    let Some(first) = per_direction.first() else {
        return Err(CharacterizationError::UnexpectedSeriesShape(
            "no direction samples to aggregate".to_string(),
        )
        .into());
    };
    let n_zones = first.len();

    let mut sums = vec![0.0; n_zones];
    for (j, sample) in per_direction.iter().enumerate() {
        if sample.len() != n_zones {
            return Err(CharacterizationError::ResultLengthMismatch {
                expected: n_zones,
                found: sample.len(),
                context: format!("direction sample {j}"),
            }
            .into());
        }
        for (s, v) in sums.iter_mut().zip(sample) {
            *s += v;
        }
    }

    let n = per_direction.len() as f64;
    Ok(sums.into_iter().map(|s| s / n).collect())
}

/// Direction-averaged zone flows at the two reference speeds.
///
/// `flows[i][k]` is the flow of network zone `k + 1` at `speeds[i]`. Both
/// flow vectors always have the same length, also when loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ZoneResponseData")]
pub struct ZoneResponse {
    speeds: [f64; 2],
    flows: [Vec<f64>; 2],
}

/// Unchecked serialized form of [`ZoneResponse`].
#[derive(Deserialize)]
struct ZoneResponseData {
    #[serde(default = "reference_speeds")]
    speeds: [f64; 2],
    flows: [Vec<f64>; 2],
}

fn reference_speeds() -> [f64; 2] {
    REFERENCE_SPEEDS
}

impl TryFrom<ZoneResponseData> for ZoneResponse {
    type Error = anyhow::Error;

    fn try_from(data: ZoneResponseData) -> Result<Self> {
        Self::new(data.speeds, data.flows)
    }
}

impl ZoneResponse {
    pub fn new(speeds: [f64; 2], flows: [Vec<f64>; 2]) -> Result<Self> {
        if flows[0].len() != flows[1].len() {
            return Err(CharacterizationError::ResultLengthMismatch {
                expected: flows[0].len(),
                found: flows[1].len(),
                context: "second reference speed".to_string(),
            }
            .into());
        }
        Ok(Self { speeds, flows })
    }

    pub fn from_sweep(results: &SweepResults) -> Result<Self> {
        let low = aggregate_directions(&results.per_direction[0])?;
        let high = aggregate_directions(&results.per_direction[1])?;
        Self::new(results.speeds, [low, high])
    }

    pub fn speeds(&self) -> [f64; 2] {
        self.speeds
    }

    pub fn flows(&self) -> &[Vec<f64>; 2] {
        &self.flows
    }

    pub fn zone_count(&self) -> usize {
        self.flows[0].len()
    }

    /// `[Q1, Q2]` for the zone at `index` (zone number − 1).
    pub fn zone_flows(&self, index: usize) -> Option<[f64; 2]> {
        Some([*self.flows[0].get(index)?, *self.flows[1].get(index)?])
    }
}
