//! Two-point quadratic wind response.
//!
//! Each zone's direction-averaged flow at two reference speeds gives the
//! system
//!
//! ```text
//! C·v1 + D·v1² = Q1
//! C·v2 + D·v2² = Q2
//! ```
//!
//! solved by Cramer's rule. The model stores the coefficients normalized by
//! `Q1`, so the multiplier is exactly 1 at the first reference speed and the
//! design flow rate carries the magnitude.

use thiserror::Error;

use super::aggregate::ZoneResponse;

/// 10 mph and 20 mph in m/s.
pub const REFERENCE_SPEEDS: [f64; 2] = [4.4704, 8.9408];

/// Flows with a magnitude below this are treated as zero.
const MIN_REFERENCE_FLOW: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FitError {
    #[error("reference flow at the first speed is zero")]
    ZeroReferenceFlow,
    #[error("non-finite flow or speed")]
    NonFiniteFlow,
    #[error("reference speeds give a singular system")]
    SingularSpeeds,
}

/// Raw solution of the 2×2 system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticFit {
    pub c: f64,
    pub d: f64,
    /// `Qi − (C·vi + D·vi²)`, diagnostic only.
    pub residuals: [f64; 2],
}

impl QuadraticFit {
    pub fn predict(&self, v: f64) -> f64 {
        self.c * v + self.d * v * v
    }
}

/// Solves for `(C, D)` through the two points `(speeds[i], flows[i])`.
pub fn solve_quadratic(speeds: [f64; 2], flows: [f64; 2]) -> Result<QuadraticFit, FitError> {
    let [v1, v2] = speeds;
    let [q1, q2] = flows;
    if !(v1.is_finite() && v2.is_finite() && q1.is_finite() && q2.is_finite()) {
        return Err(FitError::NonFiniteFlow);
    }

    let (a, b) = (v1 * v2 * v2, v2 * v1 * v1);
    let det = a - b;
    // Relative to the terms, so small but distinct speeds still solve.
    if det.abs() <= 4.0 * f64::EPSILON * a.abs().max(b.abs()) {
        return Err(FitError::SingularSpeeds);
    }

    let c = (q1 * v2 * v2 - q2 * v1 * v1) / det;
    let d = (v1 * q2 - v2 * q1) / det;
    let mut fit = QuadraticFit {
        c,
        d,
        residuals: [0.0; 2],
    };
    fit.residuals = [q1 - fit.predict(v1), q2 - fit.predict(v2)];
    Ok(fit)
}

/// Coefficients written to the model for one zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfiltrationCoefficients {
    pub zone_number: u32,
    /// `Q1`, the flow at the first reference speed.
    pub reference_flow: f64,
    /// `C / Q1`
    pub velocity: f64,
    /// `D / Q1`
    pub velocity_squared: f64,
    pub raw: QuadraticFit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneFit {
    pub zone_number: u32,
    pub outcome: Result<InfiltrationCoefficients, FitError>,
}

impl ZoneFit {
    pub fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }
}

pub fn fit_zone(
    zone_number: u32,
    speeds: [f64; 2],
    flows: [f64; 2],
) -> Result<InfiltrationCoefficients, FitError> {
    let raw = solve_quadratic(speeds, flows)?;
    let q1 = flows[0];
    if q1.abs() < MIN_REFERENCE_FLOW {
        return Err(FitError::ZeroReferenceFlow);
    }

    let velocity = raw.c / q1;
    let velocity_squared = raw.d / q1;
    if !(velocity.is_finite() && velocity_squared.is_finite()) {
        return Err(FitError::NonFiniteFlow);
    }

    Ok(InfiltrationCoefficients {
        zone_number,
        reference_flow: q1,
        velocity,
        velocity_squared,
        raw,
    })
}

/// One fit per network zone, in zone-number order.
pub fn fit_zones(response: &ZoneResponse) -> Vec<ZoneFit> {
    let [low, high] = response.flows();
    low.iter()
        .zip(high)
        .enumerate()
        .map(|(k, (&q1, &q2))| {
            let zone_number = k as u32 + 1;
            ZoneFit {
                zone_number,
                outcome: fit_zone(zone_number, response.speeds(), [q1, q2]),
            }
        })
        .collect()
}
