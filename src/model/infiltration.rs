//! Space infiltration definitions.
//!
//! Two kinds are supported, matching the usual building-energy conventions:
//!
//! - design flow rate: `Q = Q_design · F_schedule · (A + B·|ΔT| + C·v + D·v²)`
//! - effective leakage area: `Q = F_schedule · (A_L / 1000) · sqrt(C_s·ΔT + C_w·v²)`
//!
//! with `Q` in m³/s, `ΔT` the indoor/outdoor temperature difference in K and
//! `v` the wind speed in m/s.

use serde::{Deserialize, Serialize};

use super::HasName;
use crate::UID;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignFlowRate {
    pub name: String,
    pub uid: UID,
    pub space: UID,
    /// Design flow rate (m³/s).
    pub design_flow_rate: f64,
    /// `A`
    pub constant_coefficient: f64,
    /// `B`
    pub temperature_coefficient: f64,
    /// `C`
    pub velocity_coefficient: f64,
    /// `D`
    pub velocity_squared_coefficient: f64,
    /// Multiplier schedule; `None` means always 1.
    pub schedule: Option<UID>,
}

impl DesignFlowRate {
    /// Creates a definition with `A = 1` and all other coefficients zero.
    pub fn new(name: &str, space: &UID, design_flow_rate: f64) -> Self {
        Self {
            name: name.to_string(),
            uid: UID::new(),
            space: space.clone(),
            design_flow_rate,
            constant_coefficient: 1.0,
            temperature_coefficient: 0.0,
            velocity_coefficient: 0.0,
            velocity_squared_coefficient: 0.0,
            schedule: None,
        }
    }

    pub fn with_coefficients(mut self, a: f64, b: f64, c: f64, d: f64) -> Self {
        self.constant_coefficient = a;
        self.temperature_coefficient = b;
        self.velocity_coefficient = c;
        self.velocity_squared_coefficient = d;
        self
    }

    pub fn with_schedule(mut self, schedule: &UID) -> Self {
        self.schedule = Some(schedule.clone());
        self
    }

    /// Infiltration flow (m³/s) for the given conditions and schedule value.
    pub fn flow_rate(&self, delta_t: f64, wind_speed: f64, schedule_value: f64) -> f64 {
        self.design_flow_rate
            * schedule_value
            * (self.constant_coefficient
                + self.temperature_coefficient * delta_t.abs()
                + self.velocity_coefficient * wind_speed
                + self.velocity_squared_coefficient * wind_speed * wind_speed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveLeakageArea {
    pub name: String,
    pub uid: UID,
    pub space: UID,
    /// Effective air leakage area at 4 Pa (cm²).
    pub leakage_area_cm2: f64,
    pub stack_coefficient: f64,
    pub wind_coefficient: f64,
    pub schedule: Option<UID>,
}

impl EffectiveLeakageArea {
    pub fn new(
        name: &str,
        space: &UID,
        leakage_area_cm2: f64,
        stack_coefficient: f64,
        wind_coefficient: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            uid: UID::new(),
            space: space.clone(),
            leakage_area_cm2,
            stack_coefficient,
            wind_coefficient,
            schedule: None,
        }
    }

    pub fn flow_rate(&self, delta_t: f64, wind_speed: f64, schedule_value: f64) -> f64 {
        let driving = self.stack_coefficient * delta_t.abs()
            + self.wind_coefficient * wind_speed * wind_speed;
        schedule_value * self.leakage_area_cm2 / 1000.0 * driving.max(0.0).sqrt()
    }
}

/// An infiltration definition bound to one space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Infiltration {
    DesignFlowRate(DesignFlowRate),
    EffectiveLeakageArea(EffectiveLeakageArea),
}

impl Infiltration {
    pub fn space(&self) -> &UID {
        match self {
            Infiltration::DesignFlowRate(d) => &d.space,
            Infiltration::EffectiveLeakageArea(e) => &e.space,
        }
    }

    pub fn schedule(&self) -> Option<&UID> {
        match self {
            Infiltration::DesignFlowRate(d) => d.schedule.as_ref(),
            Infiltration::EffectiveLeakageArea(e) => e.schedule.as_ref(),
        }
    }

    pub fn as_design_flow_rate(&self) -> Option<&DesignFlowRate> {
        match self {
            Infiltration::DesignFlowRate(d) => Some(d),
            Infiltration::EffectiveLeakageArea(_) => None,
        }
    }
}

impl HasName for Infiltration {
    fn get_name(&self) -> &str {
        match self {
            Infiltration::DesignFlowRate(d) => &d.name,
            Infiltration::EffectiveLeakageArea(e) => &e.name,
        }
    }

    fn get_uid(&self) -> &UID {
        match self {
            Infiltration::DesignFlowRate(d) => &d.uid,
            Infiltration::EffectiveLeakageArea(e) => &e.uid,
        }
    }
}
