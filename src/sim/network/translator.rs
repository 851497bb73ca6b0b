//! Contract with the external model → airflow-network translator.

use std::collections::HashMap;
use std::str::FromStr;

use anyhow::Result;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::input::NetworkInput;
use crate::UID;
use crate::error::CharacterizationError;
use crate::model::Model;

/// Handle → index tables produced by the translator.
///
/// Treated as opaque input: indices are never recomputed here, only validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslatorMaps {
    /// Zone UID → 1-based network zone number.
    pub zone_map: HashMap<UID, u32>,
    /// Surface UID → 1-based network flow-path number.
    pub surface_map: HashMap<UID, u32>,
}

/// Result of translating a model into an airflow network.
#[derive(Debug, Clone)]
pub struct Translation<I> {
    pub maps: TranslatorMaps,
    /// Network input payload; cloned and overridden per run, never mutated in place.
    pub input: I,
    /// Simulation window; both are set only for a transient-capable network.
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl<I> Translation<I> {
    pub fn new(maps: TranslatorMaps, input: I) -> Self {
        Self {
            maps,
            input,
            start: None,
            end: None,
        }
    }

    pub fn with_window(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Start and end of the transient window.
    pub fn transient_window(&self) -> Result<(NaiveDateTime, NaiveDateTime)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Ok((start, end)),
            _ => Err(CharacterizationError::NotTransient.into()),
        }
    }
}

/// Envelope airtightness presets understood by the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Airtightness {
    Tight,
    Average,
    Leaky,
}

impl FromStr for Airtightness {
    type Err = CharacterizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Tight" => Ok(Airtightness::Tight),
            "Average" => Ok(Airtightness::Average),
            "Leaky" => Ok(Airtightness::Leaky),
            other => Err(CharacterizationError::InvalidAirtightness(other.to_string())),
        }
    }
}

/// How the translator should assign envelope leakage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LeakageSpec {
    Level(Airtightness),
    /// Leakage flow per envelope area at a reference pressure difference.
    ExteriorFlowRate {
        /// m³/h per m² of envelope.
        flow_m3_h_m2: f64,
        exponent: f64,
        pressure_pa: f64,
    },
}

impl Default for LeakageSpec {
    fn default() -> Self {
        LeakageSpec::Level(Airtightness::Average)
    }
}

impl LeakageSpec {
    /// Flow-per-area leakage with exponent 0.65 at 75 Pa.
    pub fn exterior_flow_rate(flow_m3_h_m2: f64) -> Self {
        LeakageSpec::ExteriorFlowRate {
            flow_m3_h_m2,
            exponent: 0.65,
            pressure_pa: 75.0,
        }
    }
}

/// External translator from a building model to an airflow network.
pub trait NetworkTranslator {
    type Input: NetworkInput;

    fn translate(&self, model: &Model, leakage: &LeakageSpec) -> Result<Translation<Self::Input>>;
}
