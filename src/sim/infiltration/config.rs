use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::fit::REFERENCE_SPEEDS;
use super::sweep::RawDirectionCount;
use super::transient::SurfaceCombine;
use crate::sim::network::{LeakageSpec, ToolPaths};

/// Standard air density (kg/m³).
pub const AIR_DENSITY: f64 = 1.2041;

/// Configuration for an infiltration characterization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterizationConfig {
    /// Number of wind directions in the sweep, as given.
    ///
    /// Anything other than a positive integer is replaced by the default with
    /// a warning when the sweep grid is built.
    pub direction_count: RawDirectionCount,
    /// The two reference wind speeds (m/s). Default 10 and 20 mph.
    pub reference_speeds: [f64; 2],
    /// Air density (kg/m³) used to scale the design flow rate.
    pub air_density: f64,
    /// Directory receiving the intermediate input and results files.
    pub work_dir: PathBuf,
    /// File stem for sweep runs; the speed and direction are appended.
    pub sweep_file_stem: String,
    /// File stem for the single transient run.
    pub transient_file_stem: String,
    /// Extension of the network input file.
    pub input_extension: String,
    /// How multiple exterior surfaces of one space are combined (transient path).
    pub surface_combine: SurfaceCombine,
    /// Leakage assignment requested from the translator.
    pub leakage: LeakageSpec,
    /// External simulator and post-processor, when running outside tests.
    pub tools: Option<ToolPaths>,
}

impl CharacterizationConfig {
    pub fn new() -> Self {
        Self {
            direction_count: RawDirectionCount::default(),
            reference_speeds: REFERENCE_SPEEDS,
            air_density: AIR_DENSITY,
            work_dir: PathBuf::from("."),
            sweep_file_stem: "temporary".to_string(),
            transient_file_stem: "transient".to_string(),
            input_extension: "prj".to_string(),
            surface_combine: SurfaceCombine::LastWins,
            leakage: LeakageSpec::default(),
            tools: None,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse characterization config")
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }
}

impl Default for CharacterizationConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::network::Airtightness;

    #[test]
    fn test_defaults() {
        let c = CharacterizationConfig::new();
        assert_eq!(c.direction_count, RawDirectionCount::Integer(4));
        assert_eq!(c.reference_speeds, [4.4704, 8.9408]);
        assert_eq!(c.air_density, 1.2041);
        assert_eq!(c.surface_combine, SurfaceCombine::LastWins);
        assert_eq!(c.leakage, LeakageSpec::Level(Airtightness::Average));
        assert!(c.tools.is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let c = CharacterizationConfig::from_json_str(
            r#"{"direction_count": 8, "surface_combine": "Sum", "leakage": {"Level": "Leaky"}}"#,
        )
        .unwrap();
        assert_eq!(c.direction_count, RawDirectionCount::Integer(8));
        assert_eq!(c.surface_combine, SurfaceCombine::Sum);
        assert_eq!(c.leakage, LeakageSpec::Level(Airtightness::Leaky));
        assert_eq!(c.sweep_file_stem, "temporary");
    }

    #[test]
    fn test_unusable_direction_count_loads() {
        use crate::diagnostics::Diagnostics;

        for json in [r#"{"direction_count": "four"}"#, r#"{"direction_count": 2.5}"#] {
            let c = CharacterizationConfig::from_json_str(json).unwrap();
            let mut diags = Diagnostics::new();
            assert_eq!(c.direction_count.resolve(&mut diags).get(), 4);
            assert_eq!(diags.len(), 1);
        }
    }

    #[test]
    fn test_tools_from_json() {
        let c = CharacterizationConfig::from_json_str(
            r#"{"tools": {"simulator": "/opt/net/solver", "results_extractor": "/opt/net/extract"}}"#,
        )
        .unwrap();
        let tools = c.tools.unwrap();
        assert_eq!(
            tools,
            ToolPaths::new("/opt/net/solver").with_extractor("/opt/net/extract")
        );
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"leakage": {"ExteriorFlowRate": {"flow_m3_h_m2": 27.1, "exponent": 0.65, "pressure_pa": 75.0}}}"#,
        )
        .unwrap();
        let c = CharacterizationConfig::from_json_file(&path).unwrap();
        assert_eq!(c.leakage, LeakageSpec::exterior_flow_rate(27.1));
        assert!(c.tools.is_none());
        assert!(CharacterizationConfig::from_json_file(&dir.path().join("missing.json")).is_err());
    }
}
