//! Steady path: wind sweep → direction average → quadratic fit → model.

use anyhow::Result;

use super::aggregate::ZoneResponse;
use super::config::CharacterizationConfig;
use super::fit::{ZoneFit, fit_zones};
use super::sweep::{SweepGrid, run_sweep};
use super::synthesis::{SynthesisSummary, install_steady};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::CharacterizationError;
use crate::model::Model;
use crate::sim::network::{
    EntityIndexMap, NetworkInput, NetworkTranslator, ResultsReader, SimulationRunner, Translation,
};

#[derive(Debug, Clone)]
pub struct SteadyReport {
    pub grid: SweepGrid,
    pub response: ZoneResponse,
    pub fits: Vec<ZoneFit>,
    pub synthesis: SynthesisSummary,
    pub diagnostics: Diagnostics,
}

/// Translates `model`, runs the sweep and installs the fitted definitions.
pub fn characterize_steady<T: NetworkTranslator>(
    model: &mut Model,
    translator: &T,
    runner: &dyn SimulationRunner,
    reader: &dyn ResultsReader,
    config: &CharacterizationConfig,
) -> Result<SteadyReport> {
    let translation = translator.translate(model, &config.leakage)?;
    run_steady(model, &translation, runner, reader, config)
}

pub fn run_steady<I: NetworkInput>(
    model: &mut Model,
    translation: &Translation<I>,
    runner: &dyn SimulationRunner,
    reader: &dyn ResultsReader,
    config: &CharacterizationConfig,
) -> Result<SteadyReport> {
    let mut diagnostics = Diagnostics::new();
    let count = config.direction_count.resolve(&mut diagnostics);

    let index = EntityIndexMap::build(model, &translation.maps)?;
    diagnostics.extend(index.diagnostics().clone());

    let grid = SweepGrid::new(count, config.reference_speeds);
    tracing::info!(
        "Running {} steady simulations ({} directions)",
        grid.len(),
        count.get()
    );
    let results = run_sweep(
        &grid,
        &translation.input,
        index.network_zone_count(),
        runner,
        reader,
        config,
    )?;
    let response = ZoneResponse::from_sweep(&results)?;

    let (fits, synthesis) =
        apply_response(model, &index, &response, config.air_density, &mut diagnostics)?;

    Ok(SteadyReport {
        grid,
        response,
        fits,
        synthesis,
        diagnostics,
    })
}

/// Fits every zone of `response` and writes the valid fits into `model`.
///
/// The response must hold one flow per network zone. Degenerate zones are
/// reported in `diagnostics` and left without a definition.
pub fn apply_response(
    model: &mut Model,
    index: &EntityIndexMap,
    response: &ZoneResponse,
    density: f64,
    diagnostics: &mut Diagnostics,
) -> Result<(Vec<ZoneFit>, SynthesisSummary)> {
    if response.zone_count() != index.network_zone_count() {
        return Err(CharacterizationError::ResultLengthMismatch {
            expected: index.network_zone_count(),
            found: response.zone_count(),
            context: "zone response".to_string(),
        }
        .into());
    }

    let fits = fit_zones(response);
    for fit in &fits {
        match &fit.outcome {
            Ok(c) => tracing::info!(
                zone = fit.zone_number,
                c = c.velocity,
                d = c.velocity_squared,
                residual_1 = c.raw.residuals[0],
                residual_2 = c.raw.residuals[1],
                "Fitted zone"
            ),
            Err(e) => diagnostics.push(Diagnostic::DegenerateFit {
                zone_number: fit.zone_number,
                reason: e.to_string(),
            }),
        }
    }

    let synthesis = install_steady(model, index, &fits, density, diagnostics)?;
    Ok((fits, synthesis))
}
