//! Transient path: one simulation, path flows mapped onto spaces as hourly
//! schedules.

use std::collections::BTreeMap;

use anyhow::{Result, anyhow};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::config::CharacterizationConfig;
use super::synthesis::{SynthesisSummary, install_transient};
use crate::UID;
use crate::diagnostics::Diagnostics;
use crate::error::CharacterizationError;
use crate::model::Model;
use crate::series::{HOURS_PER_YEAR, TimeSeries};
use crate::sim::network::input::{transient_variant, write_input};
use crate::sim::network::{
    EntityIndexMap, NetworkInput, NetworkTranslator, ResultsReader, SimulationRunner, Translation,
};

/// How the path flows of several exterior surfaces of one space combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceCombine {
    /// Each surface overwrites the space series; the last surface (by name) wins.
    #[default]
    LastWins,
    /// Surface flows are summed.
    Sum,
}

/// Builds one hourly series per mapped space from per-path flow series.
///
/// `path_series` is aligned with [`EntityIndexMap::exterior_surfaces`]. Spaces
/// without an exterior surface keep an all-zero year.
pub fn map_paths_to_spaces(
    model: &Model,
    index: &EntityIndexMap,
    path_series: &[TimeSeries],
    start: NaiveDateTime,
    combine: SurfaceCombine,
) -> Result<BTreeMap<UID, TimeSeries>> {
    let surfaces = index.exterior_surfaces();
    if path_series.len() != surfaces.len() {
        return Err(CharacterizationError::ResultLengthMismatch {
            expected: surfaces.len(),
            found: path_series.len(),
            context: "path flow series".to_string(),
        }
        .into());
    }

    let mut by_space: BTreeMap<UID, TimeSeries> = index
        .mapped_spaces()
        .map(|(_, space)| (space.clone(), TimeSeries::zero_year(start)))
        .collect();

    for (surface_uid, series) in surfaces.iter().zip(path_series) {
        if series.len() != HOURS_PER_YEAR || !series.is_hourly() {
            return Err(CharacterizationError::UnexpectedSeriesShape(format!(
                "path series for surface '{surface_uid}' has {} values at {} min, expected {HOURS_PER_YEAR} hourly",
                series.len(),
                series.interval_minutes
            ))
            .into());
        }

        let surface = model
            .surface(surface_uid)
            .ok_or_else(|| anyhow!("Unknown surface: {surface_uid}"))?;
        let Some(target) = surface.space.as_ref().and_then(|s| by_space.get_mut(s)) else {
            continue;
        };

        let restamped = TimeSeries::hourly(start, series.values().to_vec());
        match combine {
            SurfaceCombine::LastWins => *target = restamped,
            SurfaceCombine::Sum => target.add_assign(&restamped)?,
        }
    }

    Ok(by_space)
}

#[derive(Debug, Clone)]
pub struct TransientReport {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub series_by_space: BTreeMap<UID, TimeSeries>,
    pub synthesis: SynthesisSummary,
    pub diagnostics: Diagnostics,
}

/// Translates `model`, runs it once in transient mode and installs the
/// resulting schedules.
pub fn characterize_transient<T: NetworkTranslator>(
    model: &mut Model,
    translator: &T,
    runner: &dyn SimulationRunner,
    reader: &dyn ResultsReader,
    config: &CharacterizationConfig,
) -> Result<TransientReport> {
    let translation = translator.translate(model, &config.leakage)?;
    run_transient(model, &translation, runner, reader, config)
}

pub fn run_transient<I: NetworkInput>(
    model: &mut Model,
    translation: &Translation<I>,
    runner: &dyn SimulationRunner,
    reader: &dyn ResultsReader,
    config: &CharacterizationConfig,
) -> Result<TransientReport> {
    let (start, end) = translation.transient_window()?;
    let index = EntityIndexMap::build(model, &translation.maps)?;

    let resolved = index.exterior_surfaces().len();
    if resolved != index.exterior_surface_count() {
        return Err(CharacterizationError::UnresolvedSurfacePaths {
            exterior: index.exterior_surface_count(),
            resolved,
        }
        .into());
    }

    let input = transient_variant(&translation.input);
    let path = config.work_dir.join(format!(
        "{}.{}",
        config.transient_file_stem, config.input_extension
    ));
    tracing::info!("Writing file {}", path.display());
    write_input(&input, &path)?;

    let results = runner.run(&path)?;
    let path_series = reader.path_flows(&results, &index.path_numbers())?;
    tracing::info!(
        "Read {} path flow series from {}",
        path_series.len(),
        results.display()
    );

    let series_by_space =
        map_paths_to_spaces(model, &index, &path_series, start, config.surface_combine)?;
    let synthesis = install_transient(model, &series_by_space)?;

    Ok(TransientReport {
        start,
        end,
        series_by_space,
        synthesis,
        diagnostics: index.diagnostics().clone(),
    })
}
