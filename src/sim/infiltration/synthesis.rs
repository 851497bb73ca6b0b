//! Writes derived infiltration definitions back into the model.
//!
//! Both paths replace every existing definition, so running the same
//! characterization twice leaves the model in the same state.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Result, anyhow};

use super::fit::ZoneFit;
use crate::UID;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::model::{DesignFlowRate, FixedIntervalSchedule, HasName, Infiltration, Model};
use crate::series::TimeSeries;
use crate::sim::network::EntityIndexMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SynthesisSummary {
    /// Definitions removed before installing.
    pub removed: usize,
    /// Definitions installed, in zone-number or space order.
    pub installed: Vec<UID>,
    /// Zones with no definition written.
    pub skipped_zones: Vec<u32>,
}

/// Removes every infiltration definition and the schedules they referenced.
///
/// Returns the number of definitions removed.
pub fn remove_infiltration(model: &mut Model) -> usize {
    let uids: Vec<UID> = model
        .infiltration()
        .iter()
        .map(|i| i.get_uid().clone())
        .collect();

    let mut schedules = BTreeSet::new();
    for uid in &uids {
        if let Some(removed) = model.remove_infiltration(uid)
            && let Some(schedule) = removed.schedule()
        {
            schedules.insert(schedule.clone());
        }
    }
    for schedule in &schedules {
        model.remove_schedule(schedule);
    }

    if !uids.is_empty() {
        tracing::info!(
            "Removed {} infiltration definitions and {} schedules",
            uids.len(),
            schedules.len()
        );
    }
    uids.len()
}

fn space_name(model: &Model, space: &UID) -> Result<String> {
    model
        .space(space)
        .map(|s| s.name.clone())
        .ok_or_else(|| anyhow!("Unknown space: {space}"))
}

/// Installs one wind-dependent definition per zone with a valid fit.
///
/// Design flow = `density · Q1`; coefficients `(0, 0, C/Q1, D/Q1)`. A valid
/// fit for a network zone without a model space is skipped and reported.
pub fn install_steady(
    model: &mut Model,
    index: &EntityIndexMap,
    fits: &[ZoneFit],
    density: f64,
    diagnostics: &mut Diagnostics,
) -> Result<SynthesisSummary> {
    let mut summary = SynthesisSummary {
        removed: remove_infiltration(model),
        ..Default::default()
    };

    for fit in fits {
        let Ok(coeffs) = &fit.outcome else {
            summary.skipped_zones.push(fit.zone_number);
            continue;
        };
        let Some(space) = index.space_for_zone_number(fit.zone_number) else {
            diagnostics.push(Diagnostic::ZoneWithoutSpace {
                zone_number: fit.zone_number,
            });
            summary.skipped_zones.push(fit.zone_number);
            continue;
        };

        let name = format!("{} Infiltration", space_name(model, space)?);
        let dfr = DesignFlowRate::new(&name, space, density * coeffs.reference_flow)
            .with_coefficients(0.0, 0.0, coeffs.velocity, coeffs.velocity_squared);
        let uid = model.add_infiltration(Infiltration::DesignFlowRate(dfr))?;
        summary.installed.push(uid);
    }

    tracing::info!(
        "Installed {} steady infiltration definitions",
        summary.installed.len()
    );
    Ok(summary)
}

/// Installs one schedule-driven definition per space.
///
/// The schedule carries the flow; the definition has design flow 1 and
/// constant coefficient 1.
pub fn install_transient(
    model: &mut Model,
    series_by_space: &BTreeMap<UID, TimeSeries>,
) -> Result<SynthesisSummary> {
    let mut summary = SynthesisSummary {
        removed: remove_infiltration(model),
        ..Default::default()
    };

    for (space, series) in series_by_space {
        let name = space_name(model, space)?;
        let schedule = FixedIntervalSchedule::new(
            &format!("{name} Infiltration Schedule"),
            series.clone(),
        );
        let schedule = model.add_schedule(schedule);

        let dfr = DesignFlowRate::new(&format!("{name} Infiltration"), space, 1.0)
            .with_schedule(&schedule);
        let uid = model.add_infiltration(Infiltration::DesignFlowRate(dfr))?;
        summary.installed.push(uid);
    }

    tracing::info!(
        "Installed {} scheduled infiltration definitions",
        summary.installed.len()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EffectiveLeakageArea, OutsideBoundary};
    use crate::sim::infiltration::fit::{FitError, REFERENCE_SPEEDS, fit_zone};
    use crate::sim::network::TranslatorMaps;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn model_with_maps() -> (Model, TranslatorMaps, Vec<UID>) {
        let mut model = Model::new("m");
        let mut maps = TranslatorMaps::default();
        let mut spaces = Vec::new();
        for (k, name) in ["A", "B"].iter().enumerate() {
            let zone = model.add_zone(&format!("{name} Zone"));
            let space = model.add_space(name, Some(&zone)).unwrap();
            let wall = model
                .add_surface(&format!("{name} Wall"), Some(&space), OutsideBoundary::Outdoors)
                .unwrap();
            maps.zone_map.insert(zone, k as u32 + 1);
            maps.surface_map.insert(wall, k as u32 + 1);
            spaces.push(space);
        }
        (model, maps, spaces)
    }

    fn add_existing(model: &mut Model, space: &UID) {
        let schedule = model.add_schedule(FixedIntervalSchedule::new(
            "Old",
            TimeSeries::zero_year(
                NaiveDate::from_ymd_opt(2020, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
            ),
        ));
        model
            .add_infiltration(Infiltration::DesignFlowRate(
                DesignFlowRate::new("Old DFR", space, 0.1).with_schedule(&schedule),
            ))
            .unwrap();
        model
            .add_infiltration(Infiltration::EffectiveLeakageArea(EffectiveLeakageArea::new(
                "Old ELA", space, 50.0, 0.0001, 0.0002,
            )))
            .unwrap();
    }

    #[test]
    fn test_remove_infiltration_clears_both_kinds_and_schedules() {
        let (mut model, _, spaces) = model_with_maps();
        add_existing(&mut model, &spaces[0]);
        assert_eq!(model.infiltration().len(), 2);
        assert_eq!(model.schedules().len(), 1);

        assert_eq!(remove_infiltration(&mut model), 2);
        assert!(model.infiltration().is_empty());
        assert!(model.schedules().is_empty());
        assert_eq!(remove_infiltration(&mut model), 0);
    }

    #[test]
    fn test_install_steady_skips_degenerate_zone() {
        let (mut model, maps, spaces) = model_with_maps();
        add_existing(&mut model, &spaces[1]);
        let index = EntityIndexMap::build(&model, &maps).unwrap();

        let fits = vec![
            ZoneFit {
                zone_number: 1,
                outcome: fit_zone(1, REFERENCE_SPEEDS, [10.0, 18.0]),
            },
            ZoneFit {
                zone_number: 2,
                outcome: Err(FitError::ZeroReferenceFlow),
            },
        ];
        let mut diagnostics = Diagnostics::new();
        let summary = install_steady(&mut model, &index, &fits, 1.2041, &mut diagnostics).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(summary.removed, 2);
        assert_eq!(summary.installed.len(), 1);
        assert_eq!(summary.skipped_zones, vec![2]);

        let defs = model.infiltration_for_space(&spaces[0]);
        assert_eq!(defs.len(), 1);
        let dfr = defs[0].as_design_flow_rate().unwrap();
        assert_eq!(dfr.name, "A Infiltration");
        assert_relative_eq!(dfr.design_flow_rate, 12.041, epsilon = 1e-12);
        assert_eq!(dfr.constant_coefficient, 0.0);
        assert_eq!(dfr.temperature_coefficient, 0.0);
        assert!(model.infiltration_for_space(&spaces[1]).is_empty());
    }

    #[test]
    fn test_install_steady_is_idempotent() {
        let (mut model, maps, _) = model_with_maps();
        let index = EntityIndexMap::build(&model, &maps).unwrap();
        let fits: Vec<ZoneFit> = (1..=2)
            .map(|n| ZoneFit {
                zone_number: n,
                outcome: fit_zone(n, REFERENCE_SPEEDS, [5.0 * n as f64, 9.0 * n as f64]),
            })
            .collect();

        install_steady(&mut model, &index, &fits, 1.2, &mut Diagnostics::new()).unwrap();
        let first: Vec<DesignFlowRate> = model
            .infiltration()
            .iter()
            .filter_map(|i| i.as_design_flow_rate().cloned())
            .collect();

        let summary = install_steady(&mut model, &index, &fits, 1.2, &mut Diagnostics::new()).unwrap();
        assert_eq!(summary.removed, 2);
        let second: Vec<DesignFlowRate> = model
            .infiltration()
            .iter()
            .filter_map(|i| i.as_design_flow_rate().cloned())
            .collect();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.space, b.space);
            assert_eq!(a.design_flow_rate, b.design_flow_rate);
            assert_eq!(a.velocity_coefficient, b.velocity_coefficient);
            assert_eq!(a.velocity_squared_coefficient, b.velocity_squared_coefficient);
        }
    }

    #[test]
    fn test_zone_without_space_is_reported() {
        let (mut model, mut maps, _) = model_with_maps();
        let empty = model.add_zone("C Zone");
        maps.zone_map.insert(empty, 3);
        let index = EntityIndexMap::build(&model, &maps).unwrap();

        let fits: Vec<ZoneFit> = (1..=3)
            .map(|n| ZoneFit {
                zone_number: n,
                outcome: fit_zone(n, REFERENCE_SPEEDS, [10.0, 18.0]),
            })
            .collect();
        let mut diagnostics = Diagnostics::new();
        let summary = install_steady(&mut model, &index, &fits, 1.2, &mut diagnostics).unwrap();

        assert_eq!(summary.installed.len(), 2);
        assert_eq!(summary.skipped_zones, vec![3]);
        assert_eq!(
            diagnostics.items(),
            &[Diagnostic::ZoneWithoutSpace { zone_number: 3 }]
        );
    }

    #[test]
    fn test_install_transient_binds_schedules() {
        let (mut model, _, spaces) = model_with_maps();
        add_existing(&mut model, &spaces[0]);
        let start = NaiveDate::from_ymd_opt(2021, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let mut series_by_space = BTreeMap::new();
        for (k, space) in spaces.iter().enumerate() {
            series_by_space.insert(space.clone(), TimeSeries::hourly(start, vec![k as f64; 8760]));
        }

        let summary = install_transient(&mut model, &series_by_space).unwrap();
        assert_eq!(summary.removed, 2);
        assert_eq!(summary.installed.len(), 2);
        // The old schedule is gone; one new schedule per space.
        assert_eq!(model.schedules().len(), 2);

        let dfr = model.infiltration_for_space(&spaces[1])[0]
            .as_design_flow_rate()
            .unwrap()
            .clone();
        assert_eq!(dfr.design_flow_rate, 1.0);
        assert_eq!(dfr.constant_coefficient, 1.0);
        let schedule = model.schedule(dfr.schedule.as_ref().unwrap()).unwrap();
        assert_eq!(schedule.name, "B Infiltration Schedule");
        assert_eq!(schedule.value_at(100), 1.0);
    }
}
