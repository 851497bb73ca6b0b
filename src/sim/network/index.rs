//! Identity mapping between model entities and airflow-network indices.
//!
//! The translator assigns 1-based zone numbers to zones and path numbers to
//! exterior surfaces. This module resolves those tables against the model:
//! unresolvable entities are excluded with a warning, while duplicate or
//! zero indices are structural errors.

use std::collections::{BTreeMap, HashMap};

use anyhow::Result;

use super::translator::TranslatorMaps;
use crate::UID;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{CharacterizationError, IndexKind};
use crate::model::Model;

/// Checks that a translator table is 1-based and injective.
///
/// With `dense` set, indices must also lie in `1..=table.len()`.
fn check_injective(table: &HashMap<UID, u32>, kind: IndexKind, dense: bool) -> Result<()> {
    let mut entries: Vec<(&UID, u32)> = table.iter().map(|(k, &v)| (k, v)).collect();
    entries.sort();

    let mut seen: HashMap<u32, &UID> = HashMap::with_capacity(entries.len());
    for (uid, index) in entries {
        if index == 0 {
            return Err(CharacterizationError::InvalidIndex {
                kind,
                entity: uid.clone(),
            }
            .into());
        }
        if dense && index as usize > table.len() {
            return Err(CharacterizationError::IndexOutOfRange {
                kind,
                entity: uid.clone(),
                index,
                count: table.len(),
            }
            .into());
        }
        if let Some(first) = seen.insert(index, uid) {
            return Err(CharacterizationError::NonInjectiveIndex {
                kind,
                index,
                first: first.clone(),
                second: uid.clone(),
            }
            .into());
        }
    }
    Ok(())
}

/// Resolves zone UID → zone number for every zone that owns a space.
///
/// Unattached spaces and zones missing from the translator table are excluded
/// and reported.
pub fn build_zone_map(
    model: &Model,
    translator_zone_map: &HashMap<UID, u32>,
    diagnostics: &mut Diagnostics,
) -> Result<HashMap<UID, u32>> {
    // Zone numbers index the simulator's zone result vector.
    check_injective(translator_zone_map, IndexKind::Zone, true)?;

    let mut zones = HashMap::new();
    for space in model.spaces() {
        let Some(zone) = space.zone.as_ref() else {
            diagnostics.push(Diagnostic::UnattachedSpace {
                space: space.uid.clone(),
            });
            continue;
        };
        match translator_zone_map.get(zone) {
            Some(&n) => {
                zones.insert(zone.clone(), n);
            }
            None => diagnostics.push(Diagnostic::ZoneLookupFailed { zone: zone.clone() }),
        }
    }
    Ok(zones)
}

/// Resolves exterior surface UID → path number.
///
/// Exterior surfaces without a path are excluded and reported.
pub fn build_surface_map(
    model: &Model,
    translator_path_map: &HashMap<UID, u32>,
    diagnostics: &mut Diagnostics,
) -> Result<HashMap<UID, u32>> {
    check_injective(translator_path_map, IndexKind::Path, false)?;

    let mut surfaces = HashMap::new();
    for surface in model.attached_exterior_surfaces() {
        match translator_path_map.get(&surface.uid) {
            Some(&n) => {
                surfaces.insert(surface.uid.clone(), n);
            }
            None => diagnostics.push(Diagnostic::SurfaceLookupFailed {
                surface: surface.uid.clone(),
            }),
        }
    }
    Ok(surfaces)
}

/// Resolved mapping for one model / network pair.
#[derive(Debug, Clone)]
pub struct EntityIndexMap {
    zones: HashMap<UID, u32>,
    /// Zone number → the single space of that zone.
    spaces_by_zone_number: BTreeMap<u32, UID>,
    spaces: HashMap<UID, u32>,
    surfaces: HashMap<UID, u32>,
    /// Resolved exterior surfaces in model order.
    exterior_surfaces: Vec<UID>,
    /// All attached exterior surfaces, resolved or not.
    exterior_surface_count: usize,
    network_zone_count: usize,
    diagnostics: Diagnostics,
}

impl EntityIndexMap {
    pub fn build(model: &Model, maps: &TranslatorMaps) -> Result<Self> {
        let mut diagnostics = Diagnostics::new();
        let zones = build_zone_map(model, &maps.zone_map, &mut diagnostics)?;
        let surfaces = build_surface_map(model, &maps.surface_map, &mut diagnostics)?;

        // One space per zone.
        let mut spaces = HashMap::new();
        let mut spaces_by_zone_number: BTreeMap<u32, UID> = BTreeMap::new();
        for space in model.spaces() {
            let Some(zone) = space.zone.as_ref() else {
                continue;
            };
            let Some(&n) = zones.get(zone) else {
                continue;
            };
            if let Some(first) = spaces_by_zone_number.insert(n, space.uid.clone()) {
                return Err(CharacterizationError::MultipleSpacesInZone {
                    zone: zone.clone(),
                    first,
                    second: space.uid.clone(),
                }
                .into());
            }
            spaces.insert(space.uid.clone(), n);
        }

        let exterior = model.attached_exterior_surfaces();
        let exterior_surfaces: Vec<UID> = exterior
            .iter()
            .filter(|s| surfaces.contains_key(&s.uid))
            .map(|s| s.uid.clone())
            .collect();

        tracing::debug!(
            zones = zones.len(),
            exterior = exterior.len(),
            resolved = exterior_surfaces.len(),
            "Built entity index map"
        );

        Ok(Self {
            zones,
            spaces_by_zone_number,
            spaces,
            surfaces,
            exterior_surfaces,
            exterior_surface_count: exterior.len(),
            network_zone_count: maps.zone_map.len(),
            diagnostics,
        })
    }

    pub fn zone_number(&self, zone: &UID) -> Option<u32> {
        self.zones.get(zone).copied()
    }

    /// Zone number of the zone owning `space`.
    pub fn space_zone_number(&self, space: &UID) -> Option<u32> {
        self.spaces.get(space).copied()
    }

    pub fn path_number(&self, surface: &UID) -> Option<u32> {
        self.surfaces.get(surface).copied()
    }

    pub fn space_for_zone_number(&self, zone_number: u32) -> Option<&UID> {
        self.spaces_by_zone_number.get(&zone_number)
    }

    /// `(zone number, space)` pairs ordered by zone number.
    pub fn mapped_spaces(&self) -> impl Iterator<Item = (u32, &UID)> {
        self.spaces_by_zone_number.iter().map(|(&n, uid)| (n, uid))
    }

    /// Exterior surfaces that resolved to a path, in model order.
    pub fn exterior_surfaces(&self) -> &[UID] {
        &self.exterior_surfaces
    }

    /// Path numbers aligned with [`Self::exterior_surfaces`].
    pub fn path_numbers(&self) -> Vec<u32> {
        self.exterior_surfaces
            .iter()
            .filter_map(|s| self.surfaces.get(s).copied())
            .collect()
    }

    /// Number of attached exterior surfaces in the model, resolved or not.
    pub fn exterior_surface_count(&self) -> usize {
        self.exterior_surface_count
    }

    /// Number of zones in the network, i.e. the expected zone result count.
    pub fn network_zone_count(&self) -> usize {
        self.network_zone_count
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}
