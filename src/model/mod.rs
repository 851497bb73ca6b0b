//! In-memory building model.
//!
//! Hierarchy: Model → ThermalZone ← Space ← Surface
//!
//! Entities reference their parent by [`UID`] rather than by ownership, so that
//! a space can exist without a zone and a surface without a space, the way
//! real building models arrive. Accessors return entities sorted by name.

pub mod demo;
pub mod infiltration;
pub mod schedule;
pub mod surface;
pub mod zone;

use std::collections::HashMap;

use anyhow::{Result, anyhow, ensure};
use serde::{Deserialize, Serialize};

use crate::UID;

pub use infiltration::{DesignFlowRate, EffectiveLeakageArea, Infiltration};
pub use schedule::FixedIntervalSchedule;
pub use surface::{OutsideBoundary, Surface};
pub use zone::{Space, ThermalZone};

/// Types that expose a name and a handle.
pub trait HasName {
    fn get_name(&self) -> &str;
    fn get_uid(&self) -> &UID;
}

/// Collects map values sorted by name, ties broken by UID.
fn sorted_by_name<T: HasName>(map: &HashMap<UID, T>) -> Vec<&T> {
    let mut items: Vec<&T> = map.values().collect();
    items.sort_by(|a, b| {
        a.get_name()
            .cmp(b.get_name())
            .then_with(|| a.get_uid().cmp(b.get_uid()))
    });
    items
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    zones: HashMap<UID, ThermalZone>,
    spaces: HashMap<UID, Space>,
    surfaces: HashMap<UID, Surface>,
    infiltration: HashMap<UID, Infiltration>,
    schedules: HashMap<UID, FixedIntervalSchedule>,
}

impl Model {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Adds a thermal zone and returns its handle.
    pub fn add_zone(&mut self, name: &str) -> UID {
        let zone = ThermalZone::new(name);
        let uid = zone.uid.clone();
        self.zones.insert(uid.clone(), zone);
        uid
    }

    /// Adds a space, optionally assigned to an existing zone.
    pub fn add_space(&mut self, name: &str, zone: Option<&UID>) -> Result<UID> {
        if let Some(z) = zone {
            ensure!(self.zones.contains_key(z), "Unknown zone: {z}");
        }
        let space = Space::new(name, zone.cloned());
        let uid = space.uid.clone();
        self.spaces.insert(uid.clone(), space);
        Ok(uid)
    }

    /// Adds a surface, optionally owned by an existing space.
    pub fn add_surface(
        &mut self,
        name: &str,
        space: Option<&UID>,
        boundary: OutsideBoundary,
    ) -> Result<UID> {
        if let Some(s) = space {
            ensure!(self.spaces.contains_key(s), "Unknown space: {s}");
        }
        let surface = Surface::new(name, space.cloned(), boundary);
        let uid = surface.uid.clone();
        self.surfaces.insert(uid.clone(), surface);
        Ok(uid)
    }

    /// Replaces the outside boundary condition of a surface.
    pub fn set_boundary(&mut self, surface: &UID, boundary: OutsideBoundary) -> Result<()> {
        let s = self
            .surfaces
            .get_mut(surface)
            .ok_or_else(|| anyhow!("Unknown surface: {surface}"))?;
        s.boundary = boundary;
        Ok(())
    }

    /// Assigns (or detaches) the zone of a space.
    pub fn set_space_zone(&mut self, space: &UID, zone: Option<&UID>) -> Result<()> {
        if let Some(z) = zone {
            ensure!(self.zones.contains_key(z), "Unknown zone: {z}");
        }
        let s = self
            .spaces
            .get_mut(space)
            .ok_or_else(|| anyhow!("Unknown space: {space}"))?;
        s.zone = zone.cloned();
        Ok(())
    }

    pub fn add_schedule(&mut self, schedule: FixedIntervalSchedule) -> UID {
        let uid = schedule.uid.clone();
        self.schedules.insert(uid.clone(), schedule);
        uid
    }

    /// Adds an infiltration definition. Its space (and schedule, if any) must exist.
    pub fn add_infiltration(&mut self, infiltration: Infiltration) -> Result<UID> {
        ensure!(
            self.spaces.contains_key(infiltration.space()),
            "Infiltration '{}' refers to unknown space {}",
            infiltration.get_name(),
            infiltration.space()
        );
        if let Some(schedule) = infiltration.schedule() {
            ensure!(
                self.schedules.contains_key(schedule),
                "Infiltration '{}' refers to unknown schedule {}",
                infiltration.get_name(),
                schedule
            );
        }
        let uid = infiltration.get_uid().clone();
        self.infiltration.insert(uid.clone(), infiltration);
        Ok(uid)
    }

    pub fn remove_infiltration(&mut self, uid: &UID) -> Option<Infiltration> {
        self.infiltration.remove(uid)
    }

    pub fn remove_schedule(&mut self, uid: &UID) -> Option<FixedIntervalSchedule> {
        self.schedules.remove(uid)
    }

    pub fn zones(&self) -> Vec<&ThermalZone> {
        sorted_by_name(&self.zones)
    }

    pub fn spaces(&self) -> Vec<&Space> {
        sorted_by_name(&self.spaces)
    }

    pub fn surfaces(&self) -> Vec<&Surface> {
        sorted_by_name(&self.surfaces)
    }

    pub fn infiltration(&self) -> Vec<&Infiltration> {
        sorted_by_name(&self.infiltration)
    }

    pub fn schedules(&self) -> Vec<&FixedIntervalSchedule> {
        sorted_by_name(&self.schedules)
    }

    pub fn zone(&self, uid: &UID) -> Option<&ThermalZone> {
        self.zones.get(uid)
    }

    pub fn space(&self, uid: &UID) -> Option<&Space> {
        self.spaces.get(uid)
    }

    pub fn surface(&self, uid: &UID) -> Option<&Surface> {
        self.surfaces.get(uid)
    }

    pub fn schedule(&self, uid: &UID) -> Option<&FixedIntervalSchedule> {
        self.schedules.get(uid)
    }

    pub fn get_infiltration(&self, uid: &UID) -> Option<&Infiltration> {
        self.infiltration.get(uid)
    }

    pub fn get_space_by_name(&self, name: &str) -> Option<&Space> {
        self.spaces().into_iter().find(|s| s.name == name)
    }

    pub fn get_zone_by_name(&self, name: &str) -> Option<&ThermalZone> {
        self.zones().into_iter().find(|z| z.name == name)
    }

    pub fn get_surface_by_name(&self, name: &str) -> Option<&Surface> {
        self.surfaces().into_iter().find(|s| s.name == name)
    }

    /// Zone of a space, if the space is attached to one.
    pub fn space_zone(&self, space: &UID) -> Option<&ThermalZone> {
        let zone = self.spaces.get(space)?.zone.as_ref()?;
        self.zones.get(zone)
    }

    /// True if the surface is outdoor-exposed and its space belongs to a zone.
    pub fn is_attached_exterior(&self, surface: &Surface) -> bool {
        if surface.boundary != OutsideBoundary::Outdoors {
            return false;
        }
        let Some(space) = surface.space.as_ref() else {
            return false;
        };
        self.space_zone(space).is_some()
    }

    /// Attached exterior surfaces sorted by name.
    pub fn attached_exterior_surfaces(&self) -> Vec<&Surface> {
        self.surfaces()
            .into_iter()
            .filter(|s| self.is_attached_exterior(s))
            .collect()
    }

    /// Infiltration definitions bound to a space, sorted by name.
    pub fn infiltration_for_space(&self, space: &UID) -> Vec<&Infiltration> {
        self.infiltration()
            .into_iter()
            .filter(|i| i.space() == space)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_space_model() -> (Model, UID, UID) {
        let mut model = Model::new("m");
        let z = model.add_zone("Z1");
        let zoned = model.add_space("A", Some(&z)).unwrap();
        let loose = model.add_space("B", None).unwrap();
        (model, zoned, loose)
    }

    #[test]
    fn test_accessors_sorted_by_name() {
        let mut model = Model::new("m");
        model.add_zone("c");
        model.add_zone("a");
        model.add_zone("b");
        let names: Vec<&str> = model.zones().iter().map(|z| z.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_add_space_rejects_unknown_zone() {
        let mut model = Model::new("m");
        assert!(model.add_space("s", Some(&UID::from("nope"))).is_err());
    }

    #[test]
    fn test_attached_exterior_requires_outdoors_and_zone() {
        let (mut model, zoned, loose) = two_space_model();
        model
            .add_surface("A wall", Some(&zoned), OutsideBoundary::Outdoors)
            .unwrap();
        model
            .add_surface("A floor", Some(&zoned), OutsideBoundary::Ground)
            .unwrap();
        model
            .add_surface("B wall", Some(&loose), OutsideBoundary::Outdoors)
            .unwrap();
        model
            .add_surface("Orphan", None, OutsideBoundary::Outdoors)
            .unwrap();

        let ext: Vec<&str> = model
            .attached_exterior_surfaces()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(ext, vec!["A wall"]);
    }

    #[test]
    fn test_add_infiltration_validates_references() {
        let (mut model, zoned, _) = two_space_model();
        let ok = DesignFlowRate::new("inf", &zoned, 0.1);
        assert!(model.add_infiltration(Infiltration::DesignFlowRate(ok)).is_ok());

        let bad_space = DesignFlowRate::new("inf2", &UID::from("missing"), 0.1);
        assert!(
            model
                .add_infiltration(Infiltration::DesignFlowRate(bad_space))
                .is_err()
        );

        let bad_schedule =
            DesignFlowRate::new("inf3", &zoned, 0.1).with_schedule(&UID::from("missing"));
        assert!(
            model
                .add_infiltration(Infiltration::DesignFlowRate(bad_schedule))
                .is_err()
        );
        assert_eq!(model.infiltration_for_space(&zoned).len(), 1);
    }

    #[test]
    fn test_detaching_space_removes_exterior_status() {
        let (mut model, zoned, _) = two_space_model();
        model
            .add_surface("A wall", Some(&zoned), OutsideBoundary::Outdoors)
            .unwrap();
        assert_eq!(model.attached_exterior_surfaces().len(), 1);
        model.set_space_zone(&zoned, None).unwrap();
        assert!(model.attached_exterior_surfaces().is_empty());
    }
}
