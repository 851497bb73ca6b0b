//! Four-room demonstration model.
//!
//! Single storey, 3 m floor-to-floor. Plan (x east, y north, metres):
//!
//! ```text
//! y=17 +--------+-------------------+
//!      |        |     Office 2      |
//! y=10 | Library+---+---------------+
//!      |        | H |   Office 1    |
//! y=0  +--------+---+---------------+
//!      x=0      8   11              18
//! ```
//!
//! Each space sits in its own zone. Every space has a roof to outdoors and a
//! floor on ground; walls are either exterior or matched partitions.

use anyhow::Result;

use super::{Model, OutsideBoundary};
use crate::UID;

/// Adds a pair of matched partition surfaces between two spaces.
fn add_partition(model: &mut Model, a: (&UID, &str), b: (&UID, &str)) -> Result<()> {
    let sa = model.add_surface(a.1, Some(a.0), OutsideBoundary::Adiabatic)?;
    let sb = model.add_surface(b.1, Some(b.0), OutsideBoundary::Surface(sa.clone()))?;
    model.set_boundary(&sa, OutsideBoundary::Surface(sb))?;
    Ok(())
}

fn add_roof_and_floor(model: &mut Model, space: &UID, name: &str) -> Result<()> {
    model.add_surface(&format!("{name} Roof"), Some(space), OutsideBoundary::Outdoors)?;
    model.add_surface(&format!("{name} Floor"), Some(space), OutsideBoundary::Ground)?;
    Ok(())
}

/// Builds the demonstration model.
pub fn demo_model() -> Result<Model> {
    let mut model = Model::new("Demo");

    let mut spaces = Vec::new();
    for name in ["Library", "Office 1", "Office 2", "Hallway"] {
        let zone = model.add_zone(&format!("{name} Zone"));
        spaces.push(model.add_space(name, Some(&zone))?);
    }
    let [library, office1, office2, hallway] = [&spaces[0], &spaces[1], &spaces[2], &spaces[3]];

    let exterior = [
        (library, "Library West Wall"),
        (library, "Library North Wall"),
        (library, "Library South Wall"),
        (office2, "Office 2 North Wall"),
        (office2, "Office 2 East Wall"),
        (hallway, "Hallway South Wall"),
        (office1, "Office 1 South Wall"),
        (office1, "Office 1 East Wall"),
    ];
    for (space, name) in exterior {
        model.add_surface(name, Some(space), OutsideBoundary::Outdoors)?;
    }

    add_partition(
        &mut model,
        (library, "Library East Wall 1"),
        (hallway, "Hallway West Wall"),
    )?;
    add_partition(
        &mut model,
        (library, "Library East Wall 2"),
        (office2, "Office 2 West Wall"),
    )?;
    add_partition(
        &mut model,
        (hallway, "Hallway North Wall"),
        (office2, "Office 2 South Wall 1"),
    )?;
    add_partition(
        &mut model,
        (hallway, "Hallway East Wall"),
        (office1, "Office 1 West Wall"),
    )?;
    add_partition(
        &mut model,
        (office1, "Office 1 North Wall"),
        (office2, "Office 2 South Wall 2"),
    )?;

    add_roof_and_floor(&mut model, library, "Library")?;
    add_roof_and_floor(&mut model, office1, "Office 1")?;
    add_roof_and_floor(&mut model, office2, "Office 2")?;
    add_roof_and_floor(&mut model, hallway, "Hallway")?;

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_model_counts() {
        let model = demo_model().unwrap();
        assert_eq!(model.zones().len(), 4);
        assert_eq!(model.spaces().len(), 4);
        // 8 walls + 4 roofs
        assert_eq!(model.attached_exterior_surfaces().len(), 12);
        // 12 exterior + 4 floors + 10 partition faces
        assert_eq!(model.surfaces().len(), 26);
    }

    #[test]
    fn test_demo_partitions_are_matched() {
        let model = demo_model().unwrap();
        for surface in model.surfaces() {
            if let OutsideBoundary::Surface(other) = &surface.boundary {
                let other = model.surface(other).unwrap();
                assert_eq!(other.boundary, OutsideBoundary::Surface(surface.uid.clone()));
                assert_ne!(other.space, surface.space);
            }
        }
    }

    #[test]
    fn test_demo_one_space_per_zone() {
        let model = demo_model().unwrap();
        for zone in model.zones() {
            let n = model
                .spaces()
                .iter()
                .filter(|s| s.zone.as_ref() == Some(&zone.uid))
                .count();
            assert_eq!(n, 1, "zone {} should hold one space", zone.name);
        }
    }
}
