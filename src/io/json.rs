//! JSON persistence for [`Model`].
//!
//! The JSON form preserves entity UIDs, so references between zones, spaces,
//! surfaces, schedules and infiltration definitions survive a roundtrip.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::Model;

/// Pretty-printed JSON for `model`.
pub fn to_model_string(model: &Model) -> Result<String> {
    serde_json::to_string_pretty(model)
        .with_context(|| format!("Building model '{}' is not serializable", model.name))
}

pub fn from_model_string(json: &str) -> Result<Model> {
    serde_json::from_str(json).context("Invalid building model JSON")
}

/// Saves `model` to `path`, replacing any existing file.
pub fn write_model(path: &Path, model: &Model) -> Result<()> {
    let json = to_model_string(model)?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write building model '{}'", path.display()))
}

/// Loads a model saved by [`write_model`].
pub fn read_model(path: &Path) -> Result<Model> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read building model '{}'", path.display()))?;
    from_model_string(&json).with_context(|| format!("In '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::demo::demo_model;
    use crate::model::{DesignFlowRate, FixedIntervalSchedule, Infiltration};
    use crate::series::TimeSeries;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn test_write_and_read_model() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("demo.json");

        let original = demo_model()?;
        write_model(&path, &original)?;
        let loaded = read_model(&path)?;

        assert_eq!(loaded.name, original.name);
        assert_eq!(loaded.zones().len(), original.zones().len());
        assert_eq!(loaded.surfaces().len(), original.surfaces().len());
        assert_eq!(
            loaded.attached_exterior_surfaces().len(),
            original.attached_exterior_surfaces().len()
        );
        Ok(())
    }

    #[test]
    fn test_roundtrip_preserves_references() -> Result<()> {
        let mut model = demo_model()?;
        let space = model.get_space_by_name("Hallway").unwrap().uid.clone();
        let start = NaiveDate::from_ymd_opt(2013, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let schedule = model.add_schedule(FixedIntervalSchedule::new(
            "sched",
            TimeSeries::hourly(start, vec![0.25; 24]),
        ));
        let inf = DesignFlowRate::new("inf", &space, 1.0).with_schedule(&schedule);
        model.add_infiltration(Infiltration::DesignFlowRate(inf))?;

        let loaded = from_model_string(&to_model_string(&model)?)?;
        let infs = loaded.infiltration_for_space(&space);
        assert_eq!(infs.len(), 1);
        let sched_uid = infs[0].schedule().unwrap();
        assert_eq!(loaded.schedule(sched_uid).unwrap().value_at(3), 0.25);
        Ok(())
    }

    #[test]
    fn test_read_errors_name_the_file() -> Result<()> {
        let err = read_model(Path::new("/nonexistent/path/model.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/path/model.json"));

        let dir = tempdir()?;
        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"name\": ")?;
        let err = read_model(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
        assert!(format!("{err:#}").contains("Invalid building model JSON"));
        Ok(())
    }
}
