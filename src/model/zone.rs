use serde::{Deserialize, Serialize};

use super::HasName;
use crate::UID;

/// A thermal control volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalZone {
    pub name: String,
    pub uid: UID,
}

impl ThermalZone {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            uid: UID::new(),
        }
    }
}

impl HasName for ThermalZone {
    fn get_name(&self) -> &str {
        &self.name
    }

    fn get_uid(&self) -> &UID {
        &self.uid
    }
}

/// A physical enclosure. Belongs to at most one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub name: String,
    pub uid: UID,
    /// Owning zone; `None` for an unattached space.
    pub zone: Option<UID>,
}

impl Space {
    pub fn new(name: &str, zone: Option<UID>) -> Self {
        Self {
            name: name.to_string(),
            uid: UID::new(),
            zone,
        }
    }
}

impl HasName for Space {
    fn get_name(&self) -> &str {
        &self.name
    }

    fn get_uid(&self) -> &UID {
        &self.uid
    }
}
