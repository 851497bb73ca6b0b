use serde::{Deserialize, Serialize};

use super::HasName;
use crate::UID;

/// What lies on the outside face of a surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutsideBoundary {
    Outdoors,
    Ground,
    Adiabatic,
    /// Interior partition facing another surface.
    Surface(UID),
}

/// A planar envelope element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub name: String,
    pub uid: UID,
    /// Owning space; `None` for an unattached surface.
    pub space: Option<UID>,
    pub boundary: OutsideBoundary,
}

impl Surface {
    pub fn new(name: &str, space: Option<UID>, boundary: OutsideBoundary) -> Self {
        Self {
            name: name.to_string(),
            uid: UID::new(),
            space,
            boundary,
        }
    }
}

impl HasName for Surface {
    fn get_name(&self) -> &str {
        &self.name
    }

    fn get_uid(&self) -> &UID {
        &self.uid
    }
}
