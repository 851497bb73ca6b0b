//! Recoverable conditions observed during a run.
//!
//! Every exclusion or correction is logged through `tracing` when it happens
//! and kept in a [`Diagnostics`] list that ends up in the run report.

use std::fmt;

use crate::UID;

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A non-positive or unparsable direction count was replaced.
    DirectionCountCorrected { raw: String, used: usize },
    /// Space has no zone; excluded from all derived results.
    UnattachedSpace { space: UID },
    /// Zone has no entry in the translator zone map; excluded.
    ZoneLookupFailed { zone: UID },
    /// Exterior surface has no entry in the translator path map; excluded.
    SurfaceLookupFailed { surface: UID },
    /// Quadratic fit is undefined for this zone; nothing is written for it.
    DegenerateFit { zone_number: u32, reason: String },
    /// Network zone has no model space to receive a definition.
    ZoneWithoutSpace { zone_number: u32 },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DirectionCountCorrected { raw, used } => {
                write!(f, "bad direction count '{raw}', using {used}")
            }
            Diagnostic::UnattachedSpace { space } => write!(f, "unattached space '{space}'"),
            Diagnostic::ZoneLookupFailed { zone } => write!(f, "lookup failed for zone '{zone}'"),
            Diagnostic::SurfaceLookupFailed { surface } => {
                write!(f, "lookup failed for exterior surface '{surface}'")
            }
            Diagnostic::DegenerateFit {
                zone_number,
                reason,
            } => write!(f, "zone {zone_number}: fit rejected ({reason})"),
            Diagnostic::ZoneWithoutSpace { zone_number } => {
                write!(f, "network zone {zone_number} has no model space")
            }
        }
    }
}

/// Ordered collection of diagnostics for one run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs the diagnostic as a warning and records it.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{diagnostic}");
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_extend_keep_order() {
        let mut a = Diagnostics::new();
        a.push(Diagnostic::UnattachedSpace {
            space: UID::from("s1"),
        });
        let mut b = Diagnostics::new();
        b.push(Diagnostic::ZoneLookupFailed {
            zone: UID::from("z9"),
        });
        a.extend(b);

        assert_eq!(a.len(), 2);
        assert_eq!(a.items()[0].to_string(), "unattached space 's1'");
        assert_eq!(a.items()[1].to_string(), "lookup failed for zone 'z9'");
    }
}
