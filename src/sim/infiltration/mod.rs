//! Wind-driven infiltration characterization.
//!
//! Two paths share the entity index map and model synthesis:
//!
//! - steady: sweep wind speed and direction, average over directions, fit
//!   `Q(v) = C·v + D·v²` per zone and write one design-flow-rate definition
//!   per zone;
//! - transient: run once over the translator's time window and write one
//!   hourly schedule per space.

pub mod aggregate;
pub mod config;
pub mod fit;
pub mod steady;
pub mod sweep;
pub mod synthesis;
pub mod transient;

pub use aggregate::{ZoneResponse, aggregate_directions};
pub use config::{AIR_DENSITY, CharacterizationConfig};
pub use fit::{
    FitError, InfiltrationCoefficients, QuadraticFit, REFERENCE_SPEEDS, ZoneFit, fit_zones,
    solve_quadratic,
};
pub use steady::{SteadyReport, apply_response, characterize_steady, run_steady};
pub use sweep::{
    DirectionCount, RawDirectionCount, SweepGrid, SweepPoint, SweepResults, run_sweep,
};
pub use synthesis::{SynthesisSummary, install_steady, install_transient, remove_infiltration};
pub use transient::{
    SurfaceCombine, TransientReport, characterize_transient, map_paths_to_spaces, run_transient,
};
