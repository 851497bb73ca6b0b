pub mod diagnostics;
pub mod error;
pub mod io;
pub mod model;
pub mod series;
pub mod sim;
mod uid;

// Prelude
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::CharacterizationError;
pub use model::{HasName, Model};
pub use series::TimeSeries;
pub use sim::infiltration::{
    CharacterizationConfig, SteadyReport, TransientReport, characterize_steady,
    characterize_transient,
};
pub use uid::UID;
