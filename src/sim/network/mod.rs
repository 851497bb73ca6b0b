//! Airflow-network side of the characterization.
//!
//! Translator contract, identity mapping, input payloads, process execution
//! and results reading. The native file formats live behind traits.

pub mod index;
pub mod input;
pub mod results;
pub mod runner;
pub mod translator;

pub use index::EntityIndexMap;
pub use input::{NetworkInput, SimulationMode};
pub use results::ResultsReader;
pub use runner::{ExternalRunner, SimulationRunner, ToolPaths};
pub use translator::{Airtightness, LeakageSpec, NetworkTranslator, Translation, TranslatorMaps};
