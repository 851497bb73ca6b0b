use std::path::Path;

use anyhow::Result;

use crate::series::TimeSeries;

/// Reader for airflow-network simulation results.
///
/// Parsing the native results format is the implementor's business; values
/// are mass flows in kg/s.
pub trait ResultsReader {
    /// Infiltration per network zone, ordered by zone number (index = number − 1).
    fn zone_infiltration(&self, results: &Path) -> Result<Vec<TimeSeries>>;

    /// Flow series for each requested path, in request order.
    fn path_flows(&self, results: &Path, path_numbers: &[u32]) -> Result<Vec<TimeSeries>>;
}
