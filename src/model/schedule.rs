use serde::{Deserialize, Serialize};

use super::HasName;
use crate::UID;
use crate::series::TimeSeries;

/// A schedule whose values come from a fixed-interval time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedIntervalSchedule {
    pub name: String,
    pub uid: UID,
    pub series: TimeSeries,
}

impl FixedIntervalSchedule {
    pub fn new(name: &str, series: TimeSeries) -> Self {
        Self {
            name: name.to_string(),
            uid: UID::new(),
            series,
        }
    }

    /// Value at a sample index (hour of year for hourly series).
    ///
    /// Past the end of the series the schedule reads zero.
    pub fn value_at(&self, index: usize) -> f64 {
        self.series.value(index).unwrap_or(0.0)
    }
}

impl HasName for FixedIntervalSchedule {
    fn get_name(&self) -> &str {
        &self.name
    }

    fn get_uid(&self) -> &UID {
        &self.uid
    }
}
