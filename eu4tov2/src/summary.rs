use serde::Serialize;
use v2world::V2World;

/// End-of-run totals, printable to the log and writable as JSON.
#[derive(Debug, Serialize)]
pub struct ConversionSummary {
    pub output_name: String,
    pub countries: usize,
    pub provinces: usize,
    pub states: usize,
    pub total_population: i64,
    pub unmapped_countries: usize,
}

impl ConversionSummary {
    pub fn new(output_name: &str, world: &V2World, unmapped_countries: usize) -> Self {
        ConversionSummary {
            output_name: output_name.to_string(),
            countries: world.tags().len(),
            provinces: world.provinces().count(),
            states: world.states().len(),
            total_population: world.provinces().map(|p| p.total_population() as i64).sum(),
            unmapped_countries,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
