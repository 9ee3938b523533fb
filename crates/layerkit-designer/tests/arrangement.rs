#[path = "arrangement/properties.rs"]
mod properties;
#[path = "arrangement/scenarios.rs"]
mod scenarios;
