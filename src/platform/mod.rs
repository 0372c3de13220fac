// GolNumeros - platform/mod.rs
//
// Platform layer: CSV files on disk and config.toml.
// Dependencies: core, app (implements app::session::TableSource).
// Must NOT be used by: core.

pub mod config;
pub mod loader;
