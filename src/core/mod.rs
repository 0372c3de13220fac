// GolNumeros - core/mod.rs
//
// Core business logic layer: normalisation, filtering, aggregation.
// Must NOT depend on: app, platform, or any file I/O.

pub mod export;
pub mod filter;
pub mod model;
pub mod normalize;
pub mod scoreline;
pub mod summary;
pub mod view;
