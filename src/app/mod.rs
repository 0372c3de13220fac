// GolNumeros - app/mod.rs
//
// Application layer: metric presets and the session dataset cache.
// Dependencies: core layer.
// Must NOT depend on: platform specifics.

pub mod catalog;
pub mod session;
