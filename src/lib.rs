//! Workflow automation for mooring analyses of spread-moored floating
//! vessels, driven by a tabular input workbook.
//!
//! Four batch phases, each its own binary, communicating only through
//! persisted artifacts: `build_model` constructs the vessel + mooring model
//! and solves intact statics; `static_results` extracts the static end
//! forces and vessel offsets; `generate_cases` derives one dynamic-analysis
//! artifact per intact and per single-line-damage case; `dynamic_results`
//! aggregates extreme-value statistics after the external engine has run
//! the dynamic simulations. All physics is delegated to the engine through
//! the capability interface in [`engine`].

pub mod cases;
pub mod engine;
pub mod frame;
pub mod input;
pub mod model;
pub mod paths;
pub mod post;
