//! State Module - Runtime state systems
//!
//! This module contains the state systems that keep the two visual
//! surfaces mirror-consistent:
//!
//! - **Focus** - Field selection FSM, flip decisions, indicator placement
//! - **Model** - Canonical field values, provider recognition, change fan-out

pub mod focus;
pub mod model;

pub use focus::*;
pub use model::*;
