//! DTS Toolkit
//!
//! Drive-test utilities: picture alignment and border weights for
//! PowerPoint decks, CSV management for Gladiator and Wind Console exports,
//! and RSRP/CINR coverage analysis.

pub mod data;
pub mod files;
pub mod kpi;
pub mod pptx;
pub mod settings;
pub mod util;
