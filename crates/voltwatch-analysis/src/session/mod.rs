//! Session controller driving every analysis for one selected price area.

pub mod controller;
pub mod panel;

pub use controller::{AnalysisSession, SessionResult};
pub use panel::{AreaReport, Panel};
