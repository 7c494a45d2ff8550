//! Results as a dashboard panel sees them.

use serde::{Deserialize, Serialize};
use voltwatch_core::errors::VoltwatchErrorCode;
use voltwatch_core::types::PriceArea;

/// An analysis result tagged with the price area it was computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaReport<T> {
    pub area: PriceArea,
    pub report: T,
}

impl<T> AreaReport<T> {
    pub fn new(area: PriceArea, report: T) -> Self {
        Self { area, report }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> AreaReport<U> {
        AreaReport {
            area: self.area,
            report: f(self.report),
        }
    }
}

impl<T: Serialize> AreaReport<T> {
    /// JSON payload for a rendering layer.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// What one panel of the dashboard shows: a result, or a warning in its place.
///
/// A failing panel never takes the rest of the page down with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Panel<T> {
    Ready(AreaReport<T>),
    Warning {
        area: PriceArea,
        code: String,
        message: String,
    },
}

impl<T> Panel<T> {
    /// Convert a result computed for `area`, turning any failure into a
    /// warning that still names the area.
    pub fn from_result<E>(area: PriceArea, result: Result<AreaReport<T>, E>) -> Self
    where
        E: VoltwatchErrorCode + std::fmt::Display,
    {
        match result {
            Ok(report) => Self::Ready(report),
            Err(err) => {
                tracing::warn!(%area, code = err.error_code(), error = %err, "panel shows warning");
                Self::Warning {
                    area,
                    code: err.error_code().to_string(),
                    message: err.to_string(),
                }
            }
        }
    }

    /// Area the panel belongs to, whether it holds a result or a warning.
    pub fn area(&self) -> PriceArea {
        match self {
            Self::Ready(report) => report.area,
            Self::Warning { area, .. } => *area,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn report(&self) -> Option<&AreaReport<T>> {
        match self {
            Self::Ready(report) => Some(report),
            Self::Warning { .. } => None,
        }
    }

    /// `AREA: [CODE] message` for a warning panel.
    pub fn warning_text(&self) -> Option<String> {
        match self {
            Self::Ready(_) => None,
            Self::Warning {
                area,
                code,
                message,
            } => Some(format!("{area}: [{code}] {message}")),
        }
    }
}
