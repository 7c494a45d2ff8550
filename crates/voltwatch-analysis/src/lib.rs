//! voltwatch-analysis: outlier detection, decomposition, and spectral
//! analysis over hourly series, plus the session that drives them.

pub mod decomposition;
pub mod outliers;
pub mod preprocess;
pub mod production;
pub mod session;
pub mod spectral;
pub mod transform;

pub use decomposition::{decompose_stl, StlDecomposition, StlParams};
pub use outliers::{
    detect_density, detect_trend_residual, DensityParams, DensityReport, OutlierMask,
    OutlierMethod, OutlierPoint, TrendResidualParams, TrendResidualReport,
};
pub use production::{GroupTotal, ProductionRecord};
pub use session::{AnalysisSession, AreaReport, Panel};
pub use spectral::{compute_spectrogram, Spectrogram, SpectrogramParams};
