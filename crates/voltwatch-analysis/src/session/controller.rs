//! The analysis session: selected price area plus resolved configuration.
//!
//! Every page of the dashboard reads the area through the session instead of
//! shared mutable state. Each run is tagged with the area it used, so a
//! result can never be mistaken for another area's.

use std::path::Path;

use voltwatch_core::config::{ConfigOverrides, VoltwatchConfig};
use voltwatch_core::errors::{SessionError, VoltwatchErrorCode};
use voltwatch_core::types::{PriceArea, ProductionGroup, Series};

use super::panel::{AreaReport, Panel};
use crate::decomposition::{decompose_stl, StlDecomposition, StlParams};
use crate::outliers::{
    detect_density, detect_trend_residual, DensityParams, DensityReport, TrendResidualParams,
    TrendResidualReport,
};
use crate::production::{group_totals, production_series, GroupTotal, ProductionRecord};
use crate::spectral::{compute_spectrogram, Spectrogram, SpectrogramParams};

/// Result type of every session operation.
pub type SessionResult<T> = Result<AreaReport<T>, SessionError>;

#[derive(Debug, Clone)]
pub struct AnalysisSession {
    area: PriceArea,
    config: VoltwatchConfig,
}

impl AnalysisSession {
    /// Start a session on the configured default area (NO1 when unset).
    pub fn new(config: VoltwatchConfig) -> Result<Self, SessionError> {
        let area = config.session.effective_default_area()?;
        tracing::debug!(%area, "analysis session started");
        Ok(Self { area, config })
    }

    /// Resolve configuration from `root` and the usual layers, then start a session.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, SessionError> {
        let config = VoltwatchConfig::load(root, overrides)?;
        Self::new(config)
    }

    pub fn select_area(&mut self, area: PriceArea) {
        if area != self.area {
            tracing::info!(from = %self.area, to = %area, "price area changed");
        }
        self.area = area;
    }

    pub fn selected_area(&self) -> PriceArea {
        self.area
    }

    /// (latitude, longitude) of the selected area's reference city.
    pub fn weather_location(&self) -> (f64, f64) {
        self.area.coordinates()
    }

    pub fn config(&self) -> &VoltwatchConfig {
        &self.config
    }

    pub fn trend_residual(&self, series: &Series) -> SessionResult<TrendResidualReport> {
        self.trend_residual_with(series, &TrendResidualParams::from_config(&self.config.trend_residual))
    }

    pub fn trend_residual_with(
        &self,
        series: &Series,
        params: &TrendResidualParams,
    ) -> SessionResult<TrendResidualReport> {
        let report = detect_trend_residual(series, params)?;
        Ok(self.tag(report))
    }

    pub fn density(&self, series: &Series) -> SessionResult<DensityReport> {
        self.density_with(series, &DensityParams::from_config(&self.config.density))
    }

    pub fn density_with(&self, series: &Series, params: &DensityParams) -> SessionResult<DensityReport> {
        let report = detect_density(series, params)?;
        Ok(self.tag(report))
    }

    pub fn stl(&self, series: &Series) -> SessionResult<StlDecomposition> {
        self.stl_with(series, &StlParams::from_config(&self.config.stl))
    }

    pub fn stl_with(&self, series: &Series, params: &StlParams) -> SessionResult<StlDecomposition> {
        let decomposition = decompose_stl(series, params)?;
        Ok(self.tag(decomposition))
    }

    pub fn spectrogram(&self, series: &Series) -> SessionResult<Spectrogram> {
        self.spectrogram_with(series, &SpectrogramParams::from_config(&self.config.spectrogram))
    }

    pub fn spectrogram_with(
        &self,
        series: &Series,
        params: &SpectrogramParams,
    ) -> SessionResult<Spectrogram> {
        let spectrogram = compute_spectrogram(series, params)?;
        Ok(self.tag(spectrogram))
    }

    /// Hourly series of `group` in the selected area.
    pub fn production(
        &self,
        records: &[ProductionRecord],
        group: ProductionGroup,
    ) -> SessionResult<Series> {
        let series = production_series(records, self.area, group)?;
        Ok(self.tag(series))
    }

    /// Yearly production shares of the selected area, largest first.
    pub fn production_shares(&self, records: &[ProductionRecord], year: i32) -> AreaReport<Vec<GroupTotal>> {
        self.tag(group_totals(records, self.area, year))
    }

    /// Convert a session result into a panel for the selected area, logging
    /// failures as warnings.
    pub fn panel<T, E>(&self, result: Result<AreaReport<T>, E>) -> Panel<T>
    where
        E: VoltwatchErrorCode + std::fmt::Display,
    {
        Panel::from_result(self.area, result)
    }

    fn tag<T>(&self, report: T) -> AreaReport<T> {
        AreaReport::new(self.area, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn hourly(values: &[f64]) -> Series {
        Series::hourly(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(), values)
    }

    #[test]
    fn test_default_area_is_no1() {
        let session = AnalysisSession::new(VoltwatchConfig::default()).unwrap();
        assert_eq!(session.selected_area(), PriceArea::No1);
    }

    #[test]
    fn test_configured_area_is_used() {
        let config = VoltwatchConfig::from_toml("[session]\ndefault_area = \"no4\"").unwrap();
        let session = AnalysisSession::new(config).unwrap();
        assert_eq!(session.selected_area(), PriceArea::No4);
        assert_eq!(session.weather_location(), PriceArea::No4.coordinates());
    }

    #[test]
    fn test_invalid_configured_area_fails() {
        let mut config = VoltwatchConfig::default();
        config.session.default_area = Some("DK1".to_string());
        let err = AnalysisSession::new(config).unwrap_err();
        assert_eq!(err.error_code(), "SERIES_ERROR");
    }

    #[test]
    fn test_results_are_tagged_with_selected_area() {
        let mut session = AnalysisSession::new(VoltwatchConfig::default()).unwrap();
        session.select_area(PriceArea::No2);
        let values: Vec<f64> = (0..100).map(|i| (i % 12) as f64).collect();
        let report = session.density(&hourly(&values)).unwrap();
        assert_eq!(report.area, PriceArea::No2);
    }

    #[test]
    fn test_config_parameters_flow_into_detectors() {
        let config = VoltwatchConfig::from_toml("[density]\nneighbor_count = 7").unwrap();
        let session = AnalysisSession::new(config).unwrap();
        let values: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let report = session.density(&hourly(&values)).unwrap();
        assert_eq!(report.report.summary.neighbor_count, 7);
    }

    #[test]
    fn test_failure_becomes_warning_panel() {
        let session = AnalysisSession::new(VoltwatchConfig::default()).unwrap();
        let panel = session.panel(session.density(&hourly(&[1.0, 2.0, 3.0])));
        assert!(!panel.is_ready());
        let text = panel.warning_text().unwrap();
        assert!(text.starts_with("NO1: [INSUFFICIENT_DATA]"), "{text}");
    }

    #[test]
    fn test_warning_panel_names_selected_area() {
        let mut session = AnalysisSession::new(VoltwatchConfig::default()).unwrap();
        session.select_area(PriceArea::No4);
        let panel = session.panel(session.stl(&hourly(&[1.0; 10])));
        assert_eq!(panel.area(), PriceArea::No4);
        match panel {
            Panel::Warning { area, code, .. } => {
                assert_eq!(area, PriceArea::No4);
                assert_eq!(code, "INSUFFICIENT_DATA");
            }
            Panel::Ready(_) => panic!("ten samples cannot hold two daily cycles"),
        }
    }

    #[test]
    fn test_success_becomes_ready_panel() {
        let session = AnalysisSession::new(VoltwatchConfig::default()).unwrap();
        let values: Vec<f64> = (0..240).map(|i| (i as f64 / 24.0 * std::f64::consts::TAU).sin()).collect();
        let panel = session.panel(session.trend_residual(&hourly(&values)));
        assert!(panel.is_ready());
        assert_eq!(panel.report().unwrap().report.summary.n_outliers, 0);
    }
}
