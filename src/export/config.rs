//! Export settings.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "settleDelayMs": 250, "timeoutMs": 10000, "allowCrossOrigin": false }
//! ```

use folio_scene::SnapshotOptions;
use folio_traits::RasterOptions;
use folio_types::{Color, PageSize, Size};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportConfig {
    /// Width, in logical pixels, the document is laid out at.
    pub logical_width: f32,
    /// Device pixels per logical pixel.
    pub device_scale: f32,
    pub settle_delay_ms: u64,
    pub timeout_ms: u64,
    pub page: PageSize,
    pub identity_box: Size,
    pub image_box: Size,
    pub background: Color,
    pub allow_cross_origin: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        let snapshot = SnapshotOptions::default();
        let raster = RasterOptions::default();
        Self {
            logical_width: snapshot.logical_width,
            device_scale: raster.scale,
            settle_delay_ms: 500,
            timeout_ms: 30_000,
            page: PageSize::A4,
            identity_box: snapshot.identity_box,
            image_box: snapshot.image_box,
            background: raster.background,
            allow_cross_origin: raster.allow_cross_origin,
        }
    }
}

impl ExportConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn snapshot_options(&self) -> SnapshotOptions {
        SnapshotOptions {
            logical_width: self.logical_width,
            identity_box: self.identity_box,
            image_box: self.image_box,
        }
    }

    pub fn raster_options(&self) -> RasterOptions {
        RasterOptions {
            scale: self.device_scale,
            background: self.background,
            allow_cross_origin: self.allow_cross_origin,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("logicalWidth", self.logical_width)?;
        positive("deviceScale", self.device_scale)?;
        positive("page.width_mm", self.page.width_mm)?;
        positive("page.height_mm", self.page.height_mm)?;
        positive("identityBox.width", self.identity_box.width)?;
        positive("identityBox.height", self.identity_box.height)?;
        positive("imageBox.width", self.image_box.width)?;
        positive("imageBox.height", self.image_box.height)?;
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeoutMs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if !self.background.is_opaque() {
            return Err(ConfigError::InvalidValue {
                field: "background",
                reason: "must be fully opaque".to_string(),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("must be a positive number, got {}", value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_export() {
        let config = ExportConfig::default();
        assert_eq!(config.logical_width, 794.0);
        assert_eq!(config.device_scale, 2.0);
        assert_eq!(config.settle_delay(), Duration::from_millis(500));
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.page, PageSize::A4);
        assert_eq!(config.identity_box, Size::new(400.0, 180.0));
        assert_eq!(config.image_box, Size::new(150.0, 80.0));
        assert_eq!(config.background, Color::WHITE);
        assert!(config.allow_cross_origin);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            ExportConfig::from_json(r##"{"settleDelayMs": 0, "background": "#fafafa"}"##).unwrap();
        assert_eq!(config.settle_delay(), Duration::ZERO);
        assert_eq!(config.background, Color::hex(0xFAFAFA));
        assert_eq!(config.logical_width, 794.0);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = ExportConfig::from_json(r#"{"deviceScale": 0}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "deviceScale",
                ..
            }
        ));
        assert!(ExportConfig::from_json(r#"{"timeoutMs": 0}"#).is_err());
        assert!(ExportConfig::from_json(r#"{"background": {"r":0,"g":0,"b":0,"a":0.5}}"#).is_err());
        assert!(matches!(
            ExportConfig::from_json("{"),
            Err(ConfigError::Parse(_))
        ));
    }
}
