//! Explorer configuration.
//!
//! Every field has a built-in default, so the explorer runs without a config file. A JSON
//! file passed with `--config` may override any subset of fields.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::engine::fractal::FractalParams;
use crate::engine::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub fractal: FractalParams,
    pub controls: ControlConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "3D Mandelbox Fractal Explorer".to_string(),
            width: 1280,
            height: 720,
            resizable: true,
        }
    }
}

impl WindowConfig {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    /// Degrees; -90 looks down -Z.
    pub yaw: f32,
    /// Degrees, clamped to [-89, 89].
    pub pitch: f32,
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub move_step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: -90.0,
            pitch: 0.0,
            fov_y_degrees: 90.0,
            z_near: 0.1,
            z_far: 100.0,
            move_step: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub mouse_sensitivity: f32,
    pub sensitivity_step: f32,
    pub min_sensitivity: f32,
    pub max_sensitivity: f32,
    pub scale_step: f32,
    /// Multiplier applied to `debug_zoom` by the zoom-in key.
    pub zoom_in_factor: f32,
    /// Multiplier applied to `debug_zoom` by the zoom-out key.
    pub zoom_out_factor: f32,
    pub offset_step: f32,
    /// Start with the cursor grabbed for mouse look.
    pub capture_mouse: bool,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.05,
            sensitivity_step: 0.01,
            min_sensitivity: 0.01,
            max_sensitivity: 0.5,
            scale_step: 0.1,
            zoom_in_factor: 0.9,
            zoom_out_factor: 1.1,
            offset_step: 0.1,
            capture_mouse: false,
        }
    }
}

impl ControlConfig {
    /// Rejects sensitivity bounds that cannot form a range.
    pub fn validate(&self) -> Result<(), String> {
        let (min, max) = (self.min_sensitivity, self.max_sensitivity);
        if !(min.is_finite() && max.is_finite()) {
            return Err(format!("sensitivity bounds must be finite (min {min}, max {max})"));
        }
        if min > max {
            return Err(format!(
                "min_sensitivity {min} is greater than max_sensitivity {max}"
            ));
        }
        Ok(())
    }
}

impl ExplorerConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn load(path: &Path) -> EngineResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| EngineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| EngineError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config
            .controls
            .validate()
            .map_err(|reason| EngineError::ConfigInvalid {
                path: path.to_path_buf(),
                reason,
            })?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> EngineResult<Self> {
        match path {
            Some(path) => {
                let config = Self::load(path)?;
                log::info!("loaded config from {}", path.display());
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = ExplorerConfig::from_json("{}").unwrap();
        assert_eq!(config, ExplorerConfig::default());
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.fractal.scale, 2.0);
        assert_eq!(config.fractal.max_iterations, 100);
        assert_eq!(config.controls.mouse_sensitivity, 0.05);
    }

    #[test]
    fn partial_override_keeps_other_fields() {
        let config = ExplorerConfig::from_json(
            r#"{ "fractal": { "scale": -1.5 }, "camera": { "position": [0.0, 0.0, 5.5] } }"#,
        )
        .unwrap();

        assert_eq!(config.fractal.scale, -1.5);
        assert_eq!(config.fractal.max_iterations, 100);
        assert_eq!(config.camera.position, Vec3::new(0.0, 0.0, 5.5));
        assert_eq!(config.camera.yaw, -90.0);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(ExplorerConfig::from_json(r#"{ "window": { "width": "wide" } }"#).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ExplorerConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn aspect_survives_zero_height() {
        let window = WindowConfig {
            height: 0,
            ..Default::default()
        };
        assert!(window.aspect().is_finite());
    }

    #[test]
    fn inverted_sensitivity_bounds_are_rejected() {
        let config =
            ExplorerConfig::from_json(r#"{ "controls": { "min_sensitivity": 0.6 } }"#).unwrap();
        let reason = config.controls.validate().unwrap_err();
        assert!(reason.contains("0.6"), "{reason}");
    }

    #[test]
    fn nan_sensitivity_bound_is_rejected() {
        let controls = ControlConfig {
            max_sensitivity: f32::NAN,
            ..Default::default()
        };
        assert!(controls.validate().is_err());
        assert!(ControlConfig::default().validate().is_ok());
    }

    #[test]
    fn load_reports_invalid_values_with_path() {
        let path = std::env::temp_dir().join(format!(
            "mandelbox-explorer-inverted-{}.json",
            std::process::id()
        ));
        fs::write(
            &path,
            r#"{ "controls": { "min_sensitivity": 0.6, "max_sensitivity": 0.5 } }"#,
        )
        .unwrap();

        let err = ExplorerConfig::load(&path).unwrap_err();
        let _ = fs::remove_file(&path);

        assert!(matches!(err, EngineError::ConfigInvalid { .. }), "{err}");
        assert!(err.to_string().contains(&path.display().to_string()));
    }
}
