//! Runtime configuration parsed from environment variables.

use std::f32::consts::PI;

use thiserror::Error;

use crate::camera::AnglePolicy;
use crate::colors;
use crate::extract::Style;
use crate::projection::DepthStrategy;

pub const DEFAULT_WIDTH: u32 = 1280;
pub const DEFAULT_HEIGHT: u32 = 960;
pub const DEFAULT_FPS: u32 = 60;
pub const DEFAULT_MESH_SCALE: f32 = 50.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: expected {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub point_radius: f32,
    pub depth_step: f32,
    pub pan_step: f32,
    pub rotation_step: f32,
    pub mesh_scale: f32,
    pub depth_strategy: DepthStrategy,
    pub angle_policy: AnglePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fps: DEFAULT_FPS,
            point_radius: 2.0,
            depth_step: 0.1,
            pan_step: 2.0,
            rotation_step: PI / 180.0,
            mesh_scale: DEFAULT_MESH_SCALE,
            depth_strategy: DepthStrategy::default(),
            angle_policy: AnglePolicy::default(),
        }
    }
}

impl Config {
    /// Build config from environment variables. Unset variables keep defaults.
    ///
    /// - `MESHCAST_WIDTH`, `MESHCAST_HEIGHT`: window size in pixels
    /// - `MESHCAST_FPS`: frame cap
    /// - `MESHCAST_MESH_SCALE`: scale factor applied to loaded meshes
    /// - `MESHCAST_DEPTH_STRATEGY`: `single` (default) or `per-vertex`
    /// - `MESHCAST_ANGLE_POLICY`: `accumulate` (default) or `wrap`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let read = |var: &'static str| lookup(var).map(|v| (var, v));

        let width = match read("MESHCAST_WIDTH") {
            Some((var, v)) => parse_dimension(var, &v)?,
            None => defaults.width,
        };
        let height = match read("MESHCAST_HEIGHT") {
            Some((var, v)) => parse_dimension(var, &v)?,
            None => defaults.height,
        };
        let fps = match read("MESHCAST_FPS") {
            Some((var, v)) => parse_dimension(var, &v)?,
            None => defaults.fps,
        };
        let mesh_scale = match read("MESHCAST_MESH_SCALE") {
            Some((var, v)) => parse_scale(var, &v)?,
            None => defaults.mesh_scale,
        };
        let depth_strategy = parse_depth_strategy(lookup("MESHCAST_DEPTH_STRATEGY").as_deref())?;
        let angle_policy = parse_angle_policy(lookup("MESHCAST_ANGLE_POLICY").as_deref())?;

        Ok(Self {
            width,
            height,
            fps,
            mesh_scale,
            depth_strategy,
            angle_policy,
            ..defaults
        })
    }

    /// Primitive style for the extractor, using the standard palette.
    pub fn style(&self) -> Style {
        Style {
            point_radius: self.point_radius,
            point_color: colors::VERTEX,
            edge_color: colors::EDGE,
            face_fill: colors::FACE_FILL,
            face_outline: colors::FACE_OUTLINE,
        }
    }
}

fn parse_dimension(var: &'static str, raw: &str) -> Result<u32, ConfigError> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(invalid(var, "a positive integer", raw)),
    }
}

fn parse_scale(var: &'static str, raw: &str) -> Result<f32, ConfigError> {
    match raw.trim().parse::<f32>() {
        Ok(s) if s.is_finite() && s > 0.0 => Ok(s),
        _ => Err(invalid(var, "a positive number", raw)),
    }
}

fn parse_depth_strategy(raw: Option<&str>) -> Result<DepthStrategy, ConfigError> {
    match raw.map(str::trim).unwrap_or("single") {
        "single" => Ok(DepthStrategy::SinglePoint),
        "per-vertex" => Ok(DepthStrategy::PerVertex),
        other => Err(invalid("MESHCAST_DEPTH_STRATEGY", "'single' or 'per-vertex'", other)),
    }
}

fn parse_angle_policy(raw: Option<&str>) -> Result<AnglePolicy, ConfigError> {
    match raw.map(str::trim).unwrap_or("accumulate") {
        "accumulate" => Ok(AnglePolicy::Accumulate),
        "wrap" => Ok(AnglePolicy::Wrap),
        other => Err(invalid("MESHCAST_ANGLE_POLICY", "'accumulate' or 'wrap'", other)),
    }
}

fn invalid(var: &'static str, expected: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        var,
        expected,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!((config.width, config.height), (1280, 960));
        assert_eq!(config.depth_strategy, DepthStrategy::SinglePoint);
        assert_eq!(config.angle_policy, AnglePolicy::Accumulate);
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::from_lookup(lookup(&[
            ("MESHCAST_WIDTH", "640"),
            ("MESHCAST_HEIGHT", " 480 "),
            ("MESHCAST_FPS", "30"),
            ("MESHCAST_MESH_SCALE", "12.5"),
            ("MESHCAST_DEPTH_STRATEGY", "per-vertex"),
            ("MESHCAST_ANGLE_POLICY", "wrap"),
        ]))
        .unwrap();
        assert_eq!((config.width, config.height, config.fps), (640, 480, 30));
        assert_eq!(config.mesh_scale, 12.5);
        assert_eq!(config.depth_strategy, DepthStrategy::PerVertex);
        assert_eq!(config.angle_policy, AnglePolicy::Wrap);
        assert_eq!(config.pan_step, 2.0);
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = Config::from_lookup(lookup(&[("MESHCAST_WIDTH", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "MESHCAST_WIDTH", .. }));

        let err = Config::from_lookup(lookup(&[("MESHCAST_MESH_SCALE", "-1")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "MESHCAST_MESH_SCALE", .. }));

        let err = Config::from_lookup(lookup(&[("MESHCAST_ANGLE_POLICY", "spin")])).unwrap_err();
        assert_eq!(err.to_string(), "MESHCAST_ANGLE_POLICY: expected 'accumulate' or 'wrap', got \"spin\"");
    }

    #[test]
    fn style_uses_point_radius() {
        let config = Config {
            point_radius: 4.0,
            ..Config::default()
        };
        let style = config.style();
        assert_eq!(style.point_radius, 4.0);
        assert_eq!(style.face_fill, colors::FACE_FILL);
    }
}
