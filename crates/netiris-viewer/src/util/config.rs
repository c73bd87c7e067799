use anyhow::Context;
use directories::ProjectDirs;
use netiris_core::LayoutConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Viewer tuning. Several of these (cone pads, particle alpha) are
/// eye-tuned display constants; they live here so they stay adjustable
/// without a rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub layout: LayoutConfig,

    /// Radius of the child ring in the focused view.
    pub focused_tor_radius: f32,

    pub particle_count: usize,
    pub particle_speed_base: f32,
    pub particle_alpha: f32,

    /// Angular widening of a failure cone beyond its children, radians.
    pub cone_angle_pad: f32,
    /// Radial margin of a failure cone beyond its outermost child.
    pub cone_radius_pad: f32,

    /// Pointer-to-node distance cutoff for hover, pixels.
    pub hover_radius_px: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            focused_tor_radius: 250.0,
            particle_count: 150,
            particle_speed_base: 0.005,
            particle_alpha: 0.4,
            cone_angle_pad: 0.05,
            cone_radius_pad: 20.0,
            hover_radius_px: 20.0,
        }
    }
}

fn config_file_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "netiris")?;
    Some(proj.config_dir().join("viewer.toml"))
}

pub fn load_or_default() -> ViewerConfig {
    let Some(path) = config_file_path() else {
        return ViewerConfig::default();
    };
    load_or_default_from_path(&path)
}

fn load_or_default_from_path(path: &Path) -> ViewerConfig {
    let Ok(contents) = fs::read_to_string(path) else {
        return ViewerConfig::default();
    };
    toml::from_str(&contents).unwrap_or_else(|_| ViewerConfig::default())
}

pub fn save(cfg: &ViewerConfig) -> anyhow::Result<()> {
    let Some(path) = config_file_path() else {
        return Err(anyhow::anyhow!("no config directory available"));
    };
    save_to_path(cfg, &path)
}

fn save_to_path(cfg: &ViewerConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    let data = toml::to_string_pretty(cfg).context("failed to serialize viewer config")?;
    fs::write(path, data)
        .with_context(|| format!("failed to write viewer config {}", path.display()))?;
    Ok(())
}
