use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration complète du visualiseur.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine ;
/// l'état process-wide n'existe pas, tout passe par cette structure à la
/// construction.
///
/// # Example
/// ```
/// use sv_core::config::VizConfig;
/// let config = VizConfig::default();
/// assert_eq!(config.block_size, 1024);
/// assert_eq!(config.target_fps, 60);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct VizConfig {
    // === Capture ===
    /// Sous-chaîne du nom du périphérique d'entrée. None = défaut système.
    pub device: Option<String>,
    /// Sample rate demandé en Hz. None = celui du périphérique.
    pub sample_rate: Option<u32>,
    /// Échantillons par bloc de capture.
    pub block_size: usize,
    /// Capacité de la queue de blocs (blocs, pas échantillons).
    pub queue_capacity: usize,

    // === Rendu ===
    /// FPS cible de la boucle de rendu.
    pub target_fps: u32,
    /// Fraction de la hauteur du viewport utilisable par les barres.
    pub height_scale: f32,
    /// Colonnes de pixels laissées vides entre deux barres.
    pub bar_gap: u16,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            device: None,
            sample_rate: None,
            block_size: 1024,
            queue_capacity: 32,
            target_fps: 60,
            height_scale: 0.8,
            bar_gap: 1,
        }
    }
}

impl VizConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization and CLI overrides.
    pub fn clamp_all(&mut self) {
        self.block_size = self.block_size.clamp(64, 16_384);
        self.queue_capacity = self.queue_capacity.clamp(2, 256);
        self.target_fps = self.target_fps.clamp(15, 240);
        self.height_scale = self.height_scale.clamp(0.1, 1.0);
        self.bar_gap = self.bar_gap.min(4);
        if let Some(rate) = self.sample_rate {
            self.sample_rate = Some(rate.clamp(8_000, 384_000));
        }
    }
}

/// Structure TOML intermédiaire, toutes sections et champs optionnels.
#[derive(Deserialize)]
struct ConfigFile {
    audio: Option<AudioSection>,
    render: Option<RenderSection>,
}

#[derive(Deserialize)]
struct AudioSection {
    device: Option<String>,
    sample_rate: Option<u32>,
    block_size: Option<usize>,
    queue_capacity: Option<usize>,
}

#[derive(Deserialize)]
struct RenderSection {
    target_fps: Option<u32>,
    height_scale: Option<f32>,
    bar_gap: Option<u16>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use sv_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<VizConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;

    let file: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))?;

    let mut config = VizConfig::default();

    if let Some(a) = file.audio {
        if let Some(v) = a.device {
            config.device = Some(v);
        }
        if let Some(v) = a.sample_rate {
            config.sample_rate = Some(v);
        }
        if let Some(v) = a.block_size {
            config.block_size = v;
        }
        if let Some(v) = a.queue_capacity {
            config.queue_capacity = v;
        }
    }

    if let Some(r) = file.render {
        if let Some(v) = r.target_fps {
            config.target_fps = v;
        }
        if let Some(v) = r.height_scale {
            config.height_scale = v;
        }
        if let Some(v) = r.bar_gap {
            config.bar_gap = v;
        }
    }

    config.clamp_all();
    log::debug!("Config chargée depuis {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = VizConfig::default();
        assert_eq!(config.block_size, 1024);
        assert_eq!(config.queue_capacity, 32);
        assert_eq!(config.target_fps, 60);
        assert!((config.height_scale - 0.8).abs() < f32::EPSILON);
        assert!(config.device.is_none());
        assert!(config.sample_rate.is_none());
    }

    #[test]
    fn clamp_all_bounds_every_field() {
        let mut config = VizConfig {
            device: None,
            sample_rate: Some(1),
            block_size: 7,
            queue_capacity: 100_000,
            target_fps: 1000,
            height_scale: 9.0,
            bar_gap: 200,
        };
        config.clamp_all();
        assert_eq!(config.block_size, 64);
        assert_eq!(config.queue_capacity, 256);
        assert_eq!(config.target_fps, 240);
        assert!((config.height_scale - 1.0).abs() < f32::EPSILON);
        assert_eq!(config.bar_gap, 4);
        assert_eq!(config.sample_rate, Some(8_000));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let toml_str = "[render]\ntarget_fps = 30\n";
        let file: ConfigFile = toml::from_str(toml_str).unwrap();
        let mut config = VizConfig::default();
        if let Some(r) = file.render
            && let Some(v) = r.target_fps
        {
            config.target_fps = v;
        }
        assert_eq!(config.target_fps, 30);
        assert_eq!(config.block_size, 1024);
    }

    #[test]
    fn full_toml_overrides() {
        let toml_str = r#"
[audio]
device = "pipewire"
sample_rate = 48000
block_size = 2048
queue_capacity = 16

[render]
target_fps = 30
height_scale = 0.5
bar_gap = 0
"#;
        let file: ConfigFile = toml::from_str(toml_str).unwrap();
        let a = file.audio.unwrap();
        let r = file.render.unwrap();
        assert_eq!(a.device.as_deref(), Some("pipewire"));
        assert_eq!(a.sample_rate, Some(48_000));
        assert_eq!(a.block_size, Some(2048));
        assert_eq!(a.queue_capacity, Some(16));
        assert_eq!(r.target_fps, Some(30));
        assert_eq!(r.height_scale, Some(0.5));
        assert_eq!(r.bar_gap, Some(0));
    }
}
