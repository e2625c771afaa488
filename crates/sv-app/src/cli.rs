use std::path::PathBuf;

use clap::Parser;
use sv_core::config::VizConfig;

/// specSCII — Visualiseur de spectre audio temps réel pour le terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Périphérique d'entrée (sous-chaîne du nom). Défaut : périphérique système.
    #[arg(long)]
    pub device: Option<String>,

    /// Sample rate demandé en Hz. Défaut : celui du périphérique.
    #[arg(long)]
    pub sample_rate: Option<u32>,

    /// Taille de bloc de capture en échantillons.
    #[arg(long)]
    pub block_size: Option<usize>,

    /// FPS cible du rendu.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Lister les périphériques d'entrée disponibles et quitter.
    #[arg(long, default_value_t = false)]
    pub list_devices: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Les options CLI priment sur le fichier de config.
    pub fn apply_overrides(&self, config: &mut VizConfig) {
        if let Some(ref device) = self.device {
            config.device = Some(device.clone());
        }
        if let Some(rate) = self.sample_rate {
            config.sample_rate = Some(rate);
        }
        if let Some(size) = self.block_size {
            config.block_size = size;
        }
        if let Some(fps) = self.fps {
            config.target_fps = fps;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_take_priority() {
        let cli = Cli::parse_from([
            "specscii",
            "--device",
            "usb",
            "--fps",
            "30",
            "--block-size",
            "512",
        ]);
        let mut config = VizConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.device.as_deref(), Some("usb"));
        assert_eq!(config.target_fps, 30);
        assert_eq!(config.block_size, 512);
        assert!(config.sample_rate.is_none());
    }

    #[test]
    fn no_flags_leave_config_untouched() {
        let cli = Cli::parse_from(["specscii"]);
        let mut config = VizConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.block_size, 1024);
        assert_eq!(config.target_fps, 60);
        assert!(!cli.list_devices);
    }
}
