use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use clap::Parser;
use sv_audio::capture::{AudioCapture, CaptureConfig};
use sv_audio::fft::SpectrumAnalyzer;
use sv_core::config::VizConfig;
use sv_render::surface::TerminalSurface;

pub mod app;
pub mod cli;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Lister les périphériques si demandé
    if cli.list_devices {
        let devices = sv_audio::capture::list_input_devices()
            .context("Impossible d'énumérer les périphériques d'entrée")?;
        if devices.is_empty() {
            println!("Aucun périphérique d'entrée détecté.");
        } else {
            for name in devices {
                println!("{name}");
            }
        }
        return Ok(());
    }

    // 4. Charger la config, appliquer les overrides CLI
    let mut config = resolve_config(&cli)?;
    cli.apply_overrides(&mut config);
    config.clamp_all();

    // 5. Démarrer la capture. Erreur fatale si le périphérique ne s'ouvre
    // pas : le diagnostic porte la liste des périphériques, sortie non-zéro.
    let mut capture = AudioCapture::new(CaptureConfig::from(&config));
    let blocks = capture
        .start()
        .context("Impossible de démarrer la capture audio")?;

    // 6. Flag d'arrêt partagé (SIGINT), vérifié à chaque tick de rendu
    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || stop.store(true, Ordering::Relaxed))
            .context("Impossible d'installer le handler SIGINT")?;
    }

    // 7. Initialiser le terminal ratatui et la surface
    let terminal = ratatui::init();
    let surface = match TerminalSurface::new(terminal) {
        Ok(surface) => surface,
        Err(e) => {
            ratatui::restore();
            capture.stop();
            return Err(e);
        }
    };

    // 8. Boucle de rendu (bloque jusqu'à la sortie)
    let analyzer = SpectrumAnalyzer::new(config.block_size, capture.sample_rate());
    let label = format!("{} @ {} Hz", capture.device_name(), capture.sample_rate());
    let mut app = app::App::new(surface, blocks, analyzer, config, stop, label);
    let result = app.run();

    // 9. Restaurer le terminal (TOUJOURS), puis couper la source — la
    // boucle rend la main avant l'arrêt de la capture
    ratatui::restore();
    capture.stop();

    result
}

/// Resolve config: file if present, defaults otherwise.
fn resolve_config(cli: &cli::Cli) -> Result<VizConfig> {
    if cli.config.exists() {
        sv_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(VizConfig::default())
    }
}
