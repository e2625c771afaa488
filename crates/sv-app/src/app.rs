use std::fmt::Write as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::Result;
use sv_audio::fft::SpectrumAnalyzer;
use sv_audio::queue::BlockConsumer;
use sv_core::block::SpectrumFrame;
use sv_core::color;
use sv_core::config::VizConfig;
use sv_core::traits::{Surface, SurfaceEvent};
use sv_render::fps::FpsCounter;

/// Application state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppState {
    /// Boucle de rendu en cours.
    Running,
    /// Sortie demandée : la boucle se termine au prochain tour.
    Quitting,
}

/// Boucle de rendu : consomme la queue de blocs à cadence fixe sur le
/// thread appelant, transforme, peint. Possède la condition de sortie.
pub struct App<S: Surface> {
    surface: S,
    blocks: BlockConsumer,
    analyzer: SpectrumAnalyzer,
    config: VizConfig,
    /// Flag d'arrêt process (SIGINT), vérifié à chaque tick.
    stop: Arc<AtomicBool>,
    state: AppState,
    fps: FpsCounter,
    /// Dernière frame spectrale, regardée tant que rien de plus frais
    /// n'arrive.
    frame: Option<SpectrumFrame>,
    /// Buffer de magnitudes normalisées, réutilisé chaque frame.
    norm_buf: Vec<f32>,
    /// `true` si la prochaine itération doit repeindre.
    dirty: bool,
    source_label: String,
    status_buf: String,
    dropped_seen: u64,
}

impl<S: Surface> App<S> {
    /// Assemble the render loop around an already-started capture.
    pub fn new(
        surface: S,
        blocks: BlockConsumer,
        analyzer: SpectrumAnalyzer,
        config: VizConfig,
        stop: Arc<AtomicBool>,
        source_label: String,
    ) -> Self {
        Self {
            surface,
            blocks,
            analyzer,
            config,
            stop,
            state: AppState::Running,
            fps: FpsCounter::new(60),
            frame: None,
            norm_buf: Vec::new(),
            dirty: false,
            source_label,
            status_buf: String::new(),
            dropped_seen: 0,
        }
    }

    /// Bloque le thread appelant jusqu'à la sortie.
    ///
    /// # Errors
    /// Returns an error if the surface fails to present or poll.
    pub fn run(&mut self) -> Result<()> {
        let frame_duration =
            Duration::from_secs_f64(1.0 / f64::from(self.config.target_fps.max(1)));
        let mut last_tick = Instant::now();

        loop {
            if self.state == AppState::Quitting {
                break;
            }
            if self.stop.load(Ordering::Relaxed) {
                self.state = AppState::Quitting;
                continue;
            }

            // Limiteur de cadence : en avance → dormir le reste en restant
            // réactif aux événements ; en retard → enchaîner sans rattrapage
            let elapsed = last_tick.elapsed();
            if elapsed < frame_duration {
                if let Some(event) = self.surface.poll_event(frame_duration - elapsed)? {
                    self.handle_event(event);
                }
                continue;
            }
            last_tick = Instant::now();

            // Polling événements non-bloquant
            while let Some(event) = self.surface.poll_event(Duration::ZERO)? {
                self.handle_event(event);
            }
            if self.state == AppState::Quitting {
                continue;
            }

            // Dernier bloc disponible, non-bloquant. Queue vide = tick sans
            // rendu, la dernière frame reste à l'écran.
            if let Some(block) = self.blocks.pop_latest() {
                self.frame = Some(self.analyzer.transform(&block));
                self.dirty = true;
            }

            if self.dirty {
                self.paint()?;
                self.dirty = false;
            }
            self.fps.tick();
            self.report_drops();
        }

        Ok(())
    }

    fn handle_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Close => self.state = AppState::Quitting,
            // La surface a déjà réalloué sa grille ; on force un repaint
            SurfaceEvent::Resize(..) => self.dirty = true,
        }
    }

    fn paint(&mut self) -> Result<()> {
        self.surface.clear();
        if let Some(frame) = self.frame.as_ref() {
            draw_bars(
                &mut self.surface,
                frame,
                &mut self.norm_buf,
                self.config.height_scale,
                self.config.bar_gap,
            );
        }

        let bins = self.frame.as_ref().map_or(0, SpectrumFrame::len);
        self.status_buf.clear();
        let _ = write!(
            self.status_buf,
            " {} · {} bins · {:.0} fps · {} blocs perdus",
            self.source_label,
            bins,
            self.fps.fps(),
            self.blocks.dropped_blocks()
        );
        self.surface.set_status(&self.status_buf);

        self.surface.present()
    }

    /// Pertes de blocs depuis le dernier tick : journalisées, jamais fatales.
    fn report_drops(&mut self) {
        let dropped = self.blocks.dropped_blocks();
        if dropped > self.dropped_seen {
            log::warn!(
                "{} bloc(s) audio perdus (queue pleine)",
                dropped - self.dropped_seen
            );
            self.dropped_seen = dropped;
        }
    }
}

/// Peint une frame spectrale en barres verticales.
///
/// Normalise les magnitudes par le max de la frame (max nul → barres
/// nulles, pas de division), plafonne la hauteur à `height_scale` du
/// viewport, partitionne la largeur uniformément entre les bins
/// (largeur de barre ≥ 1), couleur = gradient déterministe par index.
fn draw_bars<S: Surface>(
    surface: &mut S,
    frame: &SpectrumFrame,
    norm: &mut Vec<f32>,
    height_scale: f32,
    bar_gap: u16,
) {
    let (width, height) = surface.size();
    let count = frame.len();
    if count == 0 || width == 0 || height == 0 {
        return;
    }

    norm.clear();
    norm.extend_from_slice(&frame.mags);
    let max = frame.max_magnitude();
    if max > 0.0 {
        for m in &mut *norm {
            *m /= max;
        }
    }

    let stride = f32::from(width) / count as f32;
    let bar_width = (stride as u16).saturating_sub(bar_gap).max(1);
    for (i, &m) in norm.iter().enumerate() {
        let bar_height = (m * f32::from(height) * height_scale) as u16;
        if bar_height == 0 {
            continue;
        }
        let x = (i as f32 * stride) as u16;
        if x >= width {
            break;
        }
        surface.fill_rect(
            x,
            height - bar_height,
            bar_width,
            bar_height,
            color::bin_gradient(i, count),
        );
    }
}
