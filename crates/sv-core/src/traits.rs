use std::time::Duration;

use anyhow::Result;

use crate::color::Rgb;

/// Événement remonté par la surface de rendu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// L'utilisateur demande la fermeture (touche, fermeture de fenêtre).
    Close,
    /// La surface a changé de taille (nouvelles dimensions en pixels).
    Resize(u16, u16),
}

/// Surface de rendu abstraite : le cœur ne dépend que de ce jeu de
/// capacités, jamais d'un backend graphique particulier.
///
/// Implémenté par : `TerminalSurface` (sv-render). Les tests utilisent un
/// mock qui enregistre les rectangles dessinés.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use sv_core::traits::{Surface, SurfaceEvent};
/// use sv_core::color::Rgb;
///
/// struct NullSurface;
/// impl Surface for NullSurface {
///     fn size(&self) -> (u16, u16) { (0, 0) }
///     fn clear(&mut self) {}
///     fn fill_rect(&mut self, _x: u16, _y: u16, _w: u16, _h: u16, _color: Rgb) {}
///     fn present(&mut self) -> anyhow::Result<()> { Ok(()) }
///     fn poll_event(&mut self, _wait: Duration) -> anyhow::Result<Option<SurfaceEvent>> {
///         Ok(None)
///     }
/// }
/// ```
pub trait Surface {
    /// Dimensions du viewport en pixels (largeur, hauteur).
    fn size(&self) -> (u16, u16);

    /// Efface la frame courante (fond noir).
    fn clear(&mut self);

    /// Remplit un rectangle. Les coordonnées hors viewport sont clippées,
    /// jamais une erreur.
    fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: Rgb);

    /// Ligne de statut optionnelle. Indication de présentation pure :
    /// l'implémentation par défaut l'ignore.
    fn set_status(&mut self, _status: &str) {}

    /// Présente la frame dessinée depuis le dernier `clear`.
    ///
    /// # Errors
    /// Returns an error if the backend fails to flush the frame.
    fn present(&mut self) -> Result<()>;

    /// Attend un événement pendant au plus `wait`, puis retourne.
    ///
    /// Ne bloque JAMAIS au-delà de `wait` — `Duration::ZERO` fait un
    /// sondage pur. `None` signifie "rien à signaler".
    ///
    /// # Errors
    /// Returns an error if the backend event queue fails.
    fn poll_event(&mut self, wait: Duration) -> Result<Option<SurfaceEvent>>;
}
