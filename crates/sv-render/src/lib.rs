/// Terminal rendering backend for specSCII.
///
/// Provides the half-block pixel grid, the ratatui `Surface`
/// implementation, and FPS tracking.
pub mod fps;
pub mod grid;
pub mod surface;

pub use fps::FpsCounter;
pub use grid::PixelGrid;
pub use surface::TerminalSurface;
