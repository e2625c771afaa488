use sv_core::color::Rgb;

/// Grille de pixels pré-allouée, réutilisée chaque frame.
///
/// Stockage row-major, un `Rgb` par pixel, noir = fond. Les rectangles
/// hors limites sont clippés, jamais une erreur.
///
/// # Example
/// ```
/// use sv_render::grid::PixelGrid;
/// let mut grid = PixelGrid::new(80, 48);
/// grid.fill_rect(0, 40, 2, 8, (255, 0, 255));
/// assert_eq!(grid.get(0, 40), (255, 0, 255));
/// assert_eq!(grid.get(5, 5), (0, 0, 0));
/// ```
pub struct PixelGrid {
    pixels: Vec<Rgb>,
    width: u16,
    height: u16,
}

impl PixelGrid {
    /// Crée une grille aux dimensions données, fond noir.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            pixels: vec![(0, 0, 0); usize::from(width) * usize::from(height)],
            width,
            height,
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Réalloue aux nouvelles dimensions (resize terminal — rare, OK
    /// d'allouer ici).
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels
            .resize(usize::from(width) * usize::from(height), (0, 0, 0));
    }

    /// Remet tous les pixels au noir. Zéro allocation.
    pub fn clear(&mut self) {
        self.pixels.fill((0, 0, 0));
    }

    /// Pixel (x, y). Hors limites → noir.
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Rgb {
        if x >= self.width || y >= self.height {
            return (0, 0, 0);
        }
        self.pixels[usize::from(y) * usize::from(self.width) + usize::from(x)]
    }

    /// Remplit un rectangle, clippé aux bords de la grille.
    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: Rgb) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        for py in y..y_end {
            let row = usize::from(py) * usize::from(self.width);
            for px in x..x_end {
                self.pixels[row + usize::from(px)] = color;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_black() {
        let grid = PixelGrid::new(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(grid.get(x, y), (0, 0, 0));
            }
        }
    }

    #[test]
    fn fill_rect_paints_exact_area() {
        let mut grid = PixelGrid::new(8, 8);
        grid.fill_rect(2, 3, 3, 2, (10, 20, 30));
        assert_eq!(grid.get(2, 3), (10, 20, 30));
        assert_eq!(grid.get(4, 4), (10, 20, 30));
        assert_eq!(grid.get(1, 3), (0, 0, 0));
        assert_eq!(grid.get(5, 3), (0, 0, 0));
        assert_eq!(grid.get(2, 5), (0, 0, 0));
    }

    #[test]
    fn fill_rect_clips_at_edges() {
        let mut grid = PixelGrid::new(4, 4);
        // déborde à droite et en bas : clippé, pas de panique
        grid.fill_rect(3, 3, 10, 10, (255, 255, 255));
        assert_eq!(grid.get(3, 3), (255, 255, 255));
        // entièrement hors grille
        grid.fill_rect(100, 100, 5, 5, (255, 0, 0));
    }

    #[test]
    fn clear_resets_to_black() {
        let mut grid = PixelGrid::new(4, 4);
        grid.fill_rect(0, 0, 4, 4, (1, 2, 3));
        grid.clear();
        assert_eq!(grid.get(2, 2), (0, 0, 0));
    }

    #[test]
    fn resize_changes_dimensions_and_clears() {
        let mut grid = PixelGrid::new(2, 2);
        grid.fill_rect(0, 0, 2, 2, (9, 9, 9));
        grid.resize(6, 3);
        assert_eq!(grid.width(), 6);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.get(0, 0), (0, 0, 0));
    }

    #[test]
    fn out_of_bounds_get_is_black() {
        let grid = PixelGrid::new(2, 2);
        assert_eq!(grid.get(50, 0), (0, 0, 0));
        assert_eq!(grid.get(0, 50), (0, 0, 0));
    }
}
