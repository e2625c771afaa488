/// Un bloc d'échantillons mono capturé en un seul callback.
///
/// Créé une fois par invocation du callback de capture (copie du premier
/// canal), immuable ensuite. La propriété passe à la queue, puis au
/// consommateur qui le jette à la fin de la frame de rendu.
///
/// # Example
/// ```
/// use sv_core::block::AudioBlock;
/// let block = AudioBlock::from_samples(vec![0.0; 1024]);
/// assert_eq!(block.len(), 1024);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AudioBlock {
    samples: Vec<f32>,
}

impl AudioBlock {
    /// Wrap an owned sample buffer into a block.
    #[must_use]
    pub fn from_samples(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    /// Number of samples in the block.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// `true` if the block holds no samples.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Read access to the samples.
    #[inline]
    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

/// Spectre de magnitudes dérivé d'un seul `AudioBlock`.
///
/// Deux séquences de même longueur `floor(N/2)` : les fréquences des bins
/// (croissantes, en Hz) et les magnitudes FFT brutes (non normalisées —
/// la normalisation est une affaire de rendu, pas de transformée).
/// Aucun état conservé d'une frame à l'autre.
///
/// # Example
/// ```
/// use sv_core::block::SpectrumFrame;
/// let frame = SpectrumFrame::new(vec![0.0, 43.0], vec![4.0, 0.0]);
/// assert_eq!(frame.len(), 2);
/// assert!((frame.max_magnitude() - 4.0).abs() < f32::EPSILON);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpectrumFrame {
    /// Fréquences des bins en Hz, croissantes.
    pub bins: Vec<f32>,
    /// Magnitudes FFT brutes, non négatives, même longueur que `bins`.
    pub mags: Vec<f32>,
}

impl SpectrumFrame {
    /// Build a frame from matching bin/magnitude sequences.
    #[must_use]
    pub fn new(bins: Vec<f32>, mags: Vec<f32>) -> Self {
        debug_assert_eq!(bins.len(), mags.len(), "bins/mags length mismatch");
        Self { bins, mags }
    }

    /// The empty frame (zero-length input block).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of frequency bins.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.mags.len()
    }

    /// `true` if the frame has no bins.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mags.is_empty()
    }

    /// Largest magnitude of the frame, `0.0` when empty.
    ///
    /// # Example
    /// ```
    /// use sv_core::block::SpectrumFrame;
    /// assert_eq!(SpectrumFrame::empty().max_magnitude(), 0.0);
    /// ```
    #[must_use]
    pub fn max_magnitude(&self) -> f32 {
        self.mags.iter().copied().fold(0.0f32, f32::max)
    }
}
