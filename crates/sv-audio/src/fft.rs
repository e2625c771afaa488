use std::sync::Arc;

use realfft::{RealFftPlanner, RealToComplex};
use sv_core::block::{AudioBlock, SpectrumFrame};

/// Analyseur de spectre : bloc temporel → magnitudes fréquentielles.
///
/// Plan realfft et buffers pré-alloués pour un hot path sans allocation
/// superflue. Les magnitudes sont les `|c|` FFT **bruts** — pas de fenêtre,
/// pas de division par N. La normalisation appartient au rendu, ce qui
/// garde la transformée exacte : un bloc DC `[1,1,1,1]` donne bin0 = 4.
///
/// # Example
/// ```
/// use sv_audio::fft::SpectrumAnalyzer;
/// use sv_core::block::AudioBlock;
///
/// let mut analyzer = SpectrumAnalyzer::new(1024, 44_100);
/// let frame = analyzer.transform(&AudioBlock::from_samples(vec![0.0; 1024]));
/// assert_eq!(frame.len(), 512); // N/2
/// ```
pub struct SpectrumAnalyzer {
    planner: RealFftPlanner<f32>,
    plan: Arc<dyn RealToComplex<f32>>,
    block_size: usize,
    sample_rate: u32,
    input_buf: Vec<f32>,
    spectrum_buf: Vec<realfft::num_complex::Complex<f32>>,
    scratch: Vec<realfft::num_complex::Complex<f32>>,
    /// Fréquences des bins pré-calculées pour la taille de plan courante.
    bins: Vec<f32>,
}

impl SpectrumAnalyzer {
    /// Create an analyzer planned for the given block size.
    ///
    /// # Panics
    /// Panics if `block_size < 2`.
    #[must_use]
    pub fn new(block_size: usize, sample_rate: u32) -> Self {
        assert!(block_size >= 2, "block size must be at least 2");

        let mut planner = RealFftPlanner::<f32>::new();
        let plan = planner.plan_fft_forward(block_size);

        let input_buf = plan.make_input_vec();
        let spectrum_buf = plan.make_output_vec();
        let scratch = plan.make_scratch_vec();

        let mut analyzer = Self {
            planner,
            plan,
            block_size,
            sample_rate,
            input_buf,
            spectrum_buf,
            scratch,
            bins: Vec::new(),
        };
        analyzer.compute_bins();
        analyzer
    }

    /// Transforme un bloc en frame spectrale.
    ///
    /// Pur et déterministe : même bloc, même frame. Un bloc de moins de
    /// deux échantillons n'a pas de spectre et donne la frame vide. Les
    /// blocs d'une autre longueur que celle planifiée sont acceptés (le
    /// plan est refait, le planner met en cache).
    ///
    /// # Example
    /// ```
    /// use sv_audio::fft::SpectrumAnalyzer;
    /// use sv_core::block::AudioBlock;
    ///
    /// let mut analyzer = SpectrumAnalyzer::new(4, 4);
    /// let frame = analyzer.transform(&AudioBlock::from_samples(vec![1.0; 4]));
    /// assert!((frame.mags[0] - 4.0).abs() < 1e-4); // signal DC pur
    /// ```
    pub fn transform(&mut self, block: &AudioBlock) -> SpectrumFrame {
        let n = block.len();
        if n < 2 {
            return SpectrumFrame::empty();
        }
        if n != self.block_size {
            self.replan(n);
        }

        self.input_buf.copy_from_slice(block.samples());

        if self
            .plan
            .process_with_scratch(&mut self.input_buf, &mut self.spectrum_buf, &mut self.scratch)
            .is_err()
        {
            return SpectrumFrame::empty();
        }

        // Entrée réelle → spectre conjugué-symétrique : seule la première
        // moitié des bins est significative.
        let half = n / 2;
        let mags: Vec<f32> = self.spectrum_buf[..half]
            .iter()
            .map(|c| (c.re * c.re + c.im * c.im).sqrt())
            .collect();

        SpectrumFrame::new(self.bins[..half].to_vec(), mags)
    }

    /// FFT block size currently planned.
    #[must_use]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Sample rate used for bin frequencies.
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Re-plan for a new block length (rare, the planner caches plans).
    fn replan(&mut self, n: usize) {
        self.plan = self.planner.plan_fft_forward(n);
        self.input_buf = self.plan.make_input_vec();
        self.spectrum_buf = self.plan.make_output_vec();
        self.scratch = self.plan.make_scratch_vec();
        self.block_size = n;
        self.compute_bins();
    }

    /// bin i → i · rate / N, croissant de 0 au voisinage de Nyquist.
    fn compute_bins(&mut self) {
        let n = self.block_size;
        self.bins = (0..n / 2)
            .map(|i| i as f32 * self.sample_rate as f32 / n as f32)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zeros(n: usize) -> AudioBlock {
        AudioBlock::from_samples(vec![0.0; n])
    }

    #[test]
    fn zero_block_gives_half_length_zero_magnitudes() {
        for n in [4usize, 16, 256, 1024] {
            let mut analyzer = SpectrumAnalyzer::new(n, 44_100);
            let frame = analyzer.transform(&zeros(n));
            assert_eq!(frame.len(), n / 2);
            assert!(frame.mags.iter().all(|&m| m.abs() < 1e-6));
        }
    }

    #[test]
    fn dc_block_concentrates_in_bin_zero() {
        let mut analyzer = SpectrumAnalyzer::new(4, 4);
        let frame = analyzer.transform(&AudioBlock::from_samples(vec![1.0, 1.0, 1.0, 1.0]));
        assert_eq!(frame.len(), 2);
        assert!((frame.mags[0] - 4.0).abs() < 1e-4);
        assert!(frame.mags[1].abs() < 1e-4);
    }

    #[test]
    fn sine_peaks_at_its_own_bin() {
        // 64 échantillons à 64 Hz : le bin k vaut exactement k Hz
        let n = 64usize;
        let target_bin = 8usize;
        let samples: Vec<f32> = (0..n)
            .map(|i| (std::f32::consts::TAU * target_bin as f32 * i as f32 / n as f32).sin())
            .collect();
        let mut analyzer = SpectrumAnalyzer::new(n, 64);
        let frame = analyzer.transform(&AudioBlock::from_samples(samples));

        let peak = frame
            .mags
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, target_bin);
        assert!((frame.bins[peak] - 8.0).abs() < f32::EPSILON);
        // magnitude d'un sinus pile sur un bin : N/2
        assert!((frame.mags[peak] - 32.0).abs() < 1e-2);
    }

    #[test]
    fn output_length_is_floor_half_for_any_length() {
        let mut analyzer = SpectrumAnalyzer::new(16, 48_000);
        for n in [2usize, 3, 5, 7, 16, 17, 100, 1023] {
            let frame = analyzer.transform(&zeros(n));
            assert_eq!(frame.len(), n / 2, "length {n}");
        }
    }

    #[test]
    fn empty_and_single_sample_blocks_give_empty_frame() {
        let mut analyzer = SpectrumAnalyzer::new(16, 48_000);
        assert!(analyzer.transform(&zeros(0)).is_empty());
        assert!(analyzer.transform(&zeros(1)).is_empty());
    }

    #[test]
    fn bin_frequencies_follow_rate_over_n() {
        let mut analyzer = SpectrumAnalyzer::new(8, 8_000);
        let frame = analyzer.transform(&zeros(8));
        let expected = [0.0, 1000.0, 2000.0, 3000.0];
        assert_eq!(frame.bins.len(), 4);
        for (bin, want) in frame.bins.iter().zip(expected) {
            assert!((bin - want).abs() < f32::EPSILON);
        }
        // croissantes
        assert!(frame.bins.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn transform_is_deterministic() {
        let samples: Vec<f32> = (0..128).map(|i| (i as f32 * 0.37).sin()).collect();
        let block = AudioBlock::from_samples(samples);
        let mut analyzer = SpectrumAnalyzer::new(128, 44_100);
        let a = analyzer.transform(&block);
        let b = analyzer.transform(&block);
        assert_eq!(a, b);
    }
}
