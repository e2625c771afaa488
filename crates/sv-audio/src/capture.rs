use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use sv_core::block::AudioBlock;
use sv_core::config::VizConfig;

use crate::error::AudioError;
use crate::queue::{BlockConsumer, BlockProducer, block_queue};

/// Capture parameters, extracted from the app config at construction time.
#[derive(Clone, Debug)]
pub struct CaptureConfig {
    /// Input device name substring. None = host default device.
    pub device: Option<String>,
    /// Requested sample rate. None = device default.
    pub sample_rate: Option<u32>,
    /// Samples per block handed to the queue.
    pub block_size: usize,
    /// Block queue capacity.
    pub queue_capacity: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device: None,
            sample_rate: None,
            block_size: 1024,
            queue_capacity: 32,
        }
    }
}

impl From<&VizConfig> for CaptureConfig {
    fn from(config: &VizConfig) -> Self {
        Self {
            device: config.device.clone(),
            sample_rate: config.sample_rate,
            block_size: config.block_size,
            queue_capacity: config.queue_capacity,
        }
    }
}

/// État du cycle de vie de la capture. `Stopped` est terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CaptureState {
    Created,
    Running,
    Stopped,
}

/// Audio capture via cpal.
///
/// One input stream; the backend invokes the callback on its own
/// real-time thread, once per buffer. The callback only copies channel 0,
/// slices fixed-size blocks, and pushes them onto the lock-free queue —
/// it never blocks and never touches the render thread's state.
///
/// CONTRAT : le backend sérialise les invocations du callback (jamais
/// concurrent avec lui-même), mais le callback tourne en parallèle du
/// consommateur — d'où le ring SPSC comme seul état partagé.
///
/// Lifecycle: `new()` → Created, `start()` → Running, `stop()` → Stopped
/// (terminal). `stop()` is idempotent and a no-op before `start()`;
/// `start()` from Running or Stopped is an error.
///
/// # Example
/// ```no_run
/// use sv_audio::capture::{AudioCapture, CaptureConfig};
/// let mut capture = AudioCapture::new(CaptureConfig::default());
/// let blocks = capture.start().unwrap();
/// // ... consume blocks ...
/// capture.stop();
/// ```
pub struct AudioCapture {
    config: CaptureConfig,
    state: CaptureState,
    stream: Option<cpal::Stream>,
    sample_rate: u32,
    device_name: String,
}

impl AudioCapture {
    /// Create a capture in the Created state. Does not touch any device.
    #[must_use]
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            state: CaptureState::Created,
            stream: None,
            sample_rate: 0,
            device_name: String::new(),
        }
    }

    /// Open the input stream and start producing blocks.
    ///
    /// Device selection, rate negotiation, and stream build happen here;
    /// any failure is fatal to startup and carries the enumerated device
    /// list for diagnostics. Never retried internally.
    ///
    /// # Errors
    /// Returns an error if no device matches, the stream cannot be built
    /// or started, or the capture was already started or stopped.
    pub fn start(&mut self) -> Result<BlockConsumer, AudioError> {
        match self.state {
            CaptureState::Created => {}
            CaptureState::Running => return Err(AudioError::AlreadyStarted),
            CaptureState::Stopped => return Err(AudioError::AlreadyStopped),
        }

        let host = cpal::default_host();
        let device = select_device(&host, self.config.device.as_deref())?;
        let supported = device
            .default_input_config()
            .map_err(|e| AudioError::Stream(e.to_string()))?;

        let channels = usize::from(supported.channels());
        let sample_rate = self.config.sample_rate.unwrap_or(supported.sample_rate().0);
        let sample_format = supported.sample_format();

        let stream_config = cpal::StreamConfig {
            channels: supported.channels(),
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let (producer, consumer) = block_queue(self.config.queue_capacity);
        let block_size = self.config.block_size;

        let stream = match sample_format {
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &stream_config, channels, block_size, producer)
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &stream_config, channels, block_size, producer)
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &stream_config, channels, block_size, producer)
            }
            other => return Err(AudioError::UnsupportedFormat(format!("{other:?}"))),
        }?;

        stream.play().map_err(|e| AudioError::Stream(e.to_string()))?;

        self.device_name = device.name().unwrap_or_else(|_| String::from("inconnu"));
        self.sample_rate = sample_rate;
        self.stream = Some(stream);
        self.state = CaptureState::Running;
        log::info!(
            "Capture démarrée : {} @ {} Hz, blocs de {} échantillons",
            self.device_name,
            sample_rate,
            block_size
        );
        Ok(consumer)
    }

    /// Stop the stream and release the device.
    ///
    /// Idempotent : no-op avant `start()`, sans effet si déjà arrêté.
    /// Plus aucun callback ne sera invoqué après le retour (le stream est
    /// mis en pause puis détruit).
    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                // Erreur d'arrêt : journalisée, n'empêche pas la sortie
                log::warn!("Erreur à l'arrêt du stream : {e}");
            }
            drop(stream);
            log::info!("Capture arrêtée : {}", self.device_name);
        }
        self.state = CaptureState::Stopped;
    }

    /// `true` while the stream is producing blocks.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == CaptureState::Running
    }

    /// Negotiated sample rate (0 before `start()`).
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Name of the opened device (empty before `start()`).
    #[must_use]
    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

/// Enumerate input device names, for `--list-devices` and diagnostics.
///
/// # Errors
/// Returns an error if the host cannot enumerate devices.
pub fn list_input_devices() -> Result<Vec<String>, AudioError> {
    let host = cpal::default_host();
    let devices = host
        .input_devices()
        .map_err(|e| AudioError::Stream(e.to_string()))?;
    Ok(devices.filter_map(|d| d.name().ok()).collect())
}

/// Pick the input device: by name substring, else host default.
fn select_device(host: &cpal::Host, requested: Option<&str>) -> Result<cpal::Device, AudioError> {
    match requested {
        Some(name) => {
            let needle = name.to_lowercase();
            let mut available = Vec::new();
            let devices = host
                .input_devices()
                .map_err(|e| AudioError::Stream(e.to_string()))?;
            for device in devices {
                let dev_name = device.name().unwrap_or_default();
                if dev_name.to_lowercase().contains(&needle) {
                    return Ok(device);
                }
                available.push(dev_name);
            }
            Err(AudioError::DeviceNotFound {
                requested: name.to_string(),
                available: available.join(", "),
            })
        }
        None => host.default_input_device().ok_or_else(|| {
            let available = list_input_devices().map(|v| v.join(", ")).unwrap_or_default();
            AudioError::NoInputDevice { available }
        }),
    }
}

/// Build the input stream for the device's native sample type.
fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    block_size: usize,
    mut producer: BlockProducer,
) -> Result<cpal::Stream, AudioError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let mut pending: Vec<f32> = Vec::with_capacity(block_size * 2);
    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                // Premier canal uniquement, converti en f32
                for frame in data.chunks(channels.max(1)) {
                    pending.push(f32::from_sample(frame[0]));
                }
                // Découpe en blocs de taille fixe ; push jamais bloquant
                // (queue pleine → bloc jeté + compteur, voir queue.rs)
                while pending.len() >= block_size {
                    let block: Vec<f32> = pending.drain(..block_size).collect();
                    let _ = producer.push(AudioBlock::from_samples(block));
                }
            },
            |err| {
                // Faute transitoire (under/overrun, périphérique occupé) :
                // journalisée, la capture continue
                log::warn!("Statut du stream de capture : {err}");
            },
            None,
        )
        .map_err(|e| AudioError::Stream(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_before_start_is_a_noop() {
        let mut capture = AudioCapture::new(CaptureConfig::default());
        capture.stop();
        assert!(!capture.is_running());
        // stop est idempotent
        capture.stop();
        assert!(!capture.is_running());
    }

    #[test]
    fn start_after_stop_is_rejected() {
        let mut capture = AudioCapture::new(CaptureConfig::default());
        capture.stop();
        assert!(matches!(capture.start(), Err(AudioError::AlreadyStopped)));
    }

    #[test]
    fn capture_config_maps_from_viz_config() {
        let viz = VizConfig {
            device: Some(String::from("pipewire")),
            sample_rate: Some(48_000),
            block_size: 2048,
            queue_capacity: 16,
            ..VizConfig::default()
        };
        let capture = CaptureConfig::from(&viz);
        assert_eq!(capture.device.as_deref(), Some("pipewire"));
        assert_eq!(capture.sample_rate, Some(48_000));
        assert_eq!(capture.block_size, 2048);
        assert_eq!(capture.queue_capacity, 16);
    }

    #[test]
    #[ignore = "nécessite un périphérique d'entrée audio"]
    fn start_then_stop_ceases_block_production() {
        let mut capture = AudioCapture::new(CaptureConfig::default());
        let mut blocks = capture.start().unwrap();
        assert!(capture.is_running());
        std::thread::sleep(std::time::Duration::from_millis(200));
        capture.stop();
        // vider tout ce qui a été produit avant l'arrêt
        while blocks.pop().is_some() {}
        std::thread::sleep(std::time::Duration::from_millis(200));
        assert!(
            blocks.pop().is_none(),
            "des blocs ont été produits après stop()"
        );
    }
}
