use thiserror::Error;

/// Errors originating from the audio module.
#[derive(Error, Debug)]
pub enum AudioError {
    /// No audio input device found at all.
    #[error(
        "aucun périphérique audio d'entrée trouvé. Périphériques détectés : [{available}]. \
         Vérifiez que le serveur audio (PipeWire/PulseAudio) est actif"
    )]
    NoInputDevice {
        /// Enumerated device names, comma-joined (may be empty).
        available: String,
    },

    /// A device was requested by name but none matched.
    #[error(
        "périphérique d'entrée introuvable : \"{requested}\". Disponibles : [{available}]"
    )]
    DeviceNotFound {
        /// The name substring that was requested.
        requested: String,
        /// Enumerated device names, comma-joined.
        available: String,
    },

    /// The device's native sample format has no f32 conversion path.
    #[error("format d'échantillon non supporté : {0}")]
    UnsupportedFormat(String),

    /// Stream negotiation, build, or start failure.
    #[error("erreur de stream audio : {0}")]
    Stream(String),

    /// `start()` called while the capture is already running.
    #[error("capture déjà démarrée")]
    AlreadyStarted,

    /// `start()` called after `stop()` — the state machine is terminal.
    #[error("capture déjà arrêtée")]
    AlreadyStopped,
}
