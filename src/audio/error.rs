use crate::audio::host::OsStatus;

/// Errors reported by the device lifecycle operations.
///
/// Host status codes are carried verbatim; the numbers are meaningful only
/// for diagnostics and are never interpreted here.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("could not get current output device")]
    NoDefaultOutput,

    #[error("could not find microphone device")]
    NoMicrophoneAvailable,

    #[error("BlackHole 2ch not found. Install with: brew install blackhole-2ch")]
    LoopbackNotFound,

    #[error("no device with UID '{uid}'")]
    SwitchTargetNotFound { uid: String },

    #[error("failed to create {role} device: OSStatus {status}")]
    DeviceCreationFailed {
        role: &'static str,
        status: OsStatus,
    },

    #[error("failed to switch output: OSStatus {status}")]
    OutputSwitchFailed { status: OsStatus },

    #[error("{0}")]
    TeardownFailed(String),
}
