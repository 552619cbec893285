//! Virtual audio device helper.
//!
//! Enumerates host audio endpoints and orchestrates the lifecycle of the
//! multi-output / aggregate-capture device pair used to route meeting audio
//! through a loopback capture path.

pub mod audio;
pub mod commands;

// Re-export the core API for tests and external use
pub use audio::{
    AudioHost, DefaultOutputRegister, DeviceLifecycle, Endpoint, EndpointDirectory, MockAudioHost,
    OsStatus, ProvisioningResult, SetupError, VirtualDeviceRegistry, VirtualDeviceSpec,
};
