//! Host audio gateway.
//!
//! Everything the helper knows about global host state comes through the
//! [`AudioHost`] trait: the device table, per-device metadata, the
//! default-output pointer, and aggregate device creation/destruction.
//! Every call is a single blocking round trip and nothing is cached behind
//! the trait, so callers always observe the host's current state.

#[cfg(target_os = "macos")]
mod core_audio_bindings;
#[cfg(target_os = "macos")]
pub mod coreaudio;
pub mod mock;

use crate::audio::types::{DeviceId, StreamDirection, VirtualDeviceSpec};

/// Raw status code returned by the host. Opaque: embedded in diagnostics,
/// never interpreted.
pub type OsStatus = i32;

/// Access to the host's global audio state.
pub trait AudioHost {
    /// All device handles currently known to the host, in host order.
    /// Empty when the enumeration itself fails.
    fn device_ids(&self) -> Vec<DeviceId>;

    /// Stable string identity of a device, when resolvable.
    fn device_uid(&self, id: DeviceId) -> Option<String>;

    /// Display name of a device, when resolvable. Not unique.
    fn device_name(&self, id: DeviceId) -> Option<String>;

    /// Whether the device has any stream in the given direction.
    fn has_streams(&self, id: DeviceId, direction: StreamDirection) -> bool;

    /// The system default output device, when one is set.
    fn default_output_device(&self) -> Option<DeviceId>;

    /// Repoint the system default output. One property write; the host's
    /// acknowledgement decides success.
    fn set_default_output_device(&self, id: DeviceId) -> Result<(), OsStatus>;

    /// Submit a declarative spec to the host's aggregate-device facility.
    fn create_aggregate_device(&self, spec: &VirtualDeviceSpec) -> Result<DeviceId, OsStatus>;

    /// Tear down a previously created aggregate device.
    fn destroy_aggregate_device(&self, id: DeviceId) -> Result<(), OsStatus>;
}

#[cfg(target_os = "macos")]
pub use coreaudio::CoreAudioHost;
pub use mock::MockAudioHost;

/// The host implementation for the current platform.
#[cfg(target_os = "macos")]
pub fn platform_host() -> anyhow::Result<CoreAudioHost> {
    Ok(CoreAudioHost::new())
}

/// The host implementation for the current platform.
///
/// Virtual device topology is a CoreAudio facility; there is no backend to
/// construct elsewhere.
#[cfg(not(target_os = "macos"))]
pub fn platform_host() -> anyhow::Result<MockAudioHost> {
    anyhow::bail!("virtual audio devices require macOS CoreAudio")
}
