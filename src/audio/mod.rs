// Audio module - endpoint queries and virtual device lifecycle
//
// The host's global audio state (device table, default-output pointer) is
// reached exclusively through the `AudioHost` trait in `host`; everything
// above it is host-independent:
// - types: endpoint and virtual device payload types, well-known constants
// - directory: read-only queries over the current audio object graph
// - default_output: the system default-output pointer
// - registry: create/destroy for aggregate-style virtual devices
// - orchestrator: provisioning/teardown protocols with rollback and recovery

pub mod default_output;
pub mod directory;
pub mod error;
pub mod host;
pub mod orchestrator;
pub mod registry;
pub mod types;

pub use default_output::DefaultOutputRegister;
pub use directory::EndpointDirectory;
pub use error::SetupError;
pub use host::{AudioHost, MockAudioHost, OsStatus};
pub use orchestrator::DeviceLifecycle;
pub use registry::VirtualDeviceRegistry;
pub use types::{
    DeviceId, Endpoint, ProvisioningResult, StreamDirection, VirtualDeviceHandle,
    VirtualDeviceSpec,
};

#[cfg(target_os = "macos")]
pub use host::CoreAudioHost;
