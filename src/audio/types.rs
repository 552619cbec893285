use serde::{Deserialize, Serialize};

/// Numeric handle the host assigns to an audio object. Only valid within
/// this process lifetime; persistent references go through string UIDs.
pub type DeviceId = u32;

/// Handle returned by virtual device creation; required for destruction.
pub type VirtualDeviceHandle = DeviceId;

/// Well-known UID of the multi-output device. Fixed across runs so a later
/// invocation can find and remove a crashed run's leftovers.
pub const MULTI_OUTPUT_UID: &str = "com.audiobridge.multioutput";
pub const MULTI_OUTPUT_NAME: &str = "AudioBridge Multi-Output";

/// Well-known UID of the aggregate capture device.
pub const AGGREGATE_UID: &str = "com.audiobridge.aggregate";
pub const AGGREGATE_NAME: &str = "AudioBridge Aggregate";

/// A loopback endpoint's display name must contain every token,
/// case-sensitive.
pub const LOOPBACK_NAME_TOKENS: [&str; 2] = ["BlackHole", "2ch"];

/// Preferred capture microphone; falls back to the first input-capable
/// endpoint when absent.
pub const PREFERRED_MIC_UID: &str = "BuiltInMicrophoneDevice";

/// Stream direction for capability queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamDirection {
    Input,
    Output,
}

/// A host-visible audio endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    pub id: DeviceId,
    pub uid: String,
    pub name: String,
    pub is_input: bool,
    pub is_output: bool,
}

/// Declarative description submitted to the host's aggregate-device
/// creation facility. Ephemeral: constructed, submitted, discarded.
#[derive(Debug, Clone)]
pub struct VirtualDeviceSpec {
    pub name: String,
    pub uid: String,
    /// Hidden from normal device pickers.
    pub is_private: bool,
    /// Member endpoints run in parallel rather than clocked in sequence.
    pub is_stacked: bool,
    pub sub_device_uids: Vec<String>,
}

impl VirtualDeviceSpec {
    /// The fan-out device: current speakers plus the loopback endpoint,
    /// stacked so both play simultaneously.
    pub fn multi_output(original_output_uid: &str, loopback_uid: &str) -> Self {
        Self {
            name: MULTI_OUTPUT_NAME.to_string(),
            uid: MULTI_OUTPUT_UID.to_string(),
            is_private: true,
            is_stacked: true,
            sub_device_uids: vec![original_output_uid.to_string(), loopback_uid.to_string()],
        }
    }

    /// The capture device: microphone plus the loopback endpoint combined
    /// into one recordable input.
    pub fn aggregate_capture(mic_uid: &str, loopback_uid: &str) -> Self {
        Self {
            name: AGGREGATE_NAME.to_string(),
            uid: AGGREGATE_UID.to_string(),
            is_private: false,
            is_stacked: false,
            sub_device_uids: vec![mic_uid.to_string(), loopback_uid.to_string()],
        }
    }
}

/// Output of a successful provisioning transaction. `original_output_uid`
/// is what the caller hands back to `switch-output` after teardown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningResult {
    pub multi_output_id: VirtualDeviceHandle,
    pub aggregate_id: VirtualDeviceHandle,
    pub aggregate_uid: String,
    pub aggregate_name: String,
    pub original_output_uid: String,
    pub mic_uid: String,
}
