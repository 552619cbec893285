//! In-memory [`AudioHost`] for testing.
//!
//! Simulates the host's device table and default-output pointer without
//! audio hardware, with per-operation failure injection for exercising the
//! rollback and recovery paths.

use std::sync::Mutex;

use super::{AudioHost, OsStatus};
use crate::audio::types::{DeviceId, StreamDirection, VirtualDeviceSpec};

/// kAudioHardwareBadObjectError ('!obj'): what the host reports for an
/// operation against an id it does not know.
pub const BAD_OBJECT_STATUS: OsStatus = 0x216F_626A;

#[derive(Debug, Clone)]
struct MockDevice {
    id: DeviceId,
    // None simulates a device whose metadata cannot be resolved
    uid: Option<String>,
    name: Option<String>,
    is_input: bool,
    is_output: bool,
}

#[derive(Debug, Default)]
struct MockHostState {
    devices: Vec<MockDevice>,
    default_output: Option<DeviceId>,
    next_id: DeviceId,
    /// Creation failures keyed by spec uid.
    create_failures: Vec<(String, OsStatus)>,
    /// Destruction failures keyed by device id.
    destroy_failures: Vec<(DeviceId, OsStatus)>,
    switch_failure: Option<OsStatus>,
    /// Every spec submitted for creation, in order, including failed ones.
    creation_log: Vec<VirtualDeviceSpec>,
}

/// Simulated audio host.
pub struct MockAudioHost {
    state: Mutex<MockHostState>,
}

impl MockAudioHost {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockHostState {
                next_id: 100,
                ..MockHostState::default()
            }),
        }
    }

    /// Add a simulated device; returns its id.
    pub fn add_device(&self, uid: &str, name: &str, is_input: bool, is_output: bool) -> DeviceId {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        state.devices.push(MockDevice {
            id,
            uid: Some(uid.to_string()),
            name: Some(name.to_string()),
            is_input,
            is_output,
        });
        id
    }

    /// Add a device whose display name cannot be resolved.
    pub fn add_device_missing_name(&self, uid: &str) -> DeviceId {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        state.devices.push(MockDevice {
            id,
            uid: Some(uid.to_string()),
            name: None,
            is_input: false,
            is_output: true,
        });
        id
    }

    /// Add a device whose uid cannot be resolved.
    pub fn add_device_missing_uid(&self, name: &str) -> DeviceId {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        state.devices.push(MockDevice {
            id,
            uid: None,
            name: Some(name.to_string()),
            is_input: false,
            is_output: true,
        });
        id
    }

    /// Point the simulated default output at an existing device.
    pub fn set_default_output(&self, id: DeviceId) {
        self.state.lock().unwrap().default_output = Some(id);
    }

    /// Make the next creation of a spec with this uid fail.
    pub fn fail_create_for_uid(&self, uid: &str, status: OsStatus) {
        self.state
            .lock()
            .unwrap()
            .create_failures
            .push((uid.to_string(), status));
    }

    /// Make destruction of this device id fail.
    pub fn fail_destroy(&self, id: DeviceId, status: OsStatus) {
        self.state.lock().unwrap().destroy_failures.push((id, status));
    }

    /// Make the next default-output write fail.
    pub fn fail_output_switch(&self, status: OsStatus) {
        self.state.lock().unwrap().switch_failure = Some(status);
    }

    /// Number of live devices carrying this uid (test assertions).
    pub fn device_count_with_uid(&self, uid: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .devices
            .iter()
            .filter(|d| d.uid.as_deref() == Some(uid))
            .count()
    }

    /// Every spec submitted for creation, in submission order.
    pub fn creation_log(&self) -> Vec<VirtualDeviceSpec> {
        self.state.lock().unwrap().creation_log.clone()
    }

    /// The uid the simulated default output currently resolves to.
    pub fn default_output_uid(&self) -> Option<String> {
        let state = self.state.lock().unwrap();
        let id = state.default_output?;
        state
            .devices
            .iter()
            .find(|d| d.id == id)
            .and_then(|d| d.uid.clone())
    }
}

impl Default for MockAudioHost {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioHost for MockAudioHost {
    fn device_ids(&self) -> Vec<DeviceId> {
        self.state
            .lock()
            .unwrap()
            .devices
            .iter()
            .map(|d| d.id)
            .collect()
    }

    fn device_uid(&self, id: DeviceId) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .devices
            .iter()
            .find(|d| d.id == id)
            .and_then(|d| d.uid.clone())
    }

    fn device_name(&self, id: DeviceId) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .devices
            .iter()
            .find(|d| d.id == id)
            .and_then(|d| d.name.clone())
    }

    fn has_streams(&self, id: DeviceId, direction: StreamDirection) -> bool {
        self.state
            .lock()
            .unwrap()
            .devices
            .iter()
            .find(|d| d.id == id)
            .map(|d| match direction {
                StreamDirection::Input => d.is_input,
                StreamDirection::Output => d.is_output,
            })
            .unwrap_or(false)
    }

    fn default_output_device(&self) -> Option<DeviceId> {
        self.state.lock().unwrap().default_output
    }

    fn set_default_output_device(&self, id: DeviceId) -> Result<(), OsStatus> {
        let mut state = self.state.lock().unwrap();
        if let Some(status) = state.switch_failure.take() {
            return Err(status);
        }
        if !state.devices.iter().any(|d| d.id == id) {
            return Err(BAD_OBJECT_STATUS);
        }
        state.default_output = Some(id);
        Ok(())
    }

    fn create_aggregate_device(&self, spec: &VirtualDeviceSpec) -> Result<DeviceId, OsStatus> {
        let mut state = self.state.lock().unwrap();
        state.creation_log.push(spec.clone());
        if let Some(pos) = state
            .create_failures
            .iter()
            .position(|(uid, _)| uid == &spec.uid)
        {
            let (_, status) = state.create_failures.remove(pos);
            return Err(status);
        }

        // The synthetic device's capabilities are the union of its members';
        // unknown member uids are tolerated, as on the real host.
        let mut is_input = false;
        let mut is_output = false;
        for member_uid in &spec.sub_device_uids {
            if let Some(member) = state
                .devices
                .iter()
                .find(|d| d.uid.as_deref() == Some(member_uid.as_str()))
            {
                is_input |= member.is_input;
                is_output |= member.is_output;
            }
        }

        let id = state.next_id;
        state.next_id += 1;
        state.devices.push(MockDevice {
            id,
            uid: Some(spec.uid.clone()),
            name: Some(spec.name.clone()),
            is_input,
            is_output,
        });
        Ok(id)
    }

    fn destroy_aggregate_device(&self, id: DeviceId) -> Result<(), OsStatus> {
        let mut state = self.state.lock().unwrap();
        if let Some(pos) = state
            .destroy_failures
            .iter()
            .position(|(failing_id, _)| *failing_id == id)
        {
            let (_, status) = state.destroy_failures.remove(pos);
            return Err(status);
        }

        let Some(pos) = state.devices.iter().position(|d| d.id == id) else {
            return Err(BAD_OBJECT_STATUS);
        };
        state.devices.remove(pos);

        // Destroying the current default makes the host elect another
        // output-capable device, as the real HAL does.
        if state.default_output == Some(id) {
            state.default_output = state.devices.iter().find(|d| d.is_output).map(|d| d.id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_device_capabilities_are_union_of_members() {
        let host = MockAudioHost::new();
        host.add_device("mic", "Mic", true, false);
        host.add_device("loop", "Loop", true, true);

        let spec = VirtualDeviceSpec::aggregate_capture("mic", "loop");
        let id = host.create_aggregate_device(&spec).unwrap();
        assert!(host.has_streams(id, StreamDirection::Input));
        assert!(host.has_streams(id, StreamDirection::Output));
    }

    #[test]
    fn destroying_unknown_id_reports_bad_object() {
        let host = MockAudioHost::new();
        assert_eq!(host.destroy_aggregate_device(4242), Err(BAD_OBJECT_STATUS));
    }

    #[test]
    fn destroying_default_output_elects_another_device() {
        let host = MockAudioHost::new();
        let speakers = host.add_device("speakers", "Speakers", false, true);
        let spec = VirtualDeviceSpec::multi_output("speakers", "loop");
        let virtual_id = host.create_aggregate_device(&spec).unwrap();
        host.set_default_output(virtual_id);

        host.destroy_aggregate_device(virtual_id).unwrap();
        assert_eq!(host.default_output_device(), Some(speakers));
    }

    #[test]
    fn create_failure_injection_is_one_shot() {
        let host = MockAudioHost::new();
        host.fail_create_for_uid("some-uid", 1234);

        let spec = VirtualDeviceSpec {
            name: "X".to_string(),
            uid: "some-uid".to_string(),
            is_private: false,
            is_stacked: false,
            sub_device_uids: vec![],
        };
        assert_eq!(host.create_aggregate_device(&spec), Err(1234));
        assert!(host.create_aggregate_device(&spec).is_ok());
    }
}
