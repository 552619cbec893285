//! Virtual device lifecycle protocols.
//!
//! Provisioning and teardown are written as explicit step sequences rather
//! than nested error handling so the rollback scope at each step is visible:
//! every abort path unwinds exactly the devices created so far, and the
//! error reported is always the step that failed, never a rollback outcome.

use colored::Colorize;
use tracing::{info, warn};

use crate::audio::default_output::DefaultOutputRegister;
use crate::audio::directory::EndpointDirectory;
use crate::audio::error::SetupError;
use crate::audio::host::AudioHost;
use crate::audio::registry::VirtualDeviceRegistry;
use crate::audio::types::{
    ProvisioningResult, VirtualDeviceHandle, VirtualDeviceSpec, AGGREGATE_NAME, AGGREGATE_UID,
    MULTI_OUTPUT_UID,
};

/// Drives the multi-output / aggregate-capture device pair through
/// provisioning and teardown.
pub struct DeviceLifecycle<'h, H: AudioHost> {
    host: &'h H,
}

impl<'h, H: AudioHost> DeviceLifecycle<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self { host }
    }

    /// Best-effort cleanup of devices a crashed run left behind under the
    /// well-known uids. A failure here is indistinguishable from "nothing
    /// to recover", so it is logged and never aborts the provisioning that
    /// follows.
    fn recover_stale_devices(&self, registry: &VirtualDeviceRegistry<'h, H>) {
        for uid in [MULTI_OUTPUT_UID, AGGREGATE_UID] {
            match registry.destroy_by_stable_uid(uid) {
                Ok(true) => info!(
                    "{} removed stale device '{}' from a previous run",
                    "RECOVER".bright_yellow(),
                    uid
                ),
                Ok(false) => {}
                Err(status) => warn!(
                    "{} could not remove stale device '{}': OSStatus {}",
                    "RECOVER".bright_yellow(),
                    uid,
                    status
                ),
            }
        }
    }

    /// Destroys the handles created so far, in the order given. Failures
    /// are logged and swallowed: the caller reports the step that failed,
    /// not the rollback.
    fn rollback(&self, registry: &VirtualDeviceRegistry<'h, H>, handles: &[VirtualDeviceHandle]) {
        for &handle in handles {
            if let Err(status) = registry.destroy(handle) {
                warn!(
                    "{} rollback destroy of device {} failed: OSStatus {}",
                    "ROLLBACK".bright_yellow(),
                    handle,
                    status
                );
            }
        }
    }

    /// Create both virtual devices and repoint the default output at the
    /// multi-output device. All-or-nothing: any failure leaves no device
    /// with a well-known uid behind and the default output untouched.
    pub fn provision(&self, loopback_uid: &str) -> Result<ProvisioningResult, SetupError> {
        let directory = EndpointDirectory::new(self.host);
        let registry = VirtualDeviceRegistry::new(self.host);
        let register = DefaultOutputRegister::new(self.host);

        // Stale devices from a crashed run still hold the well-known uids;
        // clear them before creating this run's pair.
        self.recover_stale_devices(&registry);

        // Snapshot before any mutation: aborts from here need no rollback.
        let original_output = directory
            .current_default_output()
            .ok_or(SetupError::NoDefaultOutput)?;
        let mic_uid = directory
            .find_capture_microphone()
            .ok_or(SetupError::NoMicrophoneAvailable)?;

        info!(
            "{} provisioning with output='{}', mic='{}', loopback='{}'",
            "PROVISION".bright_cyan(),
            original_output.uid,
            mic_uid,
            loopback_uid
        );

        let multi_spec = VirtualDeviceSpec::multi_output(&original_output.uid, loopback_uid);
        let multi_output_id = registry.create(&multi_spec).map_err(|status| {
            SetupError::DeviceCreationFailed {
                role: "multi-output",
                status,
            }
        })?;

        let aggregate_spec = VirtualDeviceSpec::aggregate_capture(&mic_uid, loopback_uid);
        let aggregate_id = match registry.create(&aggregate_spec) {
            Ok(id) => id,
            Err(status) => {
                self.rollback(&registry, &[multi_output_id]);
                return Err(SetupError::DeviceCreationFailed {
                    role: "aggregate",
                    status,
                });
            }
        };

        // Both devices exist; only now may the default output move.
        if let Err(status) = register.set_by_id(multi_output_id) {
            self.rollback(&registry, &[aggregate_id, multi_output_id]);
            return Err(SetupError::OutputSwitchFailed { status });
        }

        info!(
            "{} output now fans out through '{}' (multi={}, aggregate={})",
            "PROVISIONED".bright_green(),
            MULTI_OUTPUT_UID,
            multi_output_id,
            aggregate_id
        );

        Ok(ProvisioningResult {
            multi_output_id,
            aggregate_id,
            aggregate_uid: AGGREGATE_UID.to_string(),
            aggregate_name: AGGREGATE_NAME.to_string(),
            original_output_uid: original_output.uid,
            mic_uid,
        })
    }

    /// Destroy both virtual devices: aggregate first, then multi-output,
    /// regardless of individual outcomes. Failures from both sub-steps are
    /// combined into one error. Does NOT restore the original default
    /// output; the caller does that with the uid from provisioning.
    pub fn teardown(
        &self,
        multi_output_id: VirtualDeviceHandle,
        aggregate_id: VirtualDeviceHandle,
    ) -> Result<(), SetupError> {
        let registry = VirtualDeviceRegistry::new(self.host);
        let mut failures = Vec::new();

        if let Err(status) = registry.destroy(aggregate_id) {
            failures.push(format!("failed to destroy aggregate: OSStatus {}", status));
        }
        if let Err(status) = registry.destroy(multi_output_id) {
            failures.push(format!(
                "failed to destroy multi-output: OSStatus {}",
                status
            ));
        }

        if failures.is_empty() {
            info!("{} both virtual devices destroyed", "TEARDOWN".bright_green());
            Ok(())
        } else {
            Err(SetupError::TeardownFailed(failures.join("; ")))
        }
    }

    /// Standalone default-output switch, used by the caller to leave the
    /// virtual routing after teardown.
    pub fn switch_output(&self, uid: &str) -> Result<(), SetupError> {
        DefaultOutputRegister::new(self.host).set_by_uid(uid)
    }
}
