//! Create/destroy operations for aggregate-style virtual devices.

use colored::Colorize;
use tracing::info;

use crate::audio::directory::EndpointDirectory;
use crate::audio::host::{AudioHost, OsStatus};
use crate::audio::types::{VirtualDeviceHandle, VirtualDeviceSpec};

/// Registry of this helper's synthetic devices on the host. Status codes
/// from the host pass through verbatim; diagnosis happens upstream.
pub struct VirtualDeviceRegistry<'h, H: AudioHost> {
    host: &'h H,
}

impl<'h, H: AudioHost> VirtualDeviceRegistry<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self { host }
    }

    pub fn create(&self, spec: &VirtualDeviceSpec) -> Result<VirtualDeviceHandle, OsStatus> {
        info!(
            "{} creating '{}' (uid='{}', members={:?})",
            "DEVICE_CREATE".bright_cyan(),
            spec.name,
            spec.uid,
            spec.sub_device_uids
        );

        let handle = self.host.create_aggregate_device(spec)?;

        info!(
            "{} '{}' is live with id {}",
            "DEVICE_CREATED".bright_green(),
            spec.name,
            handle
        );
        Ok(handle)
    }

    pub fn destroy(&self, handle: VirtualDeviceHandle) -> Result<(), OsStatus> {
        info!(
            "{} destroying device {}",
            "DEVICE_DESTROY".bright_yellow(),
            handle
        );
        self.host.destroy_aggregate_device(handle)
    }

    /// Recovery path: destroy whatever live endpoint currently carries this
    /// well-known uid. Returns whether anything was destroyed; a no-op when
    /// the uid is absent.
    pub fn destroy_by_stable_uid(&self, uid: &str) -> Result<bool, OsStatus> {
        let Some(endpoint) = EndpointDirectory::new(self.host).find_by_uid(uid) else {
            return Ok(false);
        };
        self.destroy(endpoint.id)?;
        Ok(true)
    }
}
