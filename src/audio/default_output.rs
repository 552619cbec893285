//! The system-wide default-output pointer.

use colored::Colorize;
use tracing::info;

use crate::audio::directory::EndpointDirectory;
use crate::audio::error::SetupError;
use crate::audio::host::{AudioHost, OsStatus};
use crate::audio::types::{DeviceId, Endpoint};

/// Read/write accessor for the host's "current default output" pointer.
pub struct DefaultOutputRegister<'h, H: AudioHost> {
    host: &'h H,
}

impl<'h, H: AudioHost> DefaultOutputRegister<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self { host }
    }

    /// The current default output endpoint, when one resolves.
    pub fn get(&self) -> Option<Endpoint> {
        EndpointDirectory::new(self.host).current_default_output()
    }

    /// Raw repoint to a numeric handle the caller already owns.
    pub fn set_by_id(&self, id: DeviceId) -> Result<(), OsStatus> {
        self.host.set_default_output_device(id)
    }

    /// Repoint to the endpoint carrying `uid`. Fails fast when the uid does
    /// not resolve: no property write is attempted with an invalid handle.
    pub fn set_by_uid(&self, uid: &str) -> Result<(), SetupError> {
        let endpoint = EndpointDirectory::new(self.host)
            .find_by_uid(uid)
            .ok_or_else(|| SetupError::SwitchTargetNotFound {
                uid: uid.to_string(),
            })?;

        self.host
            .set_default_output_device(endpoint.id)
            .map_err(|status| SetupError::OutputSwitchFailed { status })?;

        info!(
            "{} default output now '{}' (uid='{}')",
            "OUTPUT_SET".bright_green(),
            endpoint.name,
            endpoint.uid
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::host::MockAudioHost;

    #[test]
    fn set_by_uid_repoints_to_a_live_endpoint() {
        let host = MockAudioHost::new();
        let speakers = host.add_device("speakers", "Speakers", false, true);
        host.add_device("headphones", "Headphones", false, true);
        host.set_default_output(speakers);

        let register = DefaultOutputRegister::new(&host);
        register.set_by_uid("headphones").unwrap();
        assert_eq!(host.default_output_uid().as_deref(), Some("headphones"));
    }

    #[test]
    fn set_by_uid_fails_fast_on_unknown_uid_without_writing() {
        let host = MockAudioHost::new();
        let speakers = host.add_device("speakers", "Speakers", false, true);
        host.set_default_output(speakers);

        let register = DefaultOutputRegister::new(&host);
        let err = register.set_by_uid("missing").unwrap_err();
        assert!(matches!(err, SetupError::SwitchTargetNotFound { .. }));
        // the pointer is untouched
        assert_eq!(host.default_output_uid().as_deref(), Some("speakers"));
    }

    #[test]
    fn set_by_uid_surfaces_the_host_status_on_write_failure() {
        let host = MockAudioHost::new();
        host.add_device("speakers", "Speakers", false, true);
        host.fail_output_switch(-50);

        let err = DefaultOutputRegister::new(&host)
            .set_by_uid("speakers")
            .unwrap_err();
        assert!(matches!(err, SetupError::OutputSwitchFailed { status: -50 }));
    }
}
