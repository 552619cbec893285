//! Read-only queries over the host's current audio object graph.

use crate::audio::host::AudioHost;
use crate::audio::types::{
    DeviceId, Endpoint, StreamDirection, LOOPBACK_NAME_TOKENS, PREFERRED_MIC_UID,
};

/// Endpoint lookups. Holds no state of its own: every query re-reads the
/// host, so results always reflect the current device graph.
pub struct EndpointDirectory<'h, H: AudioHost> {
    host: &'h H,
}

impl<'h, H: AudioHost> EndpointDirectory<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self { host }
    }

    /// All endpoints with resolvable metadata. A device whose uid or name
    /// cannot be read is not a usable endpoint and is skipped, not an error.
    pub fn list_all(&self) -> Vec<Endpoint> {
        self.host
            .device_ids()
            .into_iter()
            .filter_map(|id| self.resolve(id))
            .collect()
    }

    fn resolve(&self, id: DeviceId) -> Option<Endpoint> {
        let uid = self.host.device_uid(id)?;
        let name = self.host.device_name(id)?;
        Some(Endpoint {
            id,
            uid,
            name,
            is_input: self.host.has_streams(id, StreamDirection::Input),
            is_output: self.host.has_streams(id, StreamDirection::Output),
        })
    }

    /// First endpoint carrying this uid, in enumeration order. The host is
    /// expected to keep uids unique but this is not enforced here.
    pub fn find_by_uid(&self, uid: &str) -> Option<Endpoint> {
        self.list_all().into_iter().find(|e| e.uid == uid)
    }

    /// The endpoint the default-output pointer currently resolves to.
    pub fn current_default_output(&self) -> Option<Endpoint> {
        let id = self.host.default_output_device()?;
        self.resolve(id)
    }

    /// The loopback driver's endpoint, identified by its display name.
    pub fn find_loopback_endpoint(&self) -> Option<Endpoint> {
        self.list_all()
            .into_iter()
            .find(|e| LOOPBACK_NAME_TOKENS.iter().all(|token| e.name.contains(token)))
    }

    /// Uid of the capture microphone: the built-in mic when present,
    /// otherwise the first input-capable endpoint in enumeration order.
    pub fn find_capture_microphone(&self) -> Option<String> {
        let endpoints = self.list_all();
        if let Some(built_in) = endpoints.iter().find(|e| e.uid == PREFERRED_MIC_UID) {
            return Some(built_in.uid.clone());
        }
        endpoints.into_iter().find(|e| e.is_input).map(|e| e.uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::host::MockAudioHost;

    #[test]
    fn list_all_skips_devices_with_unresolvable_metadata() {
        let host = MockAudioHost::new();
        host.add_device("speakers", "Speakers", false, true);
        host.add_device_missing_name("ghost-uid");
        host.add_device_missing_uid("Ghost Device");

        let endpoints = EndpointDirectory::new(&host).list_all();
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].uid, "speakers");
    }

    #[test]
    fn find_by_uid_returns_first_match_in_enumeration_order() {
        let host = MockAudioHost::new();
        let first = host.add_device("dup", "First", false, true);
        host.add_device("dup", "Second", false, true);

        let found = EndpointDirectory::new(&host).find_by_uid("dup").unwrap();
        assert_eq!(found.id, first);
        assert_eq!(found.name, "First");
    }

    #[test]
    fn loopback_match_requires_both_tokens_case_sensitive() {
        let host = MockAudioHost::new();
        host.add_device("bh16", "BlackHole 16ch", true, true);
        host.add_device("lower", "blackhole 2ch", true, true);
        host.add_device("bh2", "BlackHole 2ch", true, true);

        let loopback = EndpointDirectory::new(&host).find_loopback_endpoint().unwrap();
        assert_eq!(loopback.uid, "bh2");
    }

    #[test]
    fn loopback_absent_when_no_name_matches() {
        let host = MockAudioHost::new();
        host.add_device("speakers", "Speakers", false, true);
        assert!(EndpointDirectory::new(&host).find_loopback_endpoint().is_none());
    }

    #[test]
    fn microphone_prefers_built_in_over_earlier_input_devices() {
        let host = MockAudioHost::new();
        host.add_device("usb-mic", "USB Microphone", true, false);
        host.add_device(PREFERRED_MIC_UID, "MacBook Pro Microphone", true, false);

        let mic = EndpointDirectory::new(&host).find_capture_microphone();
        assert_eq!(mic.as_deref(), Some(PREFERRED_MIC_UID));
    }

    #[test]
    fn microphone_falls_back_to_first_input_capable_endpoint() {
        let host = MockAudioHost::new();
        host.add_device("speakers", "Speakers", false, true);
        host.add_device("usb-mic", "USB Microphone", true, false);
        host.add_device("other-mic", "Other Microphone", true, false);

        let mic = EndpointDirectory::new(&host).find_capture_microphone();
        assert_eq!(mic.as_deref(), Some("usb-mic"));
    }

    #[test]
    fn microphone_absent_when_nothing_supports_input() {
        let host = MockAudioHost::new();
        host.add_device("speakers", "Speakers", false, true);
        assert!(EndpointDirectory::new(&host).find_capture_microphone().is_none());
    }

    #[test]
    fn current_default_output_absent_without_a_pointer() {
        let host = MockAudioHost::new();
        host.add_device("speakers", "Speakers", false, true);
        assert!(EndpointDirectory::new(&host).current_default_output().is_none());
    }
}
