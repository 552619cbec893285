// Teardown protocol tests: fixed destruction order, combined failures, and
// the provision/teardown/switch-output round trip.

use audiobridge::audio::host::mock::BAD_OBJECT_STATUS;
use audiobridge::audio::types::{AGGREGATE_UID, MULTI_OUTPUT_UID};
use audiobridge::{DeviceLifecycle, MockAudioHost, SetupError};

/// Loopback enumerates first so the host's re-election after destroying the
/// default output lands on a device other than the original speakers.
fn host_with_loopback_first() -> MockAudioHost {
    let host = MockAudioHost::new();
    host.add_device("loopback-2ch", "BlackHole 2ch", true, true);
    let speakers = host.add_device("built-in-speakers", "MacBook Pro Speakers", false, true);
    host.add_device("built-in-mic", "MacBook Pro Microphone", true, false);
    host.set_default_output(speakers);
    host
}

#[test]
fn teardown_destroys_both_devices() {
    let host = host_with_loopback_first();
    let lifecycle = DeviceLifecycle::new(&host);

    let result = lifecycle.provision("loopback-2ch").unwrap();
    lifecycle
        .teardown(result.multi_output_id, result.aggregate_id)
        .expect("teardown should succeed");

    assert_eq!(host.device_count_with_uid(MULTI_OUTPUT_UID), 0);
    assert_eq!(host.device_count_with_uid(AGGREGATE_UID), 0);
}

#[test]
fn teardown_leaves_output_restoration_to_the_caller() {
    let host = host_with_loopback_first();
    let lifecycle = DeviceLifecycle::new(&host);

    let result = lifecycle.provision("loopback-2ch").unwrap();
    lifecycle
        .teardown(result.multi_output_id, result.aggregate_id)
        .unwrap();

    // the host elected a fallback output; teardown itself never repoints
    // back to the original
    assert_eq!(host.default_output_uid().as_deref(), Some("loopback-2ch"));
}

#[test]
fn provision_teardown_switch_restores_the_original_output() {
    let host = host_with_loopback_first();
    let lifecycle = DeviceLifecycle::new(&host);

    let result = lifecycle.provision("loopback-2ch").unwrap();
    lifecycle
        .teardown(result.multi_output_id, result.aggregate_id)
        .unwrap();
    lifecycle
        .switch_output(&result.original_output_uid)
        .unwrap();

    assert_eq!(
        host.default_output_uid().as_deref(),
        Some("built-in-speakers")
    );
}

#[test]
fn invalid_aggregate_handle_still_destroys_the_multi_output_device() {
    let host = host_with_loopback_first();
    let lifecycle = DeviceLifecycle::new(&host);

    let result = lifecycle.provision("loopback-2ch").unwrap();
    let err = lifecycle
        .teardown(result.multi_output_id, 9999)
        .unwrap_err();

    let SetupError::TeardownFailed(message) = err else {
        panic!("expected TeardownFailed, got {err:?}");
    };
    assert!(message.contains(&format!(
        "failed to destroy aggregate: OSStatus {}",
        BAD_OBJECT_STATUS
    )));

    // the valid handle was still torn down...
    assert_eq!(host.device_count_with_uid(MULTI_OUTPUT_UID), 0);
    // ...while the real aggregate device, never addressed, stays live
    assert_eq!(host.device_count_with_uid(AGGREGATE_UID), 1);
}

#[test]
fn teardown_combines_failures_from_both_steps() {
    let host = host_with_loopback_first();

    let err = DeviceLifecycle::new(&host).teardown(111, 222).unwrap_err();
    let SetupError::TeardownFailed(message) = err else {
        panic!("expected TeardownFailed, got {err:?}");
    };
    assert!(message.contains("failed to destroy aggregate"));
    assert!(message.contains("failed to destroy multi-output"));
    assert!(message.contains("; "));
}

#[test]
fn switch_output_to_unknown_uid_fails_without_moving_the_pointer() {
    let host = host_with_loopback_first();

    let err = DeviceLifecycle::new(&host)
        .switch_output("not-a-device")
        .unwrap_err();
    assert!(matches!(err, SetupError::SwitchTargetNotFound { .. }));
    assert_eq!(
        host.default_output_uid().as_deref(),
        Some("built-in-speakers")
    );
}
