//! Command handlers.
//!
//! Each handler maps a core operation onto the JSON payload the parent
//! process reads: a structured object on success, a single error string on
//! failure. The binary prints exactly one of these per invocation.

use serde_json::{json, Value};

use crate::audio::{
    AudioHost, DefaultOutputRegister, DeviceLifecycle, EndpointDirectory, SetupError,
    VirtualDeviceHandle,
};

fn endpoint_payload(endpoint: &crate::audio::Endpoint) -> Value {
    json!({
        "id": endpoint.id,
        "uid": endpoint.uid,
        "name": endpoint.name,
    })
}

pub fn list_devices<H: AudioHost>(host: &H) -> Result<Value, String> {
    let devices = EndpointDirectory::new(host).list_all();
    Ok(json!({ "devices": devices }))
}

pub fn current_output<H: AudioHost>(host: &H) -> Result<Value, String> {
    let endpoint = DefaultOutputRegister::new(host)
        .get()
        .ok_or_else(|| SetupError::NoDefaultOutput.to_string())?;
    Ok(endpoint_payload(&endpoint))
}

pub fn find_loopback<H: AudioHost>(host: &H) -> Result<Value, String> {
    let endpoint = EndpointDirectory::new(host)
        .find_loopback_endpoint()
        .ok_or_else(|| SetupError::LoopbackNotFound.to_string())?;
    Ok(endpoint_payload(&endpoint))
}

pub fn create_devices<H: AudioHost>(host: &H, loopback_uid: &str) -> Result<Value, String> {
    let result = DeviceLifecycle::new(host)
        .provision(loopback_uid)
        .map_err(|e| e.to_string())?;
    serde_json::to_value(result).map_err(|e| e.to_string())
}

pub fn destroy_devices<H: AudioHost>(
    host: &H,
    multi_output_id: VirtualDeviceHandle,
    aggregate_id: VirtualDeviceHandle,
) -> Result<Value, String> {
    DeviceLifecycle::new(host)
        .teardown(multi_output_id, aggregate_id)
        .map_err(|e| e.to_string())?;
    Ok(json!({ "ok": true }))
}

pub fn switch_output<H: AudioHost>(host: &H, uid: &str) -> Result<Value, String> {
    DeviceLifecycle::new(host)
        .switch_output(uid)
        .map_err(|e| e.to_string())?;
    Ok(json!({ "ok": true }))
}
