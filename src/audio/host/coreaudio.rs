//! CoreAudio-backed implementation of [`AudioHost`].
//!
//! Every method is a single blocking AudioObject property round trip.
//! Metadata getters return `None` on any host failure so enumeration can
//! skip devices with unresolvable uid/name instead of erroring.

use std::ffi::c_void;
use std::mem;
use std::ptr;

use core_foundation::array::CFArray;
use core_foundation::base::TCFType;
use core_foundation::dictionary::{CFDictionary, CFDictionaryRef, CFMutableDictionary};
use core_foundation::number::CFNumber;
use core_foundation::string::{CFString, CFStringRef};
use coreaudio_sys::{
    kAudioDevicePropertyDeviceNameCFString, kAudioDevicePropertyDeviceUID,
    kAudioDevicePropertyStreams, kAudioHardwarePropertyDefaultOutputDevice,
    kAudioHardwarePropertyDevices, kAudioObjectPropertyElementMaster,
    kAudioObjectPropertyScopeGlobal, kAudioObjectPropertyScopeInput,
    kAudioObjectPropertyScopeOutput, kAudioObjectSystemObject, AudioObjectGetPropertyData,
    AudioObjectGetPropertyDataSize, AudioObjectPropertyAddress, AudioObjectSetPropertyData,
};
use tracing::debug;

use super::core_audio_bindings::{
    AudioHardwareCreateAggregateDevice, AudioHardwareDestroyAggregateDevice,
};
use super::{AudioHost, OsStatus};
use crate::audio::types::{DeviceId, StreamDirection, VirtualDeviceSpec};

// CFDictionary keys for the aggregate-device description
const AGGREGATE_NAME_KEY: &str = "name";
const AGGREGATE_UID_KEY: &str = "uid";
const AGGREGATE_IS_PRIVATE_KEY: &str = "private";
const AGGREGATE_IS_STACKED_KEY: &str = "stacked";
const AGGREGATE_SUB_DEVICE_LIST_KEY: &str = "subdevices";
const SUB_DEVICE_UID_KEY: &str = "uid";

/// Host access through the CoreAudio HAL.
pub struct CoreAudioHost;

impl CoreAudioHost {
    pub fn new() -> Self {
        Self
    }

    fn global_address(selector: u32) -> AudioObjectPropertyAddress {
        AudioObjectPropertyAddress {
            mSelector: selector,
            mScope: kAudioObjectPropertyScopeGlobal,
            mElement: kAudioObjectPropertyElementMaster,
        }
    }

    fn copy_string_property(&self, id: DeviceId, selector: u32) -> Option<String> {
        unsafe {
            let address = Self::global_address(selector);
            let mut cf_ref: CFStringRef = ptr::null();
            let mut data_size = mem::size_of::<CFStringRef>() as u32;

            let status = AudioObjectGetPropertyData(
                id,
                &address,
                0,
                ptr::null(),
                &mut data_size,
                &mut cf_ref as *mut CFStringRef as *mut c_void,
            );
            if status != 0 || cf_ref.is_null() {
                return None;
            }

            Some(CFString::wrap_under_create_rule(cf_ref).to_string())
        }
    }
}

impl Default for CoreAudioHost {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioHost for CoreAudioHost {
    fn device_ids(&self) -> Vec<DeviceId> {
        unsafe {
            let address = Self::global_address(kAudioHardwarePropertyDevices);

            let mut data_size: u32 = 0;
            let status = AudioObjectGetPropertyDataSize(
                kAudioObjectSystemObject,
                &address,
                0,
                ptr::null(),
                &mut data_size,
            );
            if status != 0 {
                debug!("device enumeration size query failed: OSStatus {}", status);
                return Vec::new();
            }

            let count = data_size as usize / mem::size_of::<DeviceId>();
            let mut ids: Vec<DeviceId> = vec![0; count];
            let status = AudioObjectGetPropertyData(
                kAudioObjectSystemObject,
                &address,
                0,
                ptr::null(),
                &mut data_size,
                ids.as_mut_ptr() as *mut c_void,
            );
            if status != 0 {
                debug!("device enumeration failed: OSStatus {}", status);
                return Vec::new();
            }

            ids.truncate(data_size as usize / mem::size_of::<DeviceId>());
            ids
        }
    }

    fn device_uid(&self, id: DeviceId) -> Option<String> {
        self.copy_string_property(id, kAudioDevicePropertyDeviceUID)
    }

    fn device_name(&self, id: DeviceId) -> Option<String> {
        self.copy_string_property(id, kAudioDevicePropertyDeviceNameCFString)
    }

    fn has_streams(&self, id: DeviceId, direction: StreamDirection) -> bool {
        let scope = match direction {
            StreamDirection::Input => kAudioObjectPropertyScopeInput,
            StreamDirection::Output => kAudioObjectPropertyScopeOutput,
        };

        unsafe {
            let address = AudioObjectPropertyAddress {
                mSelector: kAudioDevicePropertyStreams,
                mScope: scope,
                mElement: kAudioObjectPropertyElementMaster,
            };

            let mut data_size: u32 = 0;
            let status =
                AudioObjectGetPropertyDataSize(id, &address, 0, ptr::null(), &mut data_size);
            status == 0 && data_size > 0
        }
    }

    fn default_output_device(&self) -> Option<DeviceId> {
        unsafe {
            let address = Self::global_address(kAudioHardwarePropertyDefaultOutputDevice);

            let mut device_id: DeviceId = 0;
            let mut data_size = mem::size_of::<DeviceId>() as u32;
            let status = AudioObjectGetPropertyData(
                kAudioObjectSystemObject,
                &address,
                0,
                ptr::null(),
                &mut data_size,
                &mut device_id as *mut DeviceId as *mut c_void,
            );

            // 0 is kAudioObjectUnknown: the host has no default output
            if status != 0 || device_id == 0 {
                None
            } else {
                Some(device_id)
            }
        }
    }

    fn set_default_output_device(&self, id: DeviceId) -> Result<(), OsStatus> {
        unsafe {
            let address = Self::global_address(kAudioHardwarePropertyDefaultOutputDevice);

            let status = AudioObjectSetPropertyData(
                kAudioObjectSystemObject,
                &address,
                0,
                ptr::null(),
                mem::size_of::<DeviceId>() as u32,
                &id as *const DeviceId as *const c_void,
            );
            if status != 0 {
                return Err(status);
            }
            Ok(())
        }
    }

    fn create_aggregate_device(&self, spec: &VirtualDeviceSpec) -> Result<DeviceId, OsStatus> {
        unsafe {
            let mut description = CFMutableDictionary::with_capacity(5);
            description.set(
                CFString::new(AGGREGATE_NAME_KEY).as_CFType(),
                CFString::new(&spec.name).as_CFType(),
            );
            description.set(
                CFString::new(AGGREGATE_UID_KEY).as_CFType(),
                CFString::new(&spec.uid).as_CFType(),
            );
            if spec.is_private {
                description.set(
                    CFString::new(AGGREGATE_IS_PRIVATE_KEY).as_CFType(),
                    CFNumber::from(1i32).as_CFType(),
                );
            }
            if spec.is_stacked {
                description.set(
                    CFString::new(AGGREGATE_IS_STACKED_KEY).as_CFType(),
                    CFNumber::from(1i32).as_CFType(),
                );
            }

            let sub_devices: Vec<CFDictionary<CFString, CFString>> = spec
                .sub_device_uids
                .iter()
                .map(|uid| {
                    CFDictionary::from_CFType_pairs(&[(
                        CFString::new(SUB_DEVICE_UID_KEY),
                        CFString::new(uid),
                    )])
                })
                .collect();
            description.set(
                CFString::new(AGGREGATE_SUB_DEVICE_LIST_KEY).as_CFType(),
                CFArray::from_CFTypes(&sub_devices).as_CFType(),
            );

            let mut device_id: DeviceId = 0;
            let status = AudioHardwareCreateAggregateDevice(
                description.as_concrete_TypeRef() as CFDictionaryRef,
                &mut device_id as *mut DeviceId,
            );
            if status != 0 {
                return Err(status);
            }
            Ok(device_id)
        }
    }

    fn destroy_aggregate_device(&self, id: DeviceId) -> Result<(), OsStatus> {
        unsafe {
            let status = AudioHardwareDestroyAggregateDevice(id);
            if status != 0 {
                return Err(status);
            }
            Ok(())
        }
    }
}
