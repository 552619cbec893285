// FFI bindings for the aggregate-device entry points in AudioHardware.h.
// coreaudio-sys binds these against its own Core Foundation aliases; the
// declarations here use the core-foundation crate's types so the call sites
// can pass CFDictionary values without casting between the two worlds.

#![allow(non_snake_case)]

pub use coreaudio_sys::{AudioObjectID, OSStatus};

use core_foundation::dictionary::CFDictionaryRef;

extern "C" {
    /// Create an aggregate device from a declarative CFDictionary spec.
    pub fn AudioHardwareCreateAggregateDevice(
        inDescription: CFDictionaryRef,
        outDeviceID: *mut AudioObjectID,
    ) -> OSStatus;

    /// Destroy an aggregate device by its AudioObjectID.
    pub fn AudioHardwareDestroyAggregateDevice(inDeviceID: AudioObjectID) -> OSStatus;
}
