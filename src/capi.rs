//! C ABI over one process-wide [`SynthBridge`].
//!
//! Call `synthbox_init` before anything else and `synthbox_shutdown` at
//! process teardown. Calls made outside that window return the failure value.
//! Strings returned by this module must be released with
//! `synthbox_free_string`.

use crate::bridge::{guarded, SynthBridge, INVALID_HANDLE, STATUS_FAILED, STATUS_OK};
use parking_lot::RwLock;
use std::ffi::{c_char, CStr, CString};
use std::sync::atomic::{AtomicU64, Ordering};
use synthbox_core::{SynthConfig, SynthSystem};
use synthbox_synth::RustySynthBackend;

static BRIDGE: RwLock<Option<SynthBridge>> = parking_lot::const_rwlock(None);

/// First handle of the next bridge. Survives shutdown so a handle from an
/// earlier session never addresses an instance of a later one.
static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

fn with_bridge<R>(fallback: R, f: impl FnOnce(&SynthBridge) -> R) -> R {
    match BRIDGE.read().as_ref() {
        Some(bridge) => f(bridge),
        None => {
            tracing::debug!("synthbox used before synthbox_init");
            fallback
        }
    }
}

/// Install a bridge built by `make` from the first handle it may hand out.
fn init_with(make: impl FnOnce(u64) -> SynthBridge) -> i32 {
    guarded("synthbox_init", STATUS_FAILED, || {
        let mut bridge = BRIDGE.write();
        if bridge.is_none() {
            let first = NEXT_HANDLE.load(Ordering::SeqCst);
            *bridge = Some(make(first));
            tracing::info!("synthbox initialized (first handle {first})");
        }
        STATUS_OK
    })
}

/// Create the process-wide bridge. Calling it again is a no-op.
#[no_mangle]
pub extern "C" fn synthbox_init() -> i32 {
    init_with(|first| {
        SynthBridge::new(
            SynthSystem::new(RustySynthBackend::new()).starting_at(first),
            SynthConfig::default(),
        )
    })
}

/// Destroy every synthesizer and release the bridge.
#[no_mangle]
pub extern "C" fn synthbox_shutdown() {
    guarded("synthbox_shutdown", (), || {
        let bridge = {
            let mut slot = BRIDGE.write();
            let bridge = slot.take();
            // Record the counter before a concurrent init can observe the empty slot
            if let Some(bridge) = &bridge {
                NEXT_HANDLE.fetch_max(bridge.system().next_handle(), Ordering::SeqCst);
            }
            bridge
        };
        // Teardown runs outside the write lock
        if let Some(bridge) = bridge {
            let destroyed = bridge.shutdown();
            tracing::info!("synthbox shut down ({destroyed} synthesizers destroyed)");
        }
    })
}

#[no_mangle]
pub extern "C" fn synthbox_create_synth() -> i64 {
    with_bridge(INVALID_HANDLE, |b| b.create_synth())
}

#[no_mangle]
pub extern "C" fn synthbox_destroy_synth(handle: i64) {
    with_bridge((), |b| b.destroy_synth(handle))
}

/// # Safety
/// `path` must be null or point to a NUL-terminated string valid for the call.
#[no_mangle]
pub unsafe extern "C" fn synthbox_load_soundfont(handle: i64, path: *const c_char) -> i32 {
    let path = if path.is_null() {
        None
    } else {
        // SAFETY: non-null and NUL-terminated per the contract above
        unsafe { CStr::from_ptr(path) }.to_str().ok()
    };
    with_bridge(STATUS_FAILED, |b| b.load_soundfont(handle, path))
}

#[no_mangle]
pub extern "C" fn synthbox_note_on(handle: i64, channel: i32, key: i32, velocity: i32) -> i32 {
    with_bridge(STATUS_FAILED, |b| b.note_on(handle, channel, key, velocity))
}

#[no_mangle]
pub extern "C" fn synthbox_note_off(handle: i64, channel: i32, key: i32) -> i32 {
    with_bridge(STATUS_FAILED, |b| b.note_off(handle, channel, key))
}

#[no_mangle]
pub extern "C" fn synthbox_program_change(handle: i64, channel: i32, program: i32) -> i32 {
    with_bridge(STATUS_FAILED, |b| b.program_change(handle, channel, program))
}

#[no_mangle]
pub extern "C" fn synthbox_control_change(
    handle: i64,
    channel: i32,
    controller: i32,
    value: i32,
) -> i32 {
    with_bridge(STATUS_FAILED, |b| {
        b.control_change(handle, channel, controller, value)
    })
}

#[no_mangle]
pub extern "C" fn synthbox_set_channel_volume(handle: i64, channel: i32, volume: i32) -> i32 {
    with_bridge(STATUS_FAILED, |b| b.set_channel_volume(handle, channel, volume))
}

#[no_mangle]
pub extern "C" fn synthbox_pitch_bend(handle: i64, channel: i32, value: i32) -> i32 {
    with_bridge(STATUS_FAILED, |b| b.pitch_bend(handle, channel, value))
}

/// `channel` of -1 releases every channel.
#[no_mangle]
pub extern "C" fn synthbox_all_notes_off(handle: i64, channel: i32) -> i32 {
    with_bridge(STATUS_FAILED, |b| b.all_notes_off(handle, channel))
}

#[no_mangle]
pub extern "C" fn synthbox_set_master_gain(handle: i64, gain: f32) -> i32 {
    with_bridge(STATUS_FAILED, |b| b.set_master_gain(handle, gain))
}

#[no_mangle]
pub extern "C" fn synthbox_get_master_gain(handle: i64) -> f32 {
    with_bridge(0.0, |b| b.get_master_gain(handle))
}

#[no_mangle]
pub extern "C" fn synthbox_get_soundfont_count(handle: i64) -> i32 {
    with_bridge(0, |b| b.get_soundfont_count(handle))
}

/// Engine version. Works before `synthbox_init`. Free with `synthbox_free_string`.
#[no_mangle]
pub extern "C" fn synthbox_get_version() -> *mut c_char {
    let version = guarded("synthbox_get_version", String::new(), synthbox_synth::version);
    CString::new(version)
        .map(CString::into_raw)
        .unwrap_or(std::ptr::null_mut())
}

/// # Safety
/// `s` must be null or a pointer returned by this library that was not freed yet.
#[no_mangle]
pub unsafe extern "C" fn synthbox_free_string(s: *mut c_char) {
    if !s.is_null() {
        // SAFETY: allocated by CString::into_raw in this module
        drop(unsafe { CString::from_raw(s) });
    }
}
