//! Function-pointer binding to the native audio module.
//!
//! Every entry is optional so a partially linked module (or a test double)
//! can be described; a missing entry surfaces as `BackendError::Unavailable`.

use std::ffi::{c_char, c_int, CStr};

/// Zero-argument callback the native module invokes for remote commands.
pub type RemoteCommandCallback = extern "C" fn();

pub type LatencyFn = unsafe extern "C" fn() -> f32;
pub type VoidFn = unsafe extern "C" fn();
pub type StringFn = unsafe extern "C" fn() -> *const c_char;
pub type IntFn = unsafe extern "C" fn() -> c_int;
pub type ReleaseStringFn = unsafe extern "C" fn(*mut c_char);
pub type RegisterRemoteCommandsFn = unsafe extern "C" fn(
    play: RemoteCommandCallback,
    pause: RemoteCommandCallback,
    next_track: RemoteCommandCallback,
    previous_track: RemoteCommandCallback,
    source_changed: RemoteCommandCallback,
);

/// Entry points exported by the native audio module.
#[derive(Clone, Copy, Default)]
pub struct NativeAudioApi {
    pub get_input_latency: Option<LatencyFn>,
    pub get_output_latency: Option<LatencyFn>,
    pub register_remote_commands: Option<RegisterRemoteCommandsFn>,
    pub unregister_remote_commands: Option<VoidFn>,
    pub enable_audio: Option<VoidFn>,
    pub disable_audio: Option<VoidFn>,
    pub get_output_name: Option<StringFn>,
    pub get_output_uid: Option<StringFn>,
    pub get_output_type: Option<IntFn>,
    /// Frees strings returned by `get_output_name` / `get_output_uid`.
    /// `None` means the module returns borrowed static strings.
    pub release_string: Option<ReleaseStringFn>,
}

#[cfg(target_os = "ios")]
mod linked {
    use std::ffi::{c_char, c_int};

    use super::RemoteCommandCallback;

    // All entry points live in the host application image.
    extern "C" {
        pub fn AudioManager_GetInputLatency() -> f32;
        pub fn AudioManager_GetOutputLatency() -> f32;
        pub fn AudioManager_RegisterRemoteCommands(
            play: RemoteCommandCallback,
            pause: RemoteCommandCallback,
            next_track: RemoteCommandCallback,
            previous_track: RemoteCommandCallback,
            source_changed: RemoteCommandCallback,
        );
        pub fn AudioManager_UnregisterRemoteCommands();
        pub fn AudioManager_EnableAudio();
        pub fn AudioManager_DisableAudio();
        pub fn AudioManager_GetOutputName() -> *const c_char;
        pub fn AudioManager_GetOutputUID() -> *const c_char;
        pub fn AudioManager_GetOutputType() -> c_int;
        pub fn free(ptr: *mut c_char);
    }
}

impl NativeAudioApi {
    /// Table bound to the `AudioManager_*` symbols linked into the app.
    ///
    /// The module hands out `strdup`ed strings, released with `free`.
    #[cfg(target_os = "ios")]
    pub fn linked() -> Self {
        Self {
            get_input_latency: Some(linked::AudioManager_GetInputLatency),
            get_output_latency: Some(linked::AudioManager_GetOutputLatency),
            register_remote_commands: Some(linked::AudioManager_RegisterRemoteCommands),
            unregister_remote_commands: Some(linked::AudioManager_UnregisterRemoteCommands),
            enable_audio: Some(linked::AudioManager_EnableAudio),
            disable_audio: Some(linked::AudioManager_DisableAudio),
            get_output_name: Some(linked::AudioManager_GetOutputName),
            get_output_uid: Some(linked::AudioManager_GetOutputUID),
            get_output_type: Some(linked::AudioManager_GetOutputType),
            release_string: Some(linked::free),
        }
    }
}

/// Copy a string returned by the native module and release the original.
///
/// A null pointer reads as the empty string; invalid UTF-8 is replaced.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// until `release` is called on it.
pub(crate) unsafe fn take_native_string(
    ptr: *const c_char,
    release: Option<ReleaseStringFn>,
) -> String {
    if ptr.is_null() {
        return String::new();
    }

    let value = CStr::from_ptr(ptr).to_string_lossy().into_owned();
    if let Some(release) = release {
        release(ptr as *mut c_char);
    }
    value
}
