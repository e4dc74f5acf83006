#![allow(clippy::missing_safety_doc)]

use std::ffi::c_void;
use std::sync::{Arc, OnceLock};

use focus_arbiter_core::{
    FocusCfg, FocusChange, FocusChangeListener, FocusGrant, FocusRequest, PolicyTier, StreamDescriptor, StreamId,
};
use focus_arbiter_supervisor::FocusArbiter;

/// FFI ABI version for focus_arbiter_ffi.
///
/// Bump this when any `#[repr(C)]` struct layout or exported function signature changes.
pub const FOCUS_ARBITER_FFI_VERSION: u32 = 1;

#[no_mangle]
pub extern "C" fn focus_arbiter_ffi_version() -> u32 {
    FOCUS_ARBITER_FFI_VERSION
}

/// Request granted (or already held).
pub const FOCUS_REQUEST_SUCCESS: i32 = 0;
/// Invalid request: null handle, null callback.
pub const FOCUS_REQUEST_FAIL: i32 = -1;
/// Queued; a `FOCUS_GAIN` callback follows once the stream is promoted.
pub const FOCUS_REQUEST_DELAY: i32 = -2;

pub const FOCUS_GAIN: i32 = 1;
pub const FOCUS_GAIN_TRANSIENT: i32 = 2;
pub const FOCUS_LOSS: i32 = 3;
pub const FOCUS_LOSS_TRANSIENT: i32 = 4;

/// Opaque handle exposed over FFI.
pub struct FocusArbiterHandle {
    inner: FocusArbiter,
}

/// Stream identity + policy as seen from C.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FocusStreamInfo {
    pub id: u64,
    pub tier: i32,
}

impl From<StreamDescriptor> for FocusStreamInfo {
    fn from(s: StreamDescriptor) -> Self {
        FocusStreamInfo { id: s.id.0, tier: s.tier.0 }
    }
}

impl From<FocusStreamInfo> for StreamDescriptor {
    fn from(s: FocusStreamInfo) -> Self {
        StreamDescriptor {
            id: StreamId(s.id),
            tier: PolicyTier(s.tier),
        }
    }
}

/// Arbiter cfg for FFI.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct FocusCfgC {
    pub assistant_threshold: i32,
    pub baseline: FocusStreamInfo,
}

/// Focus change callback: `(user_data, stream_id, change)` where `change` is one of `FOCUS_GAIN*` / `FOCUS_LOSS*`.
pub type FocusChangeCallback = extern "C" fn(user_data: *mut c_void, stream_id: u64, change: i32);

struct CallbackListener {
    stream: u64,
    callback: FocusChangeCallback,
    user_data: *mut c_void,
}

// The C caller promises `user_data` is usable from any thread that calls into the arbiter.
unsafe impl Send for CallbackListener {}
unsafe impl Sync for CallbackListener {}

impl FocusChangeListener for CallbackListener {
    fn on_focus_change(&self, change: FocusChange) {
        (self.callback)(self.user_data, self.stream, change.code());
    }
}

fn grant_code(r: Result<FocusGrant, focus_arbiter_core::FocusError>) -> i32 {
    match r {
        Ok(FocusGrant::Granted) => FOCUS_REQUEST_SUCCESS,
        Ok(FocusGrant::Delayed) => FOCUS_REQUEST_DELAY,
        Err(_) => FOCUS_REQUEST_FAIL,
    }
}

fn build_request(info: FocusStreamInfo, callback: Option<FocusChangeCallback>, user_data: *mut c_void) -> FocusRequest {
    let stream = StreamDescriptor::from(info);
    match callback {
        Some(callback) => FocusRequest::new(
            stream,
            Arc::new(CallbackListener {
                stream: info.id,
                callback,
                user_data,
            }),
        ),
        None => FocusRequest::unbound(stream),
    }
}

fn request_on(
    arbiter: &FocusArbiter,
    info: FocusStreamInfo,
    callback: Option<FocusChangeCallback>,
    user_data: *mut c_void,
    transient: bool,
) -> i32 {
    let req = build_request(info, callback, user_data);
    grant_code(arbiter.request_focus_with(&req, transient))
}

#[no_mangle]
pub extern "C" fn focus_arbiter_cfg_default() -> FocusCfgC {
    let d = FocusCfg::default();
    FocusCfgC {
        assistant_threshold: d.assistant_threshold.0,
        baseline: d.baseline.into(),
    }
}

fn cfg_from_ffi(c: FocusCfgC) -> FocusCfg {
    FocusCfg {
        assistant_threshold: PolicyTier(c.assistant_threshold),
        baseline: c.baseline.into(),
    }
}

/// Create a new arbiter handle.
///
/// This library does not spawn threads. Callbacks run on the calling thread
/// before the request or abandon call returns.
#[no_mangle]
pub extern "C" fn focus_arbiter_new(cfg: FocusCfgC) -> *mut FocusArbiterHandle {
    let handle = FocusArbiterHandle {
        inner: FocusArbiter::new(cfg_from_ffi(cfg)),
    };
    Box::into_raw(Box::new(handle))
}

#[no_mangle]
pub unsafe extern "C" fn focus_arbiter_free(h: *mut FocusArbiterHandle) {
    if !h.is_null() {
        drop(Box::from_raw(h));
    }
}

unsafe fn handle<'a>(h: *const FocusArbiterHandle) -> Option<&'a FocusArbiter> {
    h.as_ref().map(|h| &h.inner)
}

#[no_mangle]
pub unsafe extern "C" fn focus_arbiter_request(
    h: *const FocusArbiterHandle,
    info: FocusStreamInfo,
    callback: Option<FocusChangeCallback>,
    user_data: *mut c_void,
) -> i32 {
    match handle(h) {
        Some(a) => request_on(a, info, callback, user_data, false),
        None => FOCUS_REQUEST_FAIL,
    }
}

#[no_mangle]
pub unsafe extern "C" fn focus_arbiter_request_transient(
    h: *const FocusArbiterHandle,
    info: FocusStreamInfo,
    callback: Option<FocusChangeCallback>,
    user_data: *mut c_void,
) -> i32 {
    match handle(h) {
        Some(a) => request_on(a, info, callback, user_data, true),
        None => FOCUS_REQUEST_FAIL,
    }
}

/// Abandon by stream id. Unknown ids succeed.
#[no_mangle]
pub unsafe extern "C" fn focus_arbiter_abandon(h: *const FocusArbiterHandle, stream_id: u64) -> i32 {
    match handle(h) {
        Some(a) => {
            a.abandon_stream(StreamId(stream_id));
            FOCUS_REQUEST_SUCCESS
        }
        None => FOCUS_REQUEST_FAIL,
    }
}

/// Stream holding focus; the cfg baseline when idle. A null handle yields the default baseline.
#[no_mangle]
pub unsafe extern "C" fn focus_arbiter_current(h: *const FocusArbiterHandle) -> FocusStreamInfo {
    match handle(h) {
        Some(a) => a.current_stream().into(),
        None => StreamDescriptor::BASELINE.into(),
    }
}

/// Copy the queue (front first) into `out[..cap]`.
///
/// Returns the total number of queued streams, which may exceed `cap`.
/// Pass `out = NULL, cap = 0` to size the buffer.
#[no_mangle]
pub unsafe extern "C" fn focus_arbiter_queue_snapshot(
    h: *const FocusArbiterHandle,
    out: *mut FocusStreamInfo,
    cap: usize,
) -> usize {
    let Some(a) = handle(h) else {
        return 0;
    };
    let snap = a.snapshot();
    if !out.is_null() && cap > 0 {
        let dst = std::slice::from_raw_parts_mut(out, cap);
        for (slot, s) in dst.iter_mut().zip(snap.streams.iter()) {
            *slot = (*s).into();
        }
    }
    snap.streams.len()
}

// ---------------------------------------------------------------------
// Process-wide arbiter: built on first use, lives until exit.
// ---------------------------------------------------------------------

static GLOBAL: OnceLock<FocusArbiter> = OnceLock::new();

fn global() -> &'static FocusArbiter {
    GLOBAL.get_or_init(|| {
        tracing::debug!("process-wide focus arbiter created");
        FocusArbiter::default()
    })
}

#[no_mangle]
pub extern "C" fn focus_global_request(
    info: FocusStreamInfo,
    callback: Option<FocusChangeCallback>,
    user_data: *mut c_void,
) -> i32 {
    request_on(global(), info, callback, user_data, false)
}

#[no_mangle]
pub extern "C" fn focus_global_request_transient(
    info: FocusStreamInfo,
    callback: Option<FocusChangeCallback>,
    user_data: *mut c_void,
) -> i32 {
    request_on(global(), info, callback, user_data, true)
}

#[no_mangle]
pub extern "C" fn focus_global_abandon(stream_id: u64) -> i32 {
    global().abandon_stream(StreamId(stream_id));
    FOCUS_REQUEST_SUCCESS
}

#[no_mangle]
pub extern "C" fn focus_global_current() -> FocusStreamInfo {
    global().current_stream().into()
}
