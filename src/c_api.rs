// C entry points for a host UI. Every call catches panics at the boundary
// and degrades to an empty answer instead of unwinding into C.
use crate::config::EngineConfig;
use crate::core::layout::KeyboardLayout;
use crate::core::types::{Point, Size};
use crate::GestureEngine;
use libc::{c_char, c_double, c_int, size_t};
use std::ffi::{CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

static GESTURE_ENGINE: Mutex<Option<GestureEngine>> = Mutex::new(None);

fn get_snapshot_path() -> PathBuf {
    let mut path = dirs::cache_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    path.push("kana-gesture-engine");
    path.push("index.bin");
    path
}

fn into_c_string(s: String) -> *mut c_char {
    CString::new(s.replace('\0', ""))
        .unwrap_or_default()
        .into_raw()
}

fn with_engine<T>(f: impl FnOnce(&mut GestureEngine) -> T) -> Option<T> {
    let mut guard = GESTURE_ENGINE.lock().unwrap_or_else(PoisonError::into_inner);
    guard.as_mut().map(f)
}

/// Routes library logs to stderr; honours `RUST_LOG`.
#[no_mangle]
pub extern "C" fn kana_gesture_init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .try_init();
}

/// Builds (or reloads from the snapshot cache) the engine for a keyboard of
/// `width` × `height`. Returns 1 on success, 0 on failure.
///
/// # Safety
/// `vocabulary_path` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn kana_gesture_engine_init(
    vocabulary_path: *const c_char,
    width: c_double,
    height: c_double,
) -> c_int {
    let vocabulary_path = if vocabulary_path.is_null() {
        String::new()
    } else {
        CStr::from_ptr(vocabulary_path).to_string_lossy().into_owned()
    };

    let result = catch_unwind(|| {
        GestureEngine::from_snapshot_or_vocabulary(
            EngineConfig::default(),
            KeyboardLayout::default(),
            Size::new(width, height),
            &get_snapshot_path(),
            Path::new(&vocabulary_path),
        )
    });

    match result {
        Ok(Ok(engine)) => {
            log::info!("Gesture engine initialized with {} entries", engine.index().len());
            *GESTURE_ENGINE.lock().unwrap_or_else(PoisonError::into_inner) = Some(engine);
            1
        }
        Ok(Err(e)) => {
            log::error!("Gesture engine initialization failed: {e}");
            0
        }
        Err(_) => {
            log::error!("A panic occurred during gesture engine initialization");
            0
        }
    }
}

#[no_mangle]
pub extern "C" fn kana_gesture_engine_destroy() {
    let engine = GESTURE_ENGINE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
    if engine.is_some() {
        log::info!("Gesture engine destroyed");
    }
}

/// Re-resolves the layout after the keyboard surface changed size.
#[no_mangle]
pub extern "C" fn kana_gesture_resize(width: c_double, height: c_double) {
    let result = catch_unwind(AssertUnwindSafe(|| {
        with_engine(|engine| engine.resize(Size::new(width, height)))
    }));
    if result.is_err() {
        log::error!("Panic in resize");
    }
}

/// Recognizes the trace given as parallel coordinate arrays and returns a
/// JSON array of `{ "text", "confidence" }`, best first. The string must be
/// released with `kana_gesture_free_string`.
///
/// # Safety
/// `xs` and `ys` must each point to `len` readable doubles, or be null.
#[no_mangle]
pub unsafe extern "C" fn kana_gesture_recognize(
    xs: *const c_double,
    ys: *const c_double,
    len: size_t,
) -> *mut c_char {
    let trace: Vec<Point> = if xs.is_null() || ys.is_null() || len == 0 {
        Vec::new()
    } else {
        let xs = std::slice::from_raw_parts(xs, len);
        let ys = std::slice::from_raw_parts(ys, len);
        xs.iter().zip(ys).map(|(&x, &y)| Point::new(x, y)).collect()
    };

    let result = catch_unwind(AssertUnwindSafe(|| {
        with_engine(|engine| engine.recognize(&trace))
            .and_then(|candidates| serde_json::to_string(&candidates).ok())
            .unwrap_or_else(|| "[]".to_string())
    }));
    let json = result.unwrap_or_else(|_| {
        log::error!("Panic in recognize");
        "[]".to_string()
    });
    into_c_string(json)
}

/// # Safety
/// `s` must be null or a pointer returned by `kana_gesture_recognize`.
#[no_mangle]
pub unsafe extern "C" fn kana_gesture_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
