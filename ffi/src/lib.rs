mod types;

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use kernalytics::{Filter, KerningSession, Pair, SessionBuilder, UfoMaster};

pub use types::{FfiPair, FfiValue};

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = RefCell::new(None);
}

fn set_last_error(err: String) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(err).ok();
    });
}

pub struct KernSessionHandle {
    session: KerningSession<UfoMaster>,
    // pairs of the filter asked for last, so pairs can be fetched by index
    filtered: Option<(Filter, Vec<Pair>)>,
}

impl KernSessionHandle {
    fn filtered(&mut self, filter: Filter) -> &[Pair] {
        let stale = !matches!(&self.filtered, Some((cached, _)) if *cached == filter);
        if stale {
            self.filtered = Some((filter, self.session.filter(filter)));
        }
        match &self.filtered {
            Some((_, pairs)) => pairs,
            None => &[],
        }
    }
}

unsafe fn str_arg<'a>(s: *const c_char, what: &str) -> Option<&'a str> {
    if s.is_null() {
        set_last_error(format!("{} pointer is null", what));
        return None;
    }
    match unsafe { CStr::from_ptr(s) }.to_str() {
        Ok(s) => Some(s),
        Err(e) => {
            set_last_error(format!("Invalid UTF-8 in {}: {}", what, e));
            None
        }
    }
}

unsafe fn pair_arg(left: *const c_char, right: *const c_char) -> Option<Pair> {
    let left = unsafe { str_arg(left, "left") }?;
    let right = unsafe { str_arg(right, "right") }?;
    Some(Pair::new(left, right))
}

/// Load `count` UFO masters and combine their kerning. With `sort` set the
/// masters are ordered by style name first.
#[no_mangle]
pub extern "C" fn kern_session_from_ufos(
    paths: *const *const c_char,
    count: usize,
    sort: bool,
) -> *mut KernSessionHandle {
    if paths.is_null() {
        set_last_error("Paths pointer is null".to_string());
        return ptr::null_mut();
    }

    let paths = unsafe { std::slice::from_raw_parts(paths, count) };
    let mut masters = Vec::with_capacity(count);
    for &path in paths {
        let Some(path) = (unsafe { str_arg(path, "path") }) else {
            return ptr::null_mut();
        };
        match UfoMaster::load(path) {
            Ok(master) => masters.push(master),
            Err(e) => {
                set_last_error(format!("Failed to load {}: {}", path, e));
                return ptr::null_mut();
            }
        }
    }

    let session = SessionBuilder::new().sort_masters(sort).build(masters);
    let handle = Box::new(KernSessionHandle {
        session,
        filtered: None,
    });
    Box::into_raw(handle)
}

#[no_mangle]
pub extern "C" fn kern_master_count(handle: *const KernSessionHandle) -> usize {
    if handle.is_null() {
        set_last_error("Handle is null".to_string());
        return 0;
    }

    let handle = unsafe { &*handle };
    handle.session.masters().len()
}

#[no_mangle]
pub extern "C" fn kern_pair_count(handle: *const KernSessionHandle) -> usize {
    if handle.is_null() {
        set_last_error("Handle is null".to_string());
        return 0;
    }

    let handle = unsafe { &*handle };
    handle.session.map().len()
}

#[no_mangle]
pub extern "C" fn kern_filter_count(handle: *mut KernSessionHandle, filter: u32) -> usize {
    if handle.is_null() {
        set_last_error("Handle is null".to_string());
        return 0;
    }
    let Some(filter) = types::filter_from_code(filter) else {
        set_last_error(format!("Unknown filter {}", filter));
        return 0;
    };

    let handle = unsafe { &mut *handle };
    handle.filtered(filter).len()
}

#[no_mangle]
pub extern "C" fn kern_filter_pair(
    handle: *mut KernSessionHandle,
    filter: u32,
    index: usize,
    out: *mut FfiPair,
) -> i32 {
    if handle.is_null() {
        set_last_error("Handle is null".to_string());
        return -1;
    }

    if out.is_null() {
        set_last_error("Output pointer is null".to_string());
        return -1;
    }

    let Some(filter) = types::filter_from_code(filter) else {
        set_last_error(format!("Unknown filter {}", filter));
        return -1;
    };

    let handle = unsafe { &mut *handle };
    let pair = match handle.filtered(filter).get(index) {
        Some(pair) => pair,
        None => {
            set_last_error(format!("Pair index {} out of bounds", index));
            return -1;
        }
    };

    unsafe {
        *out = FfiPair::from_pair(pair);
    }

    0
}

#[no_mangle]
pub extern "C" fn kern_pair_value(
    handle: *const KernSessionHandle,
    left: *const c_char,
    right: *const c_char,
    master: usize,
    out: *mut FfiValue,
) -> i32 {
    if handle.is_null() {
        set_last_error("Handle is null".to_string());
        return -1;
    }

    if out.is_null() {
        set_last_error("Output pointer is null".to_string());
        return -1;
    }

    let Some(pair) = (unsafe { pair_arg(left, right) }) else {
        return -1;
    };

    let handle = unsafe { &*handle };
    let value = match handle.session.values(&pair) {
        Some(values) => match values.get(master) {
            Some(value) => *value,
            None => {
                set_last_error(format!("Master index {} out of bounds", master));
                return -1;
            }
        },
        None => {
            set_last_error(format!("{} is not kerned", pair));
            return -1;
        }
    };

    unsafe {
        *out = FfiValue::from(value);
    }

    0
}

/// Interpolate master `target` of a pair from its neighbours and store the
/// result in the loaded masters.
#[no_mangle]
pub extern "C" fn kern_interpolate(
    handle: *mut KernSessionHandle,
    left: *const c_char,
    right: *const c_char,
    target: usize,
) -> i32 {
    if handle.is_null() {
        set_last_error("Handle is null".to_string());
        return -1;
    }

    let Some(pair) = (unsafe { pair_arg(left, right) }) else {
        return -1;
    };

    let handle = unsafe { &mut *handle };
    match handle.session.interpolate_pair(&pair, &[target]) {
        Ok(_) => {
            handle.filtered = None;
            0
        }
        Err(e) => {
            set_last_error(format!("Failed to interpolate {}: {}", pair, e));
            -1
        }
    }
}

/// Write every master back to its UFO.
#[no_mangle]
pub extern "C" fn kern_session_save(handle: *const KernSessionHandle) -> i32 {
    if handle.is_null() {
        set_last_error("Handle is null".to_string());
        return -1;
    }

    let handle = unsafe { &*handle };
    for master in handle.session.masters() {
        if let Err(e) = master.save() {
            set_last_error(format!("Failed to save {}: {}", master.path().display(), e));
            return -1;
        }
    }

    0
}

#[no_mangle]
pub extern "C" fn kern_string_free(s: *mut c_char) {
    if !s.is_null() {
        unsafe {
            drop(CString::from_raw(s));
        }
    }
}

#[no_mangle]
pub extern "C" fn kern_session_free(handle: *mut KernSessionHandle) {
    if !handle.is_null() {
        unsafe {
            drop(Box::from_raw(handle));
        }
    }
}

#[no_mangle]
pub extern "C" fn kern_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match e.borrow().as_ref() {
        Some(err) => err.as_ptr(),
        None => ptr::null(),
    })
}
