use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use kernalytics::{Filter, Pair};

/// Filter codes, in menu order.
pub fn filter_from_code(code: u32) -> Option<Filter> {
    Filter::ALL.get(code as usize).copied()
}

#[repr(C)]
pub struct FfiPair {
    pub left: *mut c_char,
    pub right: *mut c_char,
}

impl FfiPair {
    /// Both names are owned by the caller and released with `kern_string_free`.
    pub fn from_pair(pair: &Pair) -> Self {
        let to_c = |name: &str| {
            CString::new(name)
                .map(CString::into_raw)
                .unwrap_or(ptr::null_mut())
        };
        FfiPair {
            left: to_c(&pair.left),
            right: to_c(&pair.right),
        }
    }
}

/// One master's value for a pair. `is_set` is 0 when the master has no
/// explicit value, in which case `value` is 0.
#[repr(C)]
pub struct FfiValue {
    pub is_set: u8,
    pub value: i64,
}

impl From<Option<i64>> for FfiValue {
    fn from(value: Option<i64>) -> Self {
        FfiValue {
            is_set: value.is_some() as u8,
            value: value.unwrap_or(0),
        }
    }
}
