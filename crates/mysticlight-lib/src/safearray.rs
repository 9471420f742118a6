//! Native layouts for the SDK's array and string types.
//!
//! The SDK hands collections back as one-dimensional COM `SAFEARRAY`s of
//! `BSTR`, including numeric values such as LED counts. The structs here
//! mirror the ABI layout so a `SAFEARRAY*` returned by the DLL can be read in
//! place. Ownership (destroying the array, freeing strings) is handled by the
//! native backend; this module only reads.

use std::ffi::c_void;
use std::fmt;

use crate::sdk::DeviceDescriptor;

/// `FADF_BSTR`: the array holds BSTRs and frees them on destroy.
pub const FADF_BSTR: u16 = 0x0100;

/// `SAFEARRAYBOUND`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct SafeArrayBound {
    pub c_elements: u32,
    pub l_lbound: i32,
}

/// `SAFEARRAY` with a single bound, which is all the SDK ever produces.
#[repr(C)]
#[derive(Debug)]
pub struct SafeArray {
    pub c_dims: u16,
    pub f_features: u16,
    pub cb_elements: u32,
    pub c_locks: u32,
    pub pv_data: *mut c_void,
    pub rgsabound: [SafeArrayBound; 1],
}

impl SafeArray {
    pub fn len(&self) -> usize {
        self.rgsabound[0].c_elements as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn holds_bstr(&self) -> bool {
        self.f_features & FADF_BSTR != 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarshalError {
    /// The SDK reported success but left the out-pointer null.
    NullArray,
    /// Non-empty array with no data pointer.
    NullData,
    /// Only one-dimensional arrays are understood.
    Dimensions(u16),
    ElementSize {
        expected: usize,
        actual: u32,
    },
    /// A numeric value delivered as a string did not parse.
    NotANumber(String),
    /// Two arrays that must be parallel differ in length.
    LengthMismatch {
        left: usize,
        right: usize,
    },
    /// Allocating or filling an outgoing array failed.
    Build(String),
}

impl fmt::Display for MarshalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarshalError::NullArray => write!(f, "SDK returned a null array"),
            MarshalError::NullData => write!(f, "SDK returned an array without data"),
            MarshalError::Dimensions(d) => {
                write!(f, "expected a one-dimensional array, got {d} dimensions")
            }
            MarshalError::ElementSize { expected, actual } => write!(
                f,
                "unexpected array element size: {actual} bytes (expected {expected})"
            ),
            MarshalError::NotANumber(s) => write!(f, "expected a number, got \"{s}\""),
            MarshalError::LengthMismatch { left, right } => {
                write!(f, "array length mismatch: {left} vs {right}")
            }
            MarshalError::Build(e) => write!(f, "failed to build array: {e}"),
        }
    }
}

impl std::error::Error for MarshalError {}

/// Copy a BSTR into an owned `String`.
///
/// A null BSTR is the empty string. The length comes from the 4-byte byte
/// count stored immediately before the first character, so embedded NULs
/// are preserved.
///
/// # Safety
/// `bstr` must be null or point at the first character of a valid BSTR.
pub unsafe fn bstr_to_string(bstr: *const u16) -> String {
    if bstr.is_null() {
        return String::new();
    }
    // SAFETY: a BSTR is preceded by its u32 byte length; caller guarantees validity.
    unsafe {
        let byte_len = bstr.cast::<u8>().sub(4).cast::<u32>().read_unaligned();
        let units = std::slice::from_raw_parts(bstr, (byte_len / 2) as usize);
        String::from_utf16_lossy(units)
    }
}

/// Read a one-dimensional `SAFEARRAY` of BSTR into owned strings.
///
/// # Safety
/// `psa` must be null or point to a valid SAFEARRAY whose `pvData` holds
/// `rgsabound[0].cElements` BSTR pointers.
pub unsafe fn read_bstr_vector(psa: *const SafeArray) -> Result<Vec<String>, MarshalError> {
    // SAFETY: caller guarantees psa is null or valid.
    let Some(sa) = (unsafe { psa.as_ref() }) else {
        return Err(MarshalError::NullArray);
    };
    if sa.c_dims != 1 {
        return Err(MarshalError::Dimensions(sa.c_dims));
    }
    let expected = std::mem::size_of::<*const u16>();
    if sa.cb_elements as usize != expected {
        return Err(MarshalError::ElementSize {
            expected,
            actual: sa.cb_elements,
        });
    }
    if sa.is_empty() {
        return Ok(Vec::new());
    }
    if sa.pv_data.is_null() {
        return Err(MarshalError::NullData);
    }
    if !sa.holds_bstr() {
        log::debug!("SAFEARRAY without FADF_BSTR (features 0x{:04X})", sa.f_features);
    }
    // SAFETY: pvData holds len() BSTR pointers per the caller contract.
    let data = sa.pv_data as *const *const u16;
    let elements = unsafe { std::slice::from_raw_parts(data, sa.len()) };
    // SAFETY: each element is null or a valid BSTR.
    Ok(elements.iter().map(|&b| unsafe { bstr_to_string(b) }).collect())
}

/// Parse a numeric value the SDK delivered as a string.
pub fn parse_count(s: &str) -> Result<u32, MarshalError> {
    s.trim()
        .parse()
        .map_err(|_| MarshalError::NotANumber(s.to_string()))
}

/// Pair the two parallel arrays from `MLAPI_GetDeviceInfo`: device types and
/// their LED counts, which arrive as strings.
pub fn pair_device_info(
    types: Vec<String>,
    counts: Vec<String>,
) -> Result<Vec<DeviceDescriptor>, MarshalError> {
    if types.len() != counts.len() {
        return Err(MarshalError::LengthMismatch {
            left: types.len(),
            right: counts.len(),
        });
    }
    types
        .into_iter()
        .zip(counts)
        .map(|(device_type, count)| {
            Ok(DeviceDescriptor {
                device_type,
                led_count: parse_count(&count)?,
            })
        })
        .collect()
}
