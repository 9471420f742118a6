//! Windows backend: the vendor DLL loaded at runtime.
//!
//! Every entry point is resolved once in [`NativeSdk::load`]. Strings go in as
//! BSTRs allocated with the COM allocator; BSTRs and SAFEARRAYs coming back
//! are copied into owned Rust values and then freed here.

use std::ffi::c_void;
use std::path::Path;
use std::ptr;

use libloading::Library;
use windows::Win32::System::Com::SAFEARRAY;
use windows::Win32::System::Ole::{SafeArrayCreateVector, SafeArrayDestroy, SafeArrayPutElement};
use windows::Win32::System::Variant::VT_BSTR;
use windows_core::BSTR;

use super::*;
use crate::safearray::{MarshalError, SafeArray, bstr_to_string, pair_device_info, read_bstr_vector};

type Bstr = *const u16;
type OutArray = *mut *mut SafeArray;

type FnNoArgs = unsafe extern "C" fn() -> i32;
type FnErrorMessage = unsafe extern "C" fn(i32, *mut Bstr) -> i32;
type FnDeviceInfo = unsafe extern "C" fn(OutArray, OutArray) -> i32;
type FnDeviceName = unsafe extern "C" fn(Bstr, OutArray) -> i32;
type FnBstrOut = unsafe extern "C" fn(Bstr, u32, *mut Bstr) -> i32;
type FnLedInfo = unsafe extern "C" fn(Bstr, u32, *mut Bstr, OutArray) -> i32;
type FnLedColor = unsafe extern "C" fn(Bstr, u32, *mut u32, *mut u32, *mut u32) -> i32;
type FnDwordOut = unsafe extern "C" fn(Bstr, u32, *mut u32) -> i32;
type FnSetLedColor = unsafe extern "C" fn(Bstr, u32, u32, u32, u32) -> i32;
type FnSetBstr = unsafe extern "C" fn(Bstr, u32, Bstr) -> i32;
type FnSetDword = unsafe extern "C" fn(Bstr, u32, u32) -> i32;
type FnSetColorsSync = unsafe extern "C" fn(Bstr, u32, u32, u32) -> i32;
type FnSetLedColors =
    unsafe extern "C" fn(Bstr, u32, OutArray, *mut u32, *mut u32, *mut u32) -> i32;
type FnSetLedColorEx = unsafe extern "C" fn(Bstr, u32, Bstr, u32, u32, u32, u32) -> i32;

/// A SAFEARRAY this process must destroy.
struct OwnedArray(*mut SafeArray);

impl OwnedArray {
    fn null() -> Self {
        OwnedArray(ptr::null_mut())
    }

    /// Read as BSTR strings; the array itself is destroyed on drop.
    fn strings(&self) -> Result<Vec<String>> {
        // SAFETY: the pointer is null or was produced by the SDK / SafeArrayCreateVector.
        Ok(unsafe { read_bstr_vector(self.0) }?)
    }
}

impl Drop for OwnedArray {
    fn drop(&mut self) {
        if self.0.is_null() {
            return;
        }
        // SAFETY: non-null pointer to a SAFEARRAY allocated by the COM allocator.
        if let Err(e) = unsafe { SafeArrayDestroy(self.0 as *const SAFEARRAY) } {
            log::warn!("SafeArrayDestroy failed: {e}");
        }
    }
}

/// Copy an SDK-returned BSTR and free it.
///
/// # Safety
/// `raw` must be null or a BSTR the caller owns.
unsafe fn take_bstr(raw: Bstr) -> String {
    if raw.is_null() {
        return String::new();
    }
    // SAFETY: caller passes ownership of a valid BSTR; dropping BSTR frees it.
    unsafe {
        let s = bstr_to_string(raw);
        drop(BSTR::from_raw(raw));
        s
    }
}

/// Copy `*sym` out of the library.
///
/// # Safety
/// `T` must be the function pointer type matching the exported symbol.
unsafe fn symbol<T: Copy>(lib: &Library, name: &'static str) -> Result<T> {
    // SAFETY: caller guarantees T matches the export's signature.
    let sym = unsafe { lib.get::<T>(name.as_bytes()) }
        .map_err(|e| SdkError::MissingSymbol(format!("{name}: {e}")))?;
    Ok(*sym)
}

pub struct NativeSdk {
    initialize: FnNoArgs,
    release: FnNoArgs,
    get_error_message: FnErrorMessage,
    get_device_info: FnDeviceInfo,
    get_device_name: FnDeviceName,
    get_device_name_ex: FnBstrOut,
    get_led_info: FnLedInfo,
    get_led_color: FnLedColor,
    get_led_style: FnBstrOut,
    get_led_max_bright: FnDwordOut,
    get_led_bright: FnDwordOut,
    get_led_max_speed: FnDwordOut,
    get_led_speed: FnDwordOut,
    set_led_color: FnSetLedColor,
    set_led_style: FnSetBstr,
    set_led_bright: FnSetDword,
    set_led_speed: FnSetDword,
    set_led_colors_sync: FnSetColorsSync,
    set_led_colors: FnSetLedColors,
    set_led_color_ex: FnSetLedColorEx,
    /// Keeps the function pointers above valid.
    _library: Library,
}

impl NativeSdk {
    /// Load the DLL and resolve all entry points.
    pub fn load(path: &Path) -> Result<Self> {
        // SAFETY: loading runs the DLL's initializers; the path was chosen by the user.
        let library = unsafe { Library::new(path) }
            .map_err(|e| SdkError::LoadFailed(format!("{}: {e}", path.display())))?;

        // SAFETY: each type alias mirrors the SDK header declaration of that export.
        unsafe {
            Ok(NativeSdk {
                initialize: symbol(&library, MLAPI_INITIALIZE)?,
                release: symbol(&library, MLAPI_RELEASE)?,
                get_error_message: symbol(&library, MLAPI_GET_ERROR_MESSAGE)?,
                get_device_info: symbol(&library, MLAPI_GET_DEVICE_INFO)?,
                get_device_name: symbol(&library, MLAPI_GET_DEVICE_NAME)?,
                get_device_name_ex: symbol(&library, MLAPI_GET_DEVICE_NAME_EX)?,
                get_led_info: symbol(&library, MLAPI_GET_LED_INFO)?,
                get_led_color: symbol(&library, MLAPI_GET_LED_COLOR)?,
                get_led_style: symbol(&library, MLAPI_GET_LED_STYLE)?,
                get_led_max_bright: symbol(&library, MLAPI_GET_LED_MAX_BRIGHT)?,
                get_led_bright: symbol(&library, MLAPI_GET_LED_BRIGHT)?,
                get_led_max_speed: symbol(&library, MLAPI_GET_LED_MAX_SPEED)?,
                get_led_speed: symbol(&library, MLAPI_GET_LED_SPEED)?,
                set_led_color: symbol(&library, MLAPI_SET_LED_COLOR)?,
                set_led_style: symbol(&library, MLAPI_SET_LED_STYLE)?,
                set_led_bright: symbol(&library, MLAPI_SET_LED_BRIGHT)?,
                set_led_speed: symbol(&library, MLAPI_SET_LED_SPEED)?,
                set_led_colors_sync: symbol(&library, MLAPI_SET_LED_COLORS_SYNC)?,
                set_led_colors: symbol(&library, MLAPI_SET_LED_COLORS)?,
                set_led_color_ex: symbol(&library, MLAPI_SET_LED_COLOR_EX)?,
                _library: library,
            })
        }
    }

    fn bstr_out(
        &self,
        call: &'static str,
        f: FnBstrOut,
        device_type: &str,
        index: u32,
    ) -> Result<String> {
        let t = BSTR::from(device_type);
        let mut out: Bstr = ptr::null();
        // SAFETY: t outlives the call; out receives an SDK-allocated BSTR.
        let status = unsafe { f(t.as_ptr(), index, &mut out) };
        // SAFETY: we own whatever the SDK wrote to `out`, even on failure.
        let value = unsafe { take_bstr(out) };
        self.check(call, status)?;
        Ok(value)
    }

    fn dword_out(
        &self,
        call: &'static str,
        f: FnDwordOut,
        device_type: &str,
        index: u32,
    ) -> Result<u32> {
        let t = BSTR::from(device_type);
        let mut level: u32 = 0;
        // SAFETY: t outlives the call; level is a valid DWORD out-pointer.
        let status = unsafe { f(t.as_ptr(), index, &mut level) };
        self.check(call, status)?;
        Ok(level)
    }

    fn set_dword(
        &self,
        call: &'static str,
        f: FnSetDword,
        device_type: &str,
        index: u32,
        level: u32,
    ) -> Result<()> {
        let t = BSTR::from(device_type);
        // SAFETY: t outlives the call.
        let status = unsafe { f(t.as_ptr(), index, level) };
        self.check(call, status)
    }
}

/// Build a SAFEARRAY of BSTR for `MLAPI_SetLedColors`.
fn bstr_array(values: &[String]) -> Result<OwnedArray> {
    // SAFETY: plain allocation; a null return is handled below.
    let psa = unsafe { SafeArrayCreateVector(VT_BSTR, 0, values.len() as u32) };
    if psa.is_null() {
        return Err(MarshalError::Build("SafeArrayCreateVector returned null".into()).into());
    }
    let array = OwnedArray(psa as *mut SafeArray);
    for (i, value) in values.iter().enumerate() {
        let b = BSTR::from(value.as_str());
        let idx = i as i32;
        // SAFETY: psa is a one-dimensional BSTR vector of len values.len(); PutElement copies.
        unsafe { SafeArrayPutElement(psa, &idx, b.as_ptr() as *const c_void) }
            .map_err(|e| MarshalError::Build(format!("SafeArrayPutElement: {e}")))?;
    }
    Ok(array)
}

impl LightingSdk for NativeSdk {
    fn initialize(&self) -> Result<()> {
        // SAFETY: no arguments.
        let status = unsafe { (self.initialize)() };
        self.check(MLAPI_INITIALIZE, status)
    }

    fn release(&self) -> Result<()> {
        // SAFETY: no arguments.
        let status = unsafe { (self.release)() };
        self.check(MLAPI_RELEASE, status)
    }

    fn error_message(&self, code: i32) -> Result<String> {
        let mut out: Bstr = ptr::null();
        // SAFETY: out receives an SDK-allocated BSTR.
        let status = unsafe { (self.get_error_message)(code, &mut out) };
        // SAFETY: we own the returned BSTR.
        let message = unsafe { take_bstr(out) };
        if status != MLAPI_OK {
            // No check() here: it would recurse into this lookup.
            let status = Status::from_code(status);
            return Err(SdkError::Call {
                call: MLAPI_GET_ERROR_MESSAGE,
                status,
                message: status.describe(),
            });
        }
        Ok(message)
    }

    fn device_info(&self) -> Result<Vec<DeviceDescriptor>> {
        let mut types = OwnedArray::null();
        let mut counts = OwnedArray::null();
        // SAFETY: both out-pointers receive SDK-allocated SAFEARRAYs owned by the guards.
        let status = unsafe { (self.get_device_info)(&mut types.0, &mut counts.0) };
        self.check(MLAPI_GET_DEVICE_INFO, status)?;

        Ok(pair_device_info(types.strings()?, counts.strings()?)?)
    }

    fn device_name(&self, device_type: &str) -> Result<Vec<String>> {
        let t = BSTR::from(device_type);
        let mut names = OwnedArray::null();
        // SAFETY: t outlives the call; names owns the returned array.
        let status = unsafe { (self.get_device_name)(t.as_ptr(), &mut names.0) };
        self.check(MLAPI_GET_DEVICE_NAME, status)?;
        names.strings()
    }

    fn device_name_ex(&self, device_type: &str, index: u32) -> Result<String> {
        self.bstr_out(
            MLAPI_GET_DEVICE_NAME_EX,
            self.get_device_name_ex,
            device_type,
            index,
        )
    }

    fn led_info(&self, device_type: &str, index: u32) -> Result<LedInfo> {
        let t = BSTR::from(device_type);
        let mut name: Bstr = ptr::null();
        let mut styles = OwnedArray::null();
        // SAFETY: t outlives the call; name and styles receive SDK allocations we own.
        let status = unsafe { (self.get_led_info)(t.as_ptr(), index, &mut name, &mut styles.0) };
        // SAFETY: we own the returned BSTR.
        let name = unsafe { take_bstr(name) };
        self.check(MLAPI_GET_LED_INFO, status)?;
        Ok(LedInfo {
            name,
            styles: styles.strings()?,
        })
    }

    fn led_color(&self, device_type: &str, index: u32) -> Result<Rgb> {
        let t = BSTR::from(device_type);
        let (mut r, mut g, mut b) = (0u32, 0u32, 0u32);
        // SAFETY: t outlives the call; r, g, b are valid DWORD out-pointers.
        let status = unsafe { (self.get_led_color)(t.as_ptr(), index, &mut r, &mut g, &mut b) };
        self.check(MLAPI_GET_LED_COLOR, status)?;
        Ok(Rgb::new(r, g, b))
    }

    fn led_style(&self, device_type: &str, index: u32) -> Result<String> {
        self.bstr_out(MLAPI_GET_LED_STYLE, self.get_led_style, device_type, index)
    }

    fn led_max_bright(&self, device_type: &str, index: u32) -> Result<u32> {
        self.dword_out(
            MLAPI_GET_LED_MAX_BRIGHT,
            self.get_led_max_bright,
            device_type,
            index,
        )
    }

    fn led_bright(&self, device_type: &str, index: u32) -> Result<u32> {
        self.dword_out(MLAPI_GET_LED_BRIGHT, self.get_led_bright, device_type, index)
    }

    fn led_max_speed(&self, device_type: &str, index: u32) -> Result<u32> {
        self.dword_out(
            MLAPI_GET_LED_MAX_SPEED,
            self.get_led_max_speed,
            device_type,
            index,
        )
    }

    fn led_speed(&self, device_type: &str, index: u32) -> Result<u32> {
        self.dword_out(MLAPI_GET_LED_SPEED, self.get_led_speed, device_type, index)
    }

    fn set_led_color(&self, device_type: &str, index: u32, color: Rgb) -> Result<()> {
        let t = BSTR::from(device_type);
        // SAFETY: t outlives the call.
        let status = unsafe { (self.set_led_color)(t.as_ptr(), index, color.r, color.g, color.b) };
        self.check(MLAPI_SET_LED_COLOR, status)
    }

    fn set_led_style(&self, device_type: &str, index: u32, style: &str) -> Result<()> {
        let t = BSTR::from(device_type);
        let s = BSTR::from(style);
        // SAFETY: t and s outlive the call; the SDK does not take ownership.
        let status = unsafe { (self.set_led_style)(t.as_ptr(), index, s.as_ptr()) };
        self.check(MLAPI_SET_LED_STYLE, status)
    }

    fn set_led_bright(&self, device_type: &str, index: u32, level: u32) -> Result<()> {
        self.set_dword(
            MLAPI_SET_LED_BRIGHT,
            self.set_led_bright,
            device_type,
            index,
            level,
        )
    }

    fn set_led_speed(&self, device_type: &str, index: u32, level: u32) -> Result<()> {
        self.set_dword(
            MLAPI_SET_LED_SPEED,
            self.set_led_speed,
            device_type,
            index,
            level,
        )
    }

    fn set_led_colors_sync(&self, device_type: &str, color: Rgb) -> Result<()> {
        let t = BSTR::from(device_type);
        // SAFETY: t outlives the call.
        let status = unsafe { (self.set_led_colors_sync)(t.as_ptr(), color.r, color.g, color.b) };
        self.check(MLAPI_SET_LED_COLORS_SYNC, status)
    }

    fn set_led_colors(
        &self,
        device_type: &str,
        index: u32,
        led_names: &[String],
        colors: &[Rgb],
    ) -> Result<()> {
        let (mut r, mut g, mut b) = split_channels(led_names, colors)?;
        let t = BSTR::from(device_type);
        let mut names = bstr_array(led_names)?;
        // SAFETY: t, names and the channel vectors all outlive the call; the
        // channel arrays have led_names.len() elements each.
        let status = unsafe {
            (self.set_led_colors)(
                t.as_ptr(),
                index,
                &mut names.0,
                r.as_mut_ptr(),
                g.as_mut_ptr(),
                b.as_mut_ptr(),
            )
        };
        self.check(MLAPI_SET_LED_COLORS, status)
    }

    fn set_led_color_ex(
        &self,
        device_type: &str,
        index: u32,
        led_name: &str,
        color: Rgb,
        sync: bool,
    ) -> Result<()> {
        let t = BSTR::from(device_type);
        let n = BSTR::from(led_name);
        // SAFETY: t and n outlive the call.
        let status = unsafe {
            (self.set_led_color_ex)(
                t.as_ptr(),
                index,
                n.as_ptr(),
                color.r,
                color.g,
                color.b,
                u32::from(sync),
            )
        };
        self.check(MLAPI_SET_LED_COLOR_EX, status)
    }
}
