//! SDK access: trait + Windows backend.
//!
//! [`LightingSdk`] has one method per `MLAPI_*` entry point. The Windows
//! backend loads the vendor DLL at runtime; other platforms get a stub that
//! fails every call, and [`mock::MockSdk`] backs the tests.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::led::Rgb;
use crate::safearray::MarshalError;
use crate::status::{MLAPI_OK, Status};

#[doc(hidden)]
pub mod mock;
#[cfg(windows)]
mod native;

// ── Entry point names ──

pub const MLAPI_INITIALIZE: &str = "MLAPI_Initialize";
pub const MLAPI_RELEASE: &str = "MLAPI_Release";
pub const MLAPI_GET_ERROR_MESSAGE: &str = "MLAPI_GetErrorMessage";
pub const MLAPI_GET_DEVICE_INFO: &str = "MLAPI_GetDeviceInfo";
pub const MLAPI_GET_DEVICE_NAME: &str = "MLAPI_GetDeviceName";
pub const MLAPI_GET_DEVICE_NAME_EX: &str = "MLAPI_GetDeviceNameEx";
pub const MLAPI_GET_LED_INFO: &str = "MLAPI_GetLedInfo";
pub const MLAPI_GET_LED_COLOR: &str = "MLAPI_GetLedColor";
pub const MLAPI_GET_LED_STYLE: &str = "MLAPI_GetLedStyle";
pub const MLAPI_GET_LED_MAX_BRIGHT: &str = "MLAPI_GetLedMaxBright";
pub const MLAPI_GET_LED_BRIGHT: &str = "MLAPI_GetLedBright";
pub const MLAPI_GET_LED_MAX_SPEED: &str = "MLAPI_GetLedMaxSpeed";
pub const MLAPI_GET_LED_SPEED: &str = "MLAPI_GetLedSpeed";
pub const MLAPI_SET_LED_COLOR: &str = "MLAPI_SetLedColor";
pub const MLAPI_SET_LED_STYLE: &str = "MLAPI_SetLedStyle";
pub const MLAPI_SET_LED_BRIGHT: &str = "MLAPI_SetLedBright";
pub const MLAPI_SET_LED_SPEED: &str = "MLAPI_SetLedSpeed";
pub const MLAPI_SET_LED_COLORS_SYNC: &str = "MLAPI_SetLedColorsSync";
pub const MLAPI_SET_LED_COLORS: &str = "MLAPI_SetLedColors";
pub const MLAPI_SET_LED_COLOR_EX: &str = "MLAPI_SetLedColorEx";

// ── Error type ──

/// SDK errors.
///
/// `Call` carries the vendor's own message for the failing status, so the
/// CLI can print exactly what the SDK reported.
#[derive(Debug)]
pub enum SdkError {
    LibraryNotFound(String),
    LoadFailed(String),
    MissingSymbol(String),
    Call {
        call: &'static str,
        status: Status,
        message: String,
    },
    Marshal(MarshalError),
    Unsupported(String),
}

impl SdkError {
    /// The vendor's message for a failed call, if this is one.
    pub fn vendor_message(&self) -> Option<&str> {
        match self {
            SdkError::Call { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for SdkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SdkError::LibraryNotFound(e) => write!(f, "SDK library not found: {e}"),
            SdkError::LoadFailed(e) => write!(f, "Failed to load SDK library: {e}"),
            SdkError::MissingSymbol(e) => write!(f, "SDK entry point missing: {e}"),
            SdkError::Call {
                call,
                status,
                message,
            } => write!(f, "{call} failed ({}): {message}", status.code()),
            SdkError::Marshal(e) => write!(f, "Marshaling error: {e}"),
            SdkError::Unsupported(e) => write!(f, "Unsupported: {e}"),
        }
    }
}

impl std::error::Error for SdkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SdkError::Marshal(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MarshalError> for SdkError {
    fn from(e: MarshalError) -> Self {
        SdkError::Marshal(e)
    }
}

pub type Result<T> = std::result::Result<T, SdkError>;

// ── Value types ──

/// One entry from `MLAPI_GetDeviceInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceDescriptor {
    /// Vendor type label, e.g. `MSI_MB`.
    pub device_type: String,
    pub led_count: u32,
}

/// Result of `MLAPI_GetLedInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedInfo {
    pub name: String,
    pub styles: Vec<String>,
}

// ── Trait ──

pub trait LightingSdk {
    fn initialize(&self) -> Result<()>;
    fn release(&self) -> Result<()>;
    /// Vendor description of a status code.
    fn error_message(&self, code: i32) -> Result<String>;

    fn device_info(&self) -> Result<Vec<DeviceDescriptor>>;
    fn device_name(&self, device_type: &str) -> Result<Vec<String>>;
    fn device_name_ex(&self, device_type: &str, index: u32) -> Result<String>;

    fn led_info(&self, device_type: &str, index: u32) -> Result<LedInfo>;
    fn led_color(&self, device_type: &str, index: u32) -> Result<Rgb>;
    fn led_style(&self, device_type: &str, index: u32) -> Result<String>;
    fn led_max_bright(&self, device_type: &str, index: u32) -> Result<u32>;
    fn led_bright(&self, device_type: &str, index: u32) -> Result<u32>;
    fn led_max_speed(&self, device_type: &str, index: u32) -> Result<u32>;
    fn led_speed(&self, device_type: &str, index: u32) -> Result<u32>;

    fn set_led_color(&self, device_type: &str, index: u32, color: Rgb) -> Result<()>;
    fn set_led_style(&self, device_type: &str, index: u32, style: &str) -> Result<()>;
    fn set_led_bright(&self, device_type: &str, index: u32, level: u32) -> Result<()>;
    fn set_led_speed(&self, device_type: &str, index: u32, level: u32) -> Result<()>;
    /// Same color on every LED of the device.
    fn set_led_colors_sync(&self, device_type: &str, color: Rgb) -> Result<()>;
    /// Per-LED colors by name within one area. `led_names` and `colors` are parallel.
    fn set_led_colors(
        &self,
        device_type: &str,
        index: u32,
        led_names: &[String],
        colors: &[Rgb],
    ) -> Result<()>;
    fn set_led_color_ex(
        &self,
        device_type: &str,
        index: u32,
        led_name: &str,
        color: Rgb,
        sync: bool,
    ) -> Result<()>;

    /// Turn a raw status into `Ok` or an `SdkError::Call` with the vendor message.
    fn check(&self, call: &'static str, code: i32) -> Result<()> {
        log::debug!("{call} -> {code}");
        if code == MLAPI_OK {
            Ok(())
        } else {
            Err(self.status_error(call, code))
        }
    }

    /// Build the error for a failed call.
    ///
    /// Falls back to [`Status::describe`] if the message lookup fails or is empty.
    fn status_error(&self, call: &'static str, code: i32) -> SdkError {
        let status = Status::from_code(code);
        let message = match self.error_message(code) {
            Ok(m) if !m.trim().is_empty() => m,
            Ok(_) => status.describe(),
            Err(e) => {
                log::debug!("error message lookup for {code} failed: {e}");
                status.describe()
            }
        };
        SdkError::Call {
            call,
            status,
            message,
        }
    }
}

/// Split parallel color data into the three DWORD arrays `MLAPI_SetLedColors` takes.
pub(crate) fn split_channels(
    led_names: &[String],
    colors: &[Rgb],
) -> Result<(Vec<u32>, Vec<u32>, Vec<u32>)> {
    if led_names.len() != colors.len() {
        return Err(MarshalError::LengthMismatch {
            left: led_names.len(),
            right: colors.len(),
        }
        .into());
    }
    Ok((
        colors.iter().map(|c| c.r).collect(),
        colors.iter().map(|c| c.g).collect(),
        colors.iter().map(|c| c.b).collect(),
    ))
}

// ── Library resolution ──

/// File names tried when no explicit library path is configured.
#[cfg(target_pointer_width = "64")]
pub const DEFAULT_LIBRARY_NAMES: &[&str] = &["mlsdk64.dll", "MysticLight_SDK_x64.dll"];
#[cfg(not(target_pointer_width = "64"))]
pub const DEFAULT_LIBRARY_NAMES: &[&str] = &["MysticLight_SDK.dll"];

/// Directories searched for the default library names: working directory, then
/// the executable's directory.
pub fn search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        && !dirs.contains(&exe_dir)
    {
        dirs.push(exe_dir);
    }
    dirs
}

/// Every path that [`resolve_library`] would try, in order.
pub fn candidate_paths(dirs: &[PathBuf]) -> Vec<PathBuf> {
    dirs.iter()
        .flat_map(|d| DEFAULT_LIBRARY_NAMES.iter().map(move |n| d.join(n)))
        .collect()
}

/// Pick the SDK library to load from an explicit path or the search directories.
pub fn resolve_library_in(explicit: Option<&Path>, dirs: &[PathBuf]) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(SdkError::LibraryNotFound(path.display().to_string()))
        };
    }
    let candidates = candidate_paths(dirs);
    if let Some(found) = candidates.iter().find(|p| p.is_file()) {
        return Ok(found.clone());
    }
    let searched: Vec<String> = dirs.iter().map(|d| d.display().to_string()).collect();
    Err(SdkError::LibraryNotFound(format!(
        "none of {} found in {}",
        DEFAULT_LIBRARY_NAMES.join(", "),
        if searched.is_empty() {
            "(no search directories)".to_string()
        } else {
            searched.join(", ")
        }
    )))
}

pub fn resolve_library(explicit: Option<&Path>) -> Result<PathBuf> {
    resolve_library_in(explicit, &search_dirs())
}

// ── Platform backends ──

#[cfg(windows)]
pub use native::NativeSdk;

/// Backend for platforms without the vendor SDK. Every call fails.
#[cfg(not(windows))]
pub struct StubSdk;

#[cfg(not(windows))]
impl StubSdk {
    pub fn load(_path: &Path) -> Result<Self> {
        Err(unsupported())
    }
}

#[cfg(not(windows))]
fn unsupported() -> SdkError {
    SdkError::Unsupported("the Mystic Light SDK is only available on Windows".into())
}

#[cfg(not(windows))]
impl LightingSdk for StubSdk {
    fn initialize(&self) -> Result<()> {
        Err(unsupported())
    }
    fn release(&self) -> Result<()> {
        Err(unsupported())
    }
    fn error_message(&self, _code: i32) -> Result<String> {
        Err(unsupported())
    }
    fn device_info(&self) -> Result<Vec<DeviceDescriptor>> {
        Err(unsupported())
    }
    fn device_name(&self, _device_type: &str) -> Result<Vec<String>> {
        Err(unsupported())
    }
    fn device_name_ex(&self, _device_type: &str, _index: u32) -> Result<String> {
        Err(unsupported())
    }
    fn led_info(&self, _device_type: &str, _index: u32) -> Result<LedInfo> {
        Err(unsupported())
    }
    fn led_color(&self, _device_type: &str, _index: u32) -> Result<Rgb> {
        Err(unsupported())
    }
    fn led_style(&self, _device_type: &str, _index: u32) -> Result<String> {
        Err(unsupported())
    }
    fn led_max_bright(&self, _device_type: &str, _index: u32) -> Result<u32> {
        Err(unsupported())
    }
    fn led_bright(&self, _device_type: &str, _index: u32) -> Result<u32> {
        Err(unsupported())
    }
    fn led_max_speed(&self, _device_type: &str, _index: u32) -> Result<u32> {
        Err(unsupported())
    }
    fn led_speed(&self, _device_type: &str, _index: u32) -> Result<u32> {
        Err(unsupported())
    }
    fn set_led_color(&self, _device_type: &str, _index: u32, _color: Rgb) -> Result<()> {
        Err(unsupported())
    }
    fn set_led_style(&self, _device_type: &str, _index: u32, _style: &str) -> Result<()> {
        Err(unsupported())
    }
    fn set_led_bright(&self, _device_type: &str, _index: u32, _level: u32) -> Result<()> {
        Err(unsupported())
    }
    fn set_led_speed(&self, _device_type: &str, _index: u32, _level: u32) -> Result<()> {
        Err(unsupported())
    }
    fn set_led_colors_sync(&self, _device_type: &str, _color: Rgb) -> Result<()> {
        Err(unsupported())
    }
    fn set_led_colors(
        &self,
        _device_type: &str,
        _index: u32,
        _led_names: &[String],
        _colors: &[Rgb],
    ) -> Result<()> {
        Err(unsupported())
    }
    fn set_led_color_ex(
        &self,
        _device_type: &str,
        _index: u32,
        _led_name: &str,
        _color: Rgb,
        _sync: bool,
    ) -> Result<()> {
        Err(unsupported())
    }
}

/// Concrete SDK type for the current platform.
#[cfg(windows)]
pub type PlatformSdk = NativeSdk;
#[cfg(not(windows))]
pub type PlatformSdk = StubSdk;

/// Load the platform SDK backend.
///
/// `explicit` overrides the library search. On non-Windows hosts this always
/// fails with [`SdkError::Unsupported`].
pub fn open_sdk(explicit: Option<&Path>) -> Result<PlatformSdk> {
    #[cfg(windows)]
    {
        let path = resolve_library(explicit)?;
        log::debug!("loading SDK from {}", path.display());
        NativeSdk::load(&path)
    }
    #[cfg(not(windows))]
    {
        StubSdk::load(explicit.unwrap_or(Path::new(DEFAULT_LIBRARY_NAMES[0])))
    }
}
