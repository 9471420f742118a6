//! SDK status codes.
//!
//! Every `MLAPI_*` entry point returns an `int`. Zero means success; the
//! documented failure codes are mapped to [`Status`] variants and anything
//! else is kept as [`Status::Unknown`].

use std::fmt;

use serde::Serialize;

pub const MLAPI_OK: i32 = 0;
pub const MLAPI_ERROR: i32 = -1;
pub const MLAPI_TIMEOUT: i32 = -2;
pub const MLAPI_NO_IMPLEMENTED: i32 = -3;
pub const MLAPI_NOT_INITIALIZED: i32 = -4;
pub const MLAPI_INVALID_ARGUMENT: i32 = -101;
pub const MLAPI_DEVICE_NOT_FOUND: i32 = -102;
pub const MLAPI_NOT_SUPPORTED: i32 = -103;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Ok,
    Error,
    Timeout,
    NotImplemented,
    NotInitialized,
    InvalidArgument,
    DeviceNotFound,
    NotSupported,
    Unknown(i32),
}

impl Status {
    pub fn from_code(code: i32) -> Self {
        match code {
            MLAPI_OK => Status::Ok,
            MLAPI_ERROR => Status::Error,
            MLAPI_TIMEOUT => Status::Timeout,
            MLAPI_NO_IMPLEMENTED => Status::NotImplemented,
            MLAPI_NOT_INITIALIZED => Status::NotInitialized,
            MLAPI_INVALID_ARGUMENT => Status::InvalidArgument,
            MLAPI_DEVICE_NOT_FOUND => Status::DeviceNotFound,
            MLAPI_NOT_SUPPORTED => Status::NotSupported,
            other => Status::Unknown(other),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Status::Ok => MLAPI_OK,
            Status::Error => MLAPI_ERROR,
            Status::Timeout => MLAPI_TIMEOUT,
            Status::NotImplemented => MLAPI_NO_IMPLEMENTED,
            Status::NotInitialized => MLAPI_NOT_INITIALIZED,
            Status::InvalidArgument => MLAPI_INVALID_ARGUMENT,
            Status::DeviceNotFound => MLAPI_DEVICE_NOT_FOUND,
            Status::NotSupported => MLAPI_NOT_SUPPORTED,
            Status::Unknown(code) => code,
        }
    }

    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }

    /// Built-in description, used when `MLAPI_GetErrorMessage` gives nothing back.
    pub fn describe(self) -> String {
        match self {
            Status::Ok => "Success".into(),
            Status::Error => "Generic error".into(),
            Status::Timeout => "The SDK timed out".into(),
            Status::NotImplemented => "Not implemented by the SDK".into(),
            Status::NotInitialized => "The SDK is not initialized".into(),
            Status::InvalidArgument => "Invalid argument".into(),
            Status::DeviceNotFound => "Device not found".into(),
            Status::NotSupported => "Not supported by this device".into(),
            Status::Unknown(code) => format!("Unknown status code {code}"),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.describe(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_ok() {
        assert_eq!(Status::from_code(0), Status::Ok);
        assert!(Status::from_code(0).is_ok());
    }

    #[test]
    fn documented_codes_map_to_variants() {
        assert_eq!(Status::from_code(-1), Status::Error);
        assert_eq!(Status::from_code(-2), Status::Timeout);
        assert_eq!(Status::from_code(-3), Status::NotImplemented);
        assert_eq!(Status::from_code(-4), Status::NotInitialized);
        assert_eq!(Status::from_code(-101), Status::InvalidArgument);
        assert_eq!(Status::from_code(-102), Status::DeviceNotFound);
        assert_eq!(Status::from_code(-103), Status::NotSupported);
    }

    #[test]
    fn undocumented_code_is_kept() {
        let s = Status::from_code(-42);
        assert_eq!(s, Status::Unknown(-42));
        assert_eq!(s.code(), -42);
        assert!(!s.is_ok());
    }

    #[test]
    fn code_roundtrips_for_known_variants() {
        for code in [0, -1, -2, -3, -4, -101, -102, -103] {
            assert_eq!(Status::from_code(code).code(), code);
        }
    }

    #[test]
    fn unknown_description_names_the_code() {
        assert_eq!(Status::Unknown(7).describe(), "Unknown status code 7");
    }

    #[test]
    fn display_includes_code() {
        assert_eq!(
            Status::DeviceNotFound.to_string(),
            "Device not found (-102)"
        );
    }
}
