//! Unified error type for the mysticlight-lib crate.
//!
//! [`MysticLightError`] wraps the SDK error (`SdkError`) and the
//! domain-specific error kinds (`Color`, `Input`).
//! `From` impls allow `?` to propagate across module boundaries.

use std::fmt;

use crate::safearray::MarshalError;
use crate::sdk::SdkError;

/// Unified error type for mysticlight-lib operations.
#[derive(Debug)]
pub enum MysticLightError {
    /// SDK loading, call failure or marshaling error.
    Sdk(SdkError),
    /// Standard I/O error (config read, terminal I/O).
    Io(std::io::Error),
    /// Color parsing error.
    Color(String),
    /// A user selection that does not exist (device, LED, style).
    Input(String),
}

impl fmt::Display for MysticLightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MysticLightError::Sdk(e) => write!(f, "{e}"),
            MysticLightError::Io(e) => write!(f, "I/O error: {e}"),
            MysticLightError::Color(e) => write!(f, "Color error: {e}"),
            MysticLightError::Input(e) => write!(f, "Invalid input: {e}"),
        }
    }
}

impl std::error::Error for MysticLightError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MysticLightError::Sdk(e) => Some(e),
            MysticLightError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SdkError> for MysticLightError {
    fn from(e: SdkError) -> Self {
        MysticLightError::Sdk(e)
    }
}

impl From<MarshalError> for MysticLightError {
    fn from(e: MarshalError) -> Self {
        MysticLightError::Sdk(SdkError::Marshal(e))
    }
}

impl From<std::io::Error> for MysticLightError {
    fn from(e: std::io::Error) -> Self {
        MysticLightError::Io(e)
    }
}

/// Crate-level Result alias using [`MysticLightError`].
pub type Result<T> = std::result::Result<T, MysticLightError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;

    #[test]
    fn from_sdk_error() {
        let e: MysticLightError = SdkError::Unsupported("x".into()).into();
        assert!(matches!(e, MysticLightError::Sdk(SdkError::Unsupported(_))));
    }

    #[test]
    fn from_marshal_error_goes_through_sdk() {
        let e: MysticLightError = MarshalError::NullData.into();
        assert!(matches!(
            e,
            MysticLightError::Sdk(SdkError::Marshal(MarshalError::NullData))
        ));
    }

    #[test]
    fn from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let e: MysticLightError = io_err.into();
        assert!(matches!(e, MysticLightError::Io(_)));
    }

    #[test]
    fn display_sdk_call_error() {
        let e = MysticLightError::Sdk(SdkError::Call {
            call: "MLAPI_Initialize",
            status: Status::NotSupported,
            message: "No supported device".into(),
        });
        assert_eq!(
            e.to_string(),
            "MLAPI_Initialize failed (-103): No supported device"
        );
    }

    #[test]
    fn display_color_error() {
        let e = MysticLightError::Color("bad hex".into());
        assert_eq!(e.to_string(), "Color error: bad hex");
    }

    #[test]
    fn display_input_error() {
        let e = MysticLightError::Input("no style \"Rainbow\"".into());
        assert_eq!(e.to_string(), "Invalid input: no style \"Rainbow\"");
    }

    #[test]
    fn source_chains_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let e = MysticLightError::Io(io_err);
        let source = std::error::Error::source(&e).unwrap();
        assert!(source.to_string().contains("denied"));
    }

    #[test]
    fn source_none_for_string_variants() {
        let e = MysticLightError::Color("test".into());
        assert!(std::error::Error::source(&e).is_none());
    }

    #[test]
    fn question_mark_propagation_sdk_to_crate() {
        fn inner() -> crate::sdk::Result<()> {
            Err(SdkError::LibraryNotFound("mlsdk64.dll".into()))
        }
        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }
        let err = outer().unwrap_err();
        assert!(matches!(
            err,
            MysticLightError::Sdk(SdkError::LibraryNotFound(_))
        ));
    }
}
