//! LED snapshot and listing on top of [`LightingSdk`].

use std::fmt;

use serde::Serialize;

use super::Rgb;
use crate::sdk::{LightingSdk, Result};

/// One LED area: the device type label plus a zero-based index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedRef {
    pub device_type: String,
    pub index: u32,
}

impl LedRef {
    pub fn new(device_type: impl Into<String>, index: u32) -> Self {
        LedRef {
            device_type: device_type.into(),
            index,
        }
    }
}

impl fmt::Display for LedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.device_type, self.index)
    }
}

/// Everything the SDK reports about one LED at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedState {
    #[serde(flatten)]
    pub led: LedRef,
    pub name: String,
    pub styles: Vec<String>,
    pub style: String,
    pub color: Rgb,
    pub bright: u32,
    pub max_bright: u32,
    pub speed: u32,
    pub max_speed: u32,
}

/// Read the full state of one LED.
///
/// Order: info, style, color, max brightness, brightness, max speed, speed.
/// The first failing call aborts the snapshot.
pub fn snapshot(sdk: &impl LightingSdk, led: &LedRef) -> Result<LedState> {
    let t = led.device_type.as_str();
    let i = led.index;
    let info = sdk.led_info(t, i)?;
    let style = sdk.led_style(t, i)?;
    let color = sdk.led_color(t, i)?;
    let max_bright = sdk.led_max_bright(t, i)?;
    let bright = sdk.led_bright(t, i)?;
    let max_speed = sdk.led_max_speed(t, i)?;
    let speed = sdk.led_speed(t, i)?;
    Ok(LedState {
        led: led.clone(),
        name: info.name,
        styles: info.styles,
        style,
        color,
        bright,
        max_bright,
        speed,
        max_speed,
    })
}

/// Names of the first `count` LED areas of a device, by index.
pub fn list_leds(sdk: &impl LightingSdk, device_type: &str, count: u32) -> Result<Vec<String>> {
    (0..count)
        .map(|i| sdk.device_name_ex(device_type, i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::mock::MockSdk;
    use crate::sdk::{self, SdkError};
    use crate::status::Status;

    fn ready() -> MockSdk {
        let sdk = MockSdk::new();
        sdk.initialize().unwrap();
        sdk
    }

    #[test]
    fn snapshot_reads_everything() {
        let sdk = ready();
        let state = snapshot(&sdk, &LedRef::new("MSI_MB", 1)).unwrap();
        assert_eq!(state.name, "JRAINBOW1");
        assert_eq!(state.style, "Steady");
        assert_eq!(state.color, Rgb::new(255, 0, 0));
        assert_eq!(state.bright, 5);
        assert_eq!(state.max_bright, 10);
        assert_eq!(state.speed, 1);
        assert_eq!(state.max_speed, 3);
        assert_eq!(state.styles.len(), 4);
    }

    #[test]
    fn snapshot_call_order() {
        let sdk = ready();
        snapshot(&sdk, &LedRef::new("MSI_MB", 0)).unwrap();
        let calls = sdk.calls.borrow();
        assert_eq!(
            &calls[1..],
            &[
                sdk::MLAPI_GET_LED_INFO,
                sdk::MLAPI_GET_LED_STYLE,
                sdk::MLAPI_GET_LED_COLOR,
                sdk::MLAPI_GET_LED_MAX_BRIGHT,
                sdk::MLAPI_GET_LED_BRIGHT,
                sdk::MLAPI_GET_LED_MAX_SPEED,
                sdk::MLAPI_GET_LED_SPEED,
            ]
        );
    }

    #[test]
    fn snapshot_stops_at_first_failure() {
        let sdk = ready();
        sdk.fail_with(sdk::MLAPI_GET_LED_COLOR, -1);
        let err = snapshot(&sdk, &LedRef::new("MSI_MB", 0)).unwrap_err();
        assert!(matches!(
            err,
            SdkError::Call {
                status: Status::Error,
                ..
            }
        ));
        assert_eq!(sdk.call_count(sdk::MLAPI_GET_LED_MAX_BRIGHT), 0);
    }

    #[test]
    fn list_leds_by_index() {
        let sdk = ready();
        assert_eq!(
            list_leds(&sdk, "MSI_MB", 2).unwrap(),
            vec!["JRGB1", "JRAINBOW1"]
        );
    }

    #[test]
    fn list_leds_zero_count_makes_no_calls() {
        let sdk = ready();
        assert!(list_leds(&sdk, "MSI_MB", 0).unwrap().is_empty());
        assert_eq!(sdk.call_count(sdk::MLAPI_GET_DEVICE_NAME_EX), 0);
    }

    #[test]
    fn led_ref_display() {
        assert_eq!(LedRef::new("MSI_VGA", 3).to_string(), "MSI_VGA[3]");
    }

    #[test]
    fn led_state_serializes_flat() {
        let sdk = ready();
        let state = snapshot(&sdk, &LedRef::new("MSI_VGA", 0)).unwrap();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["device_type"], "MSI_VGA");
        assert_eq!(json["index"], 0);
        assert_eq!(json["color"]["r"], 255);
    }
}
