//! In-memory SDK for unit and integration tests.
//!
//! Mimics the vendor library's observable behavior: calls fail with
//! `MLAPI_NOT_INITIALIZED` before `initialize`, unknown device types return
//! `MLAPI_DEVICE_NOT_FOUND`, and out-of-range values are rejected by the
//! "SDK" rather than by the caller.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::*;
use crate::status::{MLAPI_DEVICE_NOT_FOUND, MLAPI_INVALID_ARGUMENT, MLAPI_NOT_INITIALIZED};

#[derive(Debug, Clone)]
pub struct MockLed {
    pub name: String,
    pub styles: Vec<String>,
    pub style: String,
    pub color: Rgb,
    pub bright: u32,
    pub max_bright: u32,
    pub speed: u32,
    pub max_speed: u32,
}

impl MockLed {
    pub fn new(name: &str) -> Self {
        MockLed {
            name: name.into(),
            styles: vec![
                "Off".into(),
                "Steady".into(),
                "Breathing".into(),
                "Flashing".into(),
            ],
            style: "Steady".into(),
            color: Rgb::new(255, 0, 0),
            bright: 5,
            max_bright: 10,
            speed: 1,
            max_speed: 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockDevice {
    pub device_type: String,
    pub names: Vec<String>,
    pub leds: Vec<MockLed>,
}

pub struct MockSdk {
    pub devices: RefCell<Vec<MockDevice>>,
    /// Vendor messages by status code. Codes without an entry get the built-in text.
    pub messages: RefCell<HashMap<i32, String>>,
    /// Injected failures: entry point name → status code.
    pub failures: RefCell<HashMap<&'static str, i32>>,
    /// Every entry point invoked, in order.
    pub calls: RefCell<Vec<&'static str>>,
    pub initialized: Cell<bool>,
    pub release_count: Cell<u32>,
}

impl Default for MockSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSdk {
    /// A motherboard with two LED areas and a graphics card with one.
    pub fn new() -> Self {
        Self::with_devices(vec![
            MockDevice {
                device_type: "MSI_MB".into(),
                names: vec!["MPG Z790 EDGE".into()],
                leds: vec![MockLed::new("JRGB1"), MockLed::new("JRAINBOW1")],
            },
            MockDevice {
                device_type: "MSI_VGA".into(),
                names: vec!["RTX 4070 GAMING X".into()],
                leds: vec![MockLed::new("Logo")],
            },
        ])
    }

    pub fn with_devices(devices: Vec<MockDevice>) -> Self {
        MockSdk {
            devices: RefCell::new(devices),
            messages: RefCell::new(HashMap::new()),
            failures: RefCell::new(HashMap::new()),
            calls: RefCell::new(Vec::new()),
            initialized: Cell::new(false),
            release_count: Cell::new(0),
        }
    }

    /// Make every later call to `call` return `code`.
    pub fn fail_with(&self, call: &'static str, code: i32) {
        self.failures.borrow_mut().insert(call, code);
    }

    pub fn led(&self, device_type: &str, index: u32) -> Option<MockLed> {
        self.devices
            .borrow()
            .iter()
            .find(|d| d.device_type == device_type)
            .and_then(|d| d.leds.get(index as usize).cloned())
    }

    pub fn call_count(&self, call: &str) -> usize {
        self.calls.borrow().iter().filter(|&&c| c == call).count()
    }

    /// Record the call and apply injected failures and the init requirement.
    fn enter(&self, call: &'static str) -> Result<()> {
        self.calls.borrow_mut().push(call);
        if let Some(&code) = self.failures.borrow().get(call) {
            return self.check(call, code);
        }
        if call != MLAPI_INITIALIZE && call != MLAPI_GET_ERROR_MESSAGE && !self.initialized.get() {
            return self.check(call, MLAPI_NOT_INITIALIZED);
        }
        Ok(())
    }

    fn with_device<T>(
        &self,
        call: &'static str,
        device_type: &str,
        f: impl FnOnce(&mut MockDevice) -> std::result::Result<T, i32>,
    ) -> Result<T> {
        self.enter(call)?;
        let outcome = {
            let mut devices = self.devices.borrow_mut();
            match devices.iter_mut().find(|d| d.device_type == device_type) {
                Some(dev) => f(dev),
                None => Err(MLAPI_DEVICE_NOT_FOUND),
            }
        };
        match outcome {
            Ok(v) => Ok(v),
            Err(code) => Err(self.status_error(call, code)),
        }
    }

    fn with_led<T>(
        &self,
        call: &'static str,
        device_type: &str,
        index: u32,
        f: impl FnOnce(&mut MockLed) -> std::result::Result<T, i32>,
    ) -> Result<T> {
        self.with_device(call, device_type, |dev| {
            match dev.leds.get_mut(index as usize) {
                Some(led) => f(led),
                None => Err(MLAPI_INVALID_ARGUMENT),
            }
        })
    }
}

fn channel_ok(color: Rgb) -> bool {
    color.r <= 255 && color.g <= 255 && color.b <= 255
}

impl LightingSdk for MockSdk {
    fn initialize(&self) -> Result<()> {
        self.enter(MLAPI_INITIALIZE)?;
        self.initialized.set(true);
        Ok(())
    }

    fn release(&self) -> Result<()> {
        self.enter(MLAPI_RELEASE)?;
        self.initialized.set(false);
        self.release_count.set(self.release_count.get() + 1);
        Ok(())
    }

    fn error_message(&self, code: i32) -> Result<String> {
        self.calls.borrow_mut().push(MLAPI_GET_ERROR_MESSAGE);
        if let Some(&fail) = self.failures.borrow().get(MLAPI_GET_ERROR_MESSAGE) {
            return Err(SdkError::Call {
                call: MLAPI_GET_ERROR_MESSAGE,
                status: Status::from_code(fail),
                message: Status::from_code(fail).describe(),
            });
        }
        Ok(self
            .messages
            .borrow()
            .get(&code)
            .cloned()
            .unwrap_or_else(|| Status::from_code(code).describe()))
    }

    fn device_info(&self) -> Result<Vec<DeviceDescriptor>> {
        self.enter(MLAPI_GET_DEVICE_INFO)?;
        Ok(self
            .devices
            .borrow()
            .iter()
            .map(|d| DeviceDescriptor {
                device_type: d.device_type.clone(),
                led_count: d.leds.len() as u32,
            })
            .collect())
    }

    fn device_name(&self, device_type: &str) -> Result<Vec<String>> {
        self.with_device(MLAPI_GET_DEVICE_NAME, device_type, |d| Ok(d.names.clone()))
    }

    fn device_name_ex(&self, device_type: &str, index: u32) -> Result<String> {
        self.with_led(MLAPI_GET_DEVICE_NAME_EX, device_type, index, |l| {
            Ok(l.name.clone())
        })
    }

    fn led_info(&self, device_type: &str, index: u32) -> Result<LedInfo> {
        self.with_led(MLAPI_GET_LED_INFO, device_type, index, |l| {
            Ok(LedInfo {
                name: l.name.clone(),
                styles: l.styles.clone(),
            })
        })
    }

    fn led_color(&self, device_type: &str, index: u32) -> Result<Rgb> {
        self.with_led(MLAPI_GET_LED_COLOR, device_type, index, |l| Ok(l.color))
    }

    fn led_style(&self, device_type: &str, index: u32) -> Result<String> {
        self.with_led(MLAPI_GET_LED_STYLE, device_type, index, |l| {
            Ok(l.style.clone())
        })
    }

    fn led_max_bright(&self, device_type: &str, index: u32) -> Result<u32> {
        self.with_led(MLAPI_GET_LED_MAX_BRIGHT, device_type, index, |l| {
            Ok(l.max_bright)
        })
    }

    fn led_bright(&self, device_type: &str, index: u32) -> Result<u32> {
        self.with_led(MLAPI_GET_LED_BRIGHT, device_type, index, |l| Ok(l.bright))
    }

    fn led_max_speed(&self, device_type: &str, index: u32) -> Result<u32> {
        self.with_led(MLAPI_GET_LED_MAX_SPEED, device_type, index, |l| {
            Ok(l.max_speed)
        })
    }

    fn led_speed(&self, device_type: &str, index: u32) -> Result<u32> {
        self.with_led(MLAPI_GET_LED_SPEED, device_type, index, |l| Ok(l.speed))
    }

    fn set_led_color(&self, device_type: &str, index: u32, color: Rgb) -> Result<()> {
        self.with_led(MLAPI_SET_LED_COLOR, device_type, index, |l| {
            if !channel_ok(color) {
                return Err(MLAPI_INVALID_ARGUMENT);
            }
            l.color = color;
            Ok(())
        })
    }

    fn set_led_style(&self, device_type: &str, index: u32, style: &str) -> Result<()> {
        self.with_led(MLAPI_SET_LED_STYLE, device_type, index, |l| {
            if !l.styles.iter().any(|s| s == style) {
                return Err(MLAPI_INVALID_ARGUMENT);
            }
            l.style = style.to_string();
            Ok(())
        })
    }

    fn set_led_bright(&self, device_type: &str, index: u32, level: u32) -> Result<()> {
        self.with_led(MLAPI_SET_LED_BRIGHT, device_type, index, |l| {
            if level > l.max_bright {
                return Err(MLAPI_INVALID_ARGUMENT);
            }
            l.bright = level;
            Ok(())
        })
    }

    fn set_led_speed(&self, device_type: &str, index: u32, level: u32) -> Result<()> {
        self.with_led(MLAPI_SET_LED_SPEED, device_type, index, |l| {
            if level > l.max_speed {
                return Err(MLAPI_INVALID_ARGUMENT);
            }
            l.speed = level;
            Ok(())
        })
    }

    fn set_led_colors_sync(&self, device_type: &str, color: Rgb) -> Result<()> {
        self.with_device(MLAPI_SET_LED_COLORS_SYNC, device_type, |d| {
            if !channel_ok(color) {
                return Err(MLAPI_INVALID_ARGUMENT);
            }
            for led in &mut d.leds {
                led.color = color;
            }
            Ok(())
        })
    }

    fn set_led_colors(
        &self,
        device_type: &str,
        index: u32,
        led_names: &[String],
        colors: &[Rgb],
    ) -> Result<()> {
        split_channels(led_names, colors)?;
        self.with_device(MLAPI_SET_LED_COLORS, device_type, |d| {
            if index as usize >= d.leds.len() {
                return Err(MLAPI_INVALID_ARGUMENT);
            }
            for (name, &color) in led_names.iter().zip(colors) {
                if !channel_ok(color) {
                    return Err(MLAPI_INVALID_ARGUMENT);
                }
                match d.leds.iter_mut().find(|l| &l.name == name) {
                    Some(led) => led.color = color,
                    None => return Err(MLAPI_INVALID_ARGUMENT),
                }
            }
            Ok(())
        })
    }

    fn set_led_color_ex(
        &self,
        device_type: &str,
        index: u32,
        led_name: &str,
        color: Rgb,
        sync: bool,
    ) -> Result<()> {
        self.with_device(MLAPI_SET_LED_COLOR_EX, device_type, |d| {
            if index as usize >= d.leds.len() || !channel_ok(color) {
                return Err(MLAPI_INVALID_ARGUMENT);
            }
            if sync {
                for led in &mut d.leds {
                    led.color = color;
                }
                return Ok(());
            }
            match d.leds.iter_mut().find(|l| l.name == led_name) {
                Some(led) => {
                    led.color = color;
                    Ok(())
                }
                None => Err(MLAPI_INVALID_ARGUMENT),
            }
        })
    }
}
