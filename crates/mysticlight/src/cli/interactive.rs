//! Interactive menu: pick a device and an LED, then change color, style,
//! brightness or speed until the user exits.
//!
//! Reads from any `BufRead` and writes to any `Write` so the whole flow runs
//! against `MockSdk` with scripted input in tests. End of input is treated
//! like choosing "Exit".

use std::io::{BufRead, Write};

use super::{LedRef, LightingSdk, Result, Rgb, Session, led};
use mysticlight_lib::led::LedState;
use mysticlight_lib::sdk::SdkError;

const INVALID_INTEGER: &str = "Invalid input. Please enter integer values.";

/// One line of user input.
enum Reply {
    Line(String),
    Eof,
}

fn prompt(input: &mut impl BufRead, out: &mut impl Write, text: &str) -> Result<Reply> {
    write!(out, "{text}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(Reply::Eof);
    }
    Ok(Reply::Line(line.trim().to_string()))
}

/// Prompt for a non-negative integer. `Ok(None)` on end of input,
/// `Ok(Some(Err(())))` when the reply is not an integer.
fn prompt_u32(
    input: &mut impl BufRead,
    out: &mut impl Write,
    text: &str,
) -> Result<Option<std::result::Result<u32, ()>>> {
    Ok(match prompt(input, out, text)? {
        Reply::Eof => None,
        Reply::Line(s) => Some(s.parse::<u32>().map_err(|_| ())),
    })
}

/// Print the vendor's description of a failed set call, then `what`.
fn report_failure(out: &mut impl Write, err: &SdkError, what: &str) -> Result<()> {
    log::debug!("{err}");
    match err.vendor_message() {
        Some(msg) => writeln!(out, "{msg}")?,
        None => writeln!(out, "{err}")?,
    }
    writeln!(out, "{what} setting failed.")?;
    Ok(())
}

fn print_state(out: &mut impl Write, state: &LedState) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "Style: {}", state.style)?;
    writeln!(out, "Color: {}", state.color)?;
    writeln!(out, "Max Bright Level: {}", state.max_bright)?;
    writeln!(out, "Current Bright Level: {}", state.bright)?;
    writeln!(out, "Max Speed Level: {}", state.max_speed)?;
    writeln!(out, "Current Speed Level: {}", state.speed)?;
    writeln!(out)?;
    writeln!(out, "1: Change LED color.")?;
    writeln!(out, "2: Change LED style.")?;
    writeln!(out, "3: Change LED Brightness.")?;
    writeln!(out, "4: Change LED Speed.")?;
    writeln!(out, "0: Exit")?;
    Ok(())
}

/// Run the whole interactive session: initialize, select, edit, release.
///
/// `preselect` names a device type to use without prompting.
pub(super) fn run_menu<S: LightingSdk>(
    sdk: &S,
    preselect: Option<&str>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let session = Session::open(sdk)?;
    writeln!(out, "DLL Initialized successfully.")?;

    if let Some(target) = select(sdk, preselect, input, out)? {
        edit_loop(sdk, &target, input, out)?;
    }

    session.close()?;
    writeln!(out, "DLL released successfully.")?;
    Ok(())
}

/// Device and LED selection. `None` when the user picked nothing usable.
fn select<S: LightingSdk>(
    sdk: &S,
    preselect: Option<&str>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<Option<LedRef>> {
    let devices = sdk.device_info()?;
    for (i, d) in devices.iter().enumerate() {
        writeln!(
            out,
            "{i}: Device Type: {}, LED Count: {}",
            d.device_type, d.led_count
        )?;
    }

    let device = match preselect {
        Some(t) => {
            log::debug!("device type {t} preselected by config");
            devices.iter().find(|d| d.device_type == t)
        }
        None => match prompt_u32(input, out, "Choose device: ")? {
            None => return Ok(None),
            Some(n) => n.ok().and_then(|n| devices.get(n as usize)),
        },
    };
    let Some(device) = device else {
        writeln!(out, "The device is specified incorrectly.")?;
        return Ok(None);
    };

    let names = led::list_leds(sdk, &device.device_type, device.led_count)?;
    for (i, name) in names.iter().enumerate() {
        writeln!(out, "{i} : {name}")?;
    }
    match prompt_u32(input, out, "Choose LED: ")? {
        None => Ok(None),
        Some(Ok(n)) if n < device.led_count => Ok(Some(LedRef::new(&device.device_type, n))),
        Some(_) => {
            writeln!(out, "The LED is specified incorrectly.")?;
            Ok(None)
        }
    }
}

fn edit_loop<S: LightingSdk>(
    sdk: &S,
    target: &LedRef,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let mut state = led::snapshot(sdk, target)?;
    writeln!(out)?;
    writeln!(out, "{}", state.name)?;

    let t = target.device_type.as_str();
    let i = target.index;
    loop {
        print_state(out, &state)?;
        let choice = match prompt(input, out, "")? {
            Reply::Eof => return Ok(()),
            Reply::Line(s) => s,
        };
        match choice.parse::<u32>() {
            Ok(0) => return Ok(()),
            Ok(1) => {
                let Some(color) = read_color(input, out)? else {
                    return Ok(());
                };
                let Ok(color) = color else {
                    writeln!(out, "{INVALID_INTEGER}")?;
                    continue;
                };
                match sdk.set_led_color(t, i, color) {
                    Ok(()) => {
                        writeln!(out, "Color updated.\n")?;
                        state.color = color;
                    }
                    Err(e) => report_failure(out, &e, "Color")?,
                }
            }
            Ok(2) => {
                for (n, style) in state.styles.iter().enumerate() {
                    writeln!(out, "{n}: {style}")?;
                }
                let Some(n) = prompt_u32(input, out, "Choose style: ")? else {
                    return Ok(());
                };
                let Ok(n) = n else {
                    writeln!(out, "{INVALID_INTEGER}")?;
                    continue;
                };
                let Some(style) = state.styles.get(n as usize).cloned() else {
                    writeln!(out, "The style is specified incorrectly.")?;
                    continue;
                };
                match sdk.set_led_style(t, i, &style) {
                    Ok(()) => {
                        writeln!(out, "LED Style updated.\n")?;
                        state.style = style;
                    }
                    Err(e) => report_failure(out, &e, "Style")?,
                }
            }
            Ok(3) => {
                let text = format!("Enter brightness level (1-{}): ", state.max_bright);
                let Some(level) = prompt_u32(input, out, &text)? else {
                    return Ok(());
                };
                let Ok(level) = level else {
                    writeln!(out, "{INVALID_INTEGER}")?;
                    continue;
                };
                match sdk.set_led_bright(t, i, level) {
                    Ok(()) => {
                        writeln!(out, "Bright updated.\n")?;
                        state.bright = level;
                    }
                    Err(e) => report_failure(out, &e, "Bright")?,
                }
            }
            Ok(4) => {
                let text = format!("Enter speed level (1-{}): ", state.max_speed);
                let Some(level) = prompt_u32(input, out, &text)? else {
                    return Ok(());
                };
                let Ok(level) = level else {
                    writeln!(out, "{INVALID_INTEGER}")?;
                    continue;
                };
                match sdk.set_led_speed(t, i, level) {
                    Ok(()) => {
                        writeln!(out, "Speed updated.\n")?;
                        state.speed = level;
                    }
                    Err(e) => report_failure(out, &e, "Speed")?,
                }
            }
            // Unknown numbers redraw the menu.
            Ok(_) => {}
            Err(_) => writeln!(out, "{INVALID_INTEGER}")?,
        }
    }
}

/// Read red, green and blue. Out-of-range channels are passed through for
/// the SDK to reject.
fn read_color(
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<Option<std::result::Result<Rgb, ()>>> {
    let mut channels = [0u32; 3];
    for (slot, name) in channels.iter_mut().zip(["red", "green", "blue"]) {
        match prompt_u32(input, out, &format!("Enter {name} (0-255): "))? {
            None => return Ok(None),
            Some(Ok(v)) => *slot = v,
            Some(Err(())) => return Ok(Some(Err(()))),
        }
    }
    Ok(Some(Ok(Rgb::new(channels[0], channels[1], channels[2]))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mysticlight_lib::sdk::mock::MockSdk;
    use mysticlight_lib::sdk::{MLAPI_GET_LED_SPEED, MLAPI_RELEASE, MLAPI_SET_LED_BRIGHT};
    use std::io::Cursor;

    fn run_script(sdk: &MockSdk, preselect: Option<&str>, script: &str) -> (Result<()>, String) {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        let result = run_menu(sdk, preselect, &mut input, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn lists_devices_and_leds() {
        let sdk = MockSdk::new();
        let (result, out) = run_script(&sdk, None, "0\n1\n0\n");
        result.unwrap();
        assert!(out.starts_with("DLL Initialized successfully.\n"));
        assert!(out.contains("0: Device Type: MSI_MB, LED Count: 2\n"));
        assert!(out.contains("1: Device Type: MSI_VGA, LED Count: 1\n"));
        assert!(out.contains("0 : JRGB1\n"));
        assert!(out.contains("1 : JRAINBOW1\n"));
        assert!(out.contains("\nJRAINBOW1\n"));
        assert!(out.contains("Style: Steady\n"));
        assert!(out.contains("Color: R-255 G-0 B-0\n"));
        assert!(out.contains("Max Bright Level: 10\n"));
        assert!(out.contains("Current Speed Level: 1\n"));
        assert!(out.contains("4: Change LED Speed.\n0: Exit\n"));
        assert!(out.ends_with("DLL released successfully.\n"));
        assert_eq!(sdk.release_count.get(), 1);
    }

    #[test]
    fn change_color_updates_display() {
        let sdk = MockSdk::new();
        let (result, out) = run_script(&sdk, None, "1\n0\n1\n10\n20\n30\n0\n");
        result.unwrap();
        assert!(out.contains("Enter red (0-255): Enter green (0-255): Enter blue (0-255): "));
        assert!(out.contains("Color updated.\n"));
        assert!(out.contains("Color: R-10 G-20 B-30\n"));
        assert_eq!(sdk.led("MSI_VGA", 0).unwrap().color, Rgb::new(10, 20, 30));
    }

    #[test]
    fn non_integer_color_loops() {
        let sdk = MockSdk::new();
        let (result, out) = run_script(&sdk, None, "0\n0\n1\n12\nabc\n0\n");
        result.unwrap();
        assert!(out.contains(INVALID_INTEGER));
        assert_eq!(sdk.led("MSI_MB", 0).unwrap().color, Rgb::new(255, 0, 0));
    }

    #[test]
    fn rejected_color_reports_failure_and_keeps_display() {
        let sdk = MockSdk::new();
        let (result, out) = run_script(&sdk, None, "0\n0\n1\n300\n0\n0\n0\n");
        result.unwrap();
        assert!(out.contains("Invalid argument\nColor setting failed.\n"));
        assert!(!out.contains("Color: R-300"));
    }

    #[test]
    fn change_style_by_number() {
        let sdk = MockSdk::new();
        let (result, out) = run_script(&sdk, None, "0\n0\n2\n2\n0\n");
        result.unwrap();
        assert!(out.contains("0: Off\n1: Steady\n2: Breathing\n3: Flashing\n"));
        assert!(out.contains("Choose style: "));
        assert!(out.contains("LED Style updated.\n"));
        assert!(out.contains("Style: Breathing\n"));
        assert_eq!(sdk.led("MSI_MB", 0).unwrap().style, "Breathing");
    }

    #[test]
    fn out_of_range_style_is_reported() {
        let sdk = MockSdk::new();
        let (result, out) = run_script(&sdk, None, "0\n0\n2\n9\n0\n");
        result.unwrap();
        assert!(out.contains("The style is specified incorrectly.\n"));
        assert_eq!(sdk.led("MSI_MB", 0).unwrap().style, "Steady");
    }

    #[test]
    fn change_brightness_and_speed() {
        let sdk = MockSdk::new();
        let (result, out) = run_script(&sdk, None, "0\n1\n3\n7\n4\n3\n0\n");
        result.unwrap();
        assert!(out.contains("Enter brightness level (1-10): "));
        assert!(out.contains("Bright updated.\n"));
        assert!(out.contains("Current Bright Level: 7\n"));
        assert!(out.contains("Enter speed level (1-3): "));
        assert!(out.contains("Speed updated.\n"));
        assert!(out.contains("Current Speed Level: 3\n"));
        let led = sdk.led("MSI_MB", 1).unwrap();
        assert_eq!((led.bright, led.speed), (7, 3));
    }

    #[test]
    fn brightness_above_max_is_forwarded_and_rejected() {
        let sdk = MockSdk::new();
        let (result, out) = run_script(&sdk, None, "0\n0\n3\n11\n0\n");
        result.unwrap();
        assert_eq!(sdk.call_count(MLAPI_SET_LED_BRIGHT), 1);
        assert!(out.contains("Bright setting failed.\n"));
        assert!(out.contains("Current Bright Level: 5\n"));
    }

    #[test]
    fn negative_speed_is_invalid_input() {
        let sdk = MockSdk::new();
        let (result, out) = run_script(&sdk, None, "0\n0\n4\n-1\n0\n");
        result.unwrap();
        assert!(out.contains(INVALID_INTEGER));
    }

    #[test]
    fn vendor_message_printed_on_failure() {
        let sdk = MockSdk::new();
        sdk.messages
            .borrow_mut()
            .insert(-103, "This LED cannot change speed".into());
        sdk.fail_with(mysticlight_lib::sdk::MLAPI_SET_LED_SPEED, -103);
        let (result, out) = run_script(&sdk, None, "1\n0\n4\n2\n0\n");
        result.unwrap();
        assert!(out.contains("This LED cannot change speed\nSpeed setting failed.\n"));
    }

    #[test]
    fn bad_device_choice_releases_and_exits() {
        let sdk = MockSdk::new();
        let (result, out) = run_script(&sdk, None, "7\n");
        result.unwrap();
        assert!(out.contains("The device is specified incorrectly.\n"));
        assert!(out.ends_with("DLL released successfully.\n"));
        assert_eq!(sdk.release_count.get(), 1);
    }

    #[test]
    fn non_integer_device_choice() {
        let sdk = MockSdk::new();
        let (result, out) = run_script(&sdk, None, "MSI_MB\n");
        result.unwrap();
        assert!(out.contains("The device is specified incorrectly.\n"));
    }

    #[test]
    fn bad_led_choice() {
        let sdk = MockSdk::new();
        let (result, out) = run_script(&sdk, None, "1\n3\n");
        result.unwrap();
        assert!(out.contains("The LED is specified incorrectly.\n"));
        assert_eq!(sdk.release_count.get(), 1);
    }

    #[test]
    fn preselected_device_skips_prompt() {
        let sdk = MockSdk::new();
        let (result, out) = run_script(&sdk, Some("MSI_VGA"), "0\n0\n");
        result.unwrap();
        assert!(!out.contains("Choose device: "));
        assert!(out.contains("0 : Logo\n"));
        assert!(out.contains("\nLogo\n"));
    }

    #[test]
    fn preselected_device_missing() {
        let sdk = MockSdk::new();
        let (result, out) = run_script(&sdk, Some("MSI_KEYBOARD"), "");
        result.unwrap();
        assert!(out.contains("The device is specified incorrectly.\n"));
    }

    #[test]
    fn end_of_input_exits_cleanly() {
        let sdk = MockSdk::new();
        let (result, out) = run_script(&sdk, None, "0\n0\n1\n5\n");
        result.unwrap();
        assert!(out.ends_with("DLL released successfully.\n"));
        assert_eq!(sdk.release_count.get(), 1);
    }

    #[test]
    fn unknown_menu_number_redraws() {
        let sdk = MockSdk::new();
        let (result, out) = run_script(&sdk, None, "0\n0\n9\n0\n");
        result.unwrap();
        assert_eq!(out.matches("0: Exit\n").count(), 2);
    }

    #[test]
    fn read_failure_aborts_but_still_releases() {
        let sdk = MockSdk::new();
        sdk.fail_with(MLAPI_GET_LED_SPEED, -1);
        let (result, out) = run_script(&sdk, None, "0\n0\n");
        assert!(result.is_err());
        assert!(!out.contains("DLL released successfully."));
        assert_eq!(sdk.call_count(MLAPI_RELEASE), 1);
    }
}
