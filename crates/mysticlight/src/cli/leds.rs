//! `leds` subcommand: list the LED areas of one device type.

use std::io::Write;

use super::{
    LedNameJson, LedsOutput, LightingSdk, MysticLightError, Result, in_session, led, print_json,
};

/// Look up the LED count for `device_type`, then the name at each index.
pub(super) fn collect_leds<S: LightingSdk>(
    sdk: &S,
    device_type: &str,
) -> Result<Vec<LedNameJson>> {
    let devices = sdk.device_info()?;
    let Some(device) = devices.iter().find(|d| d.device_type == device_type) else {
        let known: Vec<&str> = devices.iter().map(|d| d.device_type.as_str()).collect();
        return Err(MysticLightError::Input(format!(
            "unknown device type \"{device_type}\" (available: {})",
            known.join(", ")
        )));
    };
    let names = led::list_leds(sdk, device_type, device.led_count)?;
    Ok(names
        .into_iter()
        .zip(0u32..)
        .map(|(name, index)| LedNameJson { index, name })
        .collect())
}

pub(super) fn cmd_leds<S: LightingSdk>(
    sdk: &S,
    device_type: &str,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let leds = in_session(sdk, |s| collect_leds(s, device_type))?;

    if json {
        let output = LedsOutput {
            device_type: device_type.to_string(),
            leds,
        };
        return print_json(out, &output);
    }

    if leds.is_empty() {
        writeln!(out, "{device_type} has no LEDs.")?;
        return Ok(());
    }
    for l in &leds {
        writeln!(out, "{} : {}", l.index, l.name)?;
    }
    Ok(())
}
