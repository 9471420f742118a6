//! `devices` subcommand: list device types, LED counts and device names.

use std::io::Write;

use super::{DeviceJson, DevicesOutput, LightingSdk, Result, in_session, print_json};

/// Device descriptors plus names. A device whose name lookup fails is still
/// listed, with no names.
pub(super) fn collect_devices<S: LightingSdk>(sdk: &S) -> Result<Vec<DeviceJson>> {
    let mut devices = Vec::new();
    for d in sdk.device_info()? {
        let names = match sdk.device_name(&d.device_type) {
            Ok(names) => names,
            Err(e) => {
                log::debug!("could not read names for {}: {e}", d.device_type);
                Vec::new()
            }
        };
        devices.push(DeviceJson {
            device_type: d.device_type,
            led_count: d.led_count,
            names,
        });
    }
    Ok(devices)
}

pub(super) fn cmd_devices<S: LightingSdk>(sdk: &S, json: bool, out: &mut impl Write) -> Result<()> {
    let devices = in_session(sdk, collect_devices)?;

    if json {
        let output = DevicesOutput {
            count: devices.len(),
            devices,
        };
        return print_json(out, &output);
    }

    if devices.is_empty() {
        writeln!(out, "No Mystic Light devices found.")?;
        return Ok(());
    }

    let plural = if devices.len() == 1 { "" } else { "s" };
    writeln!(out, "Found {} device type{plural}:", devices.len())?;
    writeln!(out)?;

    for (i, dev) in devices.iter().enumerate() {
        let plural = if dev.led_count == 1 { "" } else { "s" };
        writeln!(
            out,
            "  [{i}] {}  ({} LED{plural})",
            dev.device_type, dev.led_count
        )?;
        for name in &dev.names {
            writeln!(out, "      {name}")?;
        }
    }

    Ok(())
}
