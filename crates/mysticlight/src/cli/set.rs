//! One-shot setters: color, style, brightness, speed and the multi-LED color calls.
//!
//! Arguments are parsed before the SDK is initialized. Range checks are left
//! to the SDK, which reports them as `Invalid argument`.

use std::io::Write;

use super::{LedRef, LightingSdk, MysticLightError, Result, Rgb, in_session, led};

pub(super) fn cmd_set_color<S: LightingSdk>(
    sdk: &S,
    target: &LedRef,
    color: &str,
    out: &mut impl Write,
) -> Result<()> {
    let color = led::parse_rgb(color)?;
    in_session(sdk, |s| {
        Ok(s.set_led_color(&target.device_type, target.index, color)?)
    })?;
    writeln!(out, "Color updated: {target} -> {color}")?;
    Ok(())
}

pub(super) fn cmd_set_style<S: LightingSdk>(
    sdk: &S,
    target: &LedRef,
    style: &str,
    out: &mut impl Write,
) -> Result<()> {
    in_session(sdk, |s| {
        Ok(s.set_led_style(&target.device_type, target.index, style)?)
    })?;
    writeln!(out, "LED Style updated: {target} -> {style}")?;
    Ok(())
}

pub(super) fn cmd_set_bright<S: LightingSdk>(
    sdk: &S,
    target: &LedRef,
    level: u32,
    out: &mut impl Write,
) -> Result<()> {
    in_session(sdk, |s| {
        Ok(s.set_led_bright(&target.device_type, target.index, level)?)
    })?;
    writeln!(out, "Bright updated: {target} -> {level}")?;
    Ok(())
}

pub(super) fn cmd_set_speed<S: LightingSdk>(
    sdk: &S,
    target: &LedRef,
    level: u32,
    out: &mut impl Write,
) -> Result<()> {
    in_session(sdk, |s| {
        Ok(s.set_led_speed(&target.device_type, target.index, level)?)
    })?;
    writeln!(out, "Speed updated: {target} -> {level}")?;
    Ok(())
}

pub(super) fn cmd_sync_color<S: LightingSdk>(
    sdk: &S,
    device_type: &str,
    color: &str,
    out: &mut impl Write,
) -> Result<()> {
    let color = led::parse_rgb(color)?;
    in_session(sdk, |s| Ok(s.set_led_colors_sync(device_type, color)?))?;
    writeln!(out, "Colors updated synchronously: {device_type} -> {color}")?;
    Ok(())
}

/// Split `NAME=COLOR` arguments into parallel name and color lists.
pub(super) fn parse_pairs(pairs: &[String]) -> Result<(Vec<String>, Vec<Rgb>)> {
    let mut names = Vec::with_capacity(pairs.len());
    let mut colors = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let Some((name, color)) = pair.split_once('=') else {
            return Err(MysticLightError::Input(format!(
                "expected NAME=COLOR, got \"{pair}\""
            )));
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(MysticLightError::Input(format!(
                "missing LED name in \"{pair}\""
            )));
        }
        names.push(name.to_string());
        colors.push(led::parse_rgb(color)?);
    }
    Ok((names, colors))
}

pub(super) fn cmd_set_colors<S: LightingSdk>(
    sdk: &S,
    target: &LedRef,
    pairs: &[String],
    out: &mut impl Write,
) -> Result<()> {
    let (names, colors) = parse_pairs(pairs)?;
    in_session(sdk, |s| {
        Ok(s.set_led_colors(&target.device_type, target.index, &names, &colors)?)
    })?;
    let count = names.len();
    let plural = if count == 1 { "" } else { "s" };
    writeln!(out, "Colors updated: {count} LED{plural}")?;
    Ok(())
}

pub(super) fn cmd_set_color_ex<S: LightingSdk>(
    sdk: &S,
    target: &LedRef,
    led_name: &str,
    color: &str,
    sync: bool,
    out: &mut impl Write,
) -> Result<()> {
    let color = led::parse_rgb(color)?;
    in_session(sdk, |s| {
        Ok(s.set_led_color_ex(&target.device_type, target.index, led_name, color, sync)?)
    })?;
    if sync {
        let device_type = &target.device_type;
        writeln!(out, "Colors updated synchronously: {device_type} -> {color}")?;
    } else {
        writeln!(out, "Color updated: {led_name} -> {color}")?;
    }
    Ok(())
}
