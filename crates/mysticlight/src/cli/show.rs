//! `show` subcommand: full state of one LED.

use std::io::Write;

use super::{LedRef, LightingSdk, Result, in_session, kv, kv_width, led, print_json};

pub(super) fn cmd_show<S: LightingSdk>(
    sdk: &S,
    target: &LedRef,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let state = in_session(sdk, |s| Ok(led::snapshot(s, target)?))?;

    if json {
        return print_json(out, &state);
    }

    let color = format!("{} ({})", state.color, state.color.to_hex());
    let bright = format!("{} / {}", state.bright, state.max_bright);
    let speed = format!("{} / {}", state.speed, state.max_speed);
    let rows = [
        ("LED:", target.to_string()),
        ("Name:", state.name),
        ("Style:", state.style),
        ("Styles:", state.styles.join(", ")),
        ("Color:", color),
        ("Brightness:", bright),
        ("Speed:", speed),
    ];
    let keys: Vec<&str> = rows.iter().map(|(key, _)| *key).collect();
    let w = kv_width(&keys, &[]);
    for (key, value) in &rows {
        kv(out, key, value, w)?;
    }
    Ok(())
}
