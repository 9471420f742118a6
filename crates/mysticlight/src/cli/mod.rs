//! CLI subcommands: interactive menu, device listing, LED control.

mod config_cmd;
mod devices;
mod interactive;
mod leds;
mod set;
mod show;

use std::fmt::Display;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde::Serialize;

pub(super) use mysticlight_lib::config::Config;
pub(super) use mysticlight_lib::error::{MysticLightError, Result};
pub(super) use mysticlight_lib::led::{self, LedRef, Rgb};
pub(super) use mysticlight_lib::sdk::{self, LightingSdk};
pub(super) use mysticlight_lib::session::Session;

const PADDING: usize = 2;

/// Global options shared by every subcommand.
pub struct Options {
    pub json: bool,
    pub sdk_path: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
}

/// Compute alignment width for a command's key-value output.
/// Ensures at least PADDING spaces after the longest key in either level,
/// with top-level and indent values aligned to the same column.
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let top_max = top.iter().map(|k| k.len()).max().unwrap_or(0);
    let indent_max = indent.iter().map(|k| k.len()).max().unwrap_or(0);
    let top_need = if top.is_empty() { 0 } else { top_max + PADDING };
    // Indent keys lose 2 chars of inner width to the "  " prefix
    let indent_need = if indent.is_empty() {
        0
    } else {
        indent_max + PADDING + 2
    };
    top_need.max(indent_need)
}

pub(super) fn format_kv(key: &str, value: impl Display, w: usize) -> String {
    format!("{key:<width$}{value}", width = w)
}

pub(super) fn kv(out: &mut impl Write, key: &str, value: impl Display, w: usize) -> Result<()> {
    writeln!(out, "{}", format_kv(key, value, w))?;
    Ok(())
}

pub(super) fn kv_indent(
    out: &mut impl Write,
    key: &str,
    value: impl Display,
    w: usize,
) -> Result<()> {
    writeln!(out, "  {key:<width$}{value}", width = w - 2)?;
    Ok(())
}

pub(super) fn print_json(out: &mut impl Write, value: &impl Serialize) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    writeln!(out, "{text}")?;
    Ok(())
}

/// Load the config from `custom` or the default location, logging parse warnings.
pub(super) fn load_config(custom: Option<&Path>) -> Config {
    match custom {
        Some(path) => {
            let (config, warnings) = Config::load_from(path);
            for w in &warnings {
                log::warn!("{w}");
            }
            config
        }
        None => Config::load(),
    }
}

/// `--sdk` wins over the config file's `sdk_path`.
pub(super) fn sdk_override(opts: &Options, config: &Config) -> Option<PathBuf> {
    opts.sdk_path.clone().or_else(|| config.sdk_path())
}

/// Run `f` between one initialize and one release.
pub(super) fn in_session<S: LightingSdk, T>(sdk: &S, f: impl FnOnce(&S) -> Result<T>) -> Result<T> {
    let session = Session::open(sdk)?;
    let out = f(sdk)?;
    session.close()?;
    Ok(out)
}

// ── JSON output structs ──

#[derive(Debug, Serialize)]
pub(super) struct DevicesOutput {
    pub count: usize,
    pub devices: Vec<DeviceJson>,
}

#[derive(Debug, Serialize)]
pub(super) struct DeviceJson {
    pub device_type: String,
    pub led_count: u32,
    pub names: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct LedsOutput {
    pub device_type: String,
    pub leds: Vec<LedNameJson>,
}

#[derive(Debug, Serialize)]
pub(super) struct LedNameJson {
    pub index: u32,
    pub name: String,
}

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
    pub sdk: SdkSearchJson,
}

#[derive(Serialize)]
pub(super) struct SdkSearchJson {
    pub explicit: Option<String>,
    pub library_names: Vec<String>,
    pub search_dirs: Vec<String>,
    pub resolved: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Pick a device and LED, then change it from a menu (default)
    Interactive,

    /// List device types and their LED counts
    Devices,

    /// List the LED areas of a device type
    Leds {
        /// Device type (e.g. MSI_MB)
        device_type: String,
    },

    /// Show style, color, brightness and speed of one LED
    Show {
        /// Device type (e.g. MSI_MB)
        device_type: String,
        /// LED index
        index: u32,
    },

    /// Set the color of one LED
    SetColor {
        device_type: String,
        index: u32,
        /// Color: name, hex (#FF0000) or r,g,b
        color: String,
    },

    /// Set the style of one LED
    SetStyle {
        device_type: String,
        index: u32,
        /// Style name as listed by `show`
        style: String,
    },

    /// Set the brightness level of one LED
    SetBright {
        device_type: String,
        index: u32,
        level: u32,
    },

    /// Set the speed level of one LED
    SetSpeed {
        device_type: String,
        index: u32,
        level: u32,
    },

    /// Set every LED of a device type to one color
    SyncColor {
        device_type: String,
        /// Color: name, hex (#FF0000) or r,g,b
        color: String,
    },

    /// Set several named LEDs of a device at once
    SetColors {
        device_type: String,
        index: u32,
        /// NAME=COLOR pairs (e.g. JRGB1=red JRAINBOW1=#00FF00)
        #[arg(required = true, value_name = "NAME=COLOR")]
        pairs: Vec<String>,
    },

    /// Set the color of a named LED, or of all LEDs with --sync
    SetColorEx {
        device_type: String,
        index: u32,
        /// LED name
        led: String,
        /// Color: name, hex (#FF0000) or r,g,b
        color: String,
        /// Apply to every LED of the device
        #[arg(long)]
        sync: bool,
    },

    /// Show current configuration and SDK search paths
    Config,
}

/// Warn if `--json` was passed to a command that doesn't support it.
fn warn_json_unsupported(cmd_name: &str) {
    log::warn!("--json is not supported for `{cmd_name}` (ignored)");
}

fn json_unsupported_name(cmd: &Command) -> Option<&'static str> {
    match cmd {
        Command::Interactive => Some("interactive"),
        Command::SetColor { .. } => Some("set-color"),
        Command::SetStyle { .. } => Some("set-style"),
        Command::SetBright { .. } => Some("set-bright"),
        Command::SetSpeed { .. } => Some("set-speed"),
        Command::SyncColor { .. } => Some("sync-color"),
        Command::SetColors { .. } => Some("set-colors"),
        Command::SetColorEx { .. } => Some("set-color-ex"),
        Command::Devices | Command::Leds { .. } | Command::Show { .. } | Command::Config => None,
    }
}

pub fn run(cmd: Command, opts: &Options) -> Result<()> {
    if opts.json
        && let Some(name) = json_unsupported_name(&cmd)
    {
        warn_json_unsupported(name);
    }

    let config = load_config(opts.config_path.as_deref());
    // `config` must work without a loadable SDK, so each SDK command opens it itself.
    let open = || sdk::open_sdk(sdk_override(opts, &config).as_deref());
    let json = opts.json;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cmd {
        Command::Interactive => {
            let stdin = std::io::stdin();
            let mut input = stdin.lock();
            interactive::run_menu(&open()?, config.device_type(), &mut input, &mut out)
        }
        Command::Devices => devices::cmd_devices(&open()?, json, &mut out),
        Command::Leds { device_type } => leds::cmd_leds(&open()?, &device_type, json, &mut out),
        Command::Show { device_type, index } => {
            let target = LedRef::new(device_type, index);
            show::cmd_show(&open()?, &target, json, &mut out)
        }
        Command::SetColor {
            device_type,
            index,
            color,
        } => {
            let target = LedRef::new(device_type, index);
            set::cmd_set_color(&open()?, &target, &color, &mut out)
        }
        Command::SetStyle {
            device_type,
            index,
            style,
        } => {
            let target = LedRef::new(device_type, index);
            set::cmd_set_style(&open()?, &target, &style, &mut out)
        }
        Command::SetBright {
            device_type,
            index,
            level,
        } => {
            let target = LedRef::new(device_type, index);
            set::cmd_set_bright(&open()?, &target, level, &mut out)
        }
        Command::SetSpeed {
            device_type,
            index,
            level,
        } => {
            let target = LedRef::new(device_type, index);
            set::cmd_set_speed(&open()?, &target, level, &mut out)
        }
        Command::SyncColor { device_type, color } => {
            set::cmd_sync_color(&open()?, &device_type, &color, &mut out)
        }
        Command::SetColors {
            device_type,
            index,
            pairs,
        } => {
            let target = LedRef::new(device_type, index);
            set::cmd_set_colors(&open()?, &target, &pairs, &mut out)
        }
        Command::SetColorEx {
            device_type,
            index,
            led,
            color,
            sync,
        } => {
            let target = LedRef::new(device_type, index);
            set::cmd_set_color_ex(&open()?, &target, &led, &color, sync, &mut out)
        }
        Command::Config => config_cmd::cmd_config(opts, &config, &mut out),
    }
}
