//! `config` subcommand: show current configuration and where the SDK is looked up.

use std::io::Write;

use super::{
    Config, ConfigOutput, Options, Result, SdkSearchJson, kv, kv_indent, kv_width, print_json, sdk,
    sdk_override,
};

pub(super) fn cmd_config(opts: &Options, config: &Config, out: &mut impl Write) -> Result<()> {
    let config_path = opts.config_path.clone().or_else(Config::path);
    let config_exists = config_path.as_ref().is_some_and(|p| p.exists());

    let explicit = sdk_override(opts, config);
    let dirs = sdk::search_dirs();
    let resolved = sdk::resolve_library_in(explicit.as_deref(), &dirs).ok();

    if opts.json {
        let library_names = sdk::DEFAULT_LIBRARY_NAMES.iter().map(|n| n.to_string());
        let output = ConfigOutput {
            config_file: config_path.as_ref().map(|p| p.display().to_string()),
            config_file_exists: config_exists,
            settings: config.clone(),
            sdk: SdkSearchJson {
                explicit: explicit.as_ref().map(|p| p.display().to_string()),
                library_names: library_names.collect(),
                search_dirs: dirs.iter().map(|d| d.display().to_string()).collect(),
                resolved: resolved.as_ref().map(|p| p.display().to_string()),
            },
        };
        return print_json(out, &output);
    }

    let w = kv_width(
        &["Config file:"],
        &["sdk_path:", "device_type:", "Library names:", "Search dir:", "Resolved:"],
    );

    let config_file = match &config_path {
        Some(p) if config_exists => format!("{} (loaded)", p.display()),
        Some(p) => format!("{} (not found, using defaults)", p.display()),
        None => "(no config directory)".to_string(),
    };
    kv(out, "Config file:", config_file, w)?;
    writeln!(out)?;

    writeln!(out, "Settings:")?;
    let sdk_path = match config.sdk_path() {
        Some(p) => p.display().to_string(),
        None => "(not set)".to_string(),
    };
    kv_indent(out, "sdk_path:", sdk_path, w)?;
    let device_type = config.device_type().unwrap_or("(not set)");
    kv_indent(out, "device_type:", device_type, w)?;
    writeln!(out)?;

    writeln!(out, "SDK:")?;
    match &explicit {
        Some(p) => kv_indent(out, "Explicit:", p.display(), w)?,
        None => {
            let names = sdk::DEFAULT_LIBRARY_NAMES.join(", ");
            kv_indent(out, "Library names:", names, w)?;
            for d in &dirs {
                kv_indent(out, "Search dir:", d.display(), w)?;
            }
        }
    }
    match &resolved {
        Some(p) => kv_indent(out, "Resolved:", p.display(), w)?,
        None => kv_indent(out, "Resolved:", "(not found)", w)?,
    }
    Ok(())
}
