//! modfs - module content overlay host.

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use serde_json::json;
use std::sync::Arc;
use std::time::SystemTime;

use modfs::cli::{Cli, Commands};
use modfs::config::HostConfig;
use modfs::embed::welcome_module;
use modfs::module::{ContentPrefix, ModuleRegistry};
use modfs::overlay::OverlayFs;
use modfs::store::NativeStore;
use modfs::{cache, log, logger, serve};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let mut config = HostConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    match cli.command {
        Commands::Serve { interface, port } => {
            if let Some(interface) = interface {
                config.serve.interface = interface;
            }
            if let Some(port) = port {
                config.serve.port = port;
            }
            let overlay = build_overlay(&config)?;
            serve::copy_view_defaults(&config);
            serve::run(&config, overlay)
        }
        Commands::Inspect { path, pretty } => {
            let overlay = build_overlay(&config)?;
            inspect(&overlay, &path, pretty)
        }
    }
}

/// Assemble the overlay: native root plus the built-in Welcome module.
fn build_overlay(config: &HostConfig) -> Result<Arc<OverlayFs>> {
    let registry = Arc::new(ModuleRegistry::new(&config.app_root));
    registry.register_with(welcome_module(binary_origin()), |module| {
        log!("module"; "registered '{}'", module.name());
        Ok(())
    })?;

    let native = NativeStore::new(&config.root);
    Ok(Arc::new(OverlayFs::new(native, registry)))
}

/// Origin timestamp for built-in content: the binary's own mtime, so
/// embedded resources age with the deployment, not with each request.
fn binary_origin() -> SystemTime {
    std::env::current_exe()
        .and_then(std::fs::metadata)
        .and_then(|m| m.modified())
        .unwrap_or_else(|_| SystemTime::now())
}

/// Print how a virtual path resolves, as JSON.
fn inspect(overlay: &OverlayFs, path: &str, pretty: bool) -> Result<()> {
    let parsed = overlay.registry().parse_content_path(path);
    let file_exists = overlay.file_exists(path);
    let layer = overlay.open(path).ok().map(|s| match s.backend() {
        modfs::store::Backend::Native => "native",
        modfs::store::Backend::Embedded => "embedded",
    });

    let value = json!({
        "raw_path": parsed.raw_path,
        "full_path": parsed.full_path,
        "root_relative": parsed.is_root_relative,
        "convention": parsed.prefix.map(|p| match p {
            ContentPrefix::ShortAlias => "short-alias",
            ContentPrefix::Area => "area",
        }),
        "module": (!parsed.module_name.is_empty()).then_some(&parsed.module_name),
        "module_registered": parsed.module.is_some(),
        "content_path": parsed.content_path,
        "file_exists": file_exists,
        "dir_exists": overlay.dir_exists(path),
        "layer": layer,
        "modified": overlay
            .modified_time(path)
            .map(cache::format_http_date),
        "content_hash": file_exists
            .then(|| overlay.content_hash(path, &[]).ok().map(|h| h.to_hex()))
            .flatten(),
    });

    let output = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    println!("{output}");
    Ok(())
}
