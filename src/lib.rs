mod builtin;
mod cli;
mod clipboard;
mod config;
mod page;
mod repository;
mod strict;
mod target;
mod theme;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use cli::{Args, Command, ThemeAction};

pub use cli::Mode;
pub use cli::{Args as CliArgs, Command as CliCommand, ThemeAction as CliThemeAction};
pub use clipboard::{Clipboard, Osc52Clipboard, REVERT_DELAY, StatusIndicator, Visibility};
pub use config::{Config, ConfigOverrides, DEFAULT_PLACEHOLDER, Preset};
pub use page::{PageAssets, build_page, page_script};
pub use repository::{RepositoryReference, ResolveError, resolve, resolve_field};
pub use target::{
    DEFAULT_HOST, InstallCommand, Scheme, ScriptEndpoint, ScriptVersion, Target, derive_commands,
};
pub use theme::{
    FileStore, MemoryStore, PreferenceStore, ThemeController, ThemeMode, ThemeStorage,
};

pub async fn run(args: Args) -> anyhow::Result<()> {
    run_with_output(args, &mut std::io::stdout()).await
}

/// Like [`run`], with command output (and OSC 52 sequences) going to `out`.
pub async fn run_with_output<W: Write + Send>(args: Args, out: &mut W) -> anyhow::Result<()> {
    let file = match &args.config {
        Some(path) => Some(config::load_overrides(path)?),
        None => None,
    };
    let config = Config::layered(file, args.overrides())?;
    tracing::debug!(?config, "resolved configuration");

    match args.command {
        Command::Commands { input, json } => print_commands(&config, &input, json, out),
        Command::Render {
            mode,
            out: out_path,
            assets_dir_name,
            ..
        } => {
            let written = match mode {
                Mode::Dir => render_dir(&config, out_path, &assets_dir_name)?,
                Mode::Single => render_single(&config, out_path)?,
            };
            tracing::info!(path = %written.display(), "wrote landing page");
            Ok(())
        }
        Command::Copy { input, no_wait } => copy_command(&config, &input, !no_wait, out).await,
        Command::Theme {
            action,
            state,
            system_dark,
        } => theme_command(&config, action, state, system_dark, out),
    }
}

fn resolve_or_log(config: &Config, input: &str) -> anyhow::Result<Vec<InstallCommand>> {
    config.resolve_commands(input).map_err(|e| {
        tracing::warn!(%input, "Invalid or missing GitHub URL");
        anyhow::Error::new(e)
    })
}

fn print_commands<W: Write>(
    config: &Config,
    input: &str,
    json: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    let commands = resolve_or_log(config, input)?;
    if json {
        serde_json::to_writer_pretty(&mut *out, &commands).context("write json")?;
        writeln!(out)?;
    } else {
        for c in &commands {
            writeln!(out, "{}: {}", c.target, c.command)?;
        }
    }
    Ok(())
}

async fn copy_command<W: Write + Send>(
    config: &Config,
    input: &str,
    wait: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    let target = match config.targets.as_slice() {
        [target] => *target,
        targets => anyhow::bail!(
            "copy needs exactly one --target, got {} ({})",
            targets.len(),
            targets
                .iter()
                .map(|t| t.key())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    };
    let commands = resolve_or_log(config, input)?;
    let Some(command) = commands.into_iter().find(|c| c.target == target) else {
        anyhow::bail!("no command derived for {}", target);
    };

    let clipboard = Osc52Clipboard::new(&mut *out);
    let status = StatusIndicator::new(target);
    status.copy(&clipboard, &command.command).await?;
    if wait {
        status.settled().await;
        tracing::debug!(element = %status.element_id(), "copy acknowledgement cleared");
    }
    Ok(())
}

fn theme_command<W: Write>(
    config: &Config,
    action: Option<ThemeAction>,
    state: Option<PathBuf>,
    system_dark: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    let path = match state {
        Some(path) => path,
        None => FileStore::default_path()?,
    };
    let mut theme = ThemeController::load(FileStore::new(path), config.theme)?;

    match action.unwrap_or(ThemeAction::Show) {
        ThemeAction::Show => {}
        ThemeAction::Toggle => {
            let mode = theme.toggle(system_dark)?;
            tracing::info!(%mode, "toggled theme");
        }
        ThemeAction::Set { mode } => theme.set(mode)?,
    }

    writeln!(
        out,
        "{} (effective: {})",
        theme.mode(),
        theme.effective(system_dark)
    )?;
    Ok(())
}

fn render_dir(
    config: &Config,
    out: Option<PathBuf>,
    assets_dir_name: &str,
) -> anyhow::Result<PathBuf> {
    let out_dir = out.unwrap_or_else(|| PathBuf::from("site"));
    std::fs::create_dir_all(&out_dir).with_context(|| format!("create {}", out_dir.display()))?;

    let js = page::page_script(config)?;
    let css_rel = write_asset_file(&out_dir, assets_dir_name, "css", "site", builtin::BUILTIN_CSS)?;
    let js_rel = write_asset_file(&out_dir, assets_dir_name, "js", "packhub", &js)?;

    let html = page::build_page(
        config,
        &PageAssets::Linked {
            css_href: &css_rel,
            js_href: &js_rel,
        },
    );
    strict::assert_page_wired(&html, builtin::BUILTIN_CSS, config)?;

    let html_path = out_dir.join("index.html");
    std::fs::write(&html_path, html).with_context(|| format!("write {}", html_path.display()))?;
    Ok(html_path)
}

fn render_single(config: &Config, out: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let out_path = out.unwrap_or_else(|| PathBuf::from("index.html"));
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
    }

    let js = page::page_script(config)?;
    let html = page::build_page(
        config,
        &PageAssets::Inline {
            css: builtin::BUILTIN_CSS,
            js: &js,
        },
    );
    strict::assert_page_wired(&html, builtin::BUILTIN_CSS, config)?;

    std::fs::write(&out_path, html).with_context(|| format!("write {}", out_path.display()))?;
    Ok(out_path)
}

/// Writes `<assets>/<subdir>/<stem>-<hash>.<subdir>` and returns its path relative to `out_dir`.
fn write_asset_file(
    out_dir: &Path,
    assets_dir_name: &str,
    subdir: &str,
    stem: &str,
    contents: &str,
) -> anyhow::Result<String> {
    let hash = blake3::hash(contents.as_bytes()).to_hex().to_string();
    let rel = format!(
        "{}/{}/{}-{}.{}",
        assets_dir_name,
        subdir,
        stem,
        &hash[..16],
        subdir
    );
    let abs = out_dir.join(&rel);
    if let Some(parent) = abs.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    if !abs.exists() {
        std::fs::write(&abs, contents).with_context(|| format!("write {}", abs.display()))?;
    }
    Ok(rel)
}
