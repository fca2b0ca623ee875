use anyhow::Context as _;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::Serialize;

use crate::builtin;
use crate::clipboard::REVERT_DELAY;
use crate::config::Config;
use crate::target::{InstallCommand, Target};
use crate::theme::{self, ThemeStorage};

/// Where the stylesheet and script come from.
pub enum PageAssets<'a> {
    Inline { css: &'a str, js: &'a str },
    Linked { css_href: &'a str, js_href: &'a str },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScriptConfig<'a> {
    scheme: &'a str,
    host: &'a str,
    /// Appended after the repository name, e.g. `?prerelease=true`.
    query: String,
    targets: Vec<ScriptTarget>,
    theme: ScriptTheme,
    revert_delay_ms: u64,
}

#[derive(Serialize)]
struct ScriptTarget {
    key: &'static str,
    path: &'static str,
}

#[derive(Serialize)]
struct ScriptTheme {
    key: &'static str,
    storage: ThemeStorage,
}

/// The page script with `config` baked in.
pub fn page_script(config: &Config) -> anyhow::Result<String> {
    let script_config = ScriptConfig {
        scheme: config.scheme.as_str(),
        host: &config.host,
        query: config.endpoint().query(),
        targets: config
            .targets
            .iter()
            .map(|t| ScriptTarget {
                key: t.key(),
                path: t.path_segment(),
            })
            .collect(),
        theme: ScriptTheme {
            key: config.theme.key(),
            storage: config.theme,
        },
        revert_delay_ms: REVERT_DELAY.as_millis() as u64,
    };
    let json = serde_json::to_string(&script_config).context("serialize page script config")?;
    // Keep `</script>` out of the inline script body.
    let json = json.replace("</", "<\\/");
    Ok(builtin::PAGE_JS.replace(builtin::CONFIG_PLACEHOLDER, &json))
}

pub fn build_page(config: &Config, assets: &PageAssets<'_>) -> String {
    let initial = match config.resolve_commands(&config.placeholder) {
        Ok(commands) => commands,
        Err(_) => {
            tracing::debug!(placeholder = %config.placeholder, "placeholder does not resolve; commands start empty");
            Vec::new()
        }
    };
    let body_class = theme::body_class(config.theme, config.theme.default_mode());

    let markup: Markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                meta name="color-scheme" content="light dark";
                title { "PackHub" }
                @match assets {
                    PageAssets::Inline { css, .. } => {
                        style { (PreEscaped(*css)) }
                    }
                    PageAssets::Linked { css_href, .. } => {
                        link rel="stylesheet" href=(*css_href);
                    }
                }
            }
            body class=[body_class] {
                header class="ph-topbar" {
                    div class="ph-container ph-topbar-inner" {
                        h1 class="ph-title" { "PackHub" }
                        button type="button" id="themeToggleBtn" class="ph-btn" { "Theme" }
                    }
                }
                main class="ph-container ph-main" {
                    p class="ph-lead" {
                        "Paste a GitHub repository URL to get a one-line install command for your distribution."
                    }
                    input type="url" class="github-link" placeholder=(config.placeholder);
                    @for target in &config.targets {
                        (render_target(*target, initial.iter().find(|c| c.target == *target)))
                    }
                }
                footer class="ph-footer" {
                    div class="ph-container" {
                        "Commands are served from " (config.scheme.as_str()) "://" (config.host) "."
                    }
                }
                @match assets {
                    PageAssets::Inline { js, .. } => {
                        script { (PreEscaped(*js)) }
                    }
                    PageAssets::Linked { js_href, .. } => {
                        script src=(*js_href) {}
                    }
                }
            }
        }
    };
    markup.into_string()
}

fn render_target(target: Target, command: Option<&InstallCommand>) -> Markup {
    let key = target.key();
    let text = command.map(|c| c.command.as_str()).unwrap_or("");

    html! {
        section class="ph-target" {
            div class="ph-target-header" {
                h2 class="ph-target-name" { (target.label()) }
                span class="ph-manager" { (target.manager()) }
            }
            div class="ph-command-row" {
                code class=(format!("command {}", key)) { (text) }
                button type="button" class="ph-btn copy-button" id=(format!("copy-button-{}", key)) { "Copy" }
                span class="copy-status-message" id=(format!("copy-status-message-{}", key)) style="opacity: 0" {
                    "Copied!"
                }
            }
        }
    }
}
