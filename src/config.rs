use std::path::Path;

use anyhow::Context as _;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::repository::{self, RepositoryReference, ResolveError};
use crate::target::{
    self, DEFAULT_HOST, InstallCommand, Scheme, ScriptEndpoint, ScriptVersion, Target,
};
use crate::theme::ThemeStorage;

pub const DEFAULT_PLACEHOLDER: &str = "https://github.com/OpenBangla/OpenBangla-Keyboard";

/// Named configurations matching the deployed page revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Ubuntu and Debian over plain http, `darkmode` on/off preference.
    Legacy,
    /// All four targets over https, `themeMode` light/dark/system preference.
    #[default]
    Current,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub scheme: Scheme,
    pub host: String,
    pub targets: Vec<Target>,
    pub placeholder: String,
    pub theme: ThemeStorage,
    /// Point the commands at the pre-release channel.
    pub prerelease: bool,
    /// Script version requested from the server; the server picks when unset.
    pub version: Option<ScriptVersion>,
}

/// Partial configuration, as read from a TOML file or collected from CLI flags.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    pub preset: Option<Preset>,
    pub scheme: Option<Scheme>,
    pub host: Option<String>,
    pub targets: Option<Vec<Target>>,
    pub placeholder: Option<String>,
    pub theme: Option<ThemeStorage>,
    pub prerelease: Option<bool>,
    pub version: Option<ScriptVersion>,
}

impl Config {
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Legacy => Self {
                scheme: Scheme::Http,
                host: DEFAULT_HOST.to_string(),
                targets: vec![Target::Ubuntu, Target::Debian],
                placeholder: DEFAULT_PLACEHOLDER.to_string(),
                theme: ThemeStorage::Binary,
                prerelease: false,
                version: None,
            },
            Preset::Current => Self {
                scheme: Scheme::Https,
                host: DEFAULT_HOST.to_string(),
                targets: Target::ALL.to_vec(),
                placeholder: DEFAULT_PLACEHOLDER.to_string(),
                theme: ThemeStorage::TriState,
                prerelease: false,
                version: None,
            },
        }
    }

    /// Builds a config from `file` (if any) layered under `cli`.
    ///
    /// The base preset comes from the CLI, then the file, then [`Preset::Current`].
    pub fn layered(file: Option<ConfigOverrides>, cli: ConfigOverrides) -> anyhow::Result<Self> {
        let file = file.unwrap_or_default();
        let preset = cli.preset.or(file.preset).unwrap_or_default();
        let mut config = Self::preset(preset);
        config.apply(file);
        config.apply(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(scheme) = overrides.scheme {
            self.scheme = scheme;
        }
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(targets) = overrides.targets {
            self.targets = targets;
        }
        if let Some(placeholder) = overrides.placeholder {
            self.placeholder = placeholder;
        }
        if let Some(theme) = overrides.theme {
            self.theme = theme;
        }
        if let Some(prerelease) = overrides.prerelease {
            self.prerelease = prerelease;
        }
        if let Some(version) = overrides.version {
            self.version = Some(version);
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        validate_host(self.scheme, &self.host)?;

        if self.targets.is_empty() {
            anyhow::bail!("at least one target is required");
        }
        for (idx, t) in self.targets.iter().enumerate() {
            if self.targets[..idx].contains(t) {
                anyhow::bail!("target {} is listed more than once", t);
            }
        }

        if repository::resolve(&self.placeholder).is_err() {
            tracing::warn!(
                placeholder = %self.placeholder,
                "placeholder is not a GitHub repository URL; commands start empty"
            );
        }
        Ok(())
    }

    pub fn endpoint(&self) -> ScriptEndpoint<'_> {
        ScriptEndpoint {
            scheme: self.scheme,
            host: &self.host,
            prerelease: self.prerelease,
            version: self.version,
        }
    }

    pub fn commands_for(&self, reference: &RepositoryReference) -> Vec<InstallCommand> {
        target::derive_commands(&self.endpoint(), &self.targets, reference)
    }

    pub fn resolve_commands(&self, input: &str) -> Result<Vec<InstallCommand>, ResolveError> {
        let reference = repository::resolve(input)?;
        Ok(self.commands_for(&reference))
    }
}

pub fn load_overrides(path: &Path) -> anyhow::Result<ConfigOverrides> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_overrides(&text).with_context(|| format!("parse {}", path.display()))
}

pub fn parse_overrides(text: &str) -> anyhow::Result<ConfigOverrides> {
    Ok(toml::from_str(text)?)
}

/// The host is pasted verbatim into shell one-liners, so it must survive a URL
/// round trip unchanged: no whitespace, control characters or userinfo.
fn validate_host(scheme: Scheme, host: &str) -> anyhow::Result<()> {
    if host.is_empty() {
        anyhow::bail!("host must not be empty");
    }
    if host.chars().any(|c| c.is_whitespace() || c.is_control()) {
        anyhow::bail!("host {:?} must not contain whitespace or control characters", host);
    }
    let url = Url::parse(&format!("{}://{}/", scheme, host))
        .with_context(|| format!("invalid host {:?}", host))?;
    let Some(parsed_host) = url.host_str() else {
        anyhow::bail!("host {:?} has no host name", host);
    };
    if !url.username().is_empty()
        || url.password().is_some()
        || url.path() != "/"
        || url.query().is_some()
        || url.fragment().is_some()
    {
        anyhow::bail!("host {:?} must be a bare host name, optionally with a port", host);
    }

    let given = host.to_ascii_lowercase();
    let round_trip = match url.port() {
        Some(port) => format!("{}:{}", parsed_host, port),
        None => parsed_host.to_string(),
    };
    // The parser drops an explicit default port (`:443` on https).
    let with_default_port = url
        .port_or_known_default()
        .map(|port| format!("{}:{}", parsed_host, port));
    if given != round_trip && Some(&given) != with_default_port.as_ref() {
        anyhow::bail!(
            "host {:?} is not a canonical host name (parses as {:?})",
            host,
            round_trip
        );
    }
    Ok(())
}
