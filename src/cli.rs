use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{ConfigOverrides, Preset};
use crate::target::{Scheme, ScriptVersion, Target};
use crate::theme::{ThemeMode, ThemeStorage};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Mode {
    /// `index.html` plus an `assets/` directory.
    Dir,
    /// One self-contained HTML file.
    Single,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// TOML file with `preset`, `scheme`, `host`, `targets`, `placeholder`, `theme`,
    /// `prerelease` and `version` keys.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base configuration: `legacy` (ubuntu/debian over http) or `current` (all targets over https).
    #[arg(long, value_enum, global = true)]
    pub preset: Option<Preset>,

    /// Scheme used in generated commands.
    #[arg(long, value_enum, global = true)]
    pub scheme: Option<Scheme>,

    /// Host serving the install scripts (e.g. `packhub.dev`).
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Restrict output to these targets, in this order. Repeatable. `copy` takes exactly one.
    #[arg(long = "target", value_enum, global = true)]
    pub targets: Vec<Target>,

    /// Generate commands for the pre-release channel (`?prerelease=true`).
    #[arg(long, global = true)]
    pub prerelease: bool,

    /// Request a specific install script version (`?ver=v1|v2`).
    #[arg(long, value_enum, global = true)]
    pub script_version: Option<ScriptVersion>,

    /// How the page persists the theme: `tri-state` (`themeMode`) or `binary` (`darkmode`).
    #[arg(long, value_enum, global = true)]
    pub theme_storage: Option<ThemeStorage>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the install command for each target.
    Commands {
        /// Text containing a GitHub repository URL.
        input: String,

        /// Print a JSON array instead of `<target>: <command>` lines.
        #[arg(long)]
        json: bool,
    },

    /// Render the landing page.
    Render {
        /// Output mode: `dir` (HTML + assets/) or `single` (one self-contained HTML).
        #[arg(long, value_enum, default_value = "single")]
        mode: Mode,

        /// Output path. For `dir` mode: a directory. For `single` mode: an HTML file path.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Example URL shown in the input field and used to pre-fill the commands.
        #[arg(long)]
        placeholder: Option<String>,

        /// Assets directory name for `dir` mode.
        #[arg(long, default_value = "assets")]
        assets_dir_name: String,
    },

    /// Copy the command for the `--target` given to the terminal clipboard (OSC 52).
    Copy {
        /// Text containing a GitHub repository URL.
        input: String,

        /// Exit right after copying instead of waiting for the acknowledgement to clear.
        #[arg(long)]
        no_wait: bool,
    },

    /// Show or change the persisted theme preference.
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,

        /// Preference file. Defaults to `preferences.json` in the user data directory.
        #[arg(long)]
        state: Option<PathBuf>,

        /// Treat the system color scheme as dark.
        #[arg(long)]
        system_dark: bool,
    },
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ThemeAction {
    Show,
    Toggle,
    Set { mode: ThemeMode },
}

impl Args {
    pub(crate) fn overrides(&self) -> ConfigOverrides {
        let placeholder = match &self.command {
            Command::Render { placeholder, .. } => placeholder.clone(),
            _ => None,
        };
        ConfigOverrides {
            preset: self.preset,
            scheme: self.scheme,
            host: self.host.clone(),
            targets: (!self.targets.is_empty()).then(|| self.targets.clone()),
            placeholder,
            theme: self.theme_storage,
            prerelease: self.prerelease.then_some(true),
            version: self.script_version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_takes_input_and_global_target() {
        let args = Args::try_parse_from([
            "packhub-pages",
            "copy",
            "https://github.com/foo/bar",
            "--target",
            "fedora",
        ])
        .unwrap();
        assert_eq!(args.targets, vec![Target::Fedora]);
        match args.command {
            Command::Copy { input, no_wait } => {
                assert_eq!(input, "https://github.com/foo/bar");
                assert!(!no_wait);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn script_options_become_overrides() {
        let args = Args::try_parse_from([
            "packhub-pages",
            "--prerelease",
            "--script-version",
            "v1",
            "--theme-storage",
            "binary",
            "commands",
            "https://github.com/foo/bar",
        ])
        .unwrap();
        let overrides = args.overrides();
        assert_eq!(overrides.prerelease, Some(true));
        assert_eq!(overrides.version, Some(ScriptVersion::V1));
        assert_eq!(overrides.theme, Some(ThemeStorage::Binary));

        let args =
            Args::try_parse_from(["packhub-pages", "commands", "https://github.com/foo/bar"])
                .unwrap();
        assert_eq!(args.overrides().prerelease, None);
    }
}
