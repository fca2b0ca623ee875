use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::repository::RepositoryReference;

pub const DEFAULT_HOST: &str = "packhub.dev";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A distribution/package-manager pair an install command is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Ubuntu,
    Debian,
    Fedora,
    Suse,
}

impl Target {
    pub const ALL: [Target; 4] = [Target::Ubuntu, Target::Debian, Target::Fedora, Target::Suse];

    /// Suffix used in the page's class and id names (`command.<key>`, `copy-button-<key>`).
    pub fn key(self) -> &'static str {
        match self {
            Target::Ubuntu => "ubuntu",
            Target::Debian => "debian",
            Target::Fedora => "fedora",
            Target::Suse => "suse",
        }
    }

    /// Distro segment of the `/sh/<segment>/github/...` script route.
    pub fn path_segment(self) -> &'static str {
        match self {
            Target::Ubuntu => "ubuntu",
            Target::Debian => "debian",
            Target::Fedora => "yum",
            Target::Suse => "zypp",
        }
    }

    pub fn manager(self) -> &'static str {
        match self {
            Target::Ubuntu | Target::Debian => "apt",
            Target::Fedora => "yum",
            Target::Suse => "zypper",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Target::Ubuntu => "Ubuntu",
            Target::Debian => "Debian",
            Target::Fedora => "Fedora",
            Target::Suse => "openSUSE",
        }
    }

    pub fn from_key(key: &str) -> Option<Target> {
        Target::ALL.into_iter().find(|t| t.key() == key)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallCommand {
    pub target: Target,
    pub manager: &'static str,
    pub command: String,
}

/// `ver=` query value understood by the script route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptVersion {
    V1,
    V2,
}

impl ScriptVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            ScriptVersion::V1 => "v1",
            ScriptVersion::V2 => "v2",
        }
    }
}

/// Where the install scripts are served from and which query options they get.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptEndpoint<'a> {
    pub scheme: Scheme,
    pub host: &'a str,
    /// Install from the unstable (pre-release) channel.
    pub prerelease: bool,
    pub version: Option<ScriptVersion>,
}

impl<'a> ScriptEndpoint<'a> {
    pub fn new(scheme: Scheme, host: &'a str) -> Self {
        Self {
            scheme,
            host,
            prerelease: false,
            version: None,
        }
    }

    /// `?prerelease=true&ver=v1`, or an empty string when no option is set.
    pub fn query(&self) -> String {
        let mut params = Vec::new();
        if self.prerelease {
            params.push("prerelease=true".to_string());
        }
        if let Some(version) = self.version {
            params.push(format!("ver={}", version.as_str()));
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }

    pub fn script_url(&self, target: Target, reference: &RepositoryReference) -> String {
        format!(
            "{}://{}/sh/{}/github/{}/{}{}",
            self.scheme,
            self.host,
            target.path_segment(),
            reference.owner,
            reference.repo,
            self.query()
        )
    }

    pub fn install_command(
        &self,
        target: Target,
        reference: &RepositoryReference,
    ) -> InstallCommand {
        InstallCommand {
            target,
            manager: target.manager(),
            command: format!("wget -qO- {} | sh", self.script_url(target, reference)),
        }
    }
}

/// One command per target, in the order given.
pub fn derive_commands(
    endpoint: &ScriptEndpoint<'_>,
    targets: &[Target],
    reference: &RepositoryReference,
) -> Vec<InstallCommand> {
    targets
        .iter()
        .map(|&target| endpoint.install_command(target, reference))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foo_bar() -> RepositoryReference {
        RepositoryReference {
            owner: "foo".to_string(),
            repo: "bar".to_string(),
        }
    }

    #[test]
    fn ubuntu_command_over_https() {
        let cmd = ScriptEndpoint::new(Scheme::Https, DEFAULT_HOST)
            .install_command(Target::Ubuntu, &foo_bar());
        assert_eq!(
            cmd.command,
            "wget -qO- https://packhub.dev/sh/ubuntu/github/foo/bar | sh"
        );
        assert_eq!(cmd.manager, "apt");
    }

    #[test]
    fn rpm_targets_use_their_repo_directories() {
        let cmds = derive_commands(
            &ScriptEndpoint::new(Scheme::Https, DEFAULT_HOST),
            &[Target::Fedora, Target::Suse],
            &foo_bar(),
        );
        assert_eq!(
            cmds[0].command,
            "wget -qO- https://packhub.dev/sh/yum/github/foo/bar | sh"
        );
        assert_eq!(
            cmds[1].command,
            "wget -qO- https://packhub.dev/sh/zypp/github/foo/bar | sh"
        );
        assert_eq!(cmds[1].manager, "zypper");
    }

    #[test]
    fn follows_scheme_host_and_order() {
        let cmds = derive_commands(
            &ScriptEndpoint::new(Scheme::Http, "localhost:3000"),
            &[Target::Debian, Target::Ubuntu],
            &foo_bar(),
        );
        let targets: Vec<_> = cmds.iter().map(|c| c.target).collect();
        assert_eq!(targets, vec![Target::Debian, Target::Ubuntu]);
        assert_eq!(
            cmds[0].command,
            "wget -qO- http://localhost:3000/sh/debian/github/foo/bar | sh"
        );
    }

    #[test]
    fn prerelease_and_version_become_query_options() {
        let mut endpoint = ScriptEndpoint::new(Scheme::Https, DEFAULT_HOST);
        endpoint.prerelease = true;
        assert_eq!(
            endpoint.install_command(Target::Ubuntu, &foo_bar()).command,
            "wget -qO- https://packhub.dev/sh/ubuntu/github/foo/bar?prerelease=true | sh"
        );

        endpoint.version = Some(ScriptVersion::V2);
        assert_eq!(
            endpoint.script_url(Target::Fedora, &foo_bar()),
            "https://packhub.dev/sh/yum/github/foo/bar?prerelease=true&ver=v2"
        );

        endpoint.prerelease = false;
        endpoint.version = Some(ScriptVersion::V1);
        assert_eq!(
            endpoint.script_url(Target::Suse, &foo_bar()),
            "https://packhub.dev/sh/zypp/github/foo/bar?ver=v1"
        );
    }

    #[test]
    fn keys_round_trip() {
        for t in Target::ALL {
            assert_eq!(Target::from_key(t.key()), Some(t));
        }
        assert_eq!(Target::from_key("arch"), None);
    }
}
