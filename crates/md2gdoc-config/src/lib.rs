//! Settings for md2gdoc, read from `.md2gdoc.toml`.
//!
//! At most two files contribute, applied key by key over the built-in
//! defaults: `.md2gdoc.toml` in the working directory, then the file named
//! with `--config`.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use md2gdoc::CheckboxSlicing;
use md2gdoc_client::{default_scopes, EmailAddress, Role, DEFAULT_TITLE};
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = ".md2gdoc.toml";

#[derive(Clone, Debug)]
pub struct Config {
    pub document: DocumentSettings,
    pub share: ShareSettings,
    pub credentials: CredentialSettings,
    pub translate: TranslateSettings,
    /// Files that were applied, lowest precedence first.
    pub files: Vec<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct DocumentSettings {
    pub title: String,
}

/// Sharing is skipped when no address is configured.
#[derive(Clone, Debug)]
pub struct ShareSettings {
    pub email: Option<EmailAddress>,
    pub role: Role,
}

#[derive(Clone, Debug)]
pub struct CredentialSettings {
    /// Service-account key file. Relative paths are taken from the directory
    /// of the file that set them.
    pub path: Option<PathBuf>,
    pub scopes: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct TranslateSettings {
    pub checkbox_slicing: CheckboxSlicing,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            document: DocumentSettings {
                title: DEFAULT_TITLE.to_string(),
            },
            share: ShareSettings {
                email: None,
                role: Role::default(),
            },
            credentials: CredentialSettings {
                path: None,
                scopes: default_scopes(),
            },
            translate: TranslateSettings {
                checkbox_slicing: CheckboxSlicing::default(),
            },
            files: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot determine the working directory: {0}")]
    WorkingDirectory(#[source] io::Error),
    #[error("config file {} does not exist", path.display())]
    OverrideNotFound { path: PathBuf },
    #[error("cannot read config {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("cannot parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid configuration:\n{0}")]
    Invalid(Problems),
}

/// A rejected value and the file it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Problem {
    pub key: &'static str,
    pub message: String,
    pub file: PathBuf,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (in {})", self.key, self.message, self.file.display())
    }
}

/// Every problem found across all files, one per line.
#[derive(Debug)]
pub struct Problems(pub Vec<Problem>);

impl fmt::Display for Problems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.0.iter().map(|problem| format!("- {problem}")).collect();
        f.write_str(&lines.join("\n"))
    }
}

impl Config {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = match options.working_dir {
            Some(dir) => dir,
            None => env::current_dir().map_err(ConfigError::WorkingDirectory)?,
        };

        let mut files = Vec::new();
        let local = working_dir.join(CONFIG_FILE_NAME);
        if local.is_file() {
            files.push(local);
        }
        if let Some(path) = options.override_path {
            let path = working_dir.join(path);
            if !path.is_file() {
                return Err(ConfigError::OverrideNotFound { path });
            }
            files.retain(|file| file != &path);
            files.push(path);
        }

        let mut config = Config::default();
        let mut problems = Vec::new();
        for path in &files {
            log::debug!("applying config {}", path.display());
            ConfigFile::read(path)?.apply(&mut config, path, &mut problems);
        }

        if !problems.is_empty() {
            return Err(ConfigError::Invalid(Problems(problems)));
        }
        config.files = files;
        Ok(config)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    document: Option<DocumentTable>,
    share: Option<ShareTable>,
    credentials: Option<CredentialsTable>,
    translate: Option<TranslateTable>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocumentTable {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ShareTable {
    email: Option<String>,
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CredentialsTable {
    path: Option<PathBuf>,
    scopes: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TranslateTable {
    checkbox_slicing: Option<String>,
}

impl ConfigFile {
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overwrites every key this file sets. Rejected values leave the earlier
    /// value in place and are recorded in `problems`.
    fn apply(self, config: &mut Config, path: &Path, problems: &mut Vec<Problem>) {
        let mut reject = |key: &'static str, message: String| {
            problems.push(Problem {
                key,
                message,
                file: path.to_path_buf(),
            })
        };

        if let Some(title) = self.document.and_then(|table| table.title) {
            if title.trim().is_empty() {
                reject("document.title", "cannot be empty".into());
            } else {
                config.document.title = title;
            }
        }

        if let Some(share) = self.share {
            if let Some(email) = share.email {
                match EmailAddress::parse(&email) {
                    Ok(email) => config.share.email = Some(email),
                    Err(message) => reject("share.email", message),
                }
            }
            if let Some(role) = share.role {
                match role.parse::<Role>() {
                    Ok(role) => config.share.role = role,
                    Err(()) => reject(
                        "share.role",
                        format!("expected 'reader' or 'writer', found '{role}'"),
                    ),
                }
            }
        }

        if let Some(credentials) = self.credentials {
            if let Some(key_file) = credentials.path {
                let base = path.parent().unwrap_or_else(|| Path::new("."));
                config.credentials.path = Some(base.join(key_file));
            }
            if let Some(scopes) = credentials.scopes {
                if scopes.iter().all(|scope| scope.trim().is_empty()) {
                    reject("credentials.scopes", "must name at least one scope".into());
                } else {
                    config.credentials.scopes = scopes;
                }
            }
        }

        if let Some(slicing) = self.translate.and_then(|table| table.checkbox_slicing) {
            match slicing.parse::<CheckboxSlicing>() {
                Ok(slicing) => config.translate.checkbox_slicing = slicing,
                Err(()) => reject(
                    "translate.checkbox_slicing",
                    format!("expected 'preserve' or 'exact', found '{slicing}'"),
                ),
            }
        }
    }
}
