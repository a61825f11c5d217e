use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "frontdesk";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_BASE_URL: &str = "https://api.cal.com";
pub const DEFAULT_API_VERSION: &str = "2024-08-13";
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_MAX_PAGES: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 500;
pub const MAX_MAX_PAGES: u32 = 100;

pub const SHARED_SECRET_ENV: &str = "FRONTDESK_SHARED_SECRET";
pub const API_KEY_ENV: &str = "FRONTDESK_UPSTREAM_API_KEY";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub shared_secret: Option<String>,
    pub upstream: UpstreamConfig,
    pub matching: MatchingConfig,
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_version: String,
    pub page_size: u32,
    pub max_pages: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct MatchingConfig {
    pub require_dob: bool,
    pub auto_resolve: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            shared_secret: None,
            upstream: UpstreamConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                api_key: None,
                api_version: DEFAULT_API_VERSION.to_string(),
                page_size: DEFAULT_PAGE_SIZE,
                max_pages: DEFAULT_MAX_PAGES,
            },
            matching: MatchingConfig {
                require_dob: false,
                auto_resolve: true,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid upstream.base_url value")]
    InvalidBaseUrl,
    #[error("invalid upstream.page_size value: {0}")]
    InvalidPageSize(u32),
    #[error("invalid upstream.max_pages value: {0}")]
    InvalidMaxPages(u32),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    shared_secret: Option<String>,
    upstream: Option<UpstreamFile>,
    matching: Option<MatchingFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UpstreamFile {
    base_url: Option<String>,
    api_key: Option<String>,
    api_version: Option<String>,
    page_size: Option<u32>,
    max_pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MatchingFile {
    require_dob: Option<bool>,
    auto_resolve: Option<bool>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(with_env(AppConfig::default())),
        Err(ConfigError::InvalidConfigPath(_)) if !required => {
            return Ok(with_env(AppConfig::default()))
        }
        Err(err) => return Err(err),
    };
    let config = match load_at_path(&path, required)? {
        Some(config) => config,
        None => AppConfig::default(),
    };
    Ok(with_env(config))
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn with_env(config: AppConfig) -> AppConfig {
    apply_env_overrides(config, |name| env::var(name).ok())
}

/// Environment wins over file values for the two secrets; the lookup is
/// injected so tests never mutate process env.
fn apply_env_overrides(
    mut config: AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> AppConfig {
    if let Some(secret) = lookup(SHARED_SECRET_ENV).filter(|value| !value.trim().is_empty()) {
        config.shared_secret = Some(secret);
    }
    if let Some(key) = lookup(API_KEY_ENV).filter(|value| !value.trim().is_empty()) {
        config.upstream.api_key = Some(key);
    }
    config
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(secret) = parsed.shared_secret {
        config.shared_secret = Some(secret);
    }

    if let Some(upstream) = parsed.upstream {
        if let Some(base_url) = upstream.base_url {
            if base_url.trim().is_empty() {
                return Err(ConfigError::InvalidBaseUrl);
            }
            config.upstream.base_url = base_url;
        }
        if let Some(api_key) = upstream.api_key {
            config.upstream.api_key = Some(api_key);
        }
        if let Some(api_version) = upstream.api_version {
            config.upstream.api_version = api_version;
        }
        if let Some(page_size) = upstream.page_size {
            if page_size == 0 || page_size > MAX_PAGE_SIZE {
                return Err(ConfigError::InvalidPageSize(page_size));
            }
            config.upstream.page_size = page_size;
        }
        if let Some(max_pages) = upstream.max_pages {
            if max_pages == 0 || max_pages > MAX_MAX_PAGES {
                return Err(ConfigError::InvalidMaxPages(max_pages));
            }
            config.upstream.max_pages = max_pages;
        }
    }

    if let Some(matching) = parsed.matching {
        if let Some(require_dob) = matching.require_dob {
            config.matching.require_dob = require_dob;
        }
        if let Some(auto_resolve) = matching.auto_resolve {
            config.matching.auto_resolve = auto_resolve;
        }
    }

    Ok(config)
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        apply_env_overrides, load_at_path, merge_config, AppConfig, ConfigFile, MatchingFile,
        UpstreamFile, API_KEY_ENV, DEFAULT_MAX_PAGES, SHARED_SECRET_ENV,
    };
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn restrict_permissions(path: &Path) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path).expect("metadata").permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).expect("chmod");
        }
    }

    #[test]
    fn merge_config_applies_values() {
        let parsed = ConfigFile {
            shared_secret: Some("hunter2".to_string()),
            upstream: Some(UpstreamFile {
                base_url: Some("https://api.example.test".to_string()),
                api_key: Some("key".to_string()),
                api_version: None,
                page_size: Some(50),
                max_pages: Some(3),
            }),
            matching: Some(MatchingFile {
                require_dob: Some(true),
                auto_resolve: Some(false),
            }),
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.shared_secret.as_deref(), Some("hunter2"));
        assert_eq!(merged.upstream.base_url, "https://api.example.test");
        assert_eq!(merged.upstream.page_size, 50);
        assert_eq!(merged.upstream.max_pages, 3);
        assert!(merged.matching.require_dob);
        assert!(!merged.matching.auto_resolve);
    }

    #[test]
    fn merge_config_rejects_bad_paging_values() {
        let parsed = ConfigFile {
            shared_secret: None,
            upstream: Some(UpstreamFile {
                base_url: None,
                api_key: None,
                api_version: None,
                page_size: Some(0),
                max_pages: None,
            }),
            matching: None,
        };
        assert!(merge_config(parsed).is_err());

        let parsed = ConfigFile {
            shared_secret: None,
            upstream: Some(UpstreamFile {
                base_url: None,
                api_key: None,
                api_version: None,
                page_size: None,
                max_pages: Some(1_000),
            }),
            matching: None,
        };
        assert!(merge_config(parsed).is_err());
    }

    #[test]
    fn defaults_apply_when_sections_missing() {
        let parsed = ConfigFile {
            shared_secret: None,
            upstream: None,
            matching: None,
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.upstream.max_pages, DEFAULT_MAX_PAGES);
        assert!(!merged.matching.require_dob);
        assert!(merged.matching.auto_resolve);
    }

    #[test]
    fn env_overrides_win_over_file_values() {
        let mut config = AppConfig::default();
        config.shared_secret = Some("from-file".to_string());
        let config = apply_env_overrides(config, |name| {
            if name == SHARED_SECRET_ENV {
                Some("from-env".to_string())
            } else if name == API_KEY_ENV {
                Some("key-env".to_string())
            } else {
                None
            }
        });
        assert_eq!(config.shared_secret.as_deref(), Some("from-env"));
        assert_eq!(config.upstream.api_key.as_deref(), Some("key-env"));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let config = apply_env_overrides(AppConfig::default(), |_| Some("  ".to_string()));
        assert!(config.shared_secret.is_none());
        assert!(config.upstream.api_key.is_none());
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("config file not found"));
    }

    #[test]
    fn load_at_path_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "shared_secret = \"hunter2\"\n[matching]\nrequire_dob = true\n[upstream]\npage_size = 25\n",
        )
        .expect("write config");
        restrict_permissions(&path);

        let config = load_at_path(&path, true).expect("load").expect("config");
        assert_eq!(config.shared_secret.as_deref(), Some("hunter2"));
        assert!(config.matching.require_dob);
        assert_eq!(config.upstream.page_size, 25);
    }

    #[test]
    fn load_at_path_rejects_unknown_fields() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "shared_secrte = \"typo\"\n").expect("write config");
        restrict_permissions(&path);

        assert!(load_at_path(&path, true).is_err());
    }
}
