use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::debug;

use crate::config::{DogearConfig, load_config};
use crate::storage::{BookmarkFile, DEFAULT_STORE_FILENAME};

pub const STORE_ENV: &str = "DOGEAR_STORE";
pub const CONFIG_ENV: &str = "DOGEAR_CONFIG";
pub const RECENT_LIMIT_ENV: &str = "DOGEAR_RECENT_LIMIT";

const CONFIG_DIR_NAME: &str = "dogear";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Flag,
    Env,
    Config,
    Default,
}

impl ValueSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flag => "flag",
            Self::Env => "env",
            Self::Config => "config",
            Self::Default => "default",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub store: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Process facts path resolution draws on. `cwd` is `None` when the working
/// directory has been removed or is otherwise unreadable; only relative paths
/// and `current_directory` need it.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    pub cwd: Option<PathBuf>,
    pub home_dir: Option<PathBuf>,
    pub config_dir: Option<PathBuf>,
}

impl ResolutionContext {
    pub fn from_process() -> Self {
        let cwd = env::current_dir()
            .inspect_err(|error| debug!("current directory unavailable: {error}"))
            .ok();
        Self {
            cwd,
            home_dir: dirs::home_dir(),
            config_dir: dirs::config_dir(),
        }
    }

    fn cwd(&self) -> Result<&Path> {
        self.cwd
            .as_deref()
            .ok_or_else(|| anyhow!("failed to read current directory"))
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedRuntime {
    pub store_path: PathBuf,
    pub config_path: Option<PathBuf>,
    pub recent_limit: usize,
    pub store_source: ValueSource,
    pub config_source: ValueSource,
    pub recent_source: ValueSource,
}

impl ResolvedRuntime {
    pub fn bookmark_file(&self) -> BookmarkFile {
        BookmarkFile::new(&self.store_path)
    }

    pub fn diagnostics(&self) -> String {
        format!(
            "store_path={} ({})\nconfig_path={} ({})\nrecent_limit={} ({})",
            normalize_for_display(&self.store_path),
            self.store_source.as_str(),
            self.config_path
                .as_deref()
                .map(normalize_for_display)
                .unwrap_or_else(|| "<none>".to_string()),
            self.config_source.as_str(),
            self.recent_limit,
            self.recent_source.as_str(),
        )
    }
}

pub fn resolve_runtime(
    context: &ResolutionContext,
    overrides: &PathOverrides,
) -> Result<ResolvedRuntime> {
    resolve_runtime_with_lookup(context, overrides, |key| env::var(key).ok())
}

/// Config file location: flag > `DOGEAR_CONFIG` > `<config_dir>/dogear/config.toml`.
pub fn resolve_config_path(
    context: &ResolutionContext,
    overrides: &PathOverrides,
) -> Result<(Option<PathBuf>, ValueSource)> {
    resolve_config_path_with_lookup(context, overrides, &|key| env::var(key).ok())
}

fn resolve_config_path_with_lookup<F>(
    context: &ResolutionContext,
    overrides: &PathOverrides,
    lookup_env: &F,
) -> Result<(Option<PathBuf>, ValueSource)>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(if let Some(path) = overrides.config.as_deref() {
        (Some(absolutize(path, context)?), ValueSource::Flag)
    } else if let Some(value) = non_empty(lookup_env(CONFIG_ENV)) {
        (
            Some(absolutize(Path::new(&value), context)?),
            ValueSource::Env,
        )
    } else {
        (
            context
                .config_dir
                .as_ref()
                .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILENAME)),
            ValueSource::Default,
        )
    })
}

fn resolve_runtime_with_lookup<F>(
    context: &ResolutionContext,
    overrides: &PathOverrides,
    lookup_env: F,
) -> Result<ResolvedRuntime>
where
    F: Fn(&str) -> Option<String>,
{
    let (config_path, config_source) =
        resolve_config_path_with_lookup(context, overrides, &lookup_env)?;
    let config = match config_path.as_deref() {
        Some(path) => load_config(path)?,
        None => DogearConfig::default(),
    };

    let (store_path, store_source) = if let Some(path) = overrides.store.as_deref() {
        (absolutize(path, context)?, ValueSource::Flag)
    } else if let Some(value) = non_empty(lookup_env(STORE_ENV)) {
        (
            absolutize(Path::new(&value), context)?,
            ValueSource::Env,
        )
    } else if let Some(path) = config.store_path(context.home_dir.as_deref())? {
        (absolutize(&path, context)?, ValueSource::Config)
    } else {
        let home = context
            .home_dir
            .as_ref()
            .ok_or_else(|| anyhow!("failed to locate home directory for the bookmark store"))?;
        (home.join(DEFAULT_STORE_FILENAME), ValueSource::Default)
    };

    let (recent_limit, recent_source) = if let Some(value) = non_empty(lookup_env(RECENT_LIMIT_ENV))
    {
        let limit = value
            .parse::<usize>()
            .with_context(|| format!("{RECENT_LIMIT_ENV} must be a whole number, got `{value}`"))?;
        (limit, ValueSource::Env)
    } else if config.recent.limit.is_some() {
        (config.recent_limit(), ValueSource::Config)
    } else {
        (config.recent_limit(), ValueSource::Default)
    };

    Ok(ResolvedRuntime {
        store_path,
        config_path,
        recent_limit,
        store_source,
        config_source,
        recent_source,
    })
}

/// The directory bookmarks are recorded against. `$PWD` wins when it names the
/// same directory as the process cwd, so symlinked spellings survive.
pub fn current_directory(context: &ResolutionContext) -> Result<String> {
    current_directory_with_lookup(context, |key| env::var(key).ok())
}

fn current_directory_with_lookup<F>(context: &ResolutionContext, lookup_env: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let cwd = context.cwd()?;
    let logical = non_empty(lookup_env("PWD"))
        .map(|pwd| Path::new(&pwd).components().collect::<PathBuf>())
        .filter(|pwd| pwd.is_absolute() && same_directory(pwd, cwd));
    let directory = logical.unwrap_or_else(|| cwd.to_path_buf());
    directory.into_os_string().into_string().map_err(|raw| {
        anyhow!(
            "current directory is not valid UTF-8: {}",
            raw.to_string_lossy()
        )
    })
}

fn same_directory(left: &Path, right: &Path) -> bool {
    match (fs::canonicalize(left), fs::canonicalize(right)) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn absolutize(path: &Path, context: &ResolutionContext) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = context
        .cwd()
        .with_context(|| format!("cannot resolve relative path {}", path.display()))?;
    Ok(cwd.join(path))
}

fn normalize_for_display(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
