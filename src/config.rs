use std::path::PathBuf;

pub const WORKSPACE_ENV: &str = "KINGCLASSD_WORKSPACE";
pub const LOG_ENV: &str = "KINGCLASSD_LOG";
pub const LOG_FORMAT_ENV: &str = "KINGCLASSD_LOG_FORMAT";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Start-up settings for the daemon, read once from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Workspace to open before the first request, if any.
    pub workspace: Option<PathBuf>,
    /// `EnvFilter` directive; `None` means `RUST_LOG` or `info`.
    pub log_filter: Option<String>,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());
        Self {
            workspace: non_empty(WORKSPACE_ENV).map(PathBuf::from),
            log_filter: non_empty(LOG_ENV),
            log_format: non_empty(LOG_FORMAT_ENV)
                .and_then(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
        }
    }
}
