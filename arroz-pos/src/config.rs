use crate::utils::time::{DEFAULT_TIMEZONE, parse_timezone};
use arroz_client::ClientConfig;
use chrono_tz::Tz;
use shared::types::{HOUR_MILLIS, Timestamp};
use std::path::PathBuf;
use std::str::FromStr;

/// POS 终端配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | ARROZ_API_URL | http://localhost:5000 | 后端地址 |
/// | ARROZ_API_TIMEOUT_SECS | 30 | 请求超时(秒) |
/// | ARROZ_BRANCH_ID | - | 当前门店 |
/// | ARROZ_DATA_DIR | ./data | 本地数据目录 |
/// | ARROZ_TIMEZONE | America/Bogota | 营业时区 |
/// | ARROZ_MAX_TABS | 5 | 草稿标签页上限 |
/// | ARROZ_DRAFT_TTL_HOURS | 24 | 草稿有效期(小时) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 日志目录 |
#[derive(Debug, Clone)]
pub struct PosConfig {
    pub api_url: String,
    pub api_timeout_secs: u64,
    /// Branch this terminal works for; the operator's own branch is used when unset
    pub branch_id: Option<i64>,
    pub data_dir: PathBuf,
    pub timezone: Tz,
    pub drafts: DraftConfig,
    pub log: LogConfig,
}

/// Draft tab limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftConfig {
    pub max_tabs: usize,
    pub ttl_hours: i64,
}

impl DraftConfig {
    pub fn ttl_millis(&self) -> Timestamp {
        self.ttl_hours * HOUR_MILLIS
    }
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            max_tabs: 5,
            ttl_hours: 24,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    /// Daily rolling log files are written here when set
    pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            dir: None,
        }
    }
}

impl Default for PosConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".into(),
            api_timeout_secs: arroz_client::config::DEFAULT_TIMEOUT_SECS,
            branch_id: None,
            data_dir: PathBuf::from("./data"),
            timezone: DEFAULT_TIMEZONE,
            drafts: DraftConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl PosConfig {
    /// 从环境变量加载配置
    ///
    /// Loads `.env` first. Unset or unparseable values fall back to defaults.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let timezone = match lookup("ARROZ_TIMEZONE") {
            Some(name) => parse_timezone(&name).unwrap_or_else(|| {
                tracing::warn!(value = %name, "Unknown timezone, using default");
                DEFAULT_TIMEZONE
            }),
            None => defaults.timezone,
        };

        Self {
            api_url: lookup("ARROZ_API_URL").unwrap_or(defaults.api_url),
            api_timeout_secs: parse_or(&lookup, "ARROZ_API_TIMEOUT_SECS", defaults.api_timeout_secs),
            branch_id: lookup("ARROZ_BRANCH_ID").and_then(|v| v.trim().parse().ok()),
            data_dir: lookup("ARROZ_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            timezone,
            drafts: DraftConfig {
                max_tabs: parse_or(&lookup, "ARROZ_MAX_TABS", defaults.drafts.max_tabs),
                ttl_hours: parse_or(&lookup, "ARROZ_DRAFT_TTL_HOURS", defaults.drafts.ttl_hours),
            },
            log: LogConfig {
                level: lookup("LOG_LEVEL").unwrap_or(defaults.log.level),
                dir: lookup("LOG_DIR").map(PathBuf::from),
            },
        }
    }

    /// REST client configuration for this terminal
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_url.clone()).with_timeout(self.api_timeout_secs)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Invalid config value, using default");
            default
        }),
        None => default,
    }
}
