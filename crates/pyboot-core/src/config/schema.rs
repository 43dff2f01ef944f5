//! 按领域分组的配置结构体
//!
//! 从环境变量加载，统一 fallback 逻辑。

use std::path::PathBuf;

use super::env_keys::{env as env_keys, observability as obv_keys};
use super::loader::{env_bool, env_optional, env_or};

/// 环境目录与基础解释器配置
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// 环境目录名，相对项目根目录
    pub env_dir_name: String,
    /// 基础解释器路径覆盖；None 表示在 PATH 中查找
    pub python: Option<PathBuf>,
}

impl EnvConfig {
    /// 从环境变量加载，空值使用默认（会自动加载 .env）
    pub fn from_env() -> Self {
        super::loader::load_dotenv();
        Self {
            env_dir_name: env_or(env_keys::PYBOOT_ENV_DIR, &[], || ".venv".to_string()),
            python: env_optional(env_keys::PYBOOT_PYTHON, &[]).map(PathBuf::from),
        }
    }
}

/// 可观测性配置：quiet、log_level、log_json、event_log
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
    pub event_log: Option<String>,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| {
            super::loader::load_dotenv();
            let quiet = env_bool(obv_keys::PYBOOT_QUIET, &[], false);
            let log_level = env_or(obv_keys::PYBOOT_LOG_LEVEL, &[], || "pyboot=info".to_string());
            let log_json = env_bool(obv_keys::PYBOOT_LOG_JSON, &[], false);
            let event_log = env_optional(obv_keys::PYBOOT_EVENT_LOG, &[]);
            Self {
                quiet,
                log_level,
                log_json,
                event_log,
            }
        })
    }
}
