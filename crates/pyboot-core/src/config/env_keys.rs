//! 环境变量 key 常量定义
//!
//! 主变量统一使用 `PYBOOT_*` 前缀。

/// 环境目录与解释器
pub mod env {
    /// 环境目录名（相对项目根目录），默认 `.venv`
    pub const PYBOOT_ENV_DIR: &str = "PYBOOT_ENV_DIR";

    /// 创建环境时使用的基础解释器路径（默认在 PATH 中查找 python3/python）
    pub const PYBOOT_PYTHON: &str = "PYBOOT_PYTHON";
}

/// 可观测性与日志
pub mod observability {
    pub const PYBOOT_QUIET: &str = "PYBOOT_QUIET";

    pub const PYBOOT_LOG_LEVEL: &str = "PYBOOT_LOG_LEVEL";

    pub const PYBOOT_LOG_JSON: &str = "PYBOOT_LOG_JSON";

    /// JSONL 事件日志路径（未设置则不写事件日志）
    pub const PYBOOT_EVENT_LOG: &str = "PYBOOT_EVENT_LOG";
}
