//! 服务配置
//!
//! 加载顺序：默认值 → 配置文件（可选，TOML）→ 环境变量覆盖。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// 配置文件的查找路径
const CONFIG_PATHS: [&str; 2] = ["config.toml", "./config/config.toml"];

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// 服务配置结构
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP 服务配置
    pub http: HttpConfig,
    /// 认证配置
    pub auth: AuthConfig,
    /// 限流配置
    pub rate_limit: RateLimitConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 绑定地址
    pub bind_address: String,
    /// HTTP 服务端口
    pub port: u16,
}

/// 认证配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// `x-api-key` 请求头需要匹配的共享密钥
    pub api_key: String,
}

/// 限流配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// 每个窗口内每个客户端的最大请求数
    pub max_requests: u32,
    /// 窗口长度（秒）
    pub window_secs: u64,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: "your-secret-api-key".to_string(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window_secs: 15 * 60,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("文件读取错误: {0}")]
    FileRead(String),
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("环境变量 {name} 无效: {value}")]
    Env { name: &'static str, value: String },
    #[error("配置验证错误: {0}")]
    Validation(String),
}

impl Config {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 用环境变量覆盖配置项
    ///
    /// 支持 `PORT`、`API_KEY`、`RATE_LIMIT_MAX`、`RATE_LIMIT_WINDOW_SECS`、`LOG_LEVEL`。
    pub fn apply_env(&mut self, vars: &HashMap<String, String>) -> Result<(), ConfigError> {
        if let Some(port) = vars.get("PORT") {
            self.http.port = parse_env("PORT", port)?;
        }
        if let Some(api_key) = vars.get("API_KEY") {
            self.auth.api_key = api_key.clone();
        }
        if let Some(max) = vars.get("RATE_LIMIT_MAX") {
            self.rate_limit.max_requests = parse_env("RATE_LIMIT_MAX", max)?;
        }
        if let Some(window) = vars.get("RATE_LIMIT_WINDOW_SECS") {
            self.rate_limit.window_secs = parse_env("RATE_LIMIT_WINDOW_SECS", window)?;
        }
        if let Some(level) = vars.get("LOG_LEVEL") {
            self.logging.level = level.to_ascii_lowercase();
        }
        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::Validation("HTTP端口必须大于0".to_string()));
        }
        if self.http.bind_address.is_empty() {
            return Err(ConfigError::Validation("绑定地址不能为空".to_string()));
        }
        if self.auth.api_key.is_empty() {
            return Err(ConfigError::Validation("API Key 不能为空".to_string()));
        }
        if self.rate_limit.max_requests == 0 {
            return Err(ConfigError::Validation("限流上限必须大于0".to_string()));
        }
        if self.rate_limit.window_secs == 0 {
            return Err(ConfigError::Validation("限流窗口必须大于0".to_string()));
        }
        if !VALID_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, VALID_LEVELS
            )));
        }
        Ok(())
    }

    /// 监听地址，形如 `0.0.0.0:3000`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.http.bind_address, self.http.port)
    }
}

fn parse_env<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Env {
        name,
        value: value.to_string(),
    })
}

/// 从文件（如存在）和环境变量加载并验证配置
pub fn load_config() -> Result<Config, ConfigError> {
    let mut config = match CONFIG_PATHS.iter().find(|path| Path::new(path).exists()) {
        Some(path) => {
            println!("从配置文件加载: {}", path);
            Config::load_from_file(path)?
        }
        None => {
            println!("未找到配置文件，使用默认配置");
            Config::default()
        }
    };

    let vars: HashMap<String, String> = std::env::vars().collect();
    config.apply_env(&vars)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.auth.api_key, "your-secret-api-key");
        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.rate_limit.window_secs, 900);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(&env(&[
                ("PORT", "8081"),
                ("API_KEY", "s3cret"),
                ("RATE_LIMIT_MAX", "5"),
                ("LOG_LEVEL", "DEBUG"),
            ]))
            .unwrap();

        assert_eq!(config.http.port, 8081);
        assert_eq!(config.auth.api_key, "s3cret");
        assert_eq!(config.rate_limit.max_requests, 5);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.listen_addr(), "0.0.0.0:8081");
    }

    #[test]
    fn test_invalid_env_value() {
        let mut config = Config::default();
        let err = config.apply_env(&env(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { name: "PORT", .. }));
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.auth.api_key.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[rate_limit]\nmax_requests = 10\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.rate_limit.max_requests, 10);
        assert_eq!(config.rate_limit.window_secs, 900);
        assert_eq!(config.http.port, 3000);
    }
}
