use std::path::Path;

use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use super::{
    admin::AdminConfig, executor::ExecutorConfig, job_log::JobLogConfig,
    observability::ObservabilityConfig, server::ServerConfig,
};
use crate::validation::ConfigValidator;

const DEFAULT_PATHS: [&str; 3] = [
    "config/executor.toml",
    "executor.toml",
    "/etc/xxljob-executor/config.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub executor: ExecutorConfig,
    pub admin: AdminConfig,
    pub server: ServerConfig,
    pub job_log: JobLogConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 加载配置
    ///
    /// 指定路径时文件必须存在；未指定时依次查找默认路径，都不存在则使用内置默认值。
    /// 环境变量 `XXL_JOB__<SECTION>__<FIELD>` 可以覆盖任意字段。
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_path {
            if Path::new(path).exists() {
                builder = builder.add_source(File::new(path, FileFormat::Toml));
            } else {
                return Err(anyhow::anyhow!("配置文件不存在: {}", path));
            }
        } else if let Some(path) = DEFAULT_PATHS.iter().find(|p| Path::new(p).exists()) {
            builder = builder.add_source(File::new(path, FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("XXL_JOB")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.interrupt_signals")
                .try_parsing(true),
        );

        let config: AppConfig = builder
            .build()
            .context("构建配置失败")?
            .try_deserialize()
            .context("反序列化配置失败")?;

        config.validate()?;

        Ok(config)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(toml_str).context("解析TOML配置失败")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("序列化配置为TOML失败")
    }
}

impl ConfigValidator for AppConfig {
    fn validate(&self) -> crate::ConfigResult<()> {
        self.executor.validate()?;
        self.admin.validate()?;
        self.server.validate()?;
        self.job_log.validate()?;
        self.observability.validate()?;
        Ok(())
    }
}
