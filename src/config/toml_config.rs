use crate::core::controller::DEFAULT_BATCH_ROW_LIMIT;
use crate::core::page::PageLayout;
use crate::core::{ConfigProvider, RenderMode};
use crate::utils::error::{FormError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub server: ServerConfig,
    pub ui: UiConfig,
    pub page: PageConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub render_mode: RenderMode,
    pub batch_row_limit: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            render_mode: RenderMode::Gauge,
            batch_row_limit: DEFAULT_BATCH_ROW_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Host markup checked against `elements`; when absent the default
    /// layout is assumed to be present.
    pub markup: Option<String>,
    pub elements: PageLayout,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub filename: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "./output".to_string(),
            filename: "result.html".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl FormConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FormError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FormError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PREDICTION_SERVER})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FormError::ConfigError {
            message: format!("env pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for FormConfig {
    fn validate(&self) -> Result<()> {
        validate_url("server.base_url", &self.server.base_url)?;
        validate_positive_number("server.timeout_seconds", self.server.timeout_seconds as usize, 1)?;
        validate_positive_number("ui.batch_row_limit", self.ui.batch_row_limit, 1)?;
        validate_path("output.path", &self.output.path)?;
        validate_non_empty_string("output.filename", &self.output.filename)?;
        if let Some(markup) = &self.page.markup {
            validate_path("page.markup", markup)?;
        }
        self.page.elements.validate()
    }
}

impl ConfigProvider for FormConfig {
    fn base_url(&self) -> &str {
        &self.server.base_url
    }

    fn timeout_seconds(&self) -> u64 {
        self.server.timeout_seconds
    }

    fn render_mode(&self) -> RenderMode {
        self.ui.render_mode
    }

    fn batch_row_limit(&self) -> usize {
        self.ui.batch_row_limit
    }
}
