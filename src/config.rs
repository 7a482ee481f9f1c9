//! 程序配置
//!
//! 配置来源按优先级从低到高：内置默认值 → TOML 配置文件 → 环境变量（含 `.env`）。

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

/// 默认配置文件名（位于当前工作目录）
pub const DEFAULT_CONFIG_FILE: &str = "quiz_report.toml";

/// 程序配置文件
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM 配置
    pub llm: LlmConfig,
    /// 中文字体查找配置
    pub font: FontConfig,
    /// 输出目录（PDF / HTML 等）
    pub output_dir: PathBuf,
    /// 浏览器配置
    pub browser: BrowserSettings,
    /// 作业抓取配置
    pub homework: HomeworkConfig,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub model_name: String,
    /// 作业草稿使用的模型（需要更强的推理能力）
    pub homework_model_name: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            model_name: "gemini-2.5-flash".to_string(),
            homework_model_name: "gemini-2.5-pro".to_string(),
            temperature: 0.7,
            max_tokens: 8192,
        }
    }
}

impl LlmConfig {
    /// 获取 API 密钥，缺失时返回 `MissingCredential`
    pub fn require_api_key(&self) -> AppResult<&str> {
        non_blank(&self.api_key, "GEMINI_API_KEY")
    }
}

/// 中文字体查找配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// 显式指定的字体文件，优先于目录搜索
    pub font_path: Option<PathBuf>,
    /// 搜索目录
    pub search_dirs: Vec<PathBuf>,
    /// 候选字体文件名（按顺序尝试）
    pub candidates: Vec<String>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            search_dirs: vec![
                PathBuf::from(r"C:\Windows\Fonts"),
                PathBuf::from("/usr/share/fonts/opentype/noto"),
                PathBuf::from("/usr/share/fonts/truetype/noto"),
                PathBuf::from("/usr/share/fonts/noto-cjk"),
                PathBuf::from("/Library/Fonts"),
                PathBuf::from("/System/Library/Fonts"),
            ],
            candidates: [
                "kaiu.ttf",
                "msjh.ttc",
                "msjhbd.ttc",
                "msjhl.ttc",
                "NotoSansCJK-Regular.ttc",
                "NotoSerifCJK-Regular.ttc",
                "NotoSansTC-Regular.otf",
                "PingFang.ttc",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// 连接已启动浏览器的调试端口；为空时自行启动浏览器
    pub debug_port: Option<u16>,
    pub executable: Option<PathBuf>,
    pub headless: bool,
    /// 单个元素的等待上限
    pub wait_timeout_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            debug_port: None,
            executable: None,
            headless: false,
            wait_timeout_ms: 10_000,
            poll_interval_ms: 250,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct HomeworkConfig {
    pub login_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// 课程名称（仪表板上的课程卡片文字）
    pub course_name: String,
    /// 讨论区名称
    pub forum_name: String,
    /// 作业公告标题
    pub post_title: String,
    /// 公告正文所在元素
    pub content_selector: String,
    pub html_output: PathBuf,
    pub code_output: PathBuf,
}

impl Default for HomeworkConfig {
    fn default() -> Self {
        Self {
            login_url: "https://moodle3.ntnu.edu.tw/login/index.php".to_string(),
            username: None,
            password: None,
            course_name: "1132程式語言".to_string(),
            forum_name: "公告".to_string(),
            post_title: "作業四規定".to_string(),
            content_selector: "div[id^='post-content-']".to_string(),
            html_output: PathBuf::from("homework.html"),
            code_output: PathBuf::from("generated_code.py"),
        }
    }
}

impl HomeworkConfig {
    /// 获取登录账号密码，缺失或空白时返回 `MissingCredential`
    pub fn require_login(&self) -> AppResult<(&str, &str)> {
        let username = non_blank(&self.username, "MOODLE_USER")?;
        let password = non_blank(&self.password, "MOODLE_PASS")?;
        Ok((username, password))
    }
}

fn non_blank<'a>(value: &'a Option<String>, var: &str) -> AppResult<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::MissingCredential {
            var: var.to_string(),
        })
}

impl Config {
    /// 只使用默认值和环境变量
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|name| std::env::var(name).ok());
        config
    }

    /// 加载配置：可选的 TOML 文件 + 环境变量
    ///
    /// 未显式指定路径时，若当前目录存在 [`DEFAULT_CONFIG_FILE`] 则读取它。
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            }
        };

        let mut config = match path {
            Some(p) => {
                info!("📄 读取配置文件: {}", p.display());
                let content = std::fs::read_to_string(&p).map_err(|e| AppError::file(&p, e))?;
                Self::from_toml_str(&content)?
            }
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// 用环境变量覆盖配置
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(key) = var("GEMINI_API_KEY").or_else(|| var("LLM_API_KEY")) {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = var("LLM_API_BASE_URL") {
            self.llm.api_base_url = url;
        }
        if let Some(model) = var("LLM_MODEL_NAME") {
            self.llm.model_name = model;
        }
        if let Some(model) = var("LLM_HOMEWORK_MODEL_NAME") {
            self.llm.homework_model_name = model;
        }

        if let Some(path) = var("FONT_PATH") {
            self.font.font_path = Some(PathBuf::from(path));
        }
        if let Some(dirs) = var("FONT_DIRS") {
            let extra: Vec<PathBuf> = std::env::split_paths(&dirs).collect();
            // 用户指定的目录优先搜索
            self.font.search_dirs.splice(0..0, extra);
        }

        if let Some(dir) = var("OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(verbose) = parse_var(&var, "VERBOSE_LOGGING") {
            self.verbose_logging = verbose;
        }

        if let Some(port) = parse_var(&var, "BROWSER_DEBUG_PORT") {
            self.browser.debug_port = Some(port);
        }
        if let Some(exe) = var("BROWSER_EXECUTABLE") {
            self.browser.executable = Some(PathBuf::from(exe));
        }
        if let Some(headless) = parse_var(&var, "HEADLESS") {
            self.browser.headless = headless;
        }

        if let Some(user) = var("MOODLE_USER") {
            self.homework.username = Some(user);
        }
        if let Some(pass) = var("MOODLE_PASS") {
            self.homework.password = Some(pass);
        }

        debug!("配置加载完成: 模型 {}", self.llm.model_name);
    }
}

fn parse_var<T: FromStr>(var: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    var(name).and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn missing_api_key_is_a_credential_error() {
        let config = Config::default();
        let err = config.llm.require_api_key().unwrap_err();
        assert!(matches!(err, AppError::MissingCredential { ref var } if var == "GEMINI_API_KEY"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut config = Config::default();
        config.llm.api_key = Some("   ".to_string());
        assert!(config.llm.require_api_key().is_err());
    }

    #[test]
    fn blank_moodle_login_counts_as_missing() {
        let mut homework = HomeworkConfig {
            username: Some(" ".to_string()),
            password: Some("secret".to_string()),
            ..HomeworkConfig::default()
        };
        assert!(matches!(
            homework.require_login(),
            Err(AppError::MissingCredential { ref var }) if var == "MOODLE_USER"
        ));

        homework.username = Some("student".to_string());
        homework.password = Some(String::new());
        assert!(matches!(
            homework.require_login(),
            Err(AppError::MissingCredential { ref var }) if var == "MOODLE_PASS"
        ));

        homework.password = Some("secret".to_string());
        assert_eq!(homework.require_login().unwrap(), ("student", "secret"));
    }

    #[test]
    fn env_overrides_defaults() {
        let mut config = Config::default();
        config.apply_env(env_from(&[
            ("GEMINI_API_KEY", "k-123"),
            ("LLM_MODEL_NAME", "gemini-test"),
            ("BROWSER_DEBUG_PORT", "9222"),
            ("HEADLESS", "true"),
            ("MOODLE_USER", "student"),
        ]));

        assert_eq!(config.llm.require_api_key().unwrap(), "k-123");
        assert_eq!(config.llm.model_name, "gemini-test");
        assert_eq!(config.browser.debug_port, Some(9222));
        assert!(config.browser.headless);
        // 密码仍缺失
        assert!(matches!(
            config.homework.require_login(),
            Err(AppError::MissingCredential { ref var }) if var == "MOODLE_PASS"
        ));
    }

    #[test]
    fn unparsable_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_env(env_from(&[("BROWSER_DEBUG_PORT", "not-a-port")]));
        assert_eq!(config.browser.debug_port, None);
    }

    #[test]
    fn toml_file_fills_nested_sections() {
        let config = Config::from_toml_str(
            r#"
            output_dir = "out"

            [llm]
            model_name = "gemini-2.0-flash"

            [font]
            font_path = "/opt/fonts/kaiu.ttf"

            [homework]
            course_name = "資料結構"
            "#,
        )
        .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.llm.model_name, "gemini-2.0-flash");
        // 未写的字段保持默认
        assert_eq!(config.llm.homework_model_name, "gemini-2.5-pro");
        assert_eq!(config.font.font_path, Some(PathBuf::from("/opt/fonts/kaiu.ttf")));
        assert!(!config.font.candidates.is_empty());
        assert_eq!(config.homework.course_name, "資料結構");
        assert_eq!(config.homework.forum_name, "公告");
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = Config::from_toml_str("llm = 3").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
