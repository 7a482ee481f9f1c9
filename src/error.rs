use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 缺少必要的凭证（API 密钥、登录账号等）
    #[error("未能載入 {var}，請檢查 .env 檔案中的設定")]
    MissingCredential { var: String },

    /// 答题表缺少指定的列
    #[error("{0}")]
    MissingColumn(MissingColumn),

    /// 找不到可用的资源（字体等）
    #[error("錯誤：找不到{resource}，已搜尋：{}", .searched.join(", "))]
    ResourceMissing {
        resource: String,
        searched: Vec<String>,
    },

    /// 外部服务调用失败
    #[error("{service} 呼叫失敗: {source}")]
    ExternalService {
        service: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// 外部服务返回空内容
    #[error("{service} 返回內容為空")]
    EmptyResponse { service: String },

    /// 等待页面元素超时
    #[error("等待元素 '{selector}' 超時 ({timeout_ms} ms)")]
    SelectorNotFound { selector: String, timeout_ms: u64 },

    /// 浏览器相关错误
    #[error("瀏覽器錯誤: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    /// 浏览器配置错误
    #[error("瀏覽器設定失敗: {0}")]
    BrowserConfig(String),

    /// CSV 解析错误
    #[error("CSV 解析失敗: {0}")]
    Csv(#[from] csv::Error),

    /// PDF 生成错误
    #[error("PDF 生成失敗: {0}")]
    Pdf(#[from] printpdf::Error),

    /// 文件读写错误
    #[error("檔案錯誤 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 配置错误
    #[error("設定錯誤: {0}")]
    Config(String),

    /// JSON 解析错误
    #[error("JSON 解析失敗: {0}")]
    Json(#[from] serde_json::Error),
}

/// 答题表缺失的列
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MissingColumn {
    /// 学生姓名列不存在
    #[error("找不到名字：{0}，請確認是否正確輸入。")]
    Student(String),
    /// 缺少「題目」列
    #[error("CSV 中缺少「題目」欄位，無法進行錯題分析。請確認格式。")]
    QuestionText,
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建外部服务调用错误
    pub fn external(
        service: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::ExternalService {
            service: service.into(),
            source: Box::new(source),
        }
    }

    /// 创建文件读写错误
    pub fn file(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        AppError::File {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// 是否为可直接展示给用户的输入错误（不需要堆栈信息）
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AppError::MissingCredential { .. }
                | AppError::MissingColumn(_)
                | AppError::ResourceMissing { .. }
        )
    }
}

impl From<MissingColumn> for AppError {
    fn from(err: MissingColumn) -> Self {
        AppError::MissingColumn(err)
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
