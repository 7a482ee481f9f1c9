//! JS 执行器 - 基础设施层
//!
//! 持有 page 资源，只暴露"执行 JS"的能力

use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::{AppError, AppResult};

/// JS 执行器
///
/// 不认识 Moodle / 作业，只负责在页面上求值
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> AppResult<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> AppResult<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 读取第一个匹配元素的 innerHTML，元素不存在时返回 `None`
    pub async fn inner_html(&self, selector: &str) -> AppResult<Option<String>> {
        self.eval_as(inner_html_script(selector)?).await
    }
}

fn inner_html_script(selector: &str) -> AppResult<String> {
    let quoted = serde_json::to_string(selector).map_err(AppError::from)?;
    Ok(format!(
        "(() => {{ const el = document.querySelector({}); return el ? el.innerHTML : null; }})()",
        quoted
    ))
}
