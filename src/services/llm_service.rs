//! LLM 服务 - 业务能力层
//!
//! 只负责"把提示词发给模型、拿回文字"的能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 默认走 Gemini 的 OpenAI 兼容端点，也可以换成任何兼容 OpenAI API 的服务

use std::future::Future;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use tracing::{debug, warn};

use crate::config::LlmConfig;
use crate::error::{AppError, AppResult};

const SERVICE: &str = "LLM API";

/// 文本生成能力
///
/// 流程层只依赖这个 trait，测试时可以换成固定回复的实现。
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> impl Future<Output = AppResult<String>> + Send;
}

/// LLM 服务
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    max_tokens: u32,
}

impl LlmService {
    /// 创建新的 LLM 服务
    ///
    /// API 密钥缺失时直接返回 `MissingCredential`，不会发出任何请求。
    pub fn new(config: &LlmConfig) -> AppResult<Self> {
        Self::with_model(config, config.model_name.clone())
    }

    /// 使用指定模型创建
    pub fn with_model(config: &LlmConfig, model_name: impl Into<String>) -> AppResult<Self> {
        let api_key = config.require_api_key()?;

        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&config.api_base_url);

        Ok(Self {
            client: Client::with_config(openai_config),
            model_name: model_name.into(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回去除首尾空白后的响应内容
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> AppResult<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.chars().count());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(|e| AppError::external(SERVICE, e))?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(|e| AppError::external(SERVICE, e))?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| AppError::external(SERVICE, e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::external(SERVICE, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| AppError::EmptyResponse {
                service: SERVICE.to_string(),
            })?;

        Ok(content.trim().to_string())
    }
}

impl TextGenerator for LlmService {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        self.send_to_llm(prompt, None).await
    }
}
