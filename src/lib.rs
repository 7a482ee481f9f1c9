//! # Quiz Report
//!
//! 根据学生答题表预测错题、生成考卷 PDF 与学习回馈，
//! 以及从 Moodle 抓取作业说明交给模型写草稿。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `browser/` - 启动 / 连接浏览器，带超时的元素等待
//! - `infrastructure/` - `JsExecutor`，在页面上求值
//!
//! ### ② 业务能力层（Services）
//! - `LlmService` - 调用兼容 OpenAI API 的模型
//! - `prompt_builder` - 提示词拼接
//! - `pdf` - 逐行分类排版 + 中文字体查找 + PDF 输出
//! - `output_writer` - 时间戳文件名、作业 HTML
//!
//! ### ③ 流程层（Workflow）
//! - `QuizFlow` - 出题 / 错题回馈 / 详解
//! - `HomeworkFlow` - 登录抓取 → 草稿
//!
//! ### ④ 入口层
//! - `App` - 命令行各子命令的实现

pub mod app;
pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult, MissingColumn};
pub use models::{AnswerSheet, LineKind, QuizRequest, SectionCounts, SectionKind};
pub use services::{LlmService, PdfFormatter, TextGenerator};
pub use workflow::{FeedbackOutcome, HomeworkFlow, PdfOutcome, QuizFlow, QuizOutcome};
