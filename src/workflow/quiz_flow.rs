//! 出题与回馈流程 - 流程层
//!
//! 每个入口都是直线流程：校验答题表 → 构建提示词 → 调用模型 → 排版输出。
//! 校验失败时不会调用模型，也不会产生文件。

use std::fmt;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::{Config, FontConfig};
use crate::error::{AppError, AppResult};
use crate::models::{numbered_list, AnswerSheet, QuizRequest};
use crate::services::pdf::{PageStyle, PdfFormatter};
use crate::services::prompt_builder::{self, PREVIEW_ROWS};
use crate::services::TextGenerator;
use crate::utils::logging::truncate_text;

/// PDF 输出结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfOutcome {
    Written(PathBuf),
    /// 无法排版（例如找不到中文字体），附带给用户看的原因
    Skipped { reason: String },
}

impl PdfOutcome {
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            PdfOutcome::Written(path) => Some(path),
            PdfOutcome::Skipped { .. } => None,
        }
    }
}

impl fmt::Display for PdfOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfOutcome::Written(path) => write!(f, "{}", path.display()),
            PdfOutcome::Skipped { reason } => write!(f, "{}", reason),
        }
    }
}

/// 出题 / 详解的结果：模型文本 + PDF
#[derive(Debug, Clone)]
pub struct QuizOutcome {
    pub text: String,
    pub pdf: PdfOutcome,
}

/// 学习回馈结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackOutcome {
    /// 没有错题，不需要调用模型
    NoMistakes { student: String },
    Feedback { text: String },
}

impl FeedbackOutcome {
    pub fn message(&self) -> String {
        match self {
            FeedbackOutcome::NoMistakes { student } => {
                format!("學生「{}」在這份考卷中沒有錯題，表現非常優秀！", student)
            }
            FeedbackOutcome::Feedback { text } => text.clone(),
        }
    }
}

/// 出题流程
///
/// - 不持有浏览器等资源，只依赖文本生成能力和字体配置
/// - 字体按请求加载，缺失时仍返回模型文本
pub struct QuizFlow<G> {
    generator: G,
    font: FontConfig,
    style: PageStyle,
    output_dir: PathBuf,
}

impl<G: TextGenerator> QuizFlow<G> {
    pub fn new(generator: G, config: &Config) -> Self {
        Self {
            generator,
            font: config.font.clone(),
            style: PageStyle::default(),
            output_dir: config.output_dir.clone(),
        }
    }

    pub fn with_style(mut self, style: PageStyle) -> Self {
        self.style = style;
        self
    }

    /// 预测错题并生成考卷
    pub async fn generate_quiz(
        &self,
        sheet: &AnswerSheet,
        request: &QuizRequest,
    ) -> AppResult<QuizOutcome> {
        sheet.require_student(&request.student)?;

        info!(
            "✏️ 为「{}」出题: 主题 '{}', 共 {} 题",
            request.student,
            request.theme,
            request.counts.total()
        );

        let preview = sheet.preview_csv(PREVIEW_ROWS)?;
        let prompt = prompt_builder::quiz_prompt(request, &preview);
        let text = self.generator.generate(&prompt).await?;
        info!("✓ 模型返回 {} 行", text.lines().count());

        let pdf = self.render(&text)?;
        Ok(QuizOutcome { text, pdf })
    }

    /// 根据错题文字生成学习回馈
    pub async fn generate_feedback(
        &self,
        sheet: &AnswerSheet,
        student: &str,
    ) -> AppResult<FeedbackOutcome> {
        let wrong = sheet.wrong_questions(student)?;
        if wrong.is_empty() {
            info!("🎉 「{}」没有错题", student);
            return Ok(FeedbackOutcome::NoMistakes {
                student: student.to_string(),
            });
        }

        info!("📋 「{}」共 {} 道错题，生成回馈...", student, wrong.len());
        let lines = numbered_list(&wrong);
        let prompt = prompt_builder::feedback_prompt(student, &lines);
        let text = self.generator.generate(&prompt).await?;
        Ok(FeedbackOutcome::Feedback { text })
    }

    /// 只根据 0/1 作答记录生成回馈（不需要「題目」列）
    pub async fn generate_summary_feedback(
        &self,
        sheet: &AnswerSheet,
        student: &str,
    ) -> AppResult<String> {
        let answers = sheet.answers(student)?;
        info!("📋 「{}」共 {} 条作答记录，生成回馈...", student, answers.len());
        let prompt = prompt_builder::summary_feedback_prompt(student, &answers);
        self.generator.generate(&prompt).await
    }

    /// 为已生成的考卷撰写详解
    pub async fn generate_solutions(&self, quiz_text: &str) -> AppResult<QuizOutcome> {
        info!("🧮 生成详解: {}", truncate_text(quiz_text.trim(), 40));
        let prompt = prompt_builder::solutions_prompt(quiz_text);
        let text = self.generator.generate(&prompt).await?;
        let pdf = self.render(&text)?;
        Ok(QuizOutcome { text, pdf })
    }

    /// 排版输出；字体缺失不算致命错误，原因交给调用方展示
    fn render(&self, text: &str) -> AppResult<PdfOutcome> {
        let formatter = match PdfFormatter::with_style(&self.font, self.style.clone()) {
            Ok(formatter) => formatter,
            Err(e @ AppError::ResourceMissing { .. }) => {
                warn!("⚠️ {}", e);
                return Ok(PdfOutcome::Skipped {
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        let report = formatter.write_report(text, &self.output_dir)?;
        Ok(PdfOutcome::Written(report.path))
    }
}
