//! 应用入口层
//!
//! 把命令行参数接到各个流程上，负责加载输入、创建服务、打印结果。

use std::path::Path;

use tracing::info;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{AnswerSheet, QuizRequest};
use crate::services::LlmService;
use crate::utils::logging::{log_finished, log_startup};
use crate::workflow::{HomeworkFlow, PdfOutcome, QuizFlow};

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn quiz_flow(&self) -> AppResult<QuizFlow<LlmService>> {
        let llm = LlmService::new(&self.config.llm)?;
        Ok(QuizFlow::new(llm, &self.config))
    }

    /// 生成考卷
    pub async fn quiz(&self, csv: &Path, request: &QuizRequest) -> AppResult<()> {
        log_startup("錯題預測考卷生成");

        let sheet = AnswerSheet::from_path(csv)?;
        // 输入错误优先于缺少 API 密钥
        sheet.require_student(&request.student)?;
        let outcome = self.quiz_flow()?.generate_quiz(&sheet, request).await?;

        println!("{}", outcome.text);
        print_pdf(&outcome.pdf);

        log_finished("考卷生成");
        Ok(())
    }

    /// 错题回馈
    pub async fn feedback(&self, csv: &Path, student: &str) -> AppResult<()> {
        log_startup("錯題分析報表");

        let sheet = AnswerSheet::from_path(csv)?;
        // 同时检查学生列和「題目」列
        sheet.wrong_questions(student)?;
        let outcome = self.quiz_flow()?.generate_feedback(&sheet, student).await?;
        println!("{}", outcome.message());

        log_finished("報表生成");
        Ok(())
    }

    /// 作答记录回馈（无题目文字）
    pub async fn summary(&self, csv: &Path, student: &str) -> AppResult<()> {
        log_startup("答題紀錄回饋");

        let sheet = AnswerSheet::from_path(csv)?;
        sheet.require_student(student)?;
        let text = self
            .quiz_flow()?
            .generate_summary_feedback(&sheet, student)
            .await?;
        println!("{}", text);

        log_finished("回饋生成");
        Ok(())
    }

    /// 为考卷文字生成详解
    pub async fn solutions(&self, quiz_file: &Path) -> AppResult<()> {
        log_startup("考卷詳解生成");

        let quiz_text =
            std::fs::read_to_string(quiz_file).map_err(|e| AppError::file(quiz_file, e))?;
        let outcome = self.quiz_flow()?.generate_solutions(&quiz_text).await?;

        println!("{}", outcome.text);
        print_pdf(&outcome.pdf);

        log_finished("詳解生成");
        Ok(())
    }

    /// 抓取作业并生成草稿
    pub async fn homework(&self) -> AppResult<()> {
        log_startup("作業擷取與草稿生成");

        let llm = LlmService::with_model(&self.config.llm, &self.config.llm.homework_model_name)?;
        let flow = HomeworkFlow::new(llm, self.config.homework.clone(), self.config.browser.clone());
        let outcome = flow.run().await?;

        println!("\n📄 模型回覆如下：\n");
        println!("{}", outcome.reply);
        info!("HTML: {}", outcome.html_path.display());
        info!("程式碼: {}", outcome.code_path.display());

        log_finished("作業草稿");
        Ok(())
    }
}

fn print_pdf(pdf: &PdfOutcome) {
    match pdf {
        PdfOutcome::Written(path) => println!("\n📄 PDF：{}", path.display()),
        PdfOutcome::Skipped { reason } => println!("\n⚠️ {}", reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MissingColumn;
    use crate::models::SectionCounts;

    fn app_without_key() -> App {
        let mut config = Config::default();
        config.llm.api_key = None;
        App::new(config)
    }

    fn write_csv(dir: &Path, content: &str) -> std::path::PathBuf {
        let path = dir.join("answers.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn wrong_name_is_reported_before_missing_api_key() {
        let dir = tempfile::tempdir().unwrap();
        let csv = write_csv(dir.path(), "題目,Alice\n2+2=?,0\n");
        let app = app_without_key();

        let request = QuizRequest::new("Bob", "神秘花園", SectionCounts::default());
        let err = app.quiz(&csv, &request).await.unwrap_err();
        assert_eq!(err.to_string(), "找不到名字：Bob，請確認是否正確輸入。");

        let err = app.feedback(&csv, "Bob").await.unwrap_err();
        assert!(matches!(err, AppError::MissingColumn(MissingColumn::Student(_))));

        let err = app.summary(&csv, "Bob").await.unwrap_err();
        assert!(matches!(err, AppError::MissingColumn(MissingColumn::Student(_))));
    }

    #[tokio::test]
    async fn valid_input_without_key_reports_missing_credential() {
        let dir = tempfile::tempdir().unwrap();
        let csv = write_csv(dir.path(), "題目,Alice\n2+2=?,0\n");
        let app = app_without_key();

        let request = QuizRequest::new("Alice", "神秘花園", SectionCounts::default());
        let err = app.quiz(&csv, &request).await.unwrap_err();
        assert!(matches!(err, AppError::MissingCredential { .. }));
    }
}
