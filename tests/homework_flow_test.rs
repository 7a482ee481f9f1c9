use std::path::Path;

use quiz_report::config::{BrowserSettings, Config, HomeworkConfig};
use quiz_report::{AppError, AppResult, HomeworkFlow, TextGenerator};

struct EchoGenerator;

impl TextGenerator for EchoGenerator {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        Ok(format!("```python\nprint(len({:?}))\n```", prompt.len()))
    }
}

fn homework_config(dir: &Path) -> HomeworkConfig {
    HomeworkConfig {
        html_output: dir.join("homework.html"),
        code_output: dir.join("generated_code.py"),
        ..HomeworkConfig::default()
    }
}

#[tokio::test]
async fn draft_writes_html_and_code_files() {
    let dir = tempfile::tempdir().unwrap();
    let flow = HomeworkFlow::new(
        EchoGenerator,
        homework_config(dir.path()),
        BrowserSettings::default(),
    );

    let outcome = tokio_test::assert_ok!(flow.draft("<p>請實作 stack</p>").await);

    let html = std::fs::read_to_string(&outcome.html_path).unwrap();
    assert!(html.contains("<p>請實作 stack</p>"));
    assert!(html.starts_with("<!DOCTYPE html>"));

    let code = std::fs::read_to_string(&outcome.code_path).unwrap();
    assert_eq!(code, outcome.reply);
    assert!(code.starts_with("```python\n"));
}

#[tokio::test]
async fn missing_login_fails_before_opening_a_browser() {
    let dir = tempfile::tempdir().unwrap();
    let mut homework = homework_config(dir.path());
    homework.username = Some("student".to_string());
    homework.password = None;

    // 调试端口指向不存在的浏览器；若真的去连接会得到浏览器错误而不是凭证错误
    let browser = BrowserSettings {
        debug_port: Some(1),
        ..BrowserSettings::default()
    };
    let flow = HomeworkFlow::new(EchoGenerator, homework, browser);

    let err = flow.run().await.unwrap_err();
    assert!(matches!(err, AppError::MissingCredential { ref var } if var == "MOODLE_PASS"));
    assert!(!dir.path().join("homework.html").exists());
}

/// 需要真实的 Moodle 账号、GEMINI_API_KEY 和本机浏览器
#[tokio::test]
#[ignore]
async fn test_scrape_real_site() {
    quiz_report::utils::logging::init(true);
    let config = Config::from_env();
    let (user, pass) = config.homework.require_login().expect("需要 MOODLE_USER / MOODLE_PASS");

    let flow = HomeworkFlow::new(EchoGenerator, config.homework.clone(), config.browser.clone());
    let html = flow.scrape(user, pass).await.expect("抓取失败");
    assert!(!html.is_empty());
}
