//! 作业抓取流程 - 流程层
//!
//! 登录 Moodle → 仪表板 → 课程 → 公告区 → 作业公告 → 抓取正文 → 交给模型写草稿。
//! 每一步都等待目标元素出现，超时即整次运行失败。

use std::path::PathBuf;

use chromiumoxide::Page;
use tracing::{info, warn};

use crate::browser::wait::{
    click_text_when_ready, click_when_ready, fill_when_ready, wait_for_element, WaitOptions,
};
use crate::browser::BrowserSession;
use crate::config::{BrowserSettings, HomeworkConfig};
use crate::error::{AppError, AppResult};
use crate::infrastructure::JsExecutor;
use crate::services::output_writer::{homework_html, write_text};
use crate::services::prompt_builder;
use crate::services::TextGenerator;
use crate::utils::logging::truncate_text;

const USERNAME_INPUT: &str = "input#username";
const PASSWORD_INPUT: &str = "input#password";
const LOGIN_BUTTON: &str = r#"button[type="submit"].btn.btn-primary"#;
const USER_MENU: &str = "a.dropdown-toggle.icon-no-margin";
const DASHBOARD_LINK: &str = r#"a.dropdown-item.menu-action[href*="/my/"]"#;
const COURSE_CARD: &str = "span.multiline";
const ACTIVITY_NAME: &str = "span.instancename";
const DISCUSSION_LINK: &str = "a.p-3.p-l-0.w-100.h-100.d-block";

/// 抓取 + 草稿的结果
#[derive(Debug, Clone)]
pub struct HomeworkOutcome {
    pub content_html: String,
    pub reply: String,
    pub html_path: PathBuf,
    pub code_path: PathBuf,
}

pub struct HomeworkFlow<G> {
    generator: G,
    homework: HomeworkConfig,
    browser: BrowserSettings,
}

impl<G: TextGenerator> HomeworkFlow<G> {
    pub fn new(generator: G, homework: HomeworkConfig, browser: BrowserSettings) -> Self {
        Self {
            generator,
            homework,
            browser,
        }
    }

    /// 完整流程
    pub async fn run(&self) -> AppResult<HomeworkOutcome> {
        // 凭证缺失时连浏览器都不启动
        let (username, password) = self.homework.require_login()?;

        let content_html = self.scrape(username, password).await?;
        self.draft(&content_html).await
    }

    /// 打开浏览器抓取作业公告正文 HTML
    pub async fn scrape(&self, username: &str, password: &str) -> AppResult<String> {
        let session = BrowserSession::open(&self.browser, &self.homework.login_url).await?;
        let result = self.walk_to_post(session.page(), username, password).await;

        if let Err(e) = session.close().await {
            warn!("关闭浏览器会话失败: {}", e);
        }
        result
    }

    async fn walk_to_post(&self, page: &Page, username: &str, password: &str) -> AppResult<String> {
        let opts = WaitOptions::from_settings(&self.browser);
        let hw = &self.homework;

        // 登录
        fill_when_ready(page, USERNAME_INPUT, username, opts).await?;
        fill_when_ready(page, PASSWORD_INPUT, password, opts).await?;
        click_when_ready(page, LOGIN_BUTTON, opts).await?;
        info!("✅ 已提交登录");

        // 右上角头像 → 仪表板
        click_when_ready(page, USER_MENU, opts).await?;
        click_when_ready(page, DASHBOARD_LINK, opts).await?;
        info!("✅ 进入仪表板");

        click_text_when_ready(page, COURSE_CARD, &hw.course_name, opts).await?;
        info!("✅ 进入课程：{}", hw.course_name);

        click_text_when_ready(page, ACTIVITY_NAME, &hw.forum_name, opts).await?;
        info!("✅ 进入{}区", hw.forum_name);

        click_text_when_ready(page, DISCUSSION_LINK, &hw.post_title, opts).await?;
        info!("✅ 开启：{}", hw.post_title);

        wait_for_element(page, &hw.content_selector, opts).await?;
        let executor = JsExecutor::new(page.clone());
        let content = executor
            .inner_html(&hw.content_selector)
            .await?
            .ok_or_else(|| AppError::SelectorNotFound {
                selector: hw.content_selector.clone(),
                timeout_ms: opts.timeout.as_millis() as u64,
            })?;

        info!("📄 抓取到公告内容 {} 字符", content.chars().count());
        Ok(content)
    }

    /// 把公告内容交给模型写草稿，并写出 HTML 与程序代码文件
    pub async fn draft(&self, content_html: &str) -> AppResult<HomeworkOutcome> {
        let prompt = prompt_builder::homework_prompt(content_html);
        let reply = self.generator.generate(&prompt).await?;
        info!("🤖 模型回复: {}", truncate_text(&reply, 80));

        let html_path = self.homework.html_output.clone();
        let code_path = self.homework.code_output.clone();
        write_text(&html_path, &homework_html(content_html, &reply))?;
        write_text(&code_path, &reply)?;

        Ok(HomeworkOutcome {
            content_html: content_html.to_string(),
            reply,
            html_path,
            code_path,
        })
    }
}
