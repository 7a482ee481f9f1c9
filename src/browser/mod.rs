//! 浏览器基础设施
//!
//! 两种获取浏览器的方式：连接已开启调试端口的浏览器，或者自行启动。

pub mod connection;
pub mod launcher;
pub mod wait;

use chromiumoxide::{Browser, Page};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::BrowserSettings;
use crate::error::AppResult;

pub use connection::{connect_to_browser, open_page};
pub use launcher::launch_browser;
pub use wait::{poll_until, WaitOptions};

/// 一次抓取任务使用的浏览器会话
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    /// 是否由本程序启动（连接来的浏览器不负责关闭）
    owned: bool,
}

impl BrowserSession {
    /// 按配置连接或启动浏览器，并打开 `url`
    pub async fn open(settings: &BrowserSettings, url: &str) -> AppResult<Self> {
        let (browser, handler, owned) = match settings.debug_port {
            Some(port) => {
                let (browser, handler) = connect_to_browser(port).await?;
                (browser, handler, false)
            }
            None => {
                let (browser, handler) = launch_browser(settings).await?;
                (browser, handler, true)
            }
        };
        let page = open_page(&browser, url).await?;

        Ok(Self {
            browser,
            page,
            handler,
            owned,
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 结束会话：自行启动的浏览器会被关闭，连接来的只关闭本页面
    pub async fn close(mut self) -> AppResult<()> {
        if self.owned {
            warn_on_err("关闭浏览器", self.browser.close().await);
            warn_on_err("等待浏览器进程退出", self.browser.wait().await);
        } else {
            self.page.close().await?;
        }
        self.handler.abort();
        info!("浏览器会话已结束");
        Ok(())
    }
}

/// 收尾步骤失败只记录，不中断关闭流程
fn warn_on_err<T, E: std::fmt::Display>(step: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{}失败: {}", step, e);
            None
        }
    }
}
