//! 元素等待
//!
//! 每一步页面操作前都轮询目标元素，直到出现或超时；超时即失败，不重试。

use std::future::Future;
use std::time::Duration;

use chromiumoxide::{Element, Page};
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::config::BrowserSettings;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub interval: Duration,
}

impl WaitOptions {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    pub fn from_settings(settings: &BrowserSettings) -> Self {
        Self {
            timeout: Duration::from_millis(settings.wait_timeout_ms),
            interval: Duration::from_millis(settings.poll_interval_ms.max(1)),
        }
    }
}

/// 反复调用 `probe` 直到返回 `Some`，超时返回 `SelectorNotFound`
///
/// 至少会探测一次，即使 `timeout` 为零。
pub async fn poll_until<T, F, Fut>(what: &str, opts: WaitOptions, mut probe: F) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = Instant::now() + opts.timeout;
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        if let Some(value) = probe().await {
            debug!("'{}' 就绪 (第 {} 次探测)", what, attempts);
            return Ok(value);
        }
        let now = Instant::now();
        if now >= deadline {
            return Err(AppError::SelectorNotFound {
                selector: what.to_string(),
                timeout_ms: opts.timeout.as_millis() as u64,
            });
        }
        sleep(opts.interval.min(deadline - now)).await;
    }
}

/// 等待选择器匹配到元素
pub async fn wait_for_element(page: &Page, selector: &str, opts: WaitOptions) -> AppResult<Element> {
    poll_until(selector, opts, move || async move {
        page.find_element(selector).await.ok()
    })
    .await
}

/// 等待第一个文字包含 `needle` 的匹配元素
pub async fn wait_for_text(
    page: &Page,
    selector: &str,
    needle: &str,
    opts: WaitOptions,
) -> AppResult<Element> {
    let what = format!("{} (含文字 '{}')", selector, needle);
    poll_until(&what, opts, move || async move {
        let elements = page.find_elements(selector).await.ok()?;
        for element in elements {
            if let Ok(Some(text)) = element.inner_text().await {
                if text.contains(needle) {
                    return Some(element);
                }
            }
        }
        None
    })
    .await
}

/// 等待元素出现后点击
pub async fn click_when_ready(page: &Page, selector: &str, opts: WaitOptions) -> AppResult<()> {
    let element = wait_for_element(page, selector, opts).await?;
    element.click().await?;
    debug!("已点击: {}", selector);
    Ok(())
}

/// 等待含指定文字的元素出现后点击
pub async fn click_text_when_ready(
    page: &Page,
    selector: &str,
    needle: &str,
    opts: WaitOptions,
) -> AppResult<()> {
    let element = wait_for_text(page, selector, needle, opts).await?;
    element.click().await?;
    debug!("已点击: {} '{}'", selector, needle);
    Ok(())
}

/// 等待输入框出现后输入文字
pub async fn fill_when_ready(
    page: &Page,
    selector: &str,
    value: &str,
    opts: WaitOptions,
) -> AppResult<()> {
    let element = wait_for_element(page, selector, opts).await?;
    element.click().await?.type_str(value).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> WaitOptions {
        WaitOptions::new(Duration::from_millis(200), Duration::from_millis(5))
    }

    #[tokio::test]
    async fn returns_once_probe_succeeds() {
        let mut calls = 0;
        let value = poll_until("counter", fast(), || {
            calls += 1;
            let ready = calls >= 3;
            async move { ready.then_some(42) }
        })
        .await
        .unwrap();

        assert_eq!(value, 42);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn times_out_with_selector_name() {
        let opts = WaitOptions::new(Duration::from_millis(30), Duration::from_millis(5));
        let started = std::time::Instant::now();
        let err = poll_until("div#post-content", opts, || async { None::<()> })
            .await
            .unwrap_err();

        assert!(started.elapsed() >= Duration::from_millis(30));
        match err {
            AppError::SelectorNotFound { selector, timeout_ms } => {
                assert_eq!(selector, "div#post-content");
                assert_eq!(timeout_ms, 30);
            }
            other => panic!("应为 SelectorNotFound: {:?}", other),
        }
    }

    #[tokio::test]
    async fn zero_timeout_still_probes_once() {
        let opts = WaitOptions::new(Duration::ZERO, Duration::from_millis(5));
        let mut calls = 0;
        let result = poll_until("once", opts, || {
            calls += 1;
            async { None::<u8> }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn options_come_from_settings() {
        let settings = BrowserSettings {
            wait_timeout_ms: 1500,
            poll_interval_ms: 0,
            ..BrowserSettings::default()
        };
        let opts = WaitOptions::from_settings(&settings);
        assert_eq!(opts.timeout, Duration::from_millis(1500));
        // 间隔为零会变成忙等
        assert_eq!(opts.interval, Duration::from_millis(1));
    }
}
