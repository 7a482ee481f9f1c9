//! 输出文件写入 - 业务能力层
//!
//! 只负责"把结果落盘"，不关心内容怎么来的

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

/// 生成 `<prefix>_<YYYYMMDD_HHMMSS>.<ext>`，同名文件已存在时追加 `_2`、`_3`…
pub fn timestamped_path(
    dir: &Path,
    prefix: &str,
    ext: &str,
    now: DateTime<Local>,
) -> AppResult<PathBuf> {
    if !dir.as_os_str().is_empty() && !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| AppError::file(dir, e))?;
    }

    let stamp = now.format("%Y%m%d_%H%M%S");
    let mut path = dir.join(format!("{}_{}.{}", prefix, stamp, ext));
    let mut n = 2;
    while path.exists() {
        path = dir.join(format!("{}_{}_{}.{}", prefix, stamp, n, ext));
        n += 1;
    }
    debug!("输出路径: {}", path.display());
    Ok(path)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// 作业页面：原始公告 HTML + 模型草稿
///
/// 公告内容本身就是 HTML，原样嵌入；模型回复按纯文本转义，换行变成 `<br>`。
pub fn homework_html(content_html: &str, reply: &str) -> String {
    let reply_html = escape_html(reply).replace('\n', "<br>\n");
    format!(
        r#"<!DOCTYPE html>
<html lang="zh-TW">
<head>
    <meta charset="UTF-8">
    <title>作業草稿</title>
    <style>
        body {{ font-family: "微軟正黑體", sans-serif; line-height: 1.6; padding: 20px; }}
        h1 {{ color: #0077cc; }}
        h2 {{ color: #cc0000; }}
        .section {{ margin-bottom: 30px; }}
        .box {{ border: 1px solid #ccc; padding: 15px; background-color: #f9f9f9; }}
    </style>
</head>
<body>
    <h1>作業內容擷取 + 草稿生成</h1>

    <div class="section">
        <h2>📌 Moodle 原始內容：</h2>
        <div class="box">{content}</div>
    </div>

    <div class="section">
        <h2>🤖 模型生成草稿：</h2>
        <div class="box">{reply}</div>
    </div>
</body>
</html>
"#,
        content = content_html,
        reply = reply_html,
    )
}

/// 写入文本文件（覆盖）
pub fn write_text(path: &Path, content: &str) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| AppError::file(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| AppError::file(path, e))?;
    info!("✅ 已写入: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 5, 1, 9, 8, 7).unwrap()
    }

    #[test]
    fn report_name_uses_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = timestamped_path(dir.path(), "report", "pdf", fixed_time()).unwrap();
        assert_eq!(path.file_name().unwrap(), "report_20250501_090807.pdf");
    }

    #[test]
    fn existing_name_gets_numeric_suffix() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("report_20250501_090807.pdf"), b"x").unwrap();
        std::fs::write(dir.path().join("report_20250501_090807_2.pdf"), b"x").unwrap();

        let path = timestamped_path(dir.path(), "report", "pdf", fixed_time()).unwrap();
        assert_eq!(path.file_name().unwrap(), "report_20250501_090807_3.pdf");
    }

    #[test]
    fn missing_output_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("pdf");
        let path = timestamped_path(&nested, "report", "pdf", fixed_time()).unwrap();
        assert!(nested.is_dir());
        assert!(path.starts_with(&nested));
    }

    #[test]
    fn homework_html_escapes_reply_but_not_content() {
        let html = homework_html("<p>作業四</p>", "if a < b:\n    print(\"ok\")");
        assert!(html.contains("<div class=\"box\"><p>作業四</p></div>"));
        assert!(html.contains("if a &lt; b:<br>\n    print(&quot;ok&quot;)"));
    }

    #[test]
    fn write_text_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("generated_code.py");
        write_text(&path, "print(1)\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "print(1)\n");
    }
}
