//! 试卷 PDF 生成
//!
//! - `layout`：逐行分类与分页计算（纯函数）
//! - `font`：按配置查找中文字体
//! - `render`：把排版结果交给 printpdf 输出

pub mod font;
pub mod layout;
pub mod render;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::FontConfig;
use crate::error::AppResult;
use crate::services::output_writer::timestamped_path;

pub use font::{load_font, locate_font, FontSource};
pub use layout::{layout, wrap_line, LaidOutDocument, LaidOutPage, PageStyle, PlacedLine};

/// 已写出的报告
#[derive(Debug, Clone)]
pub struct PdfReport {
    pub path: PathBuf,
    pub document: LaidOutDocument,
}

/// 试卷 PDF 生成器
///
/// 构造时就加载字体，字体缺失返回 `ResourceMissing`，之后的渲染不会再因字体失败。
pub struct PdfFormatter {
    font: FontSource,
    style: PageStyle,
}

impl PdfFormatter {
    pub fn new(config: &FontConfig) -> AppResult<Self> {
        Self::with_style(config, PageStyle::default())
    }

    pub fn with_style(config: &FontConfig, style: PageStyle) -> AppResult<Self> {
        Ok(Self {
            font: load_font(config)?,
            style,
        })
    }

    pub fn font_path(&self) -> &Path {
        &self.font.path
    }

    pub fn style(&self) -> &PageStyle {
        &self.style
    }

    /// 只排版不输出
    pub fn layout(&self, text: &str) -> LaidOutDocument {
        layout(text, &self.style)
    }

    /// 排版并写入指定文件
    pub fn write_to(&self, text: &str, path: &Path) -> AppResult<LaidOutDocument> {
        let doc = self.layout(text);
        render::render_pdf(&doc, &self.font, "report", path)?;
        Ok(doc)
    }

    /// 写入 `report_<YYYYMMDD_HHMMSS>.pdf`
    pub fn write_report(&self, text: &str, output_dir: &Path) -> AppResult<PdfReport> {
        let path = timestamped_path(output_dir, "report", "pdf", chrono::Local::now())?;
        let document = self.write_to(text, &path)?;
        info!("📄 PDF 已生成: {} (共 {} 页)", path.display(), document.page_count());
        Ok(PdfReport { path, document })
    }
}
