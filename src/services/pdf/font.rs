//! 中文字体查找
//!
//! 试卷内容是繁体中文，没有 CJK 字形的字体排出来全是方块，
//! 所以找不到字体时直接失败，不做任何渲染。

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::FontConfig;
use crate::error::{AppError, AppResult};

/// 已加载的字体
#[derive(Debug, Clone)]
pub struct FontSource {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// 按配置查找字体文件：显式路径优先，其次依次搜索目录 × 候选文件名
pub fn locate_font(config: &FontConfig) -> AppResult<PathBuf> {
    let mut searched = Vec::new();

    if let Some(path) = &config.font_path {
        if path.is_file() {
            info!("✓ 使用指定字体: {}", path.display());
            return Ok(path.clone());
        }
        searched.push(path.display().to_string());
    }

    for dir in &config.search_dirs {
        for name in &config.candidates {
            let candidate = dir.join(name);
            debug!("检查字体: {}", candidate.display());
            if candidate.is_file() {
                info!("✓ 找到中文字体: {}", candidate.display());
                return Ok(absolute(&candidate));
            }
            searched.push(candidate.display().to_string());
        }
    }

    Err(AppError::ResourceMissing {
        resource: "中文字型".to_string(),
        searched,
    })
}

/// 查找并读入字体
pub fn load_font(config: &FontConfig) -> AppResult<FontSource> {
    let path = locate_font(config)?;
    let bytes = std::fs::read(&path).map_err(|e| AppError::file(&path, e))?;
    debug!("字体大小: {} bytes", bytes.len());
    Ok(FontSource { path, bytes })
}

fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
