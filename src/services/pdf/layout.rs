//! 试卷排版
//!
//! 把模型返回的文本逐行分类后排进分页文档。这里只计算位置，不碰 PDF，
//! 所以排版规则可以脱离字体文件单独测试。
//!
//! 坐标单位为毫米，`y` 从页面上边缘往下算，指向该行的顶部。

use crate::models::LineKind;

const PT_TO_MM: f32 = 25.4 / 72.0;

/// 页面与行距规则
#[derive(Debug, Clone, PartialEq)]
pub struct PageStyle {
    pub page_width: f32,
    pub page_height: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
    pub left_margin: f32,
    pub right_margin: f32,
    /// 正文字号（pt）
    pub body_font_size: f32,
    /// 题型标题字号（pt）
    pub header_font_size: f32,
    pub line_height: f32,
    pub header_line_height: f32,
    pub header_space_before: f32,
    pub header_space_after: f32,
    /// 标题后第一道题上方的额外间距
    pub item_after_header_gap: f32,
    /// 题号行之后续行上方的间距
    pub continuation_gap: f32,
}

impl Default for PageStyle {
    /// A4
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            top_margin: 15.0,
            bottom_margin: 15.0,
            left_margin: 10.0,
            right_margin: 10.0,
            body_font_size: 12.0,
            header_font_size: 14.0,
            line_height: 8.0,
            header_line_height: 10.0,
            header_space_before: 4.0,
            header_space_after: 2.0,
            item_after_header_gap: 2.0,
            continuation_gap: 1.0,
        }
    }
}

impl PageStyle {
    pub fn printable_width(&self) -> f32 {
        self.page_width - self.left_margin - self.right_margin
    }

    pub fn printable_height(&self) -> f32 {
        self.page_height - self.top_margin - self.bottom_margin
    }

    /// 光标不能越过的位置
    pub fn bottom_limit(&self) -> f32 {
        self.page_height - self.bottom_margin
    }

    fn font_size(&self, kind: LineKind) -> f32 {
        if kind.is_header() {
            self.header_font_size
        } else {
            self.body_font_size
        }
    }

    fn row_height(&self, kind: LineKind) -> f32 {
        if kind.is_header() {
            self.header_line_height
        } else {
            self.line_height
        }
    }

    /// 行上方的间距，取决于上一条实际排出的行
    fn gap_above(&self, prev: Option<LineKind>, kind: LineKind) -> f32 {
        match (prev, kind) {
            (_, LineKind::Header(_)) => self.header_space_before,
            (Some(LineKind::Header(_)), LineKind::Item { .. }) => self.item_after_header_gap,
            (Some(LineKind::Item { .. }), LineKind::Plain) => self.continuation_gap,
            _ => 0.0,
        }
    }
}

/// 排好位置的一行（折行后的一段）
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub kind: LineKind,
    pub font_size: f32,
    pub x: f32,
    pub y: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaidOutPage {
    pub lines: Vec<PlacedLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutDocument {
    pub page_width: f32,
    pub page_height: f32,
    pub pages: Vec<LaidOutPage>,
}

impl LaidOutDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|p| p.lines.len()).sum()
    }

    pub fn lines(&self) -> impl Iterator<Item = (usize, &PlacedLine)> {
        self.pages
            .iter()
            .enumerate()
            .flat_map(|(i, page)| page.lines.iter().map(move |line| (i, line)))
    }
}

/// 字符宽度（em）：全角 / CJK 为 1，其余按半角估算
fn char_em(c: char) -> f32 {
    let wide = matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x1F300..=0x1FAFF
        | 0x20000..=0x3FFFD);
    if wide {
        1.0
    } else {
        0.5
    }
}

/// 按可打印宽度贪心折行，每行至少一个字符
pub fn wrap_line(text: &str, font_size: f32, max_width: f32) -> Vec<String> {
    let em = font_size * PT_TO_MM;
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut width = 0.0;

    for c in text.chars() {
        let w = char_em(c) * em;
        if !current.is_empty() && width + w > max_width {
            rows.push(std::mem::take(&mut current));
            width = 0.0;
        }
        current.push(c);
        width += w;
    }
    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }
    rows
}

struct Cursor<'a> {
    style: &'a PageStyle,
    pages: Vec<LaidOutPage>,
    y: f32,
}

impl<'a> Cursor<'a> {
    fn new(style: &'a PageStyle) -> Self {
        Self {
            style,
            pages: vec![LaidOutPage::default()],
            y: style.top_margin,
        }
    }

    fn at_page_top(&self) -> bool {
        self.y <= self.style.top_margin
    }

    fn new_page(&mut self) {
        self.pages.push(LaidOutPage::default());
        self.y = self.style.top_margin;
    }

    /// 剩余空间放不下 `needed` 时换页（页首不换，避免死循环）
    fn ensure_room(&mut self, needed: f32) {
        if !self.at_page_top() && self.y + needed > self.style.bottom_limit() {
            self.new_page();
        }
    }

    /// 光标下移；越过底边界时换页
    fn advance(&mut self, dy: f32) {
        self.y += dy;
        if self.y > self.style.bottom_limit() {
            self.new_page();
        }
    }

    fn place_rows(&mut self, rows: Vec<String>, kind: LineKind, gap_above: f32) {
        let font_size = self.style.font_size(kind);
        let height = self.style.row_height(kind);
        let mut gap = gap_above;

        for text in rows {
            if !self.at_page_top() {
                self.y += gap;
            }
            let line = PlacedLine {
                text,
                kind,
                font_size,
                x: self.style.left_margin,
                y: self.y,
                height,
            };
            if let Some(page) = self.pages.last_mut() {
                page.lines.push(line);
            }
            self.advance(height);
            gap = 0.0;
        }
    }
}

/// 排版入口
///
/// 规则：
/// - 题型标题用大字号，上下留固定间距，且不会单独留在页尾（放不下标题加下一行时先换页）
/// - 题号行紧跟标题时上方多留一点间距
/// - 题号行之后的普通行上方留小间距
/// - 空行不排出，查找"上一行/下一行"时跳过
/// - 每排完一行检查光标，越过底边界就换页，光标回到上边距
pub fn layout(text: &str, style: &PageStyle) -> LaidOutDocument {
    let lines: Vec<(&str, LineKind)> = text
        .lines()
        .map(|line| (line, LineKind::classify(line)))
        .collect();

    let width = style.printable_width();
    let mut cursor = Cursor::new(style);
    let mut prev: Option<LineKind> = None;

    for (i, (line, kind)) in lines.iter().enumerate() {
        let kind = *kind;
        if kind == LineKind::Blank {
            continue;
        }

        let text = if kind.is_header() {
            line.trim()
        } else {
            line.trim_end()
        };
        let rows = wrap_line(text, style.font_size(kind), width);
        let gap = if cursor.at_page_top() {
            0.0
        } else {
            style.gap_above(prev, kind)
        };

        if kind.is_header() {
            let mut needed = gap + rows.len() as f32 * style.row_height(kind) + style.header_space_after;
            let next = lines[i + 1..]
                .iter()
                .map(|(_, k)| *k)
                .find(|k| *k != LineKind::Blank);
            if let Some(next) = next {
                needed += style.gap_above(Some(kind), next) + style.row_height(next);
            }
            cursor.ensure_room(needed);
            cursor.place_rows(rows, kind, gap);
            cursor.advance(style.header_space_after);
        } else {
            cursor.place_rows(rows, kind, gap);
        }

        prev = Some(kind);
    }

    LaidOutDocument {
        page_width: style.page_width,
        page_height: style.page_height,
        pages: cursor.pages,
    }
}
