//! 题型与行分类
//!
//! 模型生成的文本没有结构，只能按行的模式来判断：
//! 题型标题（固定三种）、题号行（`N.` 开头）、普通续行、空行。

use std::sync::OnceLock;

use phf::phf_map;
use regex::Regex;

/// 题型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// 是非题
    TrueFalse,
    /// 选择题
    MultipleChoice,
    /// 应用题
    WordProblem,
}

/// 标题文字 → 题型
static HEADERS: phf::Map<&'static str, SectionKind> = phf_map! {
    "一、是非題" => SectionKind::TrueFalse,
    "二、選擇題" => SectionKind::MultipleChoice,
    "三、應用題" => SectionKind::WordProblem,
};

impl SectionKind {
    /// 按试卷中的出现顺序排列
    pub const ALL: [SectionKind; 3] = [
        SectionKind::TrueFalse,
        SectionKind::MultipleChoice,
        SectionKind::WordProblem,
    ];

    /// 题型名称
    pub fn label(self) -> &'static str {
        match self {
            SectionKind::TrueFalse => "是非題",
            SectionKind::MultipleChoice => "選擇題",
            SectionKind::WordProblem => "應用題",
        }
    }

    /// 试卷中的标题行
    pub fn header(self) -> &'static str {
        match self {
            SectionKind::TrueFalse => "一、是非題",
            SectionKind::MultipleChoice => "二、選擇題",
            SectionKind::WordProblem => "三、應用題",
        }
    }

    /// 按标题行识别题型（忽略首尾空白）
    pub fn from_header(line: &str) -> Option<Self> {
        HEADERS.get(line.trim()).copied()
    }
}

/// 单行文本的分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Header(SectionKind),
    /// 题号行，例如 `3.若圓的半徑…`
    Item { number: u32 },
    Plain,
    Blank,
}

fn item_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*(\d+)\.").expect("静态正则"))
}

impl LineKind {
    pub fn classify(line: &str) -> Self {
        if line.trim().is_empty() {
            return LineKind::Blank;
        }
        if let Some(kind) = SectionKind::from_header(line) {
            return LineKind::Header(kind);
        }
        if let Some(caps) = item_pattern().captures(line) {
            // 超出 u32 的"题号"按普通行处理
            if let Ok(number) = caps[1].parse() {
                return LineKind::Item { number };
            }
        }
        LineKind::Plain
    }

    pub fn is_header(self) -> bool {
        matches!(self, LineKind::Header(_))
    }

    pub fn is_item(self) -> bool {
        matches!(self, LineKind::Item { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_round_trip_through_the_table() {
        for kind in SectionKind::ALL {
            assert_eq!(SectionKind::from_header(kind.header()), Some(kind));
            assert!(kind.header().ends_with(kind.label()));
        }
    }

    #[test]
    fn header_match_ignores_surrounding_whitespace_only() {
        assert_eq!(
            LineKind::classify("  二、選擇題  "),
            LineKind::Header(SectionKind::MultipleChoice)
        );
        // 简体或多余文字都不算标题
        assert_eq!(LineKind::classify("二、选择题"), LineKind::Plain);
        assert_eq!(LineKind::classify("二、選擇題（共4題）"), LineKind::Plain);
    }

    #[test]
    fn numbered_lines_are_items() {
        assert_eq!(LineKind::classify("1.台灣的人口密度比美國高"), LineKind::Item { number: 1 });
        assert_eq!(LineKind::classify("12. 媽媽買了3顆蘋果"), LineKind::Item { number: 12 });
        assert_eq!(LineKind::classify("  3.x"), LineKind::Item { number: 3 });
    }

    #[test]
    fn near_miss_numbering_is_plain() {
        assert_eq!(LineKind::classify("(1)9π(2)6π"), LineKind::Plain);
        assert_eq!(LineKind::classify("1、題目"), LineKind::Plain);
        assert_eq!(LineKind::classify("第1.題"), LineKind::Plain);
        assert_eq!(LineKind::classify("99999999999.溢位"), LineKind::Plain);
    }

    #[test]
    fn whitespace_only_is_blank() {
        assert_eq!(LineKind::classify(""), LineKind::Blank);
        assert_eq!(LineKind::classify(" \t "), LineKind::Blank);
        assert_eq!(LineKind::classify("\u{3000}"), LineKind::Blank);
    }
}
