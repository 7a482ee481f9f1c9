//! 学生答题表
//!
//! CSV 每行是一道题，每列是一位学生（`0` 答错 / `1` 答对），
//! 另有可选的「題目」列存放题目文字。

use std::path::Path;

use tracing::{debug, info};

use crate::error::{AppError, AppResult, MissingColumn};

/// 题目文字所在的列名
pub const QUESTION_COLUMN: &str = "題目";

/// 单个作答结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Right,
    Wrong,
    /// 空白或无法识别的值
    Unknown,
}

impl Answer {
    fn parse(cell: &str) -> Self {
        match cell.trim() {
            "1" | "1.0" => Answer::Right,
            "0" | "0.0" => Answer::Wrong,
            _ => Answer::Unknown,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnswerSheet {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl AnswerSheet {
    /// 从 CSV 文件加载
    pub fn from_path(path: &Path) -> AppResult<Self> {
        info!("📁 读取答题资料: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| AppError::file(path, e))?;
        Self::from_csv_str(&content)
    }

    pub fn from_csv_str(content: &str) -> AppResult<Self> {
        // Excel 导出的 UTF-8 CSV 常带 BOM
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        debug!("答题表: {} 列, {} 行", headers.len(), rows.len());
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 列名完全相同（区分大小写与空白）才算存在
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// 校验学生列存在，返回列下标
    pub fn require_student(&self, student: &str) -> AppResult<usize> {
        self.column_index(student)
            .ok_or_else(|| MissingColumn::Student(student.to_string()).into())
    }

    /// 学生在每道题上的原始值
    pub fn answers(&self, student: &str) -> AppResult<Vec<&str>> {
        let col = self.require_student(student)?;
        Ok(self.rows.iter().map(|row| row[col].as_str()).collect())
    }

    /// 学生答错的题目文字（按原顺序）
    pub fn wrong_questions(&self, student: &str) -> AppResult<Vec<&str>> {
        let student_col = self.require_student(student)?;
        let question_col = self
            .column_index(QUESTION_COLUMN)
            .ok_or(MissingColumn::QuestionText)?;

        Ok(self
            .rows
            .iter()
            .filter(|row| Answer::parse(&row[student_col]) == Answer::Wrong)
            .map(|row| row[question_col].as_str())
            .collect())
    }

    /// 表头加前 `limit` 行，重新序列化为 CSV 文本
    pub fn preview_csv(&self, limit: usize) -> AppResult<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in self.rows.iter().take(limit) {
            writer.write_record(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::file("<csv preview>", e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// 把错题列表格式化为 `1. 题目` 形式的行
pub fn numbered_list(items: &[&str]) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "題目,Alice,Bob\n2+2=?,0,1\n3*3=?,1,0\n10/2=?,0,0\n";

    #[test]
    fn single_wrong_question_is_numbered_from_one() {
        let sheet = AnswerSheet::from_csv_str("題目,Alice\n2+2=?,0\n").unwrap();
        let wrong = sheet.wrong_questions("Alice").unwrap();
        assert_eq!(numbered_list(&wrong), vec!["1. 2+2=?".to_string()]);
    }

    #[test]
    fn wrong_questions_keep_row_order() {
        let sheet = AnswerSheet::from_csv_str(SHEET).unwrap();
        assert_eq!(sheet.wrong_questions("Alice").unwrap(), vec!["2+2=?", "10/2=?"]);
        assert_eq!(sheet.wrong_questions("Bob").unwrap(), vec!["3*3=?", "10/2=?"]);
    }

    #[test]
    fn student_column_match_is_exact() {
        let sheet = AnswerSheet::from_csv_str(SHEET).unwrap();
        assert!(sheet.has_column("Alice"));
        assert!(!sheet.has_column("alice"));
        assert!(!sheet.has_column("Alice "));

        let err = sheet.require_student("alice").unwrap_err();
        assert!(matches!(
            err,
            AppError::MissingColumn(MissingColumn::Student(ref name)) if name == "alice"
        ));
    }

    #[test]
    fn wrong_questions_need_question_column() {
        let sheet = AnswerSheet::from_csv_str("Alice,Bob\n0,1\n").unwrap();
        assert!(matches!(
            sheet.wrong_questions("Alice"),
            Err(AppError::MissingColumn(MissingColumn::QuestionText))
        ));
        // 学生列缺失优先报告
        assert!(matches!(
            sheet.wrong_questions("Carol"),
            Err(AppError::MissingColumn(MissingColumn::Student(_)))
        ));
    }

    #[test]
    fn unknown_cells_are_not_wrong() {
        let sheet = AnswerSheet::from_csv_str("題目,Alice\nq1,\nq2,x\nq3,0.0\n").unwrap();
        assert_eq!(sheet.wrong_questions("Alice").unwrap(), vec!["q3"]);
    }

    #[test]
    fn short_rows_are_padded() {
        let sheet = AnswerSheet::from_csv_str("題目,Alice,Bob\nq1,1\n").unwrap();
        assert_eq!(sheet.answers("Bob").unwrap(), vec![""]);
    }

    #[test]
    fn bom_is_stripped_from_first_header() {
        let sheet = AnswerSheet::from_csv_str("\u{feff}題目,Alice\nq,1\n").unwrap();
        assert!(sheet.has_column(QUESTION_COLUMN));
    }

    #[test]
    fn preview_keeps_header_and_limits_rows() {
        let sheet = AnswerSheet::from_csv_str(SHEET).unwrap();
        let preview = sheet.preview_csv(2).unwrap();
        assert_eq!(preview, "題目,Alice,Bob\n2+2=?,0,1\n3*3=?,1,0\n");
    }

    #[test]
    fn preview_quotes_fields_with_commas() {
        let sheet = AnswerSheet::from_csv_str("題目,Alice\n\"1,2,3 的和?\",1\n").unwrap();
        let preview = sheet.preview_csv(30).unwrap();
        assert!(preview.contains("\"1,2,3 的和?\",1"));
    }
}
