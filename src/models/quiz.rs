use crate::models::section::SectionKind;

/// 各题型的题数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionCounts {
    pub true_false: u32,
    pub multiple_choice: u32,
    pub word_problem: u32,
}

impl Default for SectionCounts {
    fn default() -> Self {
        Self {
            true_false: 3,
            multiple_choice: 4,
            word_problem: 3,
        }
    }
}

impl SectionCounts {
    pub fn get(&self, kind: SectionKind) -> u32 {
        match kind {
            SectionKind::TrueFalse => self.true_false,
            SectionKind::MultipleChoice => self.multiple_choice,
            SectionKind::WordProblem => self.word_problem,
        }
    }

    pub fn total(&self) -> u32 {
        SectionKind::ALL.iter().map(|k| self.get(*k)).sum()
    }
}

/// 一次出题请求
#[derive(Debug, Clone)]
pub struct QuizRequest {
    /// 学生姓名（必须与答题表列名完全一致）
    pub student: String,
    /// 题目故事主题
    pub theme: String,
    pub counts: SectionCounts,
}

impl QuizRequest {
    pub fn new(student: impl Into<String>, theme: impl Into<String>, counts: SectionCounts) -> Self {
        Self {
            student: student.into(),
            theme: theme.into(),
            counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_follow_section_kind() {
        let counts = SectionCounts {
            true_false: 1,
            multiple_choice: 2,
            word_problem: 5,
        };
        assert_eq!(counts.get(SectionKind::MultipleChoice), 2);
        assert_eq!(counts.total(), 8);
    }
}
