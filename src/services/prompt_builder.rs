//! 提示词构建 - 业务能力层
//!
//! 纯字符串拼接，不做任何 IO。

use crate::models::{QuizRequest, SectionKind};

/// 出题时附带的答题资料行数
pub const PREVIEW_ROWS: usize = 30;

/// 出题规则
pub fn quiz_rules(request: &QuizRequest) -> String {
    let counts = SectionKind::ALL
        .iter()
        .map(|kind| format!("- {}：{} 題", kind.label(), request.counts.get(*kind)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"你是一名資深數學老師，請根據"{student}"同學的答題狀況與所有人的易錯題目進行錯誤題目預測：

1. 每個欄位皆表示為一位學生在各題的答題狀況；
2. 其中0表示該學生在該題答錯，1表示該題答對，
3. "題目"的欄位為該份考卷所有的題目
4. 禁止出與數學無關的題目，不要輸出答案，
5. 數學題目中須結合與'{theme}'相關的連貫故事
6. 每種題型（是非題 / 選擇題 / 應用題）標題只能出現一次。
7. 禁止出現多組題目、多份試卷、備用題或延伸題
8. 所有題目請用繁體中文撰寫
9. 題號後方不須空行

請預測該學生的錯題，並生成一份包含：
{counts}

📌 **題目格式請完全照以下方式呈現（必須一致）：**
{tf}
台灣的人口密度比美國高，則台灣是基準量？

{mc}
若圓的半徑為3公分，面積是多少？ (1)9π(2)6π(3)3π(4)12π

{wp}
媽媽買了3顆蘋果和2根香蕉共花60元，若每顆蘋果20元，香蕉多少錢？

📄格式與語言注意事項：
- 題號格式為：1. 2. 3. ……（中間無空格，無換行）
- 選擇題選項必須以 (1)(2)(3)(4) 呈現，且選項不得重複。
- 所有內容不得加入「請作答」「請觀察圖」或其他引導語。
- 禁止產出除題目以外的內容。
"#,
        student = request.student,
        theme = request.theme,
        counts = counts,
        tf = SectionKind::TrueFalse.header(),
        mc = SectionKind::MultipleChoice.header(),
        wp = SectionKind::WordProblem.header(),
    )
}

/// 完整的出题提示词：答题资料预览 + 出题规则
pub fn quiz_prompt(request: &QuizRequest, csv_preview: &str) -> String {
    format!(
        "以下是學生答題資料（前{}筆，包含「{}」）：\n{}\n\n請依照以下規則產題：\n{}",
        PREVIEW_ROWS,
        request.student,
        csv_preview,
        quiz_rules(request)
    )
}

/// 根据错题列表生成学习回馈
pub fn feedback_prompt(student: &str, wrong_lines: &[String]) -> String {
    format!(
        r#"你是一名有經驗的數學老師，以下是學生「{student}」在數學測驗中的錯題內容：

{wrong}

請根據上述錯題，進行以下三點的分析與建議（使用繁體中文）：

1. 分析這些錯題的共通點或主題（例如：應用題、單位概念、幾何圖形等）
2. 推測可能的錯誤原因（例如：觀念不清、計算錯誤、審題不仔細）
3. 提供具體、可執行的學習建議（例如：製作錯題本、針對類型反覆練習、使用圖像輔助理解等）

請避免空泛建議，內容聚焦在學生可立即採行的學習行動。
禁止產出與數學無關的內容，也不要寫出題目答案。
"#,
        student = student,
        wrong = wrong_lines.join("\n"),
    )
}

/// 只有 0/1 作答记录、没有题目文字时的回馈提示词
pub fn summary_feedback_prompt(student: &str, answers: &[&str]) -> String {
    format!(
        r#"你是一名有經驗的數學老師。根據學生「{student}」的答題狀況（1為答對，0為答錯），請給出學習回饋與改善建議。

答題紀錄如下：
{summary}

請以繁體中文提供：
1. 學生整體表現的簡要評估
2. 容易出錯的類型與可能原因
3. 具體可行的學習建議（避免空泛建議）"#,
        student = student,
        summary = answers.join(", "),
    )
}

/// 为已生成的试卷撰写详解
pub fn solutions_prompt(quiz_text: &str) -> String {
    format!(
        r#"你是一名資深數學老師，以下是一份已出好的數學考卷：

{quiz}

請為每一題撰寫解答與簡要詳解，規則如下：
1. 保留原本的題型標題（{tf} / {mc} / {wp}），每種標題只能出現一次
2. 每題以原本的題號開頭，格式為：1. 2. 3. ……（中間無空格）
3. 題號行寫出答案，下一行開始寫詳解步驟
4. 所有內容請用繁體中文撰寫，禁止產出與解答無關的內容
"#,
        quiz = quiz_text,
        tf = SectionKind::TrueFalse.header(),
        mc = SectionKind::MultipleChoice.header(),
        wp = SectionKind::WordProblem.header(),
    )
}

/// 根据抓取到的作业说明撰写草稿
pub fn homework_prompt(assignment_html: &str) -> String {
    format!(
        "以下是 Moodle 上老師發布的作業說明，請幫我撰寫符合要求的作業草稿內容，並且要給出完整的程式碼，且要先給完整的程式碼之後再解釋：\n\n{}",
        assignment_html
    )
}
