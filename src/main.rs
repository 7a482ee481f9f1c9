use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use quiz_report::utils::logging;
use quiz_report::{App, Config, QuizRequest, SectionCounts};

#[derive(Parser)]
#[command(
    name = "quiz-report",
    version,
    about = "錯題分析與考卷生成系統"
)]
struct Cli {
    /// TOML 配置文件（默认读取当前目录的 quiz_report.toml）
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 输出 debug 级别日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 根据答题表预测错题并生成考卷 PDF
    Quiz {
        /// 答题资料 CSV
        csv: PathBuf,

        /// 学生姓名（与 CSV 列名完全一致）
        #[arg(short, long)]
        student: String,

        /// 题目故事主题
        #[arg(short, long, default_value = "神秘花園")]
        theme: String,

        /// 是非题数
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(0..=10))]
        true_false: u32,

        /// 选择题数
        #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(0..=10))]
        multiple_choice: u32,

        /// 应用题数
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(0..=10))]
        word_problem: u32,
    },
    /// 根据错题内容生成学习回馈（需要「題目」列）
    Feedback {
        csv: PathBuf,
        #[arg(short, long)]
        student: String,
    },
    /// 只根据 0/1 作答记录生成学习回馈
    Summary {
        csv: PathBuf,
        #[arg(short, long)]
        student: String,
    },
    /// 为考卷文字生成详解 PDF
    Solutions {
        /// 考卷文字文件
        quiz_file: PathBuf,
    },
    /// 登录 Moodle 抓取作业说明并生成草稿
    Homework,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // .env 不存在时忽略
    let _ = dotenvy::dotenv();

    let config = Config::load(cli.config.as_deref())?;
    logging::init(cli.verbose || config.verbose_logging);

    let app = App::new(config);
    let result = match cli.command {
        Commands::Quiz {
            csv,
            student,
            theme,
            true_false,
            multiple_choice,
            word_problem,
        } => {
            let counts = SectionCounts {
                true_false,
                multiple_choice,
                word_problem,
            };
            app.quiz(&csv, &QuizRequest::new(student, theme, counts)).await
        }
        Commands::Feedback { csv, student } => app.feedback(&csv, &student).await,
        Commands::Summary { csv, student } => app.summary(&csv, &student).await,
        Commands::Solutions { quiz_file } => app.solutions(&quiz_file).await,
        Commands::Homework => app.homework().await,
    };

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        // 输入类错误只给用户看提示信息
        Err(e) if e.is_user_facing() => {
            eprintln!("{}", e);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}
