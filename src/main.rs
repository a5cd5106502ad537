use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use iso_case_lab::report::{self, PageLayout, ReportDocument};
use iso_case_lab::services::self_test::DEFAULT_QUESTION_COUNT;
use iso_case_lab::utils::logging;
use iso_case_lab::{App, Config};

/// Práctica de casos de estudio ISO 9001 con evaluación automática
#[derive(Debug, Parser)]
#[command(name = "iso-case-lab", version)]
struct Cli {
    /// Archivo de configuración TOML
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Mostrar logs detallados
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Genera un caso de estudio nuevo y lo guarda
    Generate,
    /// Guarda un caso de estudio propio
    SubmitCase {
        /// Archivo con el texto del caso
        #[arg(long, conflicts_with = "text", required_unless_present = "text")]
        file: Option<PathBuf>,
        /// Texto del caso
        #[arg(long)]
        text: Option<String>,
    },
    /// Muestra el caso guardado
    ShowCase,
    /// Compara tu resolución con la de la IA
    Resolve {
        /// Archivo con tu resolución
        #[arg(long)]
        answer: PathBuf,
        /// Exporta el informe paginado a esta ruta
        #[arg(long)]
        export: Option<PathBuf>,
        /// Muestra también la resolución de la IA
        #[arg(long)]
        show_ai: bool,
    },
    /// Autoevaluación con preguntas sobre el caso
    Quiz {
        /// Número de preguntas
        #[arg(long, default_value_t = DEFAULT_QUESTION_COUNT)]
        questions: usize,
        /// Archivo con una respuesta por línea (si no, se leen de la entrada estándar)
        #[arg(long)]
        answers: Option<PathBuf>,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Generate => "generate",
            Command::SubmitCase { .. } => "submit-case",
            Command::ShowCase => "show-case",
            Command::Resolve { .. } => "resolve",
            Command::Quiz { .. } => "quiz",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::load(cli.config.as_deref()).context("加载配置失败")?;

    // 初始化日志
    logging::init(cli.verbose || config.verbose_logging);
    logging::init_log_file(&config.session_log_file)
        .with_context(|| format!("无法写入会话日志 {}", config.session_log_file))?;

    let app = App::initialize(config)?;
    logging::log_startup(cli.command.name(), &app.config().model_name);

    match cli.command {
        Command::Generate => {
            let case = app.generate_case().await?;
            println!("{}", report::to_plain(&case.content));
        }
        Command::SubmitCase { file, text } => {
            let content = match (file, text) {
                (Some(path), _) => read_text(&path).await?,
                (None, Some(text)) => text,
                (None, None) => String::new(),
            };
            app.submit_case(&content).await?;
            println!("Caso guardado.");
        }
        Command::ShowCase => {
            let case = app.current_case().await?;
            let origin = if case.is_custom {
                "personalizado"
            } else {
                "generado por IA"
            };
            println!("Caso ({}):\n\n{}", origin, report::to_plain(&case.content));
        }
        Command::Resolve {
            answer,
            export,
            show_ai,
        } => {
            let user_resolution = read_text(&answer).await?;
            let mut flow = app.open_resolution().await?;

            let outcome = flow.run(user_resolution).await?;
            println!("{}", report::render_scores(outcome));

            if show_ai {
                println!(
                    "\nResolución de la IA:\n\n{}",
                    report::to_plain(flow.state().ai_resolution())
                );
            }

            if let Some(path) = export {
                let document = ReportDocument::from_session(flow.state(), PageLayout::default())?;
                document.write_to(&path).await?;
                println!("\nInforme exportado a {}", path.display());
            }
        }
        Command::Quiz { questions, answers } => {
            let mut flow = app.open_self_test(questions).await?;
            let question_set = flow.start().await?.clone();

            let provided = match answers {
                Some(path) => Some(
                    read_text(&path)
                        .await?
                        .lines()
                        .map(str::to_string)
                        .collect::<Vec<_>>(),
                ),
                None => None,
            };

            let mut stdin = BufReader::new(tokio::io::stdin()).lines();
            for (i, question) in question_set.questions.iter().enumerate() {
                println!("\n{}. {}", i + 1, question);
                let answer = match &provided {
                    Some(lines) => lines.get(i).cloned().unwrap_or_default(),
                    None => {
                        print!("> ");
                        std::io::stdout().flush().context("无法刷新标准输出")?;
                        stdin
                            .next_line()
                            .await
                            .context("读取回答失败")?
                            .unwrap_or_default()
                    }
                };
                flow.set_answer(i, answer)?;
            }

            let outcome = flow.grade().await?;
            println!("\n{}", report::render_grading(outcome));
        }
    }

    info!("✓ 完成");
    Ok(())
}

async fn read_text(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取文件 {}", path.display()))
}
