//! One-shot command-line front end.
//!
//! Runs the same extraction and inference path as the HTTP server against a local file:
//! `extract` prints the document text, `summarize` prints (and optionally saves) the summary,
//! and `ask` prints the answer to a single question.
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pdf_assistant::{
    assistant::{Completion, DocumentAssistant},
    config::Config,
    extraction::{PdfBackendKind, TextExtractor},
    inference::HttpCompletionClient,
    logging,
    metrics::AssistantMetrics,
    service::UNREADABLE_PDF_WARNING,
};

#[derive(Parser)]
#[command(
    name = "pdf-assistant-cli",
    about = "Summarize a PDF or ask questions about it from the terminal"
)]
struct Cli {
    /// PDF library used for extraction (`lopdf` or `pdf-extract`); overrides PDF_BACKEND.
    #[arg(long, global = true)]
    backend: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the text extracted from a PDF.
    Extract {
        #[arg(long)]
        pdf: PathBuf,
    },
    /// Summarize a PDF as five bullet points.
    Summarize {
        #[arg(long)]
        pdf: PathBuf,
        /// Also write the summary to this file.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Answer a question using only the PDF's text.
    Ask {
        #[arg(long)]
        pdf: PathBuf,
        #[arg(long)]
        question: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init_cli_tracing();
    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;
    let backend = match cli.backend.as_deref() {
        Some(name) => name
            .parse::<PdfBackendKind>()
            .map_err(|()| anyhow::anyhow!("unknown PDF backend '{name}'"))?,
        None => config.pdf_backend,
    };
    let extractor = TextExtractor::for_kind(backend);

    match cli.command {
        Command::Extract { pdf } => {
            println!("{}", extract(&extractor, &pdf)?);
        }
        Command::Summarize { pdf, output } => {
            let text = extract(&extractor, &pdf)?;
            let summary = into_text(assistant(&config).summarize(&text).await)?;
            println!("{summary}");
            if let Some(path) = output {
                fs::write(&path, &summary)
                    .with_context(|| format!("failed to write summary to {}", path.display()))?;
            }
        }
        Command::Ask { pdf, question } => {
            if question.trim().is_empty() {
                bail!("Please enter a question.");
            }
            let text = extract(&extractor, &pdf)?;
            let completion = assistant(&config).answer_question(&text, &question).await?;
            if let Some(message) = completion.error_message() {
                eprintln!("{message}");
            }
            println!("{}", completion.text());
        }
    }
    Ok(())
}

fn extract(extractor: &TextExtractor, path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let extraction = extractor.extract(&bytes);
    if extraction.is_empty() {
        match extraction.error {
            Some(error) => bail!("{UNREADABLE_PDF_WARNING} Error reading the PDF: {error}"),
            None => bail!("{UNREADABLE_PDF_WARNING}"),
        }
    }
    Ok(extraction.text)
}

fn assistant(config: &Config) -> DocumentAssistant {
    let client = HttpCompletionClient::new(config.inference_settings());
    DocumentAssistant::new(Arc::new(client), Arc::new(AssistantMetrics::new()))
}

fn into_text(completion: Completion) -> Result<String> {
    match completion {
        Completion::Reply { text } => Ok(text),
        Completion::Failed { message, .. } => bail!(message),
    }
}
