use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pdfsift_core::{Dispatcher, Method, OutputFormat, render};
use pdfsift_fast::FastBackend;
use pdfsift_ocr::{OcrBackend, OcrConfig, check_tools};
use pdfsift_textlayer::TextLayerBackend;

mod output;

use output::ColorMode;

/// PDF İçerik Çıkarma - extract text, tables, and images from PDF files
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract content from a PDF file and render it
    Extract {
        /// Path to the PDF file
        file_path: PathBuf,

        /// Extraction method: textlayer, ocr, or fast
        #[arg(short, long, default_value = "textlayer")]
        method: Method,

        /// Output format: markdown or json
        #[arg(short, long, default_value = "markdown")]
        format: OutputFormat,

        /// Write the rendered output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored status output
        #[arg(long)]
        no_color: bool,
    },

    /// Report availability of the external tools the OCR backend needs
    Tools {
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Extract {
            file_path,
            method,
            format,
            output,
            no_color,
        } => extract(file_path, method, format, output, no_color),
        Command::Tools { no_color } => {
            let color = ColorMode(!no_color);
            output::print_tools(&check_tools(&OcrConfig::from_env()), color);
            Ok(())
        }
    }
}

fn build_dispatcher() -> Dispatcher {
    Dispatcher::new(
        Box::new(TextLayerBackend::new()),
        Box::new(OcrBackend::from_env()),
        Box::new(FastBackend::new()),
    )
}

fn extract(
    file_path: PathBuf,
    method: Method,
    format: OutputFormat,
    output: Option<PathBuf>,
    no_color: bool,
) -> anyhow::Result<()> {
    let color = ColorMode(!no_color);

    let pdf = std::fs::read(&file_path)?;
    output::print_processing(&file_path.display().to_string(), method, color);

    let dispatcher = build_dispatcher();
    let result = match dispatcher.process(method, &pdf) {
        Ok(result) => result,
        Err(e) => {
            output::print_error(&e, color);
            std::process::exit(1);
        }
    };

    let rendered = render(&result, format)?;
    match output {
        Some(path) => std::fs::write(&path, rendered)?,
        None => println!("{rendered}"),
    }
    output::print_success(color);
    Ok(())
}
