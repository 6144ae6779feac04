//! chanlog - Entry Point

use chanlog::config::{self, ResolvedConfig};
use chanlog::logging::{self, LogTarget};
use chanlog::model::{AppError, DateId};
use chanlog::render::{render_plaintext, RenderedView};
use chanlog::source::HttpBackend;
use chanlog::view::{Applied, HtmlDocument, ViewController};
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

/// chanlog - view archived chat logs served by a log server
#[derive(Parser, Debug)]
#[command(name = "chanlog")]
#[command(version)]
#[command(about = "Render archived chat logs from a log server as HTML or plain text")]
pub struct Args {
    /// Location to open: `/`, `/latest`, `/2023-10-20#103`, `/search?q=...`
    #[arg(default_value = "/")]
    pub location: String,

    /// Base URL of the log server
    #[arg(short, long)]
    pub backend: Option<String>,

    /// Viewport width in pixels (controls collapse below the configured width)
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Path to log file for tracing output
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Send tracing output to stderr instead of the log file
    #[arg(long)]
    pub log_stderr: bool,

    /// Read navigation commands from stdin after the first load
    #[arg(short, long)]
    pub interactive: bool,
}

/// What `show` and the final print produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Full HTML page.
    Html,
    /// `[time] <author> body` transcript.
    Text,
}

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Next,
    Previous,
    Jump(DateId),
    Latest,
    Search(String),
    Collapse,
    Resize(u32),
    Show,
    Help,
    Quit,
}

const HELP: &str = "commands: next | prev | jump DATE | latest | search QUERY | collapse | resize WIDTH | show | quit";

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "next" | "n" => Ok(Command::Next),
        "prev" | "previous" | "p" => Ok(Command::Previous),
        "jump" | "j" => DateId::new(rest)
            .map(Command::Jump)
            .map_err(|e| format!("jump: {e}")),
        "latest" => Ok(Command::Latest),
        "search" | "/" => Ok(Command::Search(rest.to_string())),
        "collapse" | "c" => Ok(Command::Collapse),
        "resize" => rest
            .parse()
            .map(Command::Resize)
            .map_err(|_| format!("resize: expected a width in pixels, got {rest:?}")),
        "show" | "s" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("unknown command {other:?}; {HELP}")),
    }
}

fn resolve_config(args: &Args) -> Result<ResolvedConfig, AppError> {
    // Defaults → Config File → Env Vars → CLI Args
    let config_file = config::load_config_with_precedence(args.config.clone())?;
    let merged = config::merge_config(config_file)?;
    let with_env = config::apply_env_overrides(merged);
    Ok(config::apply_cli_overrides(
        with_env,
        args.backend.clone(),
        args.log_file.clone(),
    ))
}

type Controller = ViewController<HttpBackend, HtmlDocument>;

fn render_output(controller: &Controller, format: OutputFormat) -> String {
    match format {
        OutputFormat::Html => controller.target().to_html(),
        OutputFormat::Text => match (controller.rendered(), controller.log_view()) {
            (Some(RenderedView::Placeholder { message }), _) => format!("{message}\n"),
            (_, Some(view)) => render_plaintext(view),
            _ => String::new(),
        },
    }
}

fn status_line(controller: &Controller, applied: &Applied) -> String {
    let shown = controller.target().location().to_string();
    let count = controller.rendered().map_or(0, RenderedView::message_count);
    let label = controller
        .target()
        .date()
        .map(|d| d.label.clone())
        .unwrap_or_default();

    match applied {
        Applied::Painted => format!("{shown}  {label}  ({count} messages)"),
        Applied::Failed(e) => format!("! {e}"),
        Applied::Stale => "(superseded)".to_string(),
        Applied::NotStarted => controller
            .notices()
            .active()
            .last()
            .map(|n| format!("! {}", n.message))
            .unwrap_or_default(),
    }
}

async fn interactive(controller: &mut Controller, format: OutputFormat) -> Result<(), AppError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    while let Some(line) = lines.next_line().await? {
        controller.tick(Instant::now());
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(stdout, "{message}")?;
                continue;
            }
        };

        let applied = match command {
            Command::Next => controller.next().await,
            Command::Previous => controller.previous().await,
            Command::Jump(date) => controller.jump(&date).await,
            Command::Latest => controller.show_latest().await,
            Command::Search(query) => controller.search(&query).await,
            Command::Collapse => {
                if !controller.toggle_collapse() {
                    writeln!(stdout, "controls only collapse in a narrow viewport")?;
                }
                continue;
            }
            Command::Resize(width) => {
                controller.resize(width);
                continue;
            }
            Command::Show => {
                write!(stdout, "{}", render_output(controller, format))?;
                continue;
            }
            Command::Help => {
                writeln!(stdout, "{HELP}")?;
                continue;
            }
            Command::Quit => break,
        };

        writeln!(stdout, "{}", status_line(controller, &applied))?;
    }

    Ok(())
}

async fn run(args: Args, config: ResolvedConfig) -> Result<(), AppError> {
    let backend = HttpBackend::new(&config.backend_url, config.request_timeout)?;
    let mut controller = ViewController::new(backend, HtmlDocument::new(), config.controller_options());

    if let Some(width) = args.width {
        controller.resize(width);
    }

    let applied = controller.load(&args.location).await;

    if args.interactive {
        println!("{}", status_line(&controller, &applied));
        return interactive(&mut controller, args.format).await;
    }

    print!("{}", render_output(&controller, args.format));
    match applied {
        Applied::Failed(e) => Err(e.into()),
        _ => Ok(()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    let log_target = if args.log_stderr {
        LogTarget::Stderr
    } else {
        LogTarget::File(config.log_file_path.clone())
    };
    logging::init(&log_target)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(args, config))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_does_not_error() {
        let err = Args::try_parse_from(["chanlog", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let err = Args::try_parse_from(["chanlog", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["chanlog"]);
        assert_eq!(args.location, "/");
        assert_eq!(args.backend, None);
        assert_eq!(args.width, None);
        assert_eq!(args.format, OutputFormat::Html);
        assert!(!args.interactive);
        assert!(!args.log_stderr);
    }

    #[test]
    fn test_location_and_flags() {
        let args = Args::parse_from([
            "chanlog",
            "/2023-10-20#103",
            "--backend",
            "http://logs.local",
            "--width",
            "640",
            "--format",
            "text",
            "-i",
        ]);
        assert_eq!(args.location, "/2023-10-20#103");
        assert_eq!(args.backend.as_deref(), Some("http://logs.local"));
        assert_eq!(args.width, Some(640));
        assert_eq!(args.format, OutputFormat::Text);
        assert!(args.interactive);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Args::try_parse_from(["chanlog", "--format", "pdf"]).is_err());
    }

    #[test]
    fn parse_command_covers_navigation() {
        assert_eq!(parse_command("next"), Ok(Command::Next));
        assert_eq!(parse_command(" prev "), Ok(Command::Previous));
        assert_eq!(parse_command("latest"), Ok(Command::Latest));
        assert_eq!(
            parse_command("jump 2023-10-20"),
            Ok(Command::Jump(DateId::new("2023-10-20").expect("valid")))
        );
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
    }

    #[test]
    fn parse_command_keeps_search_text() {
        assert_eq!(
            parse_command("search  hello world "),
            Ok(Command::Search("hello world".into()))
        );
        assert_eq!(parse_command("search"), Ok(Command::Search(String::new())));
    }

    #[test]
    fn parse_command_rejects_bad_arguments() {
        assert!(parse_command("jump").is_err());
        assert!(parse_command("resize wide").is_err());
        assert_eq!(parse_command("resize 700"), Ok(Command::Resize(700)));
        assert!(parse_command("dance").is_err());
    }
}
