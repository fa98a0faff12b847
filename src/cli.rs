use crate::config::{self, AppConfig, Layout, Overrides};
use crate::identity::{IdentityProvider, LocalIdentity};
use crate::logging::{self, LogTarget};
use crate::model::{FormState, ImageAttachment, PlatformFormat, WorkflowEvent};
use crate::orchestrator::ContentWorkflow;
use crate::provider::{ContentProvider, GeminiClient, GeminiConfig, ProviderAdapter};
use crate::storage::JsonFileStore;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "threadcraft",
    version,
    about = "Write social media threads, captions and posts with a generative model"
)]
pub struct Cli {
    /// Platform format to generate
    #[arg(long, value_enum)]
    pub format: Option<PlatformFormat>,

    /// Topic or instructions for the generated content
    #[arg(long)]
    pub prompt: Option<String>,

    /// Image to describe (photo captions only)
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Run one submission and print JSON (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Run one submission and print a text summary (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Print the signed-in user's history and exit
    #[arg(long)]
    pub history: bool,

    /// Act as this user for this run
    #[arg(long, env = "THREADCRAFT_USER")]
    pub user: Option<String>,

    /// Sign in and remember the user for later runs
    #[arg(long, value_name = "ID")]
    pub sign_in: Option<String>,

    /// Forget the remembered user
    #[arg(long)]
    pub sign_out: bool,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model name
    #[arg(long)]
    pub model: Option<String>,

    /// Base URL of the generative language API
    #[arg(long)]
    pub base_url: Option<String>,

    /// HTTP timeout for one generation request (e.g. 60s)
    #[arg(long)]
    pub timeout: Option<humantime::Duration>,

    /// Directory for history, session and log files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Export the saved record as JSON
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Navigation skin of the interactive UI
    #[arg(long, value_enum)]
    pub layout: Option<Layout>,

    /// Print the documentation index, optionally filtered by a search term
    #[arg(long, value_name = "TERM", num_args = 0..=1, default_missing_value = "")]
    pub docs: Option<String>,

    /// Print the landing page: headline and feature overview
    #[arg(long)]
    pub home: bool,

    /// Print pricing plans
    #[arg(long)]
    pub pricing: bool,

    /// Print frequently asked questions
    #[arg(long)]
    pub faq: bool,
}

impl Cli {
    fn is_site_page(&self) -> bool {
        self.home || self.docs.is_some() || self.pricing || self.faq
    }

    fn is_account_action(&self) -> bool {
        self.sign_in.is_some() || self.sign_out
    }

    /// True when no one-shot mode was requested.
    fn is_interactive(&self) -> bool {
        !(self.json
            || self.text
            || self.history
            || self.prompt.is_some()
            || self.is_site_page()
            || self.is_account_action())
    }

    fn overrides(&self) -> Overrides {
        Overrides {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout: self.timeout.map(Duration::from),
            user: self.user.clone(),
            data_dir: self.data_dir.clone(),
            layout: self.layout,
        }
    }

    /// Initial form built from `--format`, `--prompt` and `--image`.
    fn form(&self) -> Result<FormState> {
        let image = self
            .image
            .as_deref()
            .map(ImageAttachment::from_path)
            .transpose()?;
        Ok(FormState {
            format: self.format.unwrap_or_default(),
            prompt: self.prompt.clone().unwrap_or_default(),
            image,
        })
    }
}

pub async fn run(args: Cli) -> Result<ExitCode> {
    let file = config::load(args.config.as_deref())?;
    let cfg = AppConfig::merge(args.overrides(), file);

    let interactive = args.is_interactive() && cfg!(feature = "tui");
    let log_path = cfg.log_path();
    let target = if interactive {
        LogTarget::File(&log_path)
    } else {
        LogTarget::Stderr
    };
    logging::init(&cfg.log_level, target)?;
    tracing::debug!(data_dir = %cfg.data_dir.display(), model = %cfg.model, "configuration loaded");

    if args.is_site_page() {
        print_site_pages(&args).await;
        return Ok(ExitCode::SUCCESS);
    }

    let identity = Arc::new(LocalIdentity::load(Some(cfg.session_path()), cfg.user.clone()));

    if args.is_account_action() {
        return run_account_action(&args, identity.as_ref()).await;
    }

    let workflow = build_workflow(&cfg, identity)?;

    if args.history {
        return run_history(&args, &workflow).await;
    }

    if !interactive {
        return run_once(&args, &workflow).await;
    }

    run_interactive(&args, workflow, cfg).await
}

#[cfg(feature = "tui")]
async fn run_interactive(args: &Cli, workflow: ContentWorkflow, cfg: AppConfig) -> Result<ExitCode> {
    crate::tui::run(workflow, cfg, args.form()?).await?;
    Ok(ExitCode::SUCCESS)
}

/// Fallback when built without TUI support.
#[cfg(not(feature = "tui"))]
async fn run_interactive(args: &Cli, workflow: ContentWorkflow, _cfg: AppConfig) -> Result<ExitCode> {
    run_once(args, &workflow).await
}

/// Wire the workflow to its capabilities. Generation stays disabled without an API key.
pub fn build_workflow(
    cfg: &AppConfig,
    identity: Arc<dyn IdentityProvider>,
) -> Result<ContentWorkflow> {
    let provider: Option<Arc<dyn ContentProvider>> = match cfg.api_key.as_deref() {
        Some(key) => {
            let client = GeminiClient::new(GeminiConfig {
                api_key: key.to_string(),
                model: cfg.model.clone(),
                base_url: cfg.base_url.clone(),
                timeout: cfg.timeout,
                user_agent: format!("threadcraft/{}", env!("CARGO_PKG_VERSION")),
            })?;
            Some(Arc::new(client) as Arc<dyn ContentProvider>)
        }
        None => None,
    };
    let store = Arc::new(JsonFileStore::new(&cfg.data_dir));
    Ok(ContentWorkflow::new(
        ProviderAdapter::new(provider),
        store,
        identity,
    ))
}

/// Requested site pages, in a fixed order.
fn site_pages(args: &Cli) -> Vec<Vec<String>> {
    let mut pages = Vec::new();
    if args.home {
        pages.push(crate::site::home_lines());
    }
    if let Some(term) = args.docs.as_deref() {
        pages.push(crate::site::docs_lines(term));
    }
    if args.pricing {
        pages.push(crate::site::pricing_lines());
    }
    if args.faq {
        pages.push(crate::site::faq_lines());
    }
    pages
}

async fn print_site_pages(args: &Cli) {
    let (out_tx, out_handle) = spawn_output_writer();
    for (i, page) in site_pages(args).into_iter().enumerate() {
        if i > 0 {
            let _ = out_tx.send(OutputLine::Stdout(String::new()));
        }
        for line in page {
            let _ = out_tx.send(OutputLine::Stdout(line));
        }
    }
    drop(out_tx);
    let _ = out_handle.await;
}

async fn run_account_action(args: &Cli, identity: &dyn IdentityProvider) -> Result<ExitCode> {
    let (out_tx, out_handle) = spawn_output_writer();
    if args.sign_out {
        identity.sign_out()?;
        let _ = out_tx.send(OutputLine::Stderr("Signed out".into()));
    }
    if let Some(id) = args.sign_in.as_deref() {
        let user = identity.sign_in(id)?;
        let _ = out_tx.send(OutputLine::Stderr(format!(
            "Signed in as {}",
            user.authenticated_id().unwrap_or(id)
        )));
    }
    drop(out_tx);
    let _ = out_handle.await;
    Ok(ExitCode::SUCCESS)
}

async fn run_history(args: &Cli, workflow: &ContentWorkflow) -> Result<ExitCode> {
    if workflow.identity.current_user().authenticated_id().is_none() {
        anyhow::bail!("not signed in: use --sign-in <ID> or --user <ID>");
    }
    let history = workflow.load_history().await?;
    let (out_tx, out_handle) = spawn_output_writer();
    if args.json {
        let out = serde_json::to_string_pretty(&history)?;
        let _ = out_tx.send(OutputLine::Stdout(out));
    } else {
        for line in crate::text_summary::build_history_summary(&history).lines {
            let _ = out_tx.send(OutputLine::Stdout(line));
        }
    }
    drop(out_tx);
    let _ = out_handle.await;
    Ok(ExitCode::SUCCESS)
}

/// Run a single submission, print it and report failure through the exit code.
async fn run_once(args: &Cli, workflow: &ContentWorkflow) -> Result<ExitCode> {
    let form = args.form()?;
    let (out_tx, out_handle) = spawn_output_writer();
    let (evt_tx, mut evt_rx) = mpsc::unbounded_channel::<WorkflowEvent>();

    let wf = workflow.clone();
    let handle = tokio::spawn(async move { wf.submit(&form, &evt_tx).await });

    while let Some(ev) = evt_rx.recv().await {
        if args.json {
            continue;
        }
        match ev {
            WorkflowEvent::PhaseChanged(phase) if phase.is_busy() => {
                let _ = out_tx.send(OutputLine::Stderr(format!("== {phase:?} ==")));
            }
            WorkflowEvent::Info(msg) => {
                let _ = out_tx.send(OutputLine::Stderr(msg));
            }
            _ => {}
        }
    }

    let outcome = handle.await.context("submission task failed")?;

    if let Some(p) = args.export_json.as_deref() {
        match outcome.record.as_ref() {
            Some(record) => {
                crate::storage::export_json(p, record)?;
                let _ = out_tx.send(OutputLine::Stderr(format!("Exported: {}", p.display())));
            }
            None => {
                let _ = out_tx.send(OutputLine::Stderr(
                    "Nothing exported: no record was saved".into(),
                ));
            }
        }
    }

    if args.json {
        let out = serde_json::to_string_pretty(&outcome)?;
        let _ = out_tx.send(OutputLine::Stdout(out));
    } else {
        for line in crate::text_summary::build_text_summary(&outcome).lines {
            let _ = out_tx.send(OutputLine::Stdout(line));
        }
    }
    drop(out_tx);
    let _ = out_handle.await;

    Ok(if outcome.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
