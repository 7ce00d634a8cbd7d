//! Command runners: logger init, live requests, offline rebuilds, preview, config.

use std::error::Error;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

use clap::CommandFactory;

use crate::cli::{self, Args, Commands};
use crate::core::config::{self, Config};
use crate::core::pipeline::{self, Assistant, Outcome, RequestParams};
use crate::core::render::{ApplyOutcome, MemoryDocument};
use crate::core::session::Session;
use crate::core::stream::{ScriptedTransport, StreamEvent, TERMINATOR, TERMINATOR_CLOSE};
use crate::core::text::display_text;
use crate::core::trigger::{RequestKind, Trigger, detect_trigger};
use crate::core::{app, paths};
use crate::preview;

type RunResult = Result<(), Box<dyn Error>>;

/// Initialize env_logger. While an answer streams to the terminal, logs go to a file so
/// they do not interleave with the live text.
pub fn init_logger(args: &Args) {
    let log_level = args.log_level();
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level));

    if args.streams_to_terminal() {
        if let Some(path) = paths::log_file()
            && let Some(dir) = path.parent()
            && fs::create_dir_all(dir).is_ok()
            && let Ok(file) = fs::OpenOptions::new().create(true).append(true).open(&path)
        {
            logger.target(env_logger::Target::Pipe(Box::new(file)));
        }
    }
    let _ = logger.try_init();
}

/// Run the parsed command.
pub async fn dispatch(args: Args) -> RunResult {
    match args.command {
        Commands::Ask {
            kind,
            prompt,
            file,
            json,
            no_stream,
        } => {
            let config = config::load()?;
            let request = AskRequest {
                kind,
                prompt,
                file: file.as_deref(),
                json,
                stream: !no_stream,
            };
            run_ask(config, request).await
        }
        Commands::Format { file, json } => run_format(file.as_deref(), json).await,
        Commands::Replay { file, json } => run_replay(&file, json).await,
        Commands::Preview { file, width, plain } => run_preview(file.as_deref(), width, plain),
        Commands::Config => run_config(),
        Commands::Completions { shell } => {
            cli::generate(shell, &mut Args::command(), app::NAME, &mut io::stdout());
            Ok(())
        }
    }
}

/// Read a file, or stdin when the path is absent or `-`.
fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => fs::read_to_string(p),
        _ => io::read_to_string(io::stdin()),
    }
}

fn print_document(doc: &MemoryDocument, json: bool) -> RunResult {
    if json {
        println!("{}", serde_json::to_string_pretty(doc.paragraphs())?);
    } else {
        println!("{}", doc.to_text());
    }
    Ok(())
}

fn report_outcome(outcome: &Outcome) {
    log::info!(
        "Answer: {} chars in {} blocks",
        outcome.final_text.len(),
        outcome.blocks.len()
    );
    match outcome.applied {
        Some(ApplyOutcome::Applied { ops, fallbacks }) => {
            log::info!("Applied {} ops ({} plain-text fallbacks)", ops, fallbacks);
        }
        Some(ApplyOutcome::Superseded) => {
            eprintln!("Request was superseded; document unchanged");
        }
        None => eprintln!("Answer was empty; document unchanged"),
    }
}

/// Displayable form of a raw buffer that later chunks can only extend. A trailing
/// backslash or a partial terminator is held back until the next chunk resolves it.
fn settled_display(raw: &str) -> String {
    let mut end = raw.len();
    if let Some(idx) = raw.rfind('<')
        && (TERMINATOR.starts_with(&raw[idx..]) || TERMINATOR_CLOSE.starts_with(&raw[idx..]))
    {
        end = idx;
    }
    let raw = &raw[..end];
    display_text(raw.strip_suffix('\\').unwrap_or(raw))
}

/// Writes the growing answer to stderr as it streams.
#[derive(Default)]
struct LivePreview {
    shown: String,
}

impl LivePreview {
    /// Text to write for the new buffer state, if any. When the displayable text no
    /// longer extends what was shown, the whole text is redrawn on a fresh line.
    fn advance(&mut self, raw: &str) -> Option<String> {
        let text = settled_display(raw);
        let out = match text.strip_prefix(self.shown.as_str()) {
            Some("") => return None,
            Some(delta) => delta.to_string(),
            None => {
                log::debug!("Preview rewrote already shown text; redrawing");
                format!("\n{}", text)
            }
        };
        self.shown = text;
        Some(out)
    }

    fn update(&mut self, raw: &str) {
        if let Some(out) = self.advance(raw) {
            let mut err = io::stderr();
            let _ = err.write_all(out.as_bytes());
            let _ = err.flush();
        }
    }

    fn finish(&self) {
        if !self.shown.is_empty() {
            eprintln!();
        }
    }
}

struct AskRequest<'a> {
    kind: RequestKind,
    prompt: Option<String>,
    file: Option<&'a Path>,
    json: bool,
    stream: bool,
}

/// Pick the request text: an explicit prompt acts as the selection, otherwise free-text
/// requests look for an `/ai` command in the document.
fn resolve_trigger(
    kind: RequestKind,
    prompt: Option<&str>,
    document: &str,
) -> Result<Trigger, Box<dyn Error>> {
    let trigger = match (kind, prompt) {
        (RequestKind::ProcessText, None) => detect_trigger(document)
            .ok_or("no /ai command found in the document; pass --prompt")?,
        (kind, selection) => Trigger::for_kind(kind, selection.unwrap_or(""), document),
    };
    if trigger.text.is_empty() {
        return Err("nothing to send: document and prompt are empty".into());
    }
    Ok(trigger)
}

/// Run the `ask` command against the live service.
async fn run_ask(config: Config, request: AskRequest<'_>) -> RunResult {
    config.token()?;

    let document = match request.file {
        Some(path) => read_input(Some(path))?,
        None => String::new(),
    };
    let prompt = match request.prompt.as_deref() {
        Some("-") => Some(io::read_to_string(io::stdin())?),
        other => other.map(str::to_string),
    };
    let trigger = resolve_trigger(request.kind, prompt.as_deref(), &document)?;
    log::info!(
        "Sending {} request ({} chars)",
        trigger.kind,
        trigger.text.len()
    );

    let mut doc = MemoryDocument::with_text(document.lines());
    let mut assistant = Assistant::new(config);
    let mut live = LivePreview::default();
    let stream = request.stream;
    let result = assistant
        .ask(&mut doc, trigger.kind, &trigger.text, |event| match event {
            StreamEvent::Opened => log::info!("Connected; request sent"),
            StreamEvent::Preview { raw, .. } if stream => live.update(raw),
            StreamEvent::Preview { .. } => {}
        })
        .await;
    live.finish();

    let outcome = result?;
    report_outcome(&outcome);
    print_document(&doc, request.json)
}

/// Drive a scripted transport through the full pipeline into a fresh document.
async fn rebuild(
    transport: &mut ScriptedTransport,
) -> Result<(Outcome, MemoryDocument), Box<dyn Error>> {
    let config = config::load()?;
    let mut session = Session::new();
    let ticket = session.begin_request();
    let mut doc = MemoryDocument::new();
    let params = RequestParams {
        kind: RequestKind::ProcessText,
        content: "",
        settings: &config.request,
        timeout: config.timeout,
    };
    let outcome = pipeline::process(&ticket, transport, &mut doc, params, |event| {
        if let StreamEvent::Preview { text, .. } = event {
            log::debug!("Preview: {} chars", text.len());
        }
    })
    .await?;
    log::debug!(
        "Scripted transport sent {} payload(s), closed: {}",
        transport.sent().len(),
        transport.is_closed()
    );
    Ok((outcome, doc))
}

/// Run the `format` command: one recorded raw answer, treated as a single chunk.
async fn run_format(file: Option<&Path>, json: bool) -> RunResult {
    let raw = read_input(file)?;
    let mut transport = ScriptedTransport::from_chunks([raw]);
    let (outcome, doc) = rebuild(&mut transport).await?;
    report_outcome(&outcome);
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.ops)?);
        Ok(())
    } else {
        print_document(&doc, false)
    }
}

/// Run the `replay` command: a JSON array of transport events.
async fn run_replay(file: &Path, json: bool) -> RunResult {
    let script = fs::read_to_string(file)?;
    let mut transport = ScriptedTransport::from_json(&script)?;
    let (outcome, doc) = rebuild(&mut transport).await?;
    report_outcome(&outcome);
    print_document(&doc, json)
}

/// Run the `preview` command.
fn run_preview(file: Option<&Path>, width: usize, plain: bool) -> RunResult {
    let raw = read_input(file)?;
    if plain {
        println!("{}", preview::to_plain_text(&display_text(&raw)));
        return Ok(());
    }
    if !preview::has_markdown(&display_text(&raw)) {
        log::info!("No markdown markup found; showing text as-is");
    }
    let lines = preview::render_preview(&raw, width);
    let mut out = io::stdout();
    if out.is_terminal() {
        out.write_all(preview::to_ansi(&lines).as_bytes())?;
    } else {
        for line in &lines {
            writeln!(out, "{}", line)?;
        }
    }
    Ok(())
}

/// Run the `config` command: effective settings with the token redacted.
fn run_config() -> RunResult {
    let config = config::load()?;
    let log_file = paths::log_file()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string());
    let token = if config.has_token() {
        "set \u{2713}"
    } else {
        "not set"
    };

    println!("Version:      {} {}", app::NAME, app::VERSION);
    println!("Service:      {}", config.ws_url);
    println!("Token:        {}", token);
    println!("Model:        {}", config.request.model_name);
    println!("Persona:      {}", config.request.persona);
    println!("Temperature:  {}", config.request.temperature);
    println!("Top K:        {}", config.request.top_k);
    println!("App ID:       {}", config.request.app_id);
    println!("Timeout:      {}s", config.timeout.as_secs());
    println!("Log file:     {}", log_file);
    Ok(())
}
