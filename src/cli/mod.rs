//! CLI command implementations for folio.
//!
//! Provides subcommand handlers for:
//! - `folio shell`: interactive simulated terminal
//! - `folio stats`: judge + source-host stats card
//! - `folio ask "question"` / `folio chat`: portfolio assistant
//! - `folio projects` / `folio experience`: catalog listings
//! - `folio events`: recent entries from the event log
//! - `folio health`: config, credential and log status
//! - `folio serve`: local JSON API
//! - `folio config show|init|set|reset`: configuration management

use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use colored::Colorize;

use crate::analytics::{Event, EventLog, Source};
use crate::assistant::{self, AssistantSession, GeminiClient, GenerativeModel, Role};
use crate::catalog::{Catalog, Project};
use crate::config::{self, FolioConfig};
use crate::stats::{CancelToken, Difficulty, StatsAggregator, StatsViewModel};
use crate::terminal::{self, CommandTable, SideEffect, Transcript};
use crate::web::{self, AppState};

/// Output format for data commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

const SHELL_PROMPT: &str = "guest@folio:~$ ";

/// ANSI sequence: clear screen and home the cursor.
const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

// ---------------------------------------------------------------------------
// folio shell
// ---------------------------------------------------------------------------

/// Run the simulated terminal on stdin/stdout until EOF or `exit`.
pub fn run_shell(config: &FolioConfig, catalog: &Catalog) -> Result<()> {
    let table = CommandTable::builtin(catalog);
    let events = EventLog::from_config(config);

    let stdin = io::stdin();
    let stdout = io::stdout();
    shell_loop(stdin.lock(), stdout.lock(), &table, &events)?;
    Ok(())
}

/// Drive [`terminal::evaluate`] from a line reader.
///
/// The loop owns the transcript and is its only writer. `exit` and `quit`
/// end the session; they are shell controls, not table commands. Returns the
/// final transcript.
pub fn shell_loop<R: BufRead, W: Write>(
    mut reader: R,
    mut out: W,
    table: &CommandTable,
    events: &EventLog,
) -> Result<Transcript> {
    let mut transcript = Transcript::welcome(terminal::WELCOME_BANNER);
    writeln!(out, "{}", terminal::WELCOME_BANNER.bold())?;

    loop {
        write!(out, "{}", SHELL_PROMPT.green())?;
        out.flush()?;

        let mut line = String::new();
        if reader
            .read_line(&mut line)
            .context("failed reading from stdin")?
            == 0
        {
            writeln!(out)?;
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);

        if matches!(terminal::normalize(line).as_str(), "exit" | "quit") {
            break;
        }

        let evaluation = terminal::evaluate(line, table, transcript);
        match evaluation.effect {
            SideEffect::Clear => {
                write!(out, "{CLEAR_SCREEN}")?;
                events.record(&Event::new(Source::Terminal, "clear"));
            }
            SideEffect::None => {
                if let Some(reply) = evaluation.reply() {
                    let command = terminal::normalize(line);
                    if table.get(&command).is_none() {
                        writeln!(out, "{}", reply.red())?;
                        events.record(&Event::new(Source::Terminal, "not_found").detail(command));
                    } else {
                        writeln!(out, "{reply}")?;
                        events.record(&Event::new(Source::Terminal, "ok").detail(command));
                    }
                }
            }
        }
        transcript = evaluation.transcript;
    }

    Ok(transcript)
}

// ---------------------------------------------------------------------------
// folio stats
// ---------------------------------------------------------------------------

/// Load and print the stats card.
///
/// A failed load is not an error for the CLI: it prints a single notice and
/// exits cleanly, matching the "render nothing" policy.
pub fn run_stats(
    config: &FolioConfig,
    format: OutputFormat,
    deadline_ms: Option<u64>,
) -> Result<()> {
    let aggregator = StatsAggregator::from_config(config);
    let cancel = match deadline_ms {
        Some(ms) => CancelToken::with_deadline(Instant::now() + Duration::from_millis(ms)),
        None => CancelToken::new(),
    };

    eprintln!(
        "{}",
        format!("Loading stats ({} sources)...", aggregator.endpoint_count()).dimmed()
    );

    let vm = match aggregator.load(&cancel) {
        Ok(vm) => vm,
        Err(e) => {
            eprintln!("{} {}", "Stats unavailable.".yellow(), e.to_string().dimmed());
            return Ok(());
        }
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&vm)?),
        OutputFormat::Table => print_stats_table(&vm, aggregator.capacity()),
    }

    Ok(())
}

fn print_stats_table(vm: &StatsViewModel, capacity: u32) {
    let profile = &vm.profile;

    println!("{}", "Coding Stats".bold().cyan());
    println!("{}", "=".repeat(60));
    println!(
        "  {} {} ({})",
        "Profile:    ".bold(),
        profile.display_name,
        profile.username.dimmed()
    );
    println!(
        "  {} ~{}K",
        "Global rank:".bold(),
        format_number(vm.rank_thousands())
    );
    println!(
        "  {} {} ({}% of {})",
        "Solved:     ".bold(),
        format_number(profile.total_solved),
        vm.capacity_pct(capacity),
        format_number(u64::from(capacity))
    );
    println!(
        "  {} {}",
        "Authored:   ".bold(),
        format_number(profile.authored)
    );
    println!();

    println!("{}", "Difficulty Mastery".bold().cyan());
    for difficulty in Difficulty::ALL {
        let tier = profile.solved.tier(difficulty);
        let share = vm.difficulty_share(difficulty);
        println!(
            "  {:<8} {:>5}  {} {:>5.1}%",
            colorize_difficulty(difficulty),
            tier.solved,
            bar(share, 24),
            share
        );
    }
    println!();

    println!("{}", "Efficiency (accepted / submissions)".bold().cyan());
    for difficulty in Difficulty::ALL {
        let tier = profile.solved.tier(difficulty);
        println!(
            "  {:<8} {:>5} / {:<6} {:>5.1}%",
            difficulty.to_string(),
            tier.solved,
            tier.submissions,
            vm.acceptance_rate(difficulty)
        );
    }
    println!();

    println!("{}", "Daily Challenge".bold().cyan());
    println!(
        "  [{}] #{} {}",
        colorize_difficulty(vm.daily.difficulty),
        vm.daily.id,
        vm.daily.title.bold()
    );
    println!("  {}", vm.daily.link.dimmed());

    if let Some(summary) = &vm.source_host {
        println!();
        println!("{}", "Language Breakdown".bold().cyan());
        for lang in &summary.languages {
            let share = summary.language_share(lang);
            println!(
                "  {:<14} {:>4}  {} {:>5.1}%",
                truncate(&lang.language, 14),
                lang.repos,
                bar(share, 24),
                share
            );
        }
        println!(
            "  {} {} repos, {} stars",
            "Total:".bold(),
            format_number(summary.total_repos),
            format_number(summary.total_stars)
        );
    }
}

// ---------------------------------------------------------------------------
// folio ask / folio chat
// ---------------------------------------------------------------------------

fn assistant_parts(config: &FolioConfig, catalog: &Catalog) -> (AssistantSession, GeminiClient) {
    let system = assistant::build_system_instruction(catalog, &config.identity);
    let session = AssistantSession::new(system, EventLog::from_config(config));
    let client = GeminiClient::from_config(config, config::api_key());
    (session, client)
}

/// Ask a single question and print the reply.
pub fn run_ask(config: &FolioConfig, catalog: &Catalog, question: &str) -> Result<()> {
    let (mut session, client) = assistant_parts(config, catalog);
    if !client.has_credential() {
        eprintln!(
            "{}",
            "No API key found (set FOLIO_API_KEY or GEMINI_API_KEY).".yellow()
        );
    }

    match session.send(question, &client) {
        Some(reply) => println!("{reply}"),
        None => eprintln!("{}", "Nothing to ask.".dimmed()),
    }
    Ok(())
}

/// Interactive assistant session. `/reset` wipes memory, `/exit` quits.
pub fn run_chat(config: &FolioConfig, catalog: &Catalog) -> Result<()> {
    let (mut session, client) = assistant_parts(config, catalog);
    let stdin = io::stdin();
    let stdout = io::stdout();
    chat_loop(stdin.lock(), stdout.lock(), &mut session, &client)
}

/// Drive an [`AssistantSession`] from a line reader.
pub fn chat_loop<R: BufRead, W: Write>(
    mut reader: R,
    mut out: W,
    session: &mut AssistantSession,
    model: &dyn GenerativeModel,
) -> Result<()> {
    print_last_model_message(&mut out, session)?;

    loop {
        write!(out, "{} ", ">".cyan().bold())?;
        out.flush()?;

        let mut line = String::new();
        if reader
            .read_line(&mut line)
            .context("failed reading from stdin")?
            == 0
        {
            writeln!(out)?;
            return Ok(());
        }

        match line.trim() {
            "/exit" | "/quit" => return Ok(()),
            "/reset" => {
                session.reset();
                print_last_model_message(&mut out, session)?;
            }
            text => {
                if let Some(reply) = session.send(text, model) {
                    writeln!(out, "{} {}", "assistant:".blue().bold(), reply)?;
                }
            }
        }
    }
}

fn print_last_model_message<W: Write>(out: &mut W, session: &AssistantSession) -> Result<()> {
    if let Some(msg) = session.messages().last().filter(|m| m.role == Role::Model) {
        writeln!(out, "{} {}", "assistant:".blue().bold(), msg.text)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// folio projects / folio experience
// ---------------------------------------------------------------------------

/// List projects, or show the single project named by `id`.
pub fn run_projects(
    catalog: &Catalog,
    id: Option<&str>,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let projects = select_projects(catalog, id, limit)?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(projects)?);
        return Ok(());
    }

    println!("{}", "Selected Works".bold().cyan());
    println!("{}", "=".repeat(60));
    for p in projects {
        println!();
        println!("  {} {}", p.title.bold(), format!("[{}]", p.category).dimmed());
        println!("  {}", p.description);
        println!("  {}", p.tags.join(" · ").dimmed());
        println!("  {} {}", "Source:".bold(), p.source);
        if let Some(demo) = p.demo {
            println!("  {} {}", "Demo:  ".bold(), demo);
        }
    }
    Ok(())
}

fn select_projects<'a>(
    catalog: &'a Catalog,
    id: Option<&str>,
    limit: Option<usize>,
) -> Result<&'a [Project]> {
    match id {
        Some(id) => catalog
            .project(id)
            .map(std::slice::from_ref)
            .with_context(|| format!("no project with id '{id}'")),
        None => Ok(catalog.projects(limit)),
    }
}

pub fn run_experience(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&catalog.experience)?);
        return Ok(());
    }

    println!("{}", "Experience".bold().cyan());
    println!("{}", "=".repeat(60));
    for e in &catalog.experience {
        println!();
        println!("  {} {} {}", e.role.bold(), "@".dimmed(), e.company);
        println!("  {}", format!("{} · {}", e.period, e.location).dimmed());
        for item in e.highlights {
            println!("    - {item}");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// folio events
// ---------------------------------------------------------------------------

/// Show the most recent event log entries.
pub fn run_events(config: &FolioConfig, limit: usize) -> Result<()> {
    let log = EventLog::from_config(config);
    let events = log.read_recent(limit);

    if events.is_empty() {
        println!("{}", "No events logged yet.".yellow());
        return Ok(());
    }

    println!(
        "  {:<26} {:<10} {:<10} {:>8} Detail",
        "Timestamp", "Source", "Outcome", "Latency"
    );
    println!("  {}", "-".repeat(70));
    for (i, e) in events.iter().enumerate() {
        let source = serde_json::to_value(e.source)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        let latency = e.latency_ms.map(|ms| format!("{ms}ms")).unwrap_or_default();
        let line = format!(
            "  {:<26} {:<10} {:<10} {:>8} {}",
            truncate(&e.timestamp, 26),
            source,
            e.outcome,
            latency,
            e.detail.as_deref().map(|d| truncate(d, 40)).unwrap_or_default()
        );
        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// folio health
// ---------------------------------------------------------------------------

/// Check config files, credential, upstream settings and the event log.
pub fn run_health(config: &FolioConfig) -> Result<()> {
    println!("{}", "folio Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.folio/config.toml found"
        } else {
            "not found (run `folio config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".folio.toml found"
        } else {
            "none (optional)"
        },
    );

    let has_key = config::api_key().is_some();
    print_health_item(
        "Assistant key",
        has_key,
        if has_key {
            "found in environment"
        } else {
            "missing (set FOLIO_API_KEY or GEMINI_API_KEY)"
        },
    );
    print_health_item("Assistant model", true, &config.assistant.model);

    print_health_item(
        "Judge",
        true,
        &format!(
            "{} as '{}'",
            config.judge.base_url, config.identity.judge_username
        ),
    );
    print_health_item(
        "Source host",
        config.source_host.enabled,
        &if config.source_host.enabled {
            format!(
                "{} as '{}'",
                config.source_host.base_url, config.identity.source_host_username
            )
        } else {
            "disabled".to_string()
        },
    );

    let log = EventLog::from_config(config);
    let log_exists = log.path().is_some_and(|p| p.exists());
    print_health_item(
        "Event log",
        log_exists,
        &if !config.logging.enabled {
            "disabled".to_string()
        } else if log_exists {
            format!("{} entries", log.read_all().len())
        } else {
            "no log file yet".to_string()
        },
    );

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<18} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// folio serve
// ---------------------------------------------------------------------------

pub fn run_serve(config: &FolioConfig, catalog: &Catalog, addr: &str) -> Result<()> {
    let state = AppState {
        table: CommandTable::builtin(catalog),
        catalog: catalog.clone(),
        aggregator: StatsAggregator::from_config(config),
        assistant_configured: config::api_key().is_some(),
    };
    web::serve(addr, &state)
}

// ---------------------------------------------------------------------------
// folio config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show(config: &FolioConfig) -> Result<()> {
    let toml_str = config::to_toml(config)?;
    println!("{}", "Effective folio Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    for (label, path) in [
        ("~/.folio/config.toml", config::global_config_file()),
        (".folio.toml", config::project_config_file()),
    ] {
        if path.is_some_and(|p| p.exists()) {
            println!("  {} {}", "✓".green(), label.dimmed());
        } else {
            println!("  {} {}", "·".dimmed(), format!("{label} (not found)").dimmed());
        }
    }
    println!("  {} {}", "·".dimmed(), "FOLIO_* environment variables".dimmed());

    Ok(())
}

/// Initialize a default config file at `~/.folio/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!("{} Config written to {}", "✓".green().bold(), path.display());
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Format a number with comma separators for readability.
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

/// Horizontal bar of `width` cells filled to `pct` percent.
fn bar(pct: f64, width: usize) -> String {
    let filled = ((pct.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn colorize_difficulty(difficulty: Difficulty) -> colored::ColoredString {
    let label = difficulty.to_string();
    match difficulty {
        Difficulty::Easy => label.green(),
        Difficulty::Medium => label.yellow(),
        Difficulty::Hard => label.red(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::terminal::Entry;

    fn run_lines(input: &str) -> (Transcript, String) {
        colored::control::set_override(false);
        let table = CommandTable::new([("whoami", "me"), ("stack", "rust")]);
        let mut out = Vec::new();
        let transcript =
            shell_loop(Cursor::new(input), &mut out, &table, &EventLog::disabled()).unwrap();
        (transcript, String::from_utf8(out).unwrap())
    }

    #[test]
    fn shell_prints_replies_and_keeps_transcript() {
        let (transcript, out) = run_lines("whoami\nnope\n");
        assert!(out.contains("me\n"));
        assert!(out.contains("command not found: nope"));
        // Banner + two pairs
        assert_eq!(transcript.len(), 5);
        assert_eq!(transcript.entries()[3], Entry::input("nope"));
    }

    #[test]
    fn shell_clear_then_command_leaves_one_pair() {
        let (transcript, out) = run_lines("whoami\nclear\nstack\n");
        assert!(out.contains(CLEAR_SCREEN));
        assert_eq!(
            transcript.entries(),
            &[Entry::input("stack"), Entry::output("rust")]
        );
    }

    #[test]
    fn shell_exit_stops_reading() {
        let (transcript, _) = run_lines("exit\nwhoami\n");
        assert_eq!(transcript.len(), 1);
    }

    #[test]
    fn chat_loop_handles_reset_and_exit() {
        struct Echo;
        impl GenerativeModel for Echo {
            fn generate(
                &self,
                _system: &str,
                user: &str,
            ) -> Result<String, assistant::AssistantError> {
                Ok(format!("echo: {user}"))
            }
            fn name(&self) -> &str {
                "echo"
            }
        }

        colored::control::set_override(false);
        let mut session = AssistantSession::new("sys", EventLog::disabled());
        let mut out = Vec::new();
        let input = Cursor::new("hello\n/reset\n/exit\nignored\n");
        chat_loop(input, &mut out, &mut session, &Echo).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("echo: hello"));
        assert!(out.contains(assistant::RESET_MESSAGE));
        assert!(!out.contains("ignored"));
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn project_lookup_by_id_or_limit() {
        let catalog = Catalog::builtin();

        let one = select_projects(&catalog, Some("GIFTINT"), Some(1)).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].id, "giftint");

        let first_two = select_projects(&catalog, None, Some(2)).unwrap();
        assert_eq!(first_two.len(), 2);

        let err = select_projects(&catalog, Some("nope"), None).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hell…");
        assert_eq!(truncate("ab", 2), "ab");
    }

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(bar(50.0, 4), "██░░");
        assert_eq!(bar(0.0, 3), "░░░");
        assert_eq!(bar(150.0, 2), "██");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Table);
    }
}
