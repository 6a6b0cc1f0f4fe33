use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tracing::Level;

use interview_core::model::{QuestionKey, SkillCategory, SkillSet};
use remote::{HttpInterviewApi, InMemoryInterviewApi, InterviewApi, RemoteConfig};
use services::{
    Advance, InterviewSession, SessionEvent, SessionObserver, Typewriter, suggest_roles,
};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidPace { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidPace { raw } => write!(f, "invalid --pace-ms value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct Args {
    api_url: Option<String>,
    pace_ms: u64,
    offline: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--api <base_url>] [--pace-ms <n>] [--offline]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api      {} (or INTERVIEW_API_URL)", remote::config::DEFAULT_BASE_URL);
    eprintln!("  --pace-ms  30");
    eprintln!();
    eprintln!("  --offline runs against the built-in scripted service, no network needed.");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut api_url = None;
        let mut pace_ms = 30;
        let mut offline = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => {
                    api_url = Some(require_value(args, "--api")?);
                }
                "--pace-ms" => {
                    let value = require_value(args, "--pace-ms")?;
                    pace_ms = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidPace { raw: value.clone() })?;
                }
                "--offline" => offline = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            api_url,
            pace_ms,
            offline,
        })
    }
}

/// Relays session notifications to the terminal.
///
/// Remote failures arrive here exactly once, so the interaction loop prints
/// only its local validation problems.
struct TermObserver;

impl SessionObserver for TermObserver {
    fn notify(&self, event: &SessionEvent) {
        match event {
            SessionEvent::Skipped { .. } => {
                println!("Question skipped. You can come back to it later.");
            }
            SessionEvent::Finished { answered } => {
                println!("\nInterview complete — {answered} answers on file.");
            }
            SessionEvent::Failed { message } => {
                println!("error: {message}");
            }
            _ => {}
        }
    }
}

fn read_line(prompt: &str) -> io::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

async fn type_out(typewriter: &Typewriter, text: &str) -> io::Result<()> {
    let run = typewriter.begin(text);
    let pace = run.pace();
    let mut stdout = io::stdout();
    for ch in run {
        write!(stdout, "{ch}")?;
        stdout.flush()?;
        tokio::time::sleep(pace).await;
    }
    writeln!(stdout)?;
    Ok(())
}

/// Offer catalog suggestions when the typed role isn't an exact match.
fn read_job_role() -> io::Result<String> {
    let input = read_line("Target job role: ")?;
    let suggestions = suggest_roles(&input);
    if input.is_empty()
        || suggestions.iter().any(|role| role.eq_ignore_ascii_case(&input))
        || suggestions.is_empty()
    {
        return Ok(input);
    }
    println!("Did you mean:");
    for (i, role) in suggestions.iter().take(8).enumerate() {
        println!("  {}. {role}", i + 1);
    }
    let choice = read_line("Pick a number, or press Enter to keep your wording: ")?;
    if let Ok(n) = choice.parse::<usize>() {
        if n >= 1 && n <= suggestions.len().min(8) {
            return Ok(suggestions[n - 1].to_string());
        }
    }
    Ok(input)
}

async fn run_interview(
    session: &mut InterviewSession,
    typewriter: &Typewriter,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\nCommands: /back, /skip, /finish. Anything else is your answer.\n");
    loop {
        let Some(question) = session.current_question().cloned() else {
            break;
        };
        let Some(progress) = session.progress() else {
            break;
        };
        println!(
            "\n[{}/{} — {}]",
            question.index + 1,
            progress.total,
            question.section
        );
        println!("{}", question.prompt);
        if let Some(existing) = session.answers().get(&question.key) {
            if !existing.is_empty() {
                println!("(current answer: {existing})");
            }
        }
        if progress.finish_available {
            println!("(you may /finish from here)");
        }

        let line = read_line("> ")?;
        let outcome = match line.as_str() {
            "/back" => {
                match session.retreat() {
                    Ok(_) => {}
                    Err(err) => println!("error: {err}"),
                }
                continue;
            }
            "/skip" => session.skip().await,
            "/finish" => {
                match session.finish(None).await {
                    Ok(_) => return Ok(()),
                    Err(err) => {
                        if !err.is_remote() {
                            println!("error: {err}");
                        }
                        continue;
                    }
                }
            }
            answer => {
                match session
                    .submit_answer(question.index, &question.key, answer)
                    .await
                {
                    Ok(receipt) => {
                        if let Some(feedback) = &receipt.feedback {
                            type_out(typewriter, &feedback.message).await?;
                        }
                        if receipt.follow_up.is_some() {
                            resolve_follow_up(session).await?;
                        }
                        session.advance().await
                    }
                    Err(err) => {
                        if !err.is_remote() {
                            println!("error: {err}");
                        }
                        continue;
                    }
                }
            }
        };

        match outcome {
            Ok(Advance::Finished) => return Ok(()),
            Ok(Advance::Moved(_)) => {}
            Err(err) => {
                if !err.is_remote() {
                    println!("error: {err}");
                }
            }
        }
    }
    Ok(())
}

async fn resolve_follow_up(session: &mut InterviewSession) -> io::Result<()> {
    while let Some(pending) = session.pending_follow_up().cloned() {
        println!("{}", pending.follow_up.prompt);
        let answer = read_line("(Enter to skip) > ")?;
        if answer.is_empty() {
            let _ = session.skip_follow_up();
            break;
        }
        match session.resolve_follow_up(&answer).await {
            Ok(()) => break,
            // Already reported; offer the skip path instead of looping forever.
            Err(_) => {
                let retry = read_line("Retry the follow-up? [y/N] ")?;
                if !retry.eq_ignore_ascii_case("y") {
                    let _ = session.skip_follow_up();
                    break;
                }
            }
        }
    }
    Ok(())
}

fn run_review(session: &InterviewSession) {
    println!("\n── Review ──");
    let Some(questionnaire) = session.questionnaire() else {
        return;
    };
    for (section, questions) in questionnaire.by_section() {
        println!("\n{section}");
        for question in questions {
            let answer = session
                .answers()
                .get(&question.key)
                .filter(|a| !a.is_empty());
            let first_line = question.prompt.lines().next().unwrap_or_default();
            println!(
                "  [{}] {first_line}",
                question.key
            );
            println!("      {}", answer.map_or("Not provided", String::as_str));
        }
    }
}

async fn edit_answers(session: &mut InterviewSession) -> io::Result<()> {
    loop {
        let line = read_line("\nEdit an answer? (key to edit, Enter to continue): ")?;
        if line.is_empty() {
            return Ok(());
        }
        let Ok(key) = QuestionKey::new(line) else {
            continue;
        };
        let text = read_line("New answer: ")?;
        match session.edit_answer(&key, &text).await {
            Ok(()) => println!("Your answer has been updated."),
            Err(err) => {
                if !err.is_remote() {
                    println!("error: {err}");
                }
            }
        }
    }
}

fn pick_confirmed_skills(session: &InterviewSession) -> io::Result<SkillSet> {
    let implied = session.implied_skills();
    let mut confirmed = SkillSet::default();
    if implied.is_empty() {
        return Ok(confirmed);
    }
    println!("\nSkills inferred from your answers (confirm to include them):");
    for category in SkillCategory::ALL {
        for skill in implied.category(category) {
            println!("  [{category}] {skill}");
        }
    }
    let line = read_line("Include which skills? (comma separated, or 'all'): ")?;
    if line.eq_ignore_ascii_case("all") {
        return Ok(implied.clone());
    }
    for wanted in line.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        for category in SkillCategory::ALL {
            if let Some(skill) = implied
                .category(category)
                .iter()
                .find(|skill| skill.eq_ignore_ascii_case(wanted))
            {
                confirmed.insert(category, skill.clone());
            }
        }
    }
    Ok(confirmed)
}

async fn save_download(
    api: &dyn InterviewApi,
    path: Option<&str>,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(());
    };
    let bytes = api.download(path).await?;
    std::fs::write(filename, bytes)?;
    println!("Saved {filename}");
    Ok(())
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let api: Arc<dyn InterviewApi> = if args.offline {
        Arc::new(InMemoryInterviewApi::new())
    } else {
        let config = match &args.api_url {
            Some(url) => RemoteConfig::new(url)?,
            None => RemoteConfig::from_env()?,
        };
        Arc::new(HttpInterviewApi::new(config))
    };
    let typewriter = Typewriter::with_pace(std::time::Duration::from_millis(args.pace_ms));
    let mut session = InterviewSession::new(Arc::clone(&api)).with_observer(Arc::new(TermObserver));

    // ── Welcome ──
    println!("AI interview wizard — answer a few questions, get a resume.\n");
    loop {
        let name = read_line("Full name: ")?;
        let role = read_job_role()?;
        let level = read_line("Experience level (entry-level / mid-level / senior / executive): ")?;
        match session.start(&name, &role, &level).await {
            Ok(questionnaire) => {
                println!("\nGreat, {name}. {} questions ahead.", questionnaire.len());
                break;
            }
            Err(err) => {
                if !err.is_remote() {
                    println!("error: {err}");
                }
            }
        }
    }

    // ── Interview ──
    run_interview(&mut session, &typewriter).await?;

    // ── Review ──
    run_review(&session);
    edit_answers(&mut session).await?;

    // ── Generate ──
    session.proceed_to_generate().await?;
    let confirmed = pick_confirmed_skills(&session)?;
    let document = loop {
        let format = read_line("Format (html / text): ")?;
        let style = read_line("Style (traditional / modern / creative): ")?;
        match session.generate(format.as_str(), style.as_str(), confirmed.clone()).await {
            Ok(document) => break document.clone(),
            Err(err) => {
                if !err.is_remote() {
                    println!("error: {err}");
                }
            }
        }
    };
    println!("\nGenerated {}", document.filename);
    for tip in &document.career_tips {
        println!("  tip: {tip}");
    }
    save_download(api.as_ref(), document.download_url.as_deref(), &document.filename).await?;

    // ── Translate (optional) ──
    let language = read_line("\nTranslate the resume? Target language (Enter to skip): ")?;
    if !language.is_empty() {
        match session.translate(&document.filename, &language).await {
            Ok(translated) => {
                let translated = translated.clone();
                println!("Translated to {language}: {}", translated.filename);
                save_download(
                    api.as_ref(),
                    Some(translated.download_url.as_str()),
                    &translated.filename,
                )
                .await?;
            }
            Err(err) => {
                if !err.is_remote() {
                    println!("error: {err}");
                }
            }
        }
    }

    println!("\nAll done. Good luck out there!");
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_max_level(Level::WARN).init();

    let mut argv = std::env::args().skip(1);
    let args = match Args::parse(&mut argv) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            std::process::exit(2);
        }
    };

    if let Err(err) = run(args).await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
