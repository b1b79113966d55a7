// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Quote Intake console entrypoint.
//!
//! Runs a line-oriented intake console against the local working copy. Edits are autosaved
//! after a short quiet period; `save`/`save-as`/`open` prompt for paths on the same input.

use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use quote_intake::coordinator::{
    wait_for, Coordinator, DetachedView, FileOutcome, IntakeError, LoadSource, ViewSnapshot,
};
use quote_intake::files::{Capability, FileError, FileHost, FsFileHost, PathChooser};
use quote_intake::model::{canonical_json_schema, Tab};
use quote_intake::store::{FileKeyValueStore, KeyValueStore, WriteDurability};
use quote_intake::IntakeConfig;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::warn;

type SharedLines<R> = Arc<Mutex<Lines<R>>>;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<data-dir>] [--durable-writes] [--no-file-dialogs]\n  {program} [--data-dir <dir>] [--durable-writes] [--no-file-dialogs]\n\nIf data-dir/--data-dir is omitted, $QUOTE_INTAKE_DIR or the platform data dir is used.\n\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported).\n--no-file-dialogs disables save/open prompts; the working copy is still saved locally.\n\nSet RUST_LOG (e.g. RUST_LOG=quote_intake=debug) for diagnostics on stderr."
    );
}

fn print_help() {
    println!(
        "Commands:\n  show                      print the current intake\n  status                    save status and bound file\n  schema                    print the JSON Schema of intake documents\n  set <path> <value>        edit a field, e.g. set home.propertyAddress.city Austin\n  tab <auto|home|business>  switch tab (saved immediately)\n  save | save-as | open     file operations\n  new                       start a new intake\n  import                    paste a document, end with a single '.' line\n  export                    print the document for copying\n  download                  write the document into the current directory\n  help | quit"
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    data_dir: Option<String>,
    durable_writes: bool,
    no_file_dialogs: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data-dir" => {
                if options.data_dir.is_some() {
                    return Err(());
                }
                let dir = args.next().ok_or(())?;
                options.data_dir = Some(dir);
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            "--no-file-dialogs" => {
                if options.no_file_dialogs {
                    return Err(());
                }
                options.no_file_dialogs = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.data_dir.is_some() {
                    return Err(());
                }
                options.data_dir = Some(arg);
            }
        }
    }

    Ok(options)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Show,
    Status,
    Schema,
    Set { path: String, value: String },
    Tab(Tab),
    Save,
    SaveAs,
    Open,
    New,
    Import,
    Export,
    Download,
    Help,
    Quit,
}

/// `Ok(None)` for a blank line.
fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let no_args = |command: Command| {
        if rest.is_empty() {
            Ok(Some(command))
        } else {
            Err(format!("`{word}` takes no arguments"))
        }
    };

    match word {
        "show" => no_args(Command::Show),
        "status" => no_args(Command::Status),
        "schema" => no_args(Command::Schema),
        "save" => no_args(Command::Save),
        "save-as" => no_args(Command::SaveAs),
        "open" => no_args(Command::Open),
        "new" => no_args(Command::New),
        "import" => no_args(Command::Import),
        "export" => no_args(Command::Export),
        "download" => no_args(Command::Download),
        "help" | "?" => no_args(Command::Help),
        "quit" | "exit" => no_args(Command::Quit),
        "tab" => rest
            .parse::<Tab>()
            .map(|tab| Some(Command::Tab(tab)))
            .map_err(|err| err.to_string()),
        "set" => {
            let (path, value) = match rest.split_once(char::is_whitespace) {
                Some((path, value)) => (path, value.trim()),
                None => (rest, ""),
            };
            if path.is_empty() {
                return Err("usage: set <path> <value>".to_owned());
            }
            Ok(Some(Command::Set {
                path: path.to_owned(),
                value: value.to_owned(),
            }))
        }
        other => Err(format!("unknown command `{other}` (try `help`)")),
    }
}

fn prompt(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}

/// Asks for paths on the console input. `-` cancels.
struct StdinChooser {
    lines: SharedLines<BufReader<Stdin>>,
    cwd: PathBuf,
}

impl StdinChooser {
    async fn ask(&self, text: &str) -> Result<Option<String>, FileError> {
        prompt(text);
        let mut lines = self.lines.lock().await;
        let line = lines.next_line().await.map_err(|source| FileError::Io {
            path: PathBuf::from("<stdin>"),
            source,
        })?;
        Ok(line.map(|line| line.trim().to_owned()))
    }
}

#[async_trait]
impl PathChooser for StdinChooser {
    async fn choose_save_path(&self, suggested_name: &str) -> Result<Option<PathBuf>, FileError> {
        let answer = self
            .ask(&format!("Save as [{suggested_name}] (- to cancel): "))
            .await?;
        Ok(match answer.as_deref() {
            None | Some("-") => None,
            Some("") => Some(self.cwd.join(suggested_name)),
            Some(path) => Some(self.cwd.join(path)),
        })
    }

    async fn choose_open_path(&self) -> Result<Option<PathBuf>, FileError> {
        let answer = self.ask("Open file (blank or - to cancel): ").await?;
        Ok(match answer.as_deref() {
            None | Some("") | Some("-") => None,
            Some(path) => Some(self.cwd.join(path)),
        })
    }
}

enum Input {
    Line(io::Result<Option<String>>),
    AutosaveDue,
}

/// Reads pasted lines up to a single `.`. Lines that are not UTF-8 are consumed, then the
/// whole paste is rejected.
async fn read_document<R>(lines: &SharedLines<R>) -> io::Result<String>
where
    R: AsyncBufRead + Unpin,
{
    println!("Paste the document, then a line with a single '.':");
    let mut lines = lines.lock().await;
    let mut text = String::new();
    let mut undecodable = 0usize;
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim() == "." => break,
            Ok(Some(line)) => {
                text.push_str(&line);
                text.push('\n');
            }
            Ok(None) => break,
            Err(err) if err.kind() == io::ErrorKind::InvalidData => undecodable += 1,
            Err(err) => return Err(err),
        }
    }
    if undecodable > 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{undecodable} pasted line(s) are not valid UTF-8; nothing imported"),
        ));
    }
    Ok(text)
}

fn report_outcome(outcome: FileOutcome) {
    match outcome {
        FileOutcome::Saved(target) => println!("Saved {target}"),
        FileOutcome::Opened(target) => println!("Opened {target}"),
        FileOutcome::Cancelled => println!("Cancelled"),
    }
}

fn load_notice(source: &LoadSource) -> String {
    match source {
        LoadSource::Current => "Restored last draft (local).".to_owned(),
        LoadSource::Legacy { key } => {
            format!("Restored last draft (local, migrated from {key}).")
        }
        LoadSource::Empty => "Started a new intake.".to_owned(),
        LoadSource::Unreadable => "Stored draft was unreadable; started a new intake.".to_owned(),
    }
}

fn capability_notice(capability: Capability) -> Option<&'static str> {
    match capability {
        Capability::Supported => None,
        Capability::Unsupported => Some(
            "File save/open is unavailable; the draft is still saved locally (use `export` or `download`).",
        ),
    }
}

async fn execute<S, H, V, R>(
    console: &mut Coordinator<S, H, V>,
    lines: &SharedLines<R>,
    command: Command,
) -> Result<bool, Box<dyn Error>>
where
    S: KeyValueStore,
    H: FileHost,
    V: ViewSnapshot,
    R: AsyncBufRead + Unpin,
{
    match command {
        Command::Show | Command::Export => print!("{}", console.export_text()?),
        Command::Status => {
            println!("Status: {}", console.status());
            match console.bound_file() {
                Some(target) => println!("File: {target}"),
                None => println!("File: (none)"),
            }
            if console.autosave_deadline().is_some() {
                println!("Autosave pending");
            }
        }
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&canonical_json_schema())?);
        }
        Command::Set { path, value } => console.set_field(&path, &value)?,
        Command::Tab(tab) => {
            console.set_active_tab(tab).await;
            println!("Tab: {tab}");
        }
        Command::Save => report_outcome(console.save().await?),
        Command::SaveAs => report_outcome(console.save_as().await?),
        Command::Open => report_outcome(console.open().await?),
        Command::New => {
            console.new_intake().await;
            println!("New intake");
        }
        Command::Import => {
            let text = read_document(lines).await?;
            let report = console.import_text(&text).await?;
            if report.is_newer_schema() {
                println!("Imported (document is from a newer version; unknown fields dropped)");
            } else {
                println!("Imported");
            }
        }
        Command::Download => {
            let dir = std::env::current_dir()?;
            let target = console.download(&dir).await?;
            println!("Downloaded {target}");
        }
        Command::Help => print_help(),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

/// Runs one command, reporting its failure. Returns `false` when the console should exit.
async fn run_command<S, H, V, R>(
    console: &mut Coordinator<S, H, V>,
    lines: &SharedLines<R>,
    command: Command,
) -> bool
where
    S: KeyValueStore,
    H: FileHost,
    V: ViewSnapshot,
    R: AsyncBufRead + Unpin,
{
    match execute(console, lines, command).await {
        Ok(keep_going) => keep_going,
        Err(err) => {
            eprintln!("error: {err}");
            true
        }
    }
}

/// Reads commands until `quit` or end of input, firing the autosave while idle.
async fn drive<S, H, V, R>(console: &mut Coordinator<S, H, V>, lines: &SharedLines<R>)
where
    S: KeyValueStore,
    H: FileHost,
    V: ViewSnapshot,
    R: AsyncBufRead + Unpin,
{
    let mut show_prompt = true;
    loop {
        if show_prompt {
            prompt("> ");
        }
        let deadline = console.autosave_deadline();
        let input = {
            let mut guard = lines.lock().await;
            tokio::select! {
                line = guard.next_line() => Input::Line(line),
                () = wait_for(deadline) => Input::AutosaveDue,
            }
        };

        show_prompt = true;
        let line = match input {
            Input::AutosaveDue => {
                console.flush_autosave().await;
                show_prompt = false;
                continue;
            }
            Input::Line(Ok(None)) => break,
            Input::Line(Ok(Some(line))) => line,
            // The undecodable line is consumed; later lines still arrive.
            Input::Line(Err(err)) if err.kind() == io::ErrorKind::InvalidData => {
                eprintln!("error: input line is not valid UTF-8; ignored");
                continue;
            }
            Input::Line(Err(err)) => {
                warn!(error = %err, "console input failed; closing");
                eprintln!("error: cannot read input: {err}");
                break;
            }
        };

        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(command)) => {
                if !run_command(console, lines, command).await {
                    break;
                }
            }
            Err(message) => eprintln!("error: {message}"),
        }
    }
}

/// The console session: the command loop, then a flush of any pending autosave.
async fn session<S, H, V, R>(
    console: &mut Coordinator<S, H, V>,
    lines: &SharedLines<R>,
) -> Result<(), IntakeError>
where
    S: KeyValueStore,
    H: FileHost,
    V: ViewSnapshot,
    R: AsyncBufRead + Unpin,
{
    drive(console, lines).await;
    console.shutdown().await
}

async fn run(config: IntakeConfig, file_dialogs: bool) -> Result<(), Box<dyn Error>> {
    let lines: SharedLines<BufReader<Stdin>> =
        Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()));

    let store = FileKeyValueStore::new(&config.data_dir).with_durability(config.durability);
    let chooser = file_dialogs.then(|| StdinChooser {
        lines: lines.clone(),
        cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    });
    let host = FsFileHost::new(chooser).with_durability(config.durability);

    let mut console = Coordinator::from_config(store, host, DetachedView, &config);
    let source = console.load().await;
    println!(
        "Quote intake ({}). Type `help` for commands.",
        config.data_dir.display()
    );
    println!("{}", load_notice(&source));
    if let Some(notice) = capability_notice(console.file_capability()) {
        println!("{notice}");
    }

    session(&mut console, &lines).await?;
    Ok(())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "quote-intake".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .init();

        let mut config = IntakeConfig::from_env()?;
        if let Some(dir) = options.data_dir {
            config = config.with_data_dir(dir);
        }
        if options.durable_writes {
            config = config.with_durability(WriteDurability::Durable);
        }

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        runtime.block_on(run(config, !options.no_file_dialogs))
    })();

    if let Err(err) = result {
        eprintln!("quote-intake: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use quote_intake::coordinator::{Coordinator, DetachedView, LoadSource};
    use quote_intake::files::{Capability, MemoryFileHost};
    use quote_intake::model::Tab;
    use quote_intake::store::MemoryKeyValueStore;
    use serde_json::Value;
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::sync::Mutex;

    use super::{
        capability_notice, load_notice, parse_command, parse_options, session, CliOptions,
        Command, SharedLines,
    };

    fn script(input: &'static [u8]) -> SharedLines<BufReader<&'static [u8]>> {
        Arc::new(Mutex::new(BufReader::new(input).lines()))
    }

    fn console(store: &MemoryKeyValueStore) -> Coordinator<MemoryKeyValueStore, MemoryFileHost> {
        Coordinator::new(store.clone(), MemoryFileHost::new(), DetachedView)
    }

    fn stored_customer(store: &MemoryKeyValueStore) -> Value {
        let raw = store.peek("quote_intake_v3").expect("stored intake");
        serde_json::from_str::<Value>(&raw).unwrap()["customer"].clone()
    }

    #[test]
    fn parses_empty_args() {
        let options = parse_options(std::iter::empty()).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_positional_data_dir_and_flags() {
        let options = parse_options(
            ["some/dir".to_owned(), "--durable-writes".to_owned(), "--no-file-dialogs".to_owned()]
                .into_iter(),
        )
        .expect("parse options");
        assert_eq!(options.data_dir.as_deref(), Some("some/dir"));
        assert!(options.durable_writes);
        assert!(options.no_file_dialogs);
    }

    #[test]
    fn parses_data_dir_flag() {
        let options = parse_options(["--data-dir".to_owned(), "d".to_owned()].into_iter())
            .expect("parse options");
        assert_eq!(options.data_dir.as_deref(), Some("d"));
    }

    #[test]
    fn rejects_bad_args() {
        parse_options(["--nope".to_owned()].into_iter()).unwrap_err();
        parse_options(["--data-dir".to_owned()].into_iter()).unwrap_err();
        parse_options(["one".to_owned(), "two".to_owned()].into_iter()).unwrap_err();
        parse_options(["--data-dir".to_owned(), "one".to_owned(), "two".to_owned()].into_iter())
            .unwrap_err();
        parse_options(["--durable-writes".to_owned(), "--durable-writes".to_owned()].into_iter())
            .unwrap_err();
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(parse_command("show"), Ok(Some(Command::Show)));
        assert_eq!(parse_command("save-as"), Ok(Some(Command::SaveAs)));
        assert_eq!(parse_command("tab home"), Ok(Some(Command::Tab(Tab::Home))));
        assert_eq!(
            parse_command("set customer.name  Dana Reyes "),
            Ok(Some(Command::Set {
                path: "customer.name".to_owned(),
                value: "Dana Reyes".to_owned(),
            }))
        );
        assert_eq!(
            parse_command("set customer.phone"),
            Ok(Some(Command::Set {
                path: "customer.phone".to_owned(),
                value: String::new(),
            }))
        );
    }

    #[test]
    fn rejects_bad_commands() {
        assert!(parse_command("tab life").is_err());
        assert!(parse_command("set").is_err());
        assert!(parse_command("save now").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[tokio::test]
    async fn undecodable_line_is_skipped_and_the_edit_is_flushed() {
        let store = MemoryKeyValueStore::new();
        let mut console = console(&store);
        let lines = script(b"set customer.name Dana\n\xff\nset customer.phone 512-555-0101\n");

        session(&mut console, &lines).await.unwrap();

        let customer = stored_customer(&store);
        assert_eq!(customer["name"], "Dana");
        assert_eq!(customer["phone"], "512-555-0101");
    }

    #[tokio::test]
    async fn failing_commands_do_not_end_the_session() {
        let store = MemoryKeyValueStore::new();
        let mut console = console(&store);
        let lines = script(b"set nope.field x\ntab life\nimport\n\n.\nset customer.name Dana\n");

        session(&mut console, &lines).await.unwrap();

        assert_eq!(stored_customer(&store)["name"], "Dana");
    }

    #[tokio::test]
    async fn undecodable_paste_imports_nothing() {
        let store = MemoryKeyValueStore::new();
        let mut console = console(&store);
        let lines = script(
            b"import\n{\"customer\": {\"name\":\n\xff\n\"Sam\"}}\n.\nset customer.phone 1\n",
        );

        session(&mut console, &lines).await.unwrap();

        let customer = stored_customer(&store);
        assert_eq!(customer["name"], "");
        assert_eq!(customer["phone"], "1");
    }

    #[tokio::test]
    async fn quit_flushes_and_ignores_later_input() {
        let store = MemoryKeyValueStore::new();
        let mut console = console(&store);
        let lines = script(b"set customer.name Dana\nquit\nset customer.name Sam\n");

        session(&mut console, &lines).await.unwrap();

        assert_eq!(stored_customer(&store)["name"], "Dana");
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn startup_notices() {
        assert_eq!(load_notice(&LoadSource::Current), "Restored last draft (local).");
        assert_eq!(
            load_notice(&LoadSource::Legacy {
                key: "quote_intake_v2".to_owned()
            }),
            "Restored last draft (local, migrated from quote_intake_v2)."
        );
        assert_eq!(load_notice(&LoadSource::Empty), "Started a new intake.");
        assert!(load_notice(&LoadSource::Unreadable).contains("unreadable"));

        assert_eq!(capability_notice(Capability::Supported), None);
        assert!(capability_notice(Capability::Unsupported)
            .is_some_and(|notice| notice.contains("saved locally")));
    }
}
