use chrono::{Datelike, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;

use crate::config::Config;
use crate::export::{export_to_dir, ExportError};
use crate::filter::{ItemFilter, PrefixField, PrefixMatch};
use crate::library::{Library, LibraryError};
use crate::models::{Item, ItemEdit, Kind, Mood, NewItem, Status};
use crate::session::{NoticeLevel, Session};
use crate::tags::serialize_tags;
use crate::utils::{non_blank, parse_date, today, DATE_FORMAT, TIMESTAMP_FORMAT};

#[derive(Parser)]
#[command(name = "biblio")]
#[command(about = "Biblioteca - track books, films, albums and games you want to get to")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Interactive shell (default if no subcommand)
    Shell,
    /// Add a new item
    Add {
        title: String,
        creator: String,
        #[arg(short, long)]
        kind: Kind,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        mood: Option<Mood>,
        #[arg(long)]
        year: Option<i32>,
        /// Delimited tags, e.g. "queue, amazon"
        #[arg(long)]
        sources: Option<String>,
        #[arg(long)]
        video_url: Option<String>,
        #[arg(long)]
        note: Option<String>,
        /// Store the item as already finished
        #[arg(long)]
        archived: bool,
        /// Finish date (YYYY-MM-DD), implies --archived; defaults to today
        #[arg(long)]
        finished: Option<String>,
    },
    /// List items matching the given filters
    List {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long)]
        json: bool,
    },
    /// Show one item
    Show {
        id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Overwrite fields of an item
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        creator: Option<String>,
        #[arg(short, long)]
        kind: Option<Kind>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        mood: Option<Mood>,
        #[arg(long)]
        year: Option<i32>,
        /// Replaces all tags; an empty string clears them
        #[arg(long)]
        sources: Option<String>,
        #[arg(long)]
        video_url: Option<String>,
        #[arg(long)]
        note: Option<String>,
        /// Fields to clear
        #[arg(long, value_enum)]
        clear: Vec<ClearField>,
    },
    /// Delete an item
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// Toggle focus on an item (turning it off needs --yes)
    Focus {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// List the items in focus
    Focused,
    /// Toggle the queue tag on an item, or list the queue
    Queue { id: Option<i64> },
    /// Mark an item as finished
    Archive {
        id: i64,
        /// Finish date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        on: Option<String>,
    },
    /// Move an item back to the active list
    Unarchive { id: i64 },
    /// Drop the wishlist tag from an item
    Purchased { id: i64 },
    /// Start a finished item over as a new entry in focus
    Again { id: i64 },
    /// Suggest a random active item
    Roll {
        #[arg(short, long)]
        kind: Kind,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        mood: Option<Mood>,
    },
    /// Items finished per kind in a month or year
    Stats {
        /// Defaults to the current year
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
    /// Write the items matching the filters to a CSV file. Inside the
    /// shell, without filters, the current listing is exported.
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClearField {
    Genre,
    Mood,
    Year,
    VideoUrl,
    Note,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Substring of title or creator
    #[arg(short, long)]
    pub search: Option<String>,
    #[arg(long)]
    pub status: Option<Status>,
    #[arg(short, long)]
    pub kind: Option<Kind>,
    #[arg(long)]
    pub genre: Option<String>,
    #[arg(long)]
    pub mood: Option<Mood>,
    /// Source tag, e.g. wishlist, queue or a store name
    #[arg(long)]
    pub source: Option<String>,
    #[arg(long, conflicts_with = "title_prefix")]
    pub creator_prefix: Option<String>,
    #[arg(long)]
    pub title_prefix: Option<String>,
    #[arg(long)]
    pub year: Option<i32>,
    /// Finished in this month (needs --finished-year)
    #[arg(long)]
    pub finished_month: Option<u32>,
    #[arg(long)]
    pub finished_year: Option<i32>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> ItemFilter {
        let prefix = match (&self.creator_prefix, &self.title_prefix) {
            (Some(p), _) => Some(PrefixMatch {
                field: PrefixField::Creator,
                prefix: p.clone(),
            }),
            (None, Some(p)) => Some(PrefixMatch {
                field: PrefixField::Title,
                prefix: p.clone(),
            }),
            (None, None) => None,
        };
        ItemFilter {
            search: non_blank(self.search.clone()),
            status: self.status,
            kind: self.kind,
            genre: non_blank(self.genre.clone()),
            mood: self.mood,
            source_tag: non_blank(self.source.clone()),
            prefix,
            year: self.year,
            completed_month: self.finished_month,
            completed_year: self.finished_year,
        }
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Library(#[from] LibraryError),
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
    #[error("{0} needs confirmation, pass --yes")]
    NeedsConfirmation(&'static str),
    #[error("Unterminated quote in input")]
    UnterminatedQuote,
    #[error("Output error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate, CliError> {
    parse_date(raw)
        .map_err(|e| CliError::DateParseError(format!("Invalid date format '{}': {}", raw, e)))
}

/// One-line summary used by every listing
pub fn format_item(item: &Item) -> String {
    let mut markers = String::new();
    if item.is_focused {
        markers.push('*');
    }
    if item.is_queued() {
        markers.push('Q');
    }
    if item.is_wishlisted() {
        markers.push('W');
    }
    let mut line = format!(
        "#{:<4} {:<3} {} - {} [{}]",
        item.id.unwrap_or_default(),
        markers,
        item.title,
        item.creator,
        item.kind
    );
    if let Some(mood) = item.mood {
        line.push_str(&format!(" ({mood})"));
    }
    if let Some(date) = item.completed_at {
        line.push_str(&format!(" finished {}", date.format(DATE_FORMAT)));
    }
    line
}

fn format_details(item: &Item) -> String {
    let dash = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
    let tags = serialize_tags(&item.source_tags);
    [
        format!("ID:       {}", item.id.unwrap_or_default()),
        format!("Title:    {}", item.title),
        format!("Creator:  {}", item.creator),
        format!("Kind:     {}", item.kind),
        format!("Status:   {}", item.status),
        format!("Genre:    {}", dash(item.genre.clone())),
        format!("Mood:     {}", dash(item.mood.map(|m| m.to_string()))),
        format!("Year:     {}", dash(item.year.map(|y| y.to_string()))),
        format!("Sources:  {}", if tags.is_empty() { "-".to_string() } else { tags }),
        format!("Video:    {}", dash(item.video_url.clone())),
        format!("Note:     {}", dash(item.note.clone())),
        format!("Focus:    {}", if item.is_focused { "yes" } else { "no" }),
        format!(
            "Finished: {}",
            dash(item.completed_at.map(|d| d.format(DATE_FORMAT).to_string()))
        ),
        format!("Added:    {}", item.created_at.format(TIMESTAMP_FORMAT)),
    ]
    .join("\n")
}

fn write_items(out: &mut dyn Write, items: &[Item]) -> Result<(), CliError> {
    for item in items {
        writeln!(out, "{}", format_item(item))?;
    }
    Ok(())
}

/// Outcome of a handler: an optional status line for the user
pub type Handled = Result<Option<String>, CliError>;

#[allow(clippy::too_many_arguments)]
pub fn handle_add(
    library: &mut Library,
    title: String,
    creator: String,
    kind: Kind,
    genre: Option<String>,
    mood: Option<Mood>,
    year: Option<i32>,
    sources: Option<String>,
    video_url: Option<String>,
    note: Option<String>,
    archived: bool,
    finished: Option<String>,
) -> Handled {
    let archived_on = match finished {
        Some(raw) => Some(parse_date_arg(&raw)?),
        None if archived => Some(today()),
        None => None,
    };

    let mut new = NewItem::new(title, creator, kind);
    new.genre = non_blank(genre);
    new.mood = mood;
    new.year = year;
    new.sources = sources;
    new.video_url = non_blank(video_url);
    new.note = non_blank(note);
    new.archived_on = archived_on;

    let item = library.add(new)?;
    Ok(Some(format!(
        "Added {} (ID: {})",
        item.title,
        item.id.unwrap_or_default()
    )))
}

pub fn handle_list(library: &Library, filter: &ItemFilter, json: bool, out: &mut dyn Write) -> Handled {
    let items = library.search(filter)?;
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&items)?)?;
        return Ok(None);
    }
    write_items(out, &items)?;
    let matched = library.count(filter)?;
    if matched > items.len() as u64 {
        return Ok(Some(format!(
            "Showing {} of {} matches, refine the filters to see the rest",
            items.len(),
            matched
        )));
    }
    Ok(Some(format!("{} item(s)", items.len())))
}

pub fn handle_show(library: &Library, id: i64, json: bool, out: &mut dyn Write) -> Handled {
    let item = library.get(id)?;
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(item)?)?;
    } else {
        writeln!(out, "{}", format_details(item))?;
    }
    Ok(None)
}

#[allow(clippy::too_many_arguments)]
pub fn handle_edit(
    library: &mut Library,
    id: i64,
    title: Option<String>,
    creator: Option<String>,
    kind: Option<Kind>,
    genre: Option<String>,
    mood: Option<Mood>,
    year: Option<i32>,
    sources: Option<String>,
    video_url: Option<String>,
    note: Option<String>,
    clear: Vec<ClearField>,
) -> Handled {
    let mut edit = ItemEdit {
        title,
        creator,
        kind,
        genre: genre.map(Some),
        mood: mood.map(Some),
        year: year.map(Some),
        sources,
        video_url: video_url.map(Some),
        note: note.map(Some),
    };
    for field in clear {
        match field {
            ClearField::Genre => edit.genre = Some(None),
            ClearField::Mood => edit.mood = Some(None),
            ClearField::Year => edit.year = Some(None),
            ClearField::VideoUrl => edit.video_url = Some(None),
            ClearField::Note => edit.note = Some(None),
        }
    }

    let item = library.edit(id, edit)?;
    Ok(Some(format!("Updated {}", item.title)))
}

pub fn handle_delete(library: &mut Library, id: i64, yes: bool) -> Handled {
    if !yes {
        return Err(CliError::NeedsConfirmation("Deleting an item"));
    }
    let title = library.get(id)?.title.clone();
    library.delete(id)?;
    Ok(Some(format!("Deleted {title}")))
}

pub fn handle_focus(library: &mut Library, id: i64, yes: bool) -> Handled {
    let item = match library.toggle_focus(id, yes) {
        Err(LibraryError::ConfirmationRequired) => {
            return Err(CliError::NeedsConfirmation("Removing an item from focus"));
        }
        other => other?,
    };
    let state = if item.is_focused { "now in focus" } else { "out of focus" };
    Ok(Some(format!("{} is {state}", item.title)))
}

pub fn handle_focused(library: &Library, out: &mut dyn Write) -> Handled {
    write_items(out, library.focus())?;
    Ok(None)
}

pub fn handle_queue(library: &mut Library, id: Option<i64>, out: &mut dyn Write) -> Handled {
    match id {
        Some(id) => {
            let item = library.toggle_queue(id)?;
            let state = if item.is_queued() { "queued" } else { "removed from the queue" };
            Ok(Some(format!("{} {state}", item.title)))
        }
        None => {
            for item in library.queue() {
                writeln!(out, "{}", format_item(item))?;
            }
            Ok(None)
        }
    }
}

pub fn handle_archive(library: &mut Library, id: i64, on: Option<String>) -> Handled {
    let date = match on {
        Some(raw) => parse_date_arg(&raw)?,
        None => today(),
    };
    let item = library.archive(id, date)?;
    Ok(Some(format!("Finished {} on {}", item.title, date.format(DATE_FORMAT))))
}

pub fn handle_unarchive(library: &mut Library, id: i64) -> Handled {
    let item = library.unarchive(id)?;
    Ok(Some(format!("{} is active again", item.title)))
}

pub fn handle_purchased(library: &mut Library, id: i64) -> Handled {
    let item = library.mark_purchased(id)?;
    Ok(Some(format!("{} removed from the wishlist", item.title)))
}

pub fn handle_again(library: &mut Library, id: i64) -> Handled {
    let item = library.re_experience(id)?;
    Ok(Some(format!(
        "Started {} again (ID: {})",
        item.title,
        item.id.unwrap_or_default()
    )))
}

pub fn handle_roll(
    library: &Library,
    kind: Kind,
    genre: Option<String>,
    mood: Option<Mood>,
    out: &mut dyn Write,
) -> Handled {
    match library.roll(kind, genre.as_deref(), mood)? {
        Some(item) => {
            writeln!(out, "{}", format_item(&item))?;
            Ok(None)
        }
        None => Ok(Some("Nothing to suggest".to_string())),
    }
}

pub fn handle_stats(library: &Library, year: Option<i32>, month: Option<u32>, out: &mut dyn Write) -> Handled {
    let year = year.unwrap_or_else(|| today().year());
    let stats = library.stats(year, month)?;
    let label = match month {
        Some(m) => format!("{year}-{m:02}"),
        None => year.to_string(),
    };
    writeln!(out, "Finished in {label}: {}", stats.total)?;
    for (kind, count) in &stats.by_kind {
        writeln!(out, "  {:<10} {}", kind.to_string(), count)?;
    }
    Ok(None)
}

pub fn handle_export(items: &[Item], dir: Option<PathBuf>, config: &Config) -> Handled {
    let dir = dir.unwrap_or_else(|| config.get_export_dir());
    let path = export_to_dir(&dir, today(), items)?;
    Ok(Some(format!("Exported {} item(s) to {}", items.len(), path.display())))
}

/// Run a single command. `Shell` is handled by the caller.
pub fn execute(command: Commands, library: &mut Library, config: &Config, out: &mut dyn Write) -> Handled {
    match command {
        Commands::Shell => Ok(Some("Already in the shell".to_string())),
        Commands::Add {
            title,
            creator,
            kind,
            genre,
            mood,
            year,
            sources,
            video_url,
            note,
            archived,
            finished,
        } => handle_add(
            library, title, creator, kind, genre, mood, year, sources, video_url, note, archived,
            finished,
        ),
        Commands::List { filter, json } => handle_list(library, &filter.to_filter(), json, out),
        Commands::Show { id, json } => handle_show(library, id, json, out),
        Commands::Edit {
            id,
            title,
            creator,
            kind,
            genre,
            mood,
            year,
            sources,
            video_url,
            note,
            clear,
        } => handle_edit(
            library, id, title, creator, kind, genre, mood, year, sources, video_url, note, clear,
        ),
        Commands::Delete { id, yes } => handle_delete(library, id, yes),
        Commands::Focus { id, yes } => handle_focus(library, id, yes),
        Commands::Focused => handle_focused(library, out),
        Commands::Queue { id } => handle_queue(library, id, out),
        Commands::Archive { id, on } => handle_archive(library, id, on),
        Commands::Unarchive { id } => handle_unarchive(library, id),
        Commands::Purchased { id } => handle_purchased(library, id),
        Commands::Again { id } => handle_again(library, id),
        Commands::Roll { kind, genre, mood } => handle_roll(library, kind, genre, mood, out),
        Commands::Stats { year, month } => handle_stats(library, year, month, out),
        Commands::Export { filter, dir } => {
            let items = library.search(&filter.to_filter())?;
            handle_export(&items, dir, config)
        }
    }
}

/// Split a shell line into words, honouring single and double quotes
pub fn split_words(line: &str) -> Result<Vec<String>, CliError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quote.is_some() {
        return Err(CliError::UnterminatedQuote);
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// List inside the shell: results go through the session so `more` can
/// reveal them a page at a time
fn shell_list(
    library: &Library,
    session: &mut Session,
    filter: ItemFilter,
    out: &mut dyn Write,
) -> Handled {
    if session.set_filter(filter) {
        tracing::debug!(filter = ?session.filter(), "filter changed");
    }
    let results = library.search(session.filter())?;
    session.set_results(results, library.count(session.filter())?);
    write_items(out, session.visible())?;

    let mut status = format!("{} of {} shown", session.visible().len(), session.results().len());
    if session.has_more() {
        status.push_str(", 'more' for the next page");
    }
    if session.is_truncated() {
        status.push_str(&format!(" ({} matches, refine the filters)", session.matched()));
    }
    Ok(Some(status))
}

fn shell_more(session: &mut Session, out: &mut dyn Write) -> Handled {
    if !session.has_more() {
        return Ok(Some("Nothing more to show".to_string()));
    }
    let page = session.reveal_more().to_vec();
    write_items(out, &page)?;
    Ok(Some(format!(
        "{} of {} shown",
        session.visible().len(),
        session.results().len()
    )))
}

/// Interactive loop. Errors become notices; only `quit`, `exit` or end of
/// input leave the loop.
pub fn run_shell<R: BufRead>(
    library: &mut Library,
    config: &Config,
    input: R,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let mut session = Session::new(config.page_size, config.notice_timeout_secs);
    let mut lines = input.lines();

    loop {
        session.expire_notice();
        if let Some(notice) = session.notice() {
            let marker = match notice.level {
                NoticeLevel::Info => "-",
                NoticeLevel::Error => "!",
            };
            writeln!(out, "{marker} {}", notice.message)?;
        }
        write!(out, "biblio> ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line?;

        let result = match split_words(&line) {
            Err(e) => Err(e),
            Ok(words) => match words.first().cloned().as_deref() {
                None => continue,
                Some("quit" | "exit") => break,
                Some("more") => shell_more(&mut session, out),
                Some(_) => match Cli::try_parse_from(std::iter::once("biblio".to_string()).chain(words)) {
                    Err(e) => {
                        // Help and usage errors are rendered by clap itself
                        write!(out, "{}", e.render())?;
                        continue;
                    }
                    Ok(cli) => match cli.command {
                        None | Some(Commands::Shell) => Ok(Some("Already in the shell".to_string())),
                        Some(Commands::List { filter, json: false }) => {
                            shell_list(library, &mut session, filter.to_filter(), out)
                        }
                        Some(Commands::Export { filter, dir })
                            if session.has_listing() && filter.to_filter().is_empty() =>
                        {
                            handle_export(session.results(), dir, config)
                        }
                        Some(command) => execute(command, library, config, out),
                    },
                },
            },
        };

        match result {
            Ok(Some(message)) => session.notify(NoticeLevel::Info, message),
            Ok(None) => session.clear_notice(),
            Err(e) => {
                tracing::debug!(error = %e, "shell command failed");
                session.notify(NoticeLevel::Error, e.to_string());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    fn library() -> Library {
        Library::open(Database::in_memory().unwrap(), 500).unwrap()
    }

    fn run(input: &str) -> (Library, String) {
        let mut lib = library();
        let mut out = Vec::new();
        run_shell(&mut lib, &Config::default(), input.as_bytes(), &mut out).unwrap();
        (lib, String::from_utf8(out).unwrap())
    }

    #[test]
    fn split_words_handles_quotes() {
        assert_eq!(
            split_words(r#"add "Il nome della rosa" 'Umberto Eco' --kind book"#).unwrap(),
            vec!["add", "Il nome della rosa", "Umberto Eco", "--kind", "book"]
        );
        assert_eq!(split_words("  ").unwrap(), Vec::<String>::new());
        assert_eq!(split_words("note \"\"").unwrap(), vec!["note", ""]);
        assert!(matches!(split_words("add \"Dune"), Err(CliError::UnterminatedQuote)));
    }

    #[test]
    fn cli_parses_add() {
        let cli = Cli::try_parse_from([
            "biblio", "add", "Dune", "Frank Herbert", "--kind", "Book", "--mood", "relax",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add { kind, mood, .. }) => {
                assert_eq!(kind, Kind::Book);
                assert_eq!(mood, Some(Mood::Relax));
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn prefix_flags_conflict() {
        assert!(Cli::try_parse_from([
            "biblio",
            "list",
            "--creator-prefix",
            "A",
            "--title-prefix",
            "B"
        ])
        .is_err());
    }

    #[test]
    fn filter_args_map_to_filter() {
        let args = FilterArgs {
            search: Some("  ".to_string()),
            kind: Some(Kind::Film),
            title_prefix: Some("L".to_string()),
            finished_month: Some(3),
            finished_year: Some(2024),
            ..Default::default()
        };
        let filter = args.to_filter();
        assert_eq!(filter.search, None);
        assert_eq!(filter.kind, Some(Kind::Film));
        assert_eq!(
            filter.prefix,
            Some(PrefixMatch {
                field: PrefixField::Title,
                prefix: "L".to_string()
            })
        );
        assert_eq!(filter.completed_month, Some(3));
    }

    #[test]
    fn add_with_finish_date_archives() {
        let mut lib = library();
        handle_add(
            &mut lib,
            "Dune".to_string(),
            "Frank Herbert".to_string(),
            Kind::Book,
            None,
            None,
            None,
            None,
            None,
            None,
            false,
            Some("2023-12-24".to_string()),
        )
        .unwrap();
        let item = &lib.items()[0];
        assert_eq!(item.status, Status::Archived);
        assert_eq!(item.completed_at, NaiveDate::from_ymd_opt(2023, 12, 24));
    }

    #[test]
    fn bad_date_is_reported() {
        let mut lib = library();
        let err = handle_archive(&mut lib, 1, Some("24/12/2023".to_string())).unwrap_err();
        assert!(matches!(err, CliError::DateParseError(_)));
    }

    #[test]
    fn delete_needs_yes() {
        let mut lib = library();
        lib.add(NewItem::new("Dune", "Frank Herbert", Kind::Book)).unwrap();
        assert!(matches!(
            handle_delete(&mut lib, 1, false),
            Err(CliError::NeedsConfirmation(_))
        ));
        handle_delete(&mut lib, 1, true).unwrap();
        assert!(lib.items().is_empty());
    }

    #[test]
    fn shell_runs_commands_and_survives_errors() {
        let (lib, out) = run(
            "add Dune \"Frank Herbert\" --kind book\n\
             queue 1\n\
             focus 42\n\
             list\n\
             quit\n",
        );
        assert!(lib.get(1).unwrap().is_queued());
        assert!(out.contains("- Added Dune (ID: 1)"));
        assert!(out.contains("! No item with id 42"));
        assert!(out.contains("Dune - Frank Herbert [book]"));
    }

    #[test]
    fn shell_unfocus_without_yes_is_a_notice() {
        let (lib, out) = run("add Dune Herbert -k book\nfocus 1\nfocus 1\n");
        assert!(lib.get(1).unwrap().is_focused);
        assert!(out.contains("needs confirmation, pass --yes"));
    }

    #[test]
    fn shell_reveals_pages_with_more() {
        let mut input = String::new();
        for i in 0..60 {
            input.push_str(&format!("add \"Book {i}\" Someone -k book\n"));
        }
        input.push_str("list\nmore\nmore\n");
        let (_, out) = run(&input);
        assert!(out.contains("50 of 60 shown, 'more' for the next page"));
        assert!(out.contains("60 of 60 shown"));
        assert!(out.contains("Nothing more to show"));
    }

    #[test]
    fn shell_reports_usage_errors_and_continues() {
        let (lib, out) = run("frobnicate\nadd Dune Herbert -k book\n");
        assert!(out.contains("frobnicate"));
        assert_eq!(lib.items().len(), 1);
    }
}
