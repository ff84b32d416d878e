//! Terminal commands.

use roster_engine::{RecordId, SortSpec, StudentDraft, StudentPatch};
use std::path::PathBuf;

/// One line of user input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Add(StudentDraft),
    Edit(RecordId, StudentPatch),
    Delete(RecordId),
    BulkDelete,
    Undo,
    Clone(RecordId),
    Toggle(RecordId),
    SelectPage(bool),
    Search(String),
    Filter(Option<String>),
    Sort(SortSpec),
    Page(usize),
    Next,
    Prev,
    PageSize(usize),
    Import(PathBuf),
    Export(PathBuf),
    Majors,
    Chart,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

impl Command {
    /// Whether the page should be redrawn after this command.
    pub fn redraws(&self) -> bool {
        !matches!(
            self,
            Command::Export(_) | Command::Majors | Command::Chart | Command::Help | Command::Quit
        )
    }
}

/// Parse one input line.
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" | "list" | "ls" => Ok(Command::List),
        "add" => parse_add(rest),
        "edit" => parse_edit(rest),
        "del" | "delete" => required(rest, "del <id>").map(Command::Delete),
        "bulk" => Ok(Command::BulkDelete),
        "undo" => Ok(Command::Undo),
        "clone" => required(rest, "clone <id>").map(Command::Clone),
        "check" => required(rest, "check <id>").map(Command::Toggle),
        "all" => match rest {
            "on" => Ok(Command::SelectPage(true)),
            "off" => Ok(Command::SelectPage(false)),
            _ => Err(CommandError::Usage("all on|off")),
        },
        "search" => Ok(Command::Search(rest.to_string())),
        "filter" => Ok(Command::Filter(match rest {
            "" | "-" => None,
            major => Some(major.to_string()),
        })),
        "sort" => rest
            .parse::<SortSpec>()
            .map(Command::Sort)
            .map_err(|_| CommandError::Usage("sort name|email|major_asc|desc")),
        "page" => number(rest, "page <n>").map(Command::Page),
        "next" => Ok(Command::Next),
        "prev" => Ok(Command::Prev),
        "size" => number(rest, "size <n>").map(Command::PageSize),
        "import" => required(rest, "import <path>").map(|p| Command::Import(p.into())),
        "export" => required(rest, "export <path>").map(|p| Command::Export(p.into())),
        "majors" => Ok(Command::Majors),
        "chart" => Ok(Command::Chart),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn required(rest: &str, usage: &'static str) -> Result<String, CommandError> {
    if rest.is_empty() {
        Err(CommandError::Usage(usage))
    } else {
        Ok(rest.to_string())
    }
}

fn number(rest: &str, usage: &'static str) -> Result<usize, CommandError> {
    rest.parse().map_err(|_| CommandError::Usage(usage))
}

fn parse_add(rest: &str) -> Result<Command, CommandError> {
    let mut parts = rest.split('|');
    let name = parts.next().unwrap_or_default();
    let email = parts.next().unwrap_or_default();
    let major = parts.next().unwrap_or_default();
    if parts.next().is_some() {
        return Err(CommandError::Usage("add name|email|major"));
    }
    Ok(Command::Add(StudentDraft::new(name, email, major)))
}

fn parse_edit(rest: &str) -> Result<Command, CommandError> {
    const USAGE: &str = "edit <id> name=..|email=..|major=..";
    let (id, fields) = rest.split_once(char::is_whitespace).ok_or(CommandError::Usage(USAGE))?;

    let mut patch = StudentPatch::default();
    for field in fields.split('|') {
        let (key, value) = field.split_once('=').ok_or(CommandError::Usage(USAGE))?;
        let value = Some(value.trim().to_string());
        match key.trim() {
            "name" => patch.name = value,
            "email" => patch.email = value,
            "major" => patch.major = value,
            _ => return Err(CommandError::Usage(USAGE)),
        }
    }
    Ok(Command::Edit(id.to_string(), patch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_engine::SortKey;

    #[test]
    fn parses_add() {
        assert_eq!(
            parse("add Sok Dara | dara@example.com | Business").unwrap(),
            Command::Add(StudentDraft::new("Sok Dara", "dara@example.com", "Business"))
        );
        assert_eq!(
            parse("add Sok Dara|dara@example.com").unwrap(),
            Command::Add(StudentDraft::new("Sok Dara", "dara@example.com", ""))
        );
        assert!(parse("add a|b|c|d").is_err());
    }

    #[test]
    fn parses_edit() {
        let cmd = parse("edit s_1 major=Arts|name=Malis Chea").unwrap();
        let expected = StudentPatch {
            name: Some("Malis Chea".into()),
            major: Some("Arts".into()),
            ..Default::default()
        };
        assert_eq!(cmd, Command::Edit("s_1".into(), expected));
        assert!(parse("edit s_1").is_err());
        assert!(parse("edit s_1 age=3").is_err());
    }

    #[test]
    fn parses_view_commands() {
        assert_eq!(parse("").unwrap(), Command::List);
        assert_eq!(parse("search  dara ").unwrap(), Command::Search("dara".into()));
        assert_eq!(parse("search").unwrap(), Command::Search(String::new()));
        assert_eq!(parse("filter -").unwrap(), Command::Filter(None));
        assert_eq!(
            parse("filter Computer Science").unwrap(),
            Command::Filter(Some("Computer Science".into()))
        );
        assert_eq!(
            parse("sort email_desc").unwrap(),
            Command::Sort(SortSpec::desc(SortKey::Email))
        );
        assert_eq!(parse("page 3").unwrap(), Command::Page(3));
        assert_eq!(parse("size 20").unwrap(), Command::PageSize(20));
        assert_eq!(parse("all on").unwrap(), Command::SelectPage(true));
    }

    #[test]
    fn reports_usage_and_unknown() {
        assert_eq!(parse("del"), Err(CommandError::Usage("del <id>")));
        assert!(matches!(parse("page two"), Err(CommandError::Usage(_))));
        assert!(matches!(parse("sort age_asc"), Err(CommandError::Usage(_))));
        assert_eq!(parse("frobnicate"), Err(CommandError::Unknown("frobnicate".into())));
    }

    #[test]
    fn redraw_policy() {
        assert!(parse("undo").unwrap().redraws());
        assert!(!parse("chart").unwrap().redraws());
    }
}
