// crates/daisho-core/src/command.rs - REPL command parsing
//
// Turns one line typed at the `daisho ->>` prompt into a Command.
//
// The line is split on whitespace and the first token picks the command.
// Every command checks its own argument count and argument values; a line
// that fails those checks produces a UsageError whose Display is the usage
// text for that command, which the shell prints before prompting again.
//
// Unknown first tokens are not errors: they become Command::Unknown and the
// shell answers with the general help text.

use std::fmt;
use thiserror::Error;

use crate::entry::{normalize_tag, parse_date, EntryKind, Priority};
use crate::filter::ListFilter;

/// Command words, in the order the help text lists them
pub const COMMANDS: [&str; 9] = [
    "add", "list", "edit", "open", "rm", "del", "search", "help", "quit",
];

/// Words accepted where an entry kind is expected
pub const KINDS: [&str; 2] = ["note", "task"];

/// First words accepted after `list`
pub const LIST_FILTERS: [&str; 8] = [
    "all", "today", "tomorrow", "date", "tags", "prio", "trash", "pending",
];

/// General help text
pub const USAGE: &str = "
Usage:
1. add  [note] | [task]            - Add a new note or task.
2. list [all] | [today] | [tomorrow] | [pending] | [trash]
        [date DD-MM-YYYY] | [tags #tag] | [prio #high|#med|#low]
                                   - List notes and tasks.
3. edit [note] | [task]  <number>  - Edit a note or task.
4. open [note] | [task]  <number>  - Open a note or task to show more info.
5. rm   [note] | [task]  <number>  - Remove a note or task (moves it to trash).
6. del  [note] | [task]  <number>  - Delete a note or task permanently.
7. search <keyword>                - Search for a keyword.

 *  help                           - Prints this help message.
 *  quit                           - Quits Daisho.
";

/// Argument errors, displayed as the usage text of the offending command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error(" - `add` takes either `note` or `task`, as argument.")]
    Add,

    #[error(
        " - `list` accepts the following arguments:
        * all [default]
        * today
        * tomorrow
        * date DD-MM-YYYY
        * tags #tag
        * prio #high | #med | #low
        * trash
        * pending"
    )]
    List,

    #[error(
        " - `edit` accepts `note` or `task`, and a number.
    Example:
        ->> edit note 4  # To edit the 4th note in the list."
    )]
    Edit,

    #[error(
        " - `open` accepts `note` or `task`, and a number.
    Example:
        ->> open task 3  # To open the 3rd task in the list."
    )]
    Open,

    #[error(
        " - `rm` accepts `note` or `task`, and a number.
    Example:
        ->> rm note 2  # To move the 2nd note to the trash."
    )]
    Remove,

    #[error(
        " - `del` accepts `note` or `task`, and a number.
    Example:
        ->> del task 1  # To delete the 1st task permanently."
    )]
    Delete,

    #[error(
        " - `search` accepts a keyword to search for.
    It returns the notes and tasks which contain the keyword."
    )]
    Search,
}

/// Addresses one entry by kind and its 1-based position in the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector {
    pub kind: EntryKind,
    pub number: usize,
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.kind, self.number)
    }
}

/// A validated REPL command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank line
    Empty,
    Add(EntryKind),
    List(ListFilter),
    Edit(Selector),
    Open(Selector),
    Remove(Selector),
    Delete(Selector),
    Search(String),
    Help,
    Quit,
    /// First token is not a command word
    Unknown(String),
}

impl Command {
    /// Parse one input line
    pub fn parse(line: &str) -> Result<Self, UsageError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((first, args)) = tokens.split_first() else {
            return Ok(Self::Empty);
        };

        match first.to_lowercase().as_str() {
            "add" => parse_add(args),
            "list" => parse_list(args).map(Self::List),
            "edit" => parse_selector(args, UsageError::Edit).map(Self::Edit),
            "open" => parse_selector(args, UsageError::Open).map(Self::Open),
            "rm" => parse_selector(args, UsageError::Remove).map(Self::Remove),
            "del" => parse_selector(args, UsageError::Delete).map(Self::Delete),
            "search" if args.is_empty() => Err(UsageError::Search),
            "search" => Ok(Self::Search(args.join(" "))),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            _ => Ok(Self::Unknown(first.to_string())),
        }
    }

    /// Name used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Add(_) => "add",
            Self::List(_) => "list",
            Self::Edit(_) => "edit",
            Self::Open(_) => "open",
            Self::Remove(_) => "rm",
            Self::Delete(_) => "del",
            Self::Search(_) => "search",
            Self::Help => "help",
            Self::Quit => "quit",
            Self::Unknown(_) => "unknown",
        }
    }
}

fn parse_add(args: &[&str]) -> Result<Command, UsageError> {
    match args {
        [kind] => kind
            .parse::<EntryKind>()
            .map(Command::Add)
            .map_err(|_| UsageError::Add),
        _ => Err(UsageError::Add),
    }
}

fn parse_list(args: &[&str]) -> Result<ListFilter, UsageError> {
    let lowered: Vec<String> = args.iter().map(|a| a.to_lowercase()).collect();
    let lowered: Vec<&str> = lowered.iter().map(String::as_str).collect();

    match lowered.as_slice() {
        [] | ["all"] => Ok(ListFilter::All),
        ["today"] => Ok(ListFilter::Today),
        ["tomorrow"] => Ok(ListFilter::Tomorrow),
        ["trash"] => Ok(ListFilter::Trash),
        ["pending"] => Ok(ListFilter::Pending),
        ["date", date] => parse_date(date)
            .map(ListFilter::Date)
            .map_err(|_| UsageError::List),
        ["tags" | "tag", tag] => normalize_tag(tag)
            .map(ListFilter::Tag)
            .map_err(|_| UsageError::List),
        ["prio", priority] => priority
            .parse::<Priority>()
            .map(ListFilter::Priority)
            .map_err(|_| UsageError::List),
        _ => Err(UsageError::List),
    }
}

fn parse_selector(args: &[&str], usage: UsageError) -> Result<Selector, UsageError> {
    let [kind, number] = args else {
        return Err(usage);
    };

    let kind = kind.parse::<EntryKind>().map_err(|_| usage.clone())?;
    let number = number
        .trim_start_matches('#')
        .parse::<usize>()
        .ok()
        .filter(|n| *n >= 1)
        .ok_or(usage)?;

    Ok(Selector { kind, number })
}
