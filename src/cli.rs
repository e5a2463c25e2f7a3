//! Command-line interface for sessionfile.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

use tracing::info;

use crate::error::SessionError;
use crate::session::SessionStore;

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Directory holding the session files.
    pub dir: Option<PathBuf>,
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
    /// Command to run.
    pub command: Option<Command>,
}

/// A session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a session and print its id.
    New,
    /// Print the value stored under a key.
    Get { id: String, key: String },
    /// Replace the value stored under a key.
    Set {
        id: String,
        key: String,
        value: String,
    },
    /// Append to the value stored under a key.
    Append {
        id: String,
        key: String,
        value: String,
    },
    /// Remove a key.
    Remove { id: String, key: String },
    /// Remove every key.
    Unset { id: String },
    /// Print every entry.
    Dump { id: String },
}

impl Command {
    /// Build a command from positional words.
    fn from_words(words: Vec<String>) -> Result<Option<Self>, ArgsError> {
        let mut words = words.into_iter();
        let Some(name) = words.next() else {
            return Ok(None);
        };

        let mut next = |what: &'static str| words.next().ok_or(ArgsError::MissingArgument(what));

        let command = match name.as_str() {
            "new" => Command::New,
            "get" => Command::Get {
                id: next("ID")?,
                key: next("KEY")?,
            },
            "set" => Command::Set {
                id: next("ID")?,
                key: next("KEY")?,
                value: next("VALUE")?,
            },
            "append" => Command::Append {
                id: next("ID")?,
                key: next("KEY")?,
                value: next("VALUE")?,
            },
            "remove" => Command::Remove {
                id: next("ID")?,
                key: next("KEY")?,
            },
            "unset" => Command::Unset { id: next("ID")? },
            "dump" => Command::Dump { id: next("ID")? },
            _ => return Err(ArgsError::UnknownCommand(name)),
        };

        if let Some(extra) = words.next() {
            return Err(ArgsError::UnexpectedArgument(extra));
        }

        Ok(Some(command))
    }
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut words = Vec::new();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('d') | Long("dir") => {
                result.dir = Some(parser.value()?.parse()?);
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) => {
                words.push(val.string()?);
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    result.command = Command::from_words(words)?;
    Ok(result)
}

/// Run a command against `store`, writing its output to `out`.
///
/// Mutating commands close the session, so the change is flushed before
/// this returns.
pub fn run<W: Write, const LEN: usize>(
    command: &Command,
    store: &mut SessionStore<LEN>,
    out: &mut W,
) -> crate::Result<()> {
    match command {
        Command::New => {
            let mut session = store.create()?;
            session.close()?;
            info!(id = %session.id(), "new session");
            writeln!(out, "{}", session.id())?;
        }
        Command::Get { id, key } => {
            let session = store.resume(id)?;
            let value = session
                .lookup(key)
                .ok_or_else(|| SessionError::KeyNotFound(key.clone()))?;
            writeln!(out, "{value}")?;
        }
        Command::Set { id, key, value } => {
            let mut session = store.resume(id)?;
            session.set(key, value.as_str());
            session.close()?;
        }
        Command::Append { id, key, value } => {
            let mut session = store.resume(id)?;
            session.append(key, value);
            session.close()?;
        }
        Command::Remove { id, key } => {
            let mut session = store.resume(id)?;
            session
                .remove(key)
                .ok_or_else(|| SessionError::KeyNotFound(key.clone()))?;
            session.close()?;
        }
        Command::Unset { id } => {
            let mut session = store.resume(id)?;
            session.unset();
            session.close()?;
        }
        Command::Dump { id } => {
            let session = store.resume(id)?;
            write!(out, "{session}")?;
        }
    }
    Ok(())
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"sessionfile {version}
File-backed key/value sessions

USAGE:
    sessionfile [OPTIONS] <COMMAND>

COMMANDS:
    new                         Create a session and print its id
    get <ID> <KEY>              Print the value under KEY
    set <ID> <KEY> <VALUE>      Replace the value under KEY
    append <ID> <KEY> <VALUE>   Append VALUE to the value under KEY
    remove <ID> <KEY>           Remove KEY
    unset <ID>                  Remove every key
    dump <ID>                   Print every entry

OPTIONS:
    -d, --dir <DIR>         Directory holding session files [default: .]
    -c, --config <FILE>     Path to configuration file (JSON)
    -l, --log-level <LVL>   Log level (error, warn, info, debug, trace)
    -h, --help              Print help
    -V, --version           Print version

ENVIRONMENT VARIABLES:
    SESSIONFILE_DIR         Session directory (overrides config)
    SESSIONFILE_LOG_LEVEL   Log level (overrides config)
    RUST_LOG                Alternative log level setting

EXAMPLES:
    # Create a session in the current directory
    sessionfile new

    # Store and read back a value
    sessionfile set Ab3dE5gH9k user alice
    sessionfile get Ab3dE5gH9k user

    # Keep sessions in a dedicated directory
    sessionfile -d /var/lib/sessions dump Ab3dE5gH9k
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("sessionfile {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug, thiserror::Error)]
pub enum ArgsError {
    /// Lexopt parsing error.
    #[error("{0}")]
    Lexopt(#[from] lexopt::Error),
    /// Unknown command name.
    #[error("unknown command: '{0}'")]
    UnknownCommand(String),
    /// A command is missing a positional argument.
    #[error("missing argument: <{0}>")]
    MissingArgument(&'static str),
    /// Unexpected positional argument.
    #[error("unexpected argument: '{0}'")]
    UnexpectedArgument(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(args: &[&str]) -> Vec<OsString> {
        std::iter::once("sessionfile")
            .chain(args.iter().copied())
            .map(OsString::from)
            .collect()
    }

    #[test]
    fn test_default_args() {
        let result = parse_args_from(args(&[])).unwrap();
        assert!(result.dir.is_none());
        assert!(result.config.is_none());
        assert!(result.command.is_none());
        assert!(!result.help);
    }

    #[test]
    fn test_new_command() {
        let result = parse_args_from(args(&["new"])).unwrap();
        assert_eq!(result.command, Some(Command::New));
    }

    #[test]
    fn test_set_command() {
        let result = parse_args_from(args(&["set", "Ab3dE5gH9k", "user", "alice"])).unwrap();
        assert_eq!(
            result.command,
            Some(Command::Set {
                id: "Ab3dE5gH9k".into(),
                key: "user".into(),
                value: "alice".into(),
            })
        );
    }

    #[test]
    fn test_options_around_command() {
        let result =
            parse_args_from(args(&["-d", "/tmp/s", "dump", "Ab3dE5gH9k", "-l", "debug"])).unwrap();
        assert_eq!(result.dir, Some(PathBuf::from("/tmp/s")));
        assert_eq!(result.log_level, Some("debug".to_string()));
        assert_eq!(
            result.command,
            Some(Command::Dump {
                id: "Ab3dE5gH9k".into()
            })
        );
    }

    #[test]
    fn test_long_options() {
        let result = parse_args_from(args(&["--dir", "/srv", "--config", "/etc/s.json"])).unwrap();
        assert_eq!(result.dir, Some(PathBuf::from("/srv")));
        assert_eq!(result.config, Some(PathBuf::from("/etc/s.json")));
    }

    #[test]
    fn test_value_after_double_dash() {
        let result = parse_args_from(args(&["set", "Ab3dE5gH9k", "n", "--", "-5"])).unwrap();
        assert!(matches!(
            result.command,
            Some(Command::Set { ref value, .. }) if value == "-5"
        ));
    }

    #[test]
    fn test_help_flag() {
        assert!(parse_args_from(args(&["-h"])).unwrap().help);
        assert!(parse_args_from(args(&["--help"])).unwrap().help);
    }

    #[test]
    fn test_version_flag() {
        assert!(parse_args_from(args(&["-V"])).unwrap().version);
        assert!(parse_args_from(args(&["--version"])).unwrap().version);
    }

    #[test]
    fn test_missing_argument() {
        let err = parse_args_from(args(&["get", "Ab3dE5gH9k"])).unwrap_err();
        assert!(matches!(err, ArgsError::MissingArgument("KEY")));
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_args_from(args(&["destroy"])).unwrap_err();
        assert!(matches!(err, ArgsError::UnknownCommand(ref c) if c == "destroy"));
    }

    #[test]
    fn test_extra_argument() {
        let err = parse_args_from(args(&["unset", "Ab3dE5gH9k", "extra"])).unwrap_err();
        assert!(matches!(err, ArgsError::UnexpectedArgument(ref a) if a == "extra"));
    }

    #[test]
    fn test_unknown_option() {
        assert!(parse_args_from(args(&["--bogus"])).is_err());
    }
}
