//! Argument parsing.
//!
//! The flags live in one static table; the `clap` command is generated from
//! it so help text, short and long forms stay in a single place.

use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};

const ABOUT: &str = "Yeet files to the yeet bin and restore them later.";
const USAGE: &str = "yeet [options] [file]";
const FILE_ARG: &str = "file";
const MODE_GROUP: &str = "mode";

/// What a flag does when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagAction {
    /// Boolean switch.
    Switch,
    /// Print the version and exit.
    Version,
}

#[derive(Debug, Clone, Copy)]
pub struct FlagSpec {
    pub id: &'static str,
    pub short: char,
    pub long: &'static str,
    pub help: &'static str,
    pub action: FlagAction,
    /// Selects an operation; at most one mode flag may be given.
    pub mode: bool,
}

pub const FLAGS: &[FlagSpec] = &[
    FlagSpec {
        id: "restore",
        short: 'r',
        long: "restore",
        help: "Restore a file from the yeet bin",
        action: FlagAction::Switch,
        mode: true,
    },
    FlagSpec {
        id: "list",
        short: 'l',
        long: "list",
        help: "List all yeeted files",
        action: FlagAction::Switch,
        mode: true,
    },
    FlagSpec {
        id: "empty",
        short: 'e',
        long: "empty",
        help: "Empty the yeet bin",
        action: FlagAction::Switch,
        mode: true,
    },
    FlagSpec {
        id: "yes",
        short: 'y',
        long: "yes",
        help: "Automatically confirm all prompts",
        action: FlagAction::Switch,
        mode: false,
    },
    FlagSpec {
        id: "version",
        short: 'v',
        long: "version",
        help: "Print the version and exit",
        action: FlagAction::Version,
        mode: false,
    },
];

/// Build the `clap` command from [`FLAGS`].
pub fn build_command() -> Command {
    let mut cmd = Command::new("yeet")
        .version(yeet_core::VERSION)
        .about(ABOUT)
        .override_usage(USAGE)
        .disable_version_flag(true)
        .arg(
            Arg::new(FILE_ARG)
                .help("The file to yeet or restore")
                .required(false),
        );

    for flag in FLAGS {
        let action = match flag.action {
            FlagAction::Switch => ArgAction::SetTrue,
            FlagAction::Version => ArgAction::Version,
        };
        cmd = cmd.arg(
            Arg::new(flag.id)
                .short(flag.short)
                .long(flag.long)
                .help(flag.help)
                .action(action),
        );
    }

    cmd.group(
        ArgGroup::new(MODE_GROUP)
            .args(FLAGS.iter().filter(|f| f.mode).map(|f| f.id))
            .multiple(false),
    )
}

/// The single thing one run of `yeet` does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Nothing to do; print usage.
    Usage,
    Yeet { file: String },
    Restore { file: String, assume_yes: bool },
    List,
    Empty { assume_yes: bool },
}

impl Invocation {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let file = matches.get_one::<String>(FILE_ARG).cloned();
        let assume_yes = matches.get_flag("yes");

        if matches.get_flag("list") {
            return Self::List;
        }
        if matches.get_flag("empty") {
            return Self::Empty { assume_yes };
        }
        match file {
            Some(file) if matches.get_flag("restore") => Self::Restore { file, assume_yes },
            Some(file) => Self::Yeet { file },
            None => Self::Usage,
        }
    }
}
