//! CLI argument parsing with clap.
//!
//! The operation is selected by a single-dash word (`-ls`, `-copy`, ...) in
//! first position, followed by the root directory and the operation's own
//! arguments. This module turns that into a [`dtree_core::Operation`].

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use dtree_core::config::{DEFAULT_COPY_CHUNK_SIZE, DEFAULT_MAX_DEPTH};
use dtree_core::{Extension, Operation, WalkConfig};

const USAGE: &str = "\
dtree -ls <root_dir>
       dtree -count-files <root_dir>
       dtree -count-dirs <root_dir>
       dtree -size <root_dir>
       dtree -ext <root_dir> <extension>
       dtree -delete <root_dir> <extension>
       dtree -copy <root_dir> <dest_dir> [exclude_extension]
       dtree -move <root_dir> <dest_dir>";

const AFTER_HELP: &str = "\
Extensions include the leading dot and match case-sensitively against the
suffix of a file name starting at its last '.', e.g. `.txt`.";

/// The operation selector in first position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OperationFlag {
    /// List every entry
    #[value(name = "-ls")]
    List,
    /// Count regular files
    #[value(name = "-count-files")]
    CountFiles,
    /// Count directories, the root included
    #[value(name = "-count-dirs")]
    CountDirs,
    /// Total size of regular files in bytes
    #[value(name = "-size")]
    Size,
    /// Print files with the given extension
    #[value(name = "-ext")]
    Ext,
    /// Delete files with the given extension
    #[value(name = "-delete")]
    Delete,
    /// Copy the tree, optionally skipping one extension
    #[value(name = "-copy")]
    Copy,
    /// Move the tree by renaming it
    #[value(name = "-move")]
    Move,
}

/// dtree - walk a directory tree and list, count, size, find, delete, copy or move its entries
#[derive(Parser, Debug)]
#[command(
    name = "dtree",
    about = "Walk a directory tree and apply one operation to every entry",
    override_usage = USAGE,
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Operation to perform
    #[arg(value_enum, value_name = "OPTION", allow_hyphen_values = true)]
    pub operation: OperationFlag,

    /// Root of the tree to walk
    #[arg(value_name = "ROOT_DIR")]
    pub root: PathBuf,

    /// Operation arguments: an extension, or a destination and optional excluded extension
    #[arg(value_name = "ARGS", num_args = 0..=2)]
    pub args: Vec<String>,

    /// Maximum directory depth to descend into
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Chunk size in bytes used when copying file contents
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_COPY_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Diagnostic log level written to stderr (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: tracing::Level,
}

impl Cli {
    /// Checks the argument count for the selected operation and builds it.
    ///
    /// # Errors
    ///
    /// Returns a clap usage error for a wrong number of arguments or an
    /// extension that does not start with `.`.
    pub fn operation(&self) -> Result<Operation, clap::Error> {
        let args = self.args.as_slice();
        let op = match (self.operation, args) {
            (OperationFlag::List, []) => Operation::List,
            (OperationFlag::CountFiles, []) => Operation::CountFiles,
            (OperationFlag::CountDirs, []) => Operation::CountDirs,
            (OperationFlag::Size, []) => Operation::Size,
            (OperationFlag::Ext, [ext]) => Operation::FindByExtension(parse_extension(ext)?),
            (OperationFlag::Delete, [ext]) => Operation::DeleteByExtension(parse_extension(ext)?),
            (OperationFlag::Copy, [dest]) => Operation::CopyTree {
                destination: PathBuf::from(dest),
                exclude: None,
            },
            (OperationFlag::Copy, [dest, exclude]) => Operation::CopyTree {
                destination: PathBuf::from(dest),
                exclude: Some(parse_extension(exclude)?),
            },
            (OperationFlag::Move, [dest]) => Operation::MoveTree {
                destination: PathBuf::from(dest),
            },
            (flag, _) => {
                let name = flag
                    .to_possible_value()
                    .map(|v| v.get_name().to_string())
                    .unwrap_or_default();
                return Err(Cli::command().error(
                    ErrorKind::WrongNumberOfValues,
                    format!("invalid option or missing arguments for {name}"),
                ));
            }
        };
        Ok(op)
    }

    pub fn walk_config(&self) -> WalkConfig {
        WalkConfig::default()
            .with_max_depth(self.max_depth)
            .with_copy_chunk_size(self.chunk_size)
    }
}

fn parse_extension(raw: &str) -> Result<Extension, clap::Error> {
    Extension::new(raw).map_err(|e| Cli::command().error(ErrorKind::InvalidValue, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("dtree").chain(args.iter().copied()))
    }

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_single_dash_operations() {
        let cli = parse(&["-ls", "root"]).unwrap();
        assert_eq!(cli.operation, OperationFlag::List);
        assert_eq!(cli.root, PathBuf::from("root"));
        assert_eq!(cli.operation().unwrap(), Operation::List);

        let cli = parse(&["-count-files", "root"]).unwrap();
        assert_eq!(cli.operation().unwrap(), Operation::CountFiles);

        let cli = parse(&["-count-dirs", "root"]).unwrap();
        assert_eq!(cli.operation().unwrap(), Operation::CountDirs);

        let cli = parse(&["-size", "root"]).unwrap();
        assert_eq!(cli.operation().unwrap(), Operation::Size);
    }

    #[test]
    fn parses_extension_operations() {
        let cli = parse(&["-ext", "root", ".txt"]).unwrap();
        assert_eq!(
            cli.operation().unwrap(),
            Operation::FindByExtension(Extension::new(".txt").unwrap())
        );

        let cli = parse(&["-delete", "root", ".log"]).unwrap();
        assert_eq!(
            cli.operation().unwrap(),
            Operation::DeleteByExtension(Extension::new(".log").unwrap())
        );
    }

    #[test]
    fn parses_copy_with_and_without_exclusion() {
        let cli = parse(&["-copy", "src", "dst"]).unwrap();
        assert_eq!(
            cli.operation().unwrap(),
            Operation::CopyTree {
                destination: PathBuf::from("dst"),
                exclude: None,
            }
        );

        let cli = parse(&["-copy", "src", "dst", ".tmp"]).unwrap();
        assert_eq!(
            cli.operation().unwrap(),
            Operation::CopyTree {
                destination: PathBuf::from("dst"),
                exclude: Some(Extension::new(".tmp").unwrap()),
            }
        );
    }

    #[test]
    fn parses_move() {
        let cli = parse(&["-move", "src", "dst"]).unwrap();
        assert_eq!(
            cli.operation().unwrap(),
            Operation::MoveTree {
                destination: PathBuf::from("dst"),
            }
        );
    }

    #[test]
    fn missing_root_is_usage_error() {
        assert!(parse(&["-ls"]).is_err());
    }

    #[test]
    fn unknown_operation_is_usage_error() {
        assert!(parse(&["-frobnicate", "root"]).is_err());
    }

    #[test]
    fn wrong_arity_is_usage_error() {
        let err = parse(&["-ext", "root"]).unwrap().operation().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WrongNumberOfValues);

        let err = parse(&["-ls", "root", "extra"]).unwrap().operation().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WrongNumberOfValues);

        let err = parse(&["-move", "src"]).unwrap().operation().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WrongNumberOfValues);
    }

    #[test]
    fn too_many_arguments_rejected_by_parser() {
        assert!(parse(&["-copy", "a", "b", ".c", "d"]).is_err());
    }

    #[test]
    fn extension_without_dot_is_invalid_value() {
        let err = parse(&["-ext", "root", "txt"]).unwrap().operation().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn long_options_feed_walk_config() {
        let cli = parse(&["--max-depth", "5", "--chunk-size", "64", "-ls", "root"]).unwrap();
        let config = cli.walk_config();
        assert_eq!(config.max_depth(), 5);
        assert_eq!(config.copy_chunk_size(), 64);
    }

    #[test]
    fn defaults_match_core_defaults() {
        let cli = parse(&["-size", "root"]).unwrap();
        assert_eq!(cli.walk_config(), WalkConfig::default());
        assert_eq!(cli.log_level, tracing::Level::WARN);
    }

    #[test]
    fn log_level_is_parsed() {
        let cli = parse(&["--log-level", "debug", "-ls", "root"]).unwrap();
        assert_eq!(cli.log_level, tracing::Level::DEBUG);
    }
}
