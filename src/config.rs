use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::Parser;

use crate::session::Settings;
use crate::words::DEFAULT_DICTIONARY;

/// Environment variable consulted when `--dict` is not given.
pub const DICTIONARY_ENV: &str = "ALLITERATION_DICT";

#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "alliteration")]
#[command(about = "Interactively suggests names built from a base name and dictionary words")]
#[command(version)]
pub struct Config {
    /// Newline-delimited word list
    #[arg(
        short,
        long = "dict",
        env = DICTIONARY_ENV,
        default_value = DEFAULT_DICTIONARY
    )]
    pub dictionary: PathBuf,

    /// Suggestions per batch
    #[arg(
        short = 'n',
        long,
        default_value_t = 20,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub count: usize,

    /// Default maximum suggestion length offered at the prompt
    #[arg(
        short = 'l',
        long,
        default_value_t = 32,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_length: usize,

    /// Offer "no" as the default answer to the alliteration prompt
    #[arg(long)]
    pub no_alliteration: bool,
}

impl Config {
    pub fn settings(&self) -> Settings {
        Settings {
            count: self.count,
            max_length: self.max_length,
            alliteration: !self.no_alliteration,
        }
    }
}
