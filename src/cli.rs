use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::Parser;

use crate::data::loader::DEFAULT_FALLBACK_ROOTS;

pub const DEFAULT_PEAK_COUNT: usize = 2;

/// Largest peak count the viewer searches for.
pub const MAX_PEAKS: usize = 12;

#[derive(Debug, Parser)]
#[command(name = "sweep-viewer", about = "Display a saved parameter sweep slice with its peaks")]
pub struct Cli {
    /// Directory of saved output files; searched under the fallback roots if not found
    pub savefile: PathBuf,

    /// Absorber width (w) to display; defaults to the largest computed value
    #[arg(short = 'w', long, allow_negative_numbers = true)]
    pub width: Option<f64>,

    /// Number of peaks to search for in the parameter space
    #[arg(
        short = 'n',
        long,
        default_value_t = DEFAULT_PEAK_COUNT,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_PEAKS as u64)
    )]
    pub npeaks: usize,

    /// Directory searched for `savefile` when it does not exist as given (repeatable)
    #[arg(long = "fallback-root")]
    pub fallback_roots: Vec<PathBuf>,
}

/// Settings the viewer runs with, after defaults are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerOptions {
    pub savefile: PathBuf,
    pub width: Option<f64>,
    pub peak_count: usize,
    pub fallback_roots: Vec<PathBuf>,
}

impl From<Cli> for ViewerOptions {
    fn from(cli: Cli) -> Self {
        let fallback_roots = if cli.fallback_roots.is_empty() {
            DEFAULT_FALLBACK_ROOTS.iter().map(PathBuf::from).collect()
        } else {
            cli.fallback_roots
        };
        ViewerOptions {
            savefile: cli.savefile,
            width: cli.width,
            peak_count: cli.npeaks,
            fallback_roots,
        }
    }
}

impl ViewerOptions {
    pub fn from_args<I, S>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<std::ffi::OsString> + Clone,
    {
        Cli::try_parse_from(args).map(Into::into)
    }

    /// Name shown in titles: the directory as the user gave it.
    pub fn title(&self) -> String {
        self.savefile.display().to_string()
    }
}
