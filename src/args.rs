use clap::Parser;

/// This is a weighted raffle program.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the raffle: the participants file, the number of draws,
    /// the random seed and the animation settings. All the settings can also be passed directly on the command line.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The Excel file (.xlsx or .xls) with the participants. Column A is the code, column B the name and
    /// column C the weight. The first row is always skipped. Setting this option overrides the file that may be
    /// specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default 1) The number of winners to draw one after the other. A participant never wins twice.
    #[clap(short = 'n', long, value_parser)]
    pub draws: Option<u32>,

    /// (integer) If specified, the draws are reproducible: the same file and the same seed always give the same
    /// winners.
    #[clap(long, value_parser)]
    pub seed: Option<u64>,

    /// If passed as an argument, the winners are shown directly, without shuffling names first.
    #[clap(long, takes_value = false)]
    pub no_animation: bool,

    /// (default 3000) The duration of the shuffle before a winner is revealed, in milliseconds.
    #[clap(long, value_parser)]
    pub reveal_ms: Option<u64>,

    /// (default 50) The time between two names of the shuffle, in milliseconds.
    #[clap(long, value_parser)]
    pub tick_ms: Option<u64>,

    /// (file path, 'stdout' or empty) If specified, the summary of the draws will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing the summary of previous draws in JSON format. If provided, fxraffle
    /// will check that the draws match the reference (timestamps excepted). This is only useful with a seed.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard error.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
