use clap::{Parser, Subcommand, ValueEnum};
use kernalytics::{
    Filter, GroupIndex, KernError, KerningSession, PairTable, Report, SessionBuilder, UfoMaster,
    filter_by_items,
};
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FilterKind {
    /// Every kerned pair
    All,
    /// Pairs between two glyphs
    Single,
    /// Pairs with the same value in every master
    Same,
    /// Pairs that are zero or unset everywhere
    Zero,
    /// Pairs with the largest positive and negative values
    Largest,
    /// Pairs with the widest spread between masters
    Gamut,
    /// Pairs with one value far above the others
    Outliers,
    /// Exceptions to group kerning
    Exceptions,
    /// Pairs with a negligible average value
    Small,
}

impl From<FilterKind> for Filter {
    fn from(kind: FilterKind) -> Self {
        match kind {
            FilterKind::All => Filter::All,
            FilterKind::Single => Filter::SinglePairs,
            FilterKind::Same => Filter::SameValue,
            FilterKind::Zero => Filter::ZeroValue,
            FilterKind::Largest => Filter::LargestValues,
            FilterKind::Gamut => Filter::HighGamut,
            FilterKind::Outliers => Filter::Outliers,
            FilterKind::Exceptions => Filter::Exceptions,
            FilterKind::Small => Filter::SmallAverage,
        }
    }
}

#[derive(Parser)]
#[command(name = "kernalytics")]
#[command(about = "Analyse kerning across the masters of a font family", long_about = None)]
struct Args {
    /// Log more; repeat for trace output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Order the UFOs, OTFs or TTFs in a directory by style name
    Sort {
        /// Directory to search for font sources
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Keep italics next to their uprights
        #[arg(short, long)]
        italics_interspersed: bool,
    },
    /// Combine the kerning of several UFO masters and list suspicious pairs
    Report {
        /// UFO masters, one per slot
        #[arg(value_name = "UFO", required = true)]
        ufos: Vec<PathBuf>,

        /// List the pairs of one filter instead of the summary
        #[arg(short, long, value_enum)]
        filter: Option<FilterKind>,

        /// Order the masters by style name first
        #[arg(short, long)]
        sort: bool,

        /// Keep italics next to their uprights when sorting
        #[arg(short, long)]
        italics_interspersed: bool,

        /// Only pairs whose left side is this glyph or its group
        #[arg(long, value_name = "GLYPH")]
        left: Option<String>,

        /// Only pairs whose right side is this glyph or its group
        #[arg(long, value_name = "GLYPH")]
        right: Option<String>,

        /// Factor for the outlier filter
        #[arg(long, default_value_t = 4.)]
        outlier_factor: f64,

        /// Approximate number of high-gamut pairs
        #[arg(long, default_value_t = 100)]
        gamut_amount: usize,

        /// Number of long-distance pairs, both signs together
        #[arg(long, default_value_t = 200)]
        largest_amount: usize,

        /// Average value below which pairs count as negligible
        #[arg(long, default_value_t = 5.)]
        small_average: f64,
    },
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let result = match args.command {
        Command::Sort {
            dir,
            italics_interspersed,
        } => sort(&dir, italics_interspersed),
        Command::Report {
            ufos,
            filter,
            sort,
            italics_interspersed,
            left,
            right,
            outlier_factor,
            gamut_amount,
            largest_amount,
            small_average,
        } => {
            let builder = SessionBuilder::new()
                .sort_masters(sort)
                .italics_interspersed(italics_interspersed)
                .outlier_factor(outlier_factor)
                .gamut_amount(gamut_amount)
                .largest_amount(largest_amount)
                .small_average_threshold(small_average);
            load_masters(&ufos).map(|masters| {
                let session = builder.build(masters);
                report(&session, filter, left.as_deref(), right.as_deref())
            })
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn sort(dir: &Path, italics_interspersed: bool) -> Result<(), KernError> {
    let paths = kernalytics::font_paths(dir)?;
    if paths.is_empty() {
        warn!("no UFOs, OTFs or TTFs found in {:?}", dir);
        return Ok(());
    }

    println!("unsorted:");
    for path in &paths {
        println!("  {}", file_name(path));
    }

    let sorted = kernalytics::sort_font_paths(dir, italics_interspersed)?;
    println!("sorted:");
    for path in &sorted.sorted {
        println!("  {}", file_name(path));
    }
    for path in &sorted.unsortable {
        warn!("could not sort {}", path.display());
        println!("  {}", file_name(path));
    }
    Ok(())
}

fn load_masters(paths: &[PathBuf]) -> Result<Vec<UfoMaster>, KernError> {
    paths.iter().map(UfoMaster::load).collect()
}

fn report(
    session: &KerningSession<UfoMaster>,
    filter: Option<FilterKind>,
    left: Option<&str>,
    right: Option<&str>,
) {
    let Some(kind) = filter else {
        print!("{}", Report::new(session));
        return;
    };

    let mut pairs = session.filter(kind.into());
    if left.is_some() || right.is_some() {
        // groups of the first master decide membership
        if let Some(first) = session.masters().first() {
            let index = GroupIndex::from_source(first);
            pairs = filter_by_items(&index, &pairs, left, right);
        }
    }
    print!("{}", PairTable::new(session, &pairs));
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
