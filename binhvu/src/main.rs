//! hvu command-line tool: convert LCS hvu stream dumps to JSON, XML or
//! CSV, or list field-occurrence statistics.
//!
//! Usage: hvu -i file.dmp [-o file.out] -a toJson|toXml|toCsv|stats|cstats [-e UTF-8]
//!
//! The statistics actions print to stdout; the conversion actions
//! require an output file. The default encoding is ISO-8859-1, the
//! usual one for Windows-originated dumps.

use clap::{Parser, ValueEnum};
use libhvu::{
    open_records, resolve_encoding, Encoding, FieldStats, HvuError, LineReader, RecordReader,
    DEFAULT_ENCODING,
};
use log::info;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

mod convert;

use convert::ConvertError;

#[derive(Parser)]
#[command(
    name = "hvu",
    version,
    about = "Convert an LCS hvu stream dump to JSON, XML or CSV, or list field statistics"
)]
struct Cli {
    /// Input file in LCS hvu stream format
    #[arg(short = 'i', long = "in", value_name = "FILE")]
    input: PathBuf,

    /// Output file (required unless the action is stats or cstats)
    #[arg(short = 'o', long = "out", value_name = "FILE")]
    output: Option<PathBuf>,

    /// What to produce from the input
    #[arg(short, long, value_enum, default_value_t = Action::Stats)]
    action: Action,

    /// Input text encoding (popular choices: UTF-8, ISO-8859-1)
    #[arg(short, long, default_value = DEFAULT_ENCODING, value_name = "LABEL")]
    encoding: String,

    /// Column delimiter for CSV output; pick one that cannot occur in
    /// the data
    #[arg(long, default_value_t = '#', value_name = "CHAR")]
    delimiter: char,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Action {
    #[value(name = "toJson")]
    ToJson,
    #[value(name = "toXml")]
    ToXml,
    #[value(name = "toCsv")]
    ToCsv,
    #[value(name = "stats")]
    Stats,
    #[value(name = "cstats")]
    Cstats,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let encoding = match resolve_encoding(&cli.encoding) {
        Some(encoding) => encoding,
        None => {
            eprintln!("unknown encoding: {}", cli.encoding);
            process::exit(2);
        }
    };
    info!("using encoding: {}", encoding.name());

    let result = match cli.action {
        Action::Stats => run_stats(&cli, encoding, false),
        Action::Cstats => run_stats(&cli, encoding, true),
        Action::ToJson | Action::ToXml | Action::ToCsv => {
            let Some(output) = cli.output.clone() else {
                eprintln!("missing output file");
                process::exit(2);
            };
            if !cli.delimiter.is_ascii() {
                eprintln!("delimiter must be a single ASCII character");
                process::exit(2);
            }
            run_convert(&cli, encoding, &output)
        }
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// The `stats`/`cstats` actions: one pass, summary and counts to stdout.
fn run_stats(cli: &Cli, encoding: &'static Encoding, descending: bool) -> Result<(), ConvertError> {
    let mut lines = LineReader::open(&cli.input, encoding)?;
    let stats = FieldStats::collect(&mut lines)?;
    let tally = stats.tally();

    println!("*** {} lines in input file", stats.line_count());
    println!(
        "*** records: {} values: {} keys: {} field refs: {} long text: {} continuations: {} comments: {} undefined: {}",
        tally.records,
        tally.values,
        tally.keys,
        tally.field_refs,
        tally.long_text,
        tally.continuations,
        tally.comments,
        tally.undefined,
    );
    println!("*** stats of (non-null) referenced fields counts:");
    let entries = if descending {
        stats.by_count()
    } else {
        stats.by_name()
    };
    for (name, count) in entries {
        println!("{name} [{count}]");
    }
    Ok(())
}

/// The conversion actions: decode the dump once (twice for CSV, whose
/// header needs a pre-pass) and stream the chosen format to the output.
fn run_convert(cli: &Cli, encoding: &'static Encoding, output: &Path) -> Result<(), ConvertError> {
    let out_file = File::create(output).map_err(|source| HvuError::Open {
        path: output.to_path_buf(),
        source,
    })?;
    let mut out = BufWriter::new(out_file);

    let count = match cli.action {
        Action::ToJson => {
            let mut records = open_records(&cli.input, encoding)?;
            let count = convert::json::write(&mut records, &mut out)?;
            report_pass(&records);
            count
        }
        Action::ToXml => {
            let mut records = open_records(&cli.input, encoding)?;
            let count = convert::xml::write(&mut records, &mut out)?;
            report_pass(&records);
            count
        }
        Action::ToCsv => {
            info!("parsing input to fix the csv header");
            let mut header_pass = LineReader::open(&cli.input, encoding)?;
            let header = FieldStats::collect(&mut header_pass)?.header();
            info!("{} fields in csv header", header.len());
            let mut records = open_records(&cli.input, encoding)?;
            let count =
                convert::csv::write(&mut records, &header, cli.delimiter as u8, &mut out)?;
            report_pass(&records);
            count
        }
        Action::Stats | Action::Cstats => unreachable!("statistics actions have no output file"),
    };
    out.flush()?;
    println!("*** {count} total records");
    Ok(())
}

fn report_pass<R: BufRead>(records: &RecordReader<R>) {
    println!(
        "*** {} lines read, {} undefined",
        records.line_count(),
        records.undefined_lines()
    );
}
