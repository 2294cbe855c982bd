use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::net::TcpStream;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pullseq::{
    chunks, lines, Contiguous, Equality, Linked, Producer, ReadConfig, Sequence, SourceError,
    Stream,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pullseq", about = "Pull elements one at a time from lists, files and sockets")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Stream records from a file (or stdin) and print the matching ones.
    Lines {
        /// Input file; reads stdin when omitted.
        path: Option<PathBuf>,
        /// Only print records containing this text.
        #[arg(long)]
        grep: Option<String>,
        /// Record delimiter (single byte).
        #[arg(long, default_value_t = '\n')]
        delimiter: char,
    },
    /// Connect to a TCP endpoint and copy everything it sends to stdout.
    Fetch {
        /// Address, e.g. `127.0.0.1:8080`.
        addr: String,
        /// Text written to the connection before reading.
        #[arg(long)]
        send: Option<String>,
        /// Maximum bytes per read.
        #[arg(long, default_value_t = pullseq::config::DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
    },
    /// Store integers in a sequence and sum them through a stream.
    Sum {
        /// Values to sum.
        values: Vec<i64>,
        /// Use the linked implementation instead of the contiguous one.
        #[arg(long)]
        linked: bool,
        /// Drop values below this threshold before summing.
        #[arg(long)]
        min: Option<i64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Lines {
            path,
            grep,
            delimiter,
        } => run_lines(path, grep, delimiter)?,
        Commands::Fetch {
            addr,
            send,
            chunk_size,
        } => run_fetch(&addr, send, chunk_size)?,
        Commands::Sum {
            values,
            linked,
            min,
        } => run_sum(values, linked, min)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_lines(path: Option<PathBuf>, grep: Option<String>, delimiter: char) -> Result<()> {
    let delimiter = u8::try_from(delimiter)
        .map_err(|_| anyhow::anyhow!("delimiter '{}' is not a single byte", delimiter))?;
    let config = ReadConfig::default().with_delimiter(delimiter);

    let reader: Box<dyn BufRead> = match &path {
        Some(path) => Box::new(BufReader::new(File::open(path).with_context(|| {
            format!("failed to open {}", path.display())
        })?)),
        None => Box::new(io::stdin().lock()),
    };

    let mut producer = lines(reader, &config);
    let mut matched = 0usize;
    {
        let stream = Stream::new(&mut producer);
        let mut out = io::stdout().lock();
        let mut write_failed = None;
        stream
            .filter(|record: &String| grep.as_deref().map_or(true, |g| record.contains(g)))
            .for_each(|record| {
                if write_failed.is_none() {
                    matched += 1;
                    if let Err(e) = writeln!(out, "{}", record) {
                        write_failed = Some(e);
                    }
                }
            });
        if let Some(e) = write_failed {
            return Err(e).context("failed to write to stdout");
        }
    }

    tracing::info!(matched, "records printed");
    check_terminal(producer.error())
}

fn run_fetch(addr: &str, send: Option<String>, chunk_size: usize) -> Result<()> {
    let config = ReadConfig::default().with_chunk_size(chunk_size)?;
    let mut conn =
        TcpStream::connect(addr).with_context(|| format!("failed to connect to {}", addr))?;
    if let Some(request) = send {
        conn.write_all(request.as_bytes())
            .context("failed to send request")?;
    }

    let mut producer = chunks(&mut conn, &config);
    let mut out = io::stdout().lock();
    let mut total = 0usize;
    for chunk in (&mut producer).into_pulled() {
        total += chunk.len();
        out.write_all(&chunk).context("failed to write to stdout")?;
    }
    out.flush()?;

    tracing::info!(total, reads = producer.reads(), "connection drained");
    check_terminal(producer.error())
}

fn run_sum(values: Vec<i64>, linked: bool, min: Option<i64>) -> Result<()> {
    let threshold = min.unwrap_or(i64::MIN);
    let sum = if linked {
        let mut seq = Linked::new(Equality::natural());
        values.into_iter().for_each(|v| seq.add(v));
        println!("{}", seq);
        checked_sum(Stream::from_sequence(&seq).filter(|v| *v >= threshold))?
    } else {
        let mut seq = Contiguous::new(Equality::natural());
        values.into_iter().for_each(|v| seq.add(v));
        println!("{}", seq);
        checked_sum(Stream::from_sequence(&seq).filter(|v| *v >= threshold))?
    };

    match sum {
        Some(sum) => println!("sum = {}", sum),
        None => println!("no values"),
    }
    Ok(())
}

/// Left fold seeded with the first element; `None` for an empty stream.
fn checked_sum<P: Producer<Item = i64>>(stream: Stream<P>) -> Result<Option<i64>> {
    stream
        .into_producer()
        .into_pulled()
        .try_fold(None, |total: Option<i64>, v| match total {
            None => Ok(Some(v)),
            Some(total) => total
                .checked_add(v)
                .map(Some)
                .with_context(|| format!("sum overflows i64 at {} + {}", total, v)),
        })
}

/// A drained external producer ends on a latched error; only a clean
/// end-of-stream counts as success.
fn check_terminal(error: Option<&SourceError>) -> Result<()> {
    match error {
        None | Some(SourceError::EndOfStream) => Ok(()),
        Some(err) => Err(anyhow::anyhow!("source failed: {}", err)),
    }
}
