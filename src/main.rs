use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::{
    fs,
    io::{self, Read, Write},
    path::PathBuf,
};
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;

use input_text_normalizer::{
    config::Config,
    grammar::ConfiguredDictionary,
    input_text::NormalizedText,
    TextNormalizer,
};

struct Args {
    config_path: Option<PathBuf>,
    encoding: &'static encoding_rs::Encoding,
    offsets: bool,
    verbose: bool,
    input_path: Option<PathBuf>,
}

fn get_args() -> Result<Option<Args>> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut opts = getopts::Options::new();
    opts.optopt("c", "config", "JSON config file", "FILE");
    opts.optopt("e", "encoding", "encoding of the input (default: UTF-8)", "LABEL");
    opts.optflag("", "offsets", "print the offset map as CSV instead of the text");
    opts.optflag("v", "verbose", "enable debug logging");
    opts.optflag("h", "help", "print this help");

    let matches = match opts.parse(&args) {
        Ok(m) => m,
        Err(f) => bail!(f),
    };

    if matches.opt_present("h") {
        print!(
            "{}",
            opts.usage("Usage: input-text-normalizer [options] [FILE]")
        );
        return Ok(None);
    }

    let encoding = match matches.opt_str("e") {
        Some(label) => encoding_rs::Encoding::for_label(label.as_bytes())
            .with_context(|| format!("Unknown encoding: {}", label))?,
        None => encoding_rs::UTF_8,
    };

    Ok(Some(Args {
        config_path: matches.opt_str("c").map(PathBuf::from),
        encoding,
        offsets: matches.opt_present("offsets"),
        verbose: matches.opt_present("v"),
        input_path: matches.free.first().map(PathBuf::from),
    }))
}

#[derive(Serialize)]
struct OffsetRecord<'a> {
    line: usize,
    position: usize,
    char: char,
    original_start: usize,
    original_end: usize,
    original: &'a str,
}

fn main() -> Result<()> {
    let args = match get_args()? {
        Some(args) => args,
        None => return Ok(()),
    };

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &args.config_path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => Config::default(),
    };
    let dictionary = ConfiguredDictionary::from_config(&config)?;
    let normalizer =
        TextNormalizer::from_dictionary(&dictionary).context("Failed to build normalizer")?;

    let bytes = match &args.input_path {
        Some(path) => {
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?
        }
        None => {
            let mut bytes = Vec::new();
            io::stdin()
                .read_to_end(&mut bytes)
                .context("Failed to read stdin")?;
            bytes
        }
    };
    let (txt, _, had_errors) = args.encoding.decode(&bytes);
    if had_errors {
        warn!("Input contains malformed {} sequences", args.encoding.name());
    }

    if args.offsets {
        let mut writer = csv::Writer::from_writer(io::stdout().lock());
        for (i, line) in txt.lines().enumerate() {
            write_offsets(&mut writer, i + 1, &normalizer.normalize_with_offsets(line))?;
        }
        writer.flush()?;
    } else {
        let mut out = io::stdout().lock();
        for line in txt.lines() {
            writeln!(out, "{}", normalizer.normalize(line))?;
        }
    }

    Ok(())
}

fn write_offsets<W: Write>(
    writer: &mut csv::Writer<W>,
    line: usize,
    normalized: &NormalizedText,
) -> Result<()> {
    for (position, c) in normalized.text().chars().enumerate() {
        let span = normalized
            .original_offset_of(position)
            .context("Offset map is shorter than the text")?;
        writer.serialize(OffsetRecord {
            line,
            position,
            char: c,
            original_start: span.start,
            original_end: span.end,
            original: &normalized.original()[span],
        })?;
    }
    Ok(())
}
