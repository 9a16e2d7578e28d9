use anyhow::{bail, Context, Result};
use clap::Parser;
use revtail::decode::DecodeOptions;
use revtail::tail::{tail, tail_lines};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "revtail")]
#[command(about = "Print the last lines of a file without reading the whole file", long_about = None)]
struct Args {
    /// File to read
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Number of lines to print
    #[arg(short = 'n', long = "lines", default_value_t = 10)]
    lines: usize,

    /// Print newest line first instead of restoring file order
    #[arg(long)]
    reverse: bool,

    /// Text encoding label, e.g. utf-8 or windows-1252
    #[arg(long, default_value = "utf-8")]
    encoding: String,

    /// Fail on invalid byte sequences instead of substituting U+FFFD
    #[arg(long)]
    strict: bool,

    /// Keep a leading byte order mark instead of stripping it
    #[arg(long)]
    keep_bom: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let options = match DecodeOptions::for_label(&args.encoding) {
        Some(options) => options
            .with_fatal(args.strict)
            .with_ignore_bom(args.keep_bom),
        None => bail!("Unknown encoding label: {}", args.encoding),
    };

    if args.reverse {
        // Lazy path: emit newest-first as lines are found
        let file = File::open(&args.file)
            .context(format!("Failed to open file: {}", args.file.display()))?;
        for line in tail_lines(file, args.lines, options) {
            println!("{}", line?);
        }
    } else {
        for line in tail(&args.file, args.lines, options)? {
            println!("{}", line);
        }
    }

    Ok(())
}
