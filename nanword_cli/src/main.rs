use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use nanword::diagnostic::Report;
use nanword::prefix::{try_type_prefix, type_prefix};
use nanword::{literal, ValueWidth};
use structopt::StructOpt;


fn init_tracing() {
    use tracing::Level;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    FmtSubscriber::builder()
        .without_time()
        .with_max_level(Level::TRACE)
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

#[derive(StructOpt)]
enum Opts {
    /// Print the bits and layout of every word literal in the input
    Inspect {
        /// Input file
        #[structopt(parse(from_os_str), default_value = "-")]
        file: PathBuf,

        /// Print only the hex bits of each word
        #[structopt(long)]
        bits_only: bool,
    },

    /// Print the type prefix of every value width
    Prefixes {
        /// Type offset ORed into each prefix
        #[structopt(long, default_value = "0")]
        offset: u64,

        /// Fail instead of truncating an offset too wide for a width
        #[structopt(long)]
        strict: bool,
    },
}

fn read_input(file: &Path) -> anyhow::Result<String> {
    let mut buf = String::new();
    if file == Path::new("-") {
        let stdin = io::stdin();
        stdin
            .lock()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
    } else {
        let mut file = File::open(file).with_context(|| format!("opening file {:?}", file))?;
        file.read_to_string(&mut buf)
            .with_context(|| format!("reading file {:?}", file))?;
    }
    Ok(buf)
}

fn inspect(file: &Path, bits_only: bool) -> anyhow::Result<()> {
    let input = read_input(file)?;

    let literals = match literal::parse(&input) {
        Ok(literals) => literals,
        Err(errs) => {
            for err in &errs {
                err.report(&input);
            }
            bail!("{} invalid literal(s) in {:?}", errs.len(), file);
        },
    };

    for literal in literals {
        let bits = literal.word.to_bits();
        if bits_only {
            println!("{:016X}", bits);
        } else {
            println!(
                "{:<24} {:016X}  {}",
                literal.span.slice(&input),
                bits,
                literal.word.describe(),
            );
        }
    }

    Ok(())
}

fn prefixes(offset: u64, strict: bool) -> anyhow::Result<()> {
    for width in ValueWidth::all().rev() {
        let prefix = if strict {
            try_type_prefix(width, offset)?
        } else {
            type_prefix(width, offset)
        };
        println!("value width = {}   type prefix = {:016X}", width, prefix);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::from_args();
    init_tracing();

    match opts {
        Opts::Inspect { file, bits_only } => inspect(&file, bits_only),
        Opts::Prefixes { offset, strict } => prefixes(offset, strict),
    }
}
