use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use json2xml_core::{convert_with, NumberFormat, ReaderOptions, DEFAULT_MAX_DEPTH};
use log::info;
use quick_xml::Writer;

#[derive(Parser)]
#[command(version, about = "Convert JSON to XML, one token at a time", long_about = None)]
struct Cli {
    /// JSON input file; reads stdin when omitted or `-`
    input: Option<PathBuf>,

    /// XML output file; writes stdout when omitted
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Decode numbers and print them in shortest decimal form instead of
    /// copying their source text
    #[arg(long)]
    float_numbers: bool,

    /// Maximum container nesting depth
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH, value_parser = parse_depth)]
    max_depth: usize,

    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,
}

fn parse_depth(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(0) => Err("depth must be at least 1".to_string()),
        Ok(depth) => Ok(depth),
        Err(err) => Err(err.to_string()),
    }
}

impl Cli {
    fn reader_options(&self) -> ReaderOptions {
        ReaderOptions {
            numbers: if self.float_numbers {
                NumberFormat::Float
            } else {
                NumberFormat::Verbatim
            },
            max_depth: self.max_depth,
        }
    }

    fn open_input(&self) -> anyhow::Result<Box<dyn BufRead>> {
        match &self.input {
            Some(path) if path.as_os_str() != "-" => {
                let file = File::open(path)
                    .with_context(|| format!("failed to open {}", path.display()))?;
                Ok(Box::new(BufReader::new(file)))
            }
            _ => Ok(Box::new(io::stdin().lock())),
        }
    }

    fn open_output(&self) -> anyhow::Result<Box<dyn Write>> {
        match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                Ok(Box::new(BufWriter::new(file)))
            }
            None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .init();

    let input = cli.open_input()?;
    let mut writer = Writer::new(cli.open_output()?);

    let stats = convert_with(input, &mut writer, cli.reader_options()).context("conversion failed")?;
    writer.into_inner().flush().context("failed to flush output")?;

    info!("wrote {} XML tokens, max depth {}", stats.tokens, stats.max_depth);
    Ok(())
}
