use std::io::Read;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use gcs::{Decoder, ElementSet, Encoder, Filter, FilterKey, FilterParameters};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogOutputFormat {
    Json,
    Pretty,
}

/// Build and inspect BIP158 Golomb-Coded Set filters.
#[derive(Debug, Parser)]
#[clap(name = "gcs", version)]
struct Cli {
    #[clap(short = 'o', long = "output-format", default_value = "pretty", global = true)]
    output_format: LogOutputFormat,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build a filter and print its hex wire form.
    Encode {
        /// Block hash in display (byte-reversed) hex order.
        #[clap(long, env = "GCS_BLOCK_HASH")]
        block_hash: String,

        #[clap(flatten)]
        params: ParamArgs,

        /// Also print the sorted hash-range values the filter encodes.
        #[clap(long)]
        show_values: bool,

        /// Hex-encoded elements. Read whitespace-separated from stdin when omitted.
        elements: Vec<String>,
    },
    /// Decode the values of a hex filter, one per line.
    Decode {
        #[clap(flatten)]
        params: ParamArgs,

        /// Read codewords until the data runs out instead of exactly N.
        #[clap(long)]
        lenient: bool,

        /// Filter in hex wire form (CompactSize N followed by codewords).
        filter: String,
    },
}

#[derive(Debug, Args)]
struct ParamArgs {
    /// JSON parameter profile, e.g. `{"m": 784931, "p": 19}`.
    #[clap(long)]
    params: Option<PathBuf>,

    /// Hash range scale factor, overriding the profile.
    #[clap(long)]
    m: Option<u64>,

    /// Golomb-Rice parameter, overriding the profile.
    #[clap(long)]
    p: Option<u8>,
}

impl ParamArgs {
    fn resolve(&self) -> Result<FilterParameters, Box<dyn std::error::Error>> {
        let mut params = match &self.params {
            Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
            None => FilterParameters::BASIC,
        };
        if let Some(m) = self.m {
            params.m = m;
        }
        if let Some(p) = self.p {
            params.p = p;
        }
        params.validate()?;
        Ok(params)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let pretty = matches!(cli.output_format, LogOutputFormat::Pretty);
    gcs::logging::setup_logging("info,gcs=debug", pretty);

    match cli.command {
        Command::Encode {
            block_hash,
            params,
            show_values,
            elements,
        } => {
            let params = params.resolve()?;
            let key = FilterKey::from_block_hash_hex(&block_hash)?;

            let elements = if elements.is_empty() {
                let mut input = String::new();
                std::io::stdin().read_to_string(&mut input)?;
                ElementSet::from_hex(input.split_whitespace())?
            } else {
                ElementSet::from_hex(&elements)?
            };
            tracing::info!(elements = elements.len(), %block_hash, "encoding filter");

            let encoder = Encoder::new(params);
            let filter = encoder.encode(&elements, &key)?;
            println!("{}", filter.to_hex());

            if show_values {
                for value in encoder.hashed_values(&elements, &key)? {
                    println!("{value}");
                }
            }
        }
        Command::Decode {
            params,
            lenient,
            filter,
        } => {
            let params = params.resolve()?;
            let filter = Filter::from_hex(&filter)?;

            let values = if lenient {
                Decoder::decode(&filter.data, params.p)?
            } else {
                filter.values(params.p)?
            };
            tracing::info!(n = filter.n, decoded = values.len(), "decoded filter");

            for value in values {
                println!("{value}");
            }
        }
    }

    Ok(())
}
