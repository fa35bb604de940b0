use std::{fs, path::PathBuf, time::Duration};

use structopt::StructOpt;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use whistler_codegen as codegen;
use whistler_wsdl::{
    self as wsdl,
    schema::WalkOptions,
    source::{Loader, LoaderOptions},
};

#[derive(Debug, Error)]
enum Error {
    #[error("Error parsing WSDL: {0}")]
    ParseError(#[from] wsdl::error::Error),

    #[error("Error generating code: {0}")]
    CodegenError(#[from] codegen::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unable to write {path}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Generates Rust types from a WSDL document.
#[derive(StructOpt)]
struct Args {
    #[structopt(short, long, default_value = "./output.rs", parse(from_os_str))]
    output: PathBuf,

    /// Directory holding downloaded remote documents.
    #[structopt(long, default_value = "cache", parse(from_os_str))]
    cache_dir: PathBuf,

    /// Download timeout in seconds.
    #[structopt(long, default_value = "30")]
    timeout: u64,

    /// Deepest include/import chain that is followed.
    #[structopt(long, default_value = "10")]
    max_depth: usize,

    /// Log debug output (overridden by RUST_LOG).
    #[structopt(short, long)]
    verbose: bool,

    /// URL or path of the WSDL document.
    input: String,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "info" })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[paw::main]
fn main(args: Args) -> Result<(), Error> {
    init_tracing(args.verbose);

    let mut loader = Loader::with_options(LoaderOptions {
        cache_dir: args.cache_dir,
        timeout: Duration::from_secs(args.timeout),
    });

    let identifier = wsdl::identifier(&args.input)?;
    let definition = wsdl::parse_with(
        &mut loader,
        &identifier,
        WalkOptions {
            max_depth: args.max_depth,
        },
    )?;

    let output = codegen::synthesize_definition(&definition)?;
    let source = codegen::render(&output)?;

    fs::write(&args.output, source).map_err(|source| Error::WriteError {
        path: args.output.clone(),
        source,
    })?;

    info!("Wrote {}", args.output.display());
    Ok(())
}
