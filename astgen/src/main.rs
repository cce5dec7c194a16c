use std::error::Error as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use astgen::output::{self, Formatter};
use astgen::{Schema, generate};
use tracing_subscriber::EnvFilter;

#[derive(argh::FromArgs)]
/// Generate AST node definitions from a schema.
struct Args {
    /// skip running the formatter on the output
    #[argh(switch)]
    no_format: bool,

    /// formatter to run on each output file (default: rustfmt)
    #[argh(option)]
    formatter: Option<String>,

    /// path to the schema file
    #[argh(positional)]
    schema: PathBuf,

    /// output directory, or `-` to print to stdout
    #[argh(positional)]
    outdir: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("astgen=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Args = argh::from_env();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            let mut source = err.source();
            while let Some(err) = source {
                eprintln!("  caused by: {err}");
                source = err.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> astgen::Result<()> {
    let schema = Schema::load(&args.schema)?;
    let units = generate(&schema)?;

    if args.outdir == "-" {
        let mut stdout = std::io::stdout().lock();
        for unit in &units {
            stdout
                .write_all(unit.source.as_bytes())
                .map_err(|source| astgen::Error::Sink {
                    path: "<stdout>".into(),
                    source,
                })?;
        }
        return Ok(());
    }

    let formatter = match (args.no_format, args.formatter) {
        (true, _) => None,
        (false, Some(program)) => Some(Formatter::new(program)),
        (false, None) => Some(Formatter::rustfmt()),
    };
    output::write_units(Path::new(&args.outdir), &units, formatter.as_ref())?;

    Ok(())
}
