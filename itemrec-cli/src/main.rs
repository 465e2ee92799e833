mod output;
mod profile;
mod session;

use clap::Parser;
use profile::Profile;
use session::Session;
use std::error::Error;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Game item recognizer (JSON profile driven)")]
struct Cli {
    /// Path to the JSON profile.
    #[arg(short, long, value_name = "FILE", default_value = "profile.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example profile and exit.
    #[arg(long)]
    print_example: bool,
    /// Write the effective profile (defaults filled in) to FILE and exit.
    #[arg(long, value_name = "FILE")]
    save_profile: Option<PathBuf>,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let mut filter = EnvFilter::from_default_env().add_directive("warn".parse()?);
    if cli.trace {
        filter = filter
            .add_directive("itemrec=info".parse()?)
            .add_directive("itemrec_cli=info".parse()?);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let profile = Profile::load(&cli.config)?;
    if let Some(path) = &cli.save_profile {
        profile.save(path)?;
        return Ok(());
    }

    let mut session = Session::open(&profile)?;
    let failures = session.run(&profile.poll);
    if failures == profile.poll.ticks {
        return Err("every polling tick failed".into());
    }
    Ok(())
}
