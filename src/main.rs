use attrlog::render::attrs_to_json;
use attrlog::script;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "attrlog")]
#[command(about = "Replay logging scripts and verify the attribute trees they produce", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a script and run its checks (validates the script first).
    Replay {
        #[arg(long)]
        script: PathBuf,

        /// Write captured records as JSON lines here instead of stdout.
        #[arg(short = 'o', long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Replay { script: path, out } => {
            // 1) Parse + validate the script.
            let validated = script::load_script(&path)?.validate_and_build()?;

            // 2) Replay steps and run checks.
            let replay = validated.replay()?;

            // 3) Records as JSON lines, to the output file or stdout.
            let mut sink: Box<dyn Write> = match &out {
                Some(out) => Box::new(std::io::BufWriter::new(std::fs::File::create(out)?)),
                None => Box::new(std::io::stdout().lock()),
            };
            for record in &replay.records {
                serde_json::to_writer(&mut sink, &attrs_to_json(record.attrs()))?;
                sink.write_all(b"\n")?;
                for c in &record.conflicts {
                    eprintln!(
                        "WARN: record {:?}: {:?} not mounted under {:?} ({} {:?})",
                        record.message, c.attr_key, c.path, c.mount_kind, c.mount_key
                    );
                }
            }
            sink.flush()?;
            drop(sink);
            if let Some(out) = &out {
                println!("Wrote {} record(s) to {}", replay.records.len(), out.display());
            }

            // 4) Report checks.
            for outcome in &replay.outcomes {
                match &outcome.result {
                    Ok(()) => println!("ok   {} (record {})", outcome.label, outcome.record),
                    Err(err) => {
                        println!("FAIL {} (record {})", outcome.label, outcome.record);
                        match outcome.check_error() {
                            Some(check_err) => {
                                for e in check_err.errors() {
                                    println!("    {}", e.to_string().replace('\n', "\n    "));
                                }
                            }
                            None => println!("    {}", err),
                        }
                    }
                }
            }

            let failed = replay.failures().count();
            if failed > 0 {
                anyhow::bail!("{} of {} check(s) failed", failed, replay.outcomes.len());
            }
        }
    }

    Ok(())
}
