use clap::Parser;
use folio::job::Job;
use folio::{ExecutorImpl, FolioError, Strategy, Typesetter};
use std::path::PathBuf;

/// Breaks the paragraphs and page flows of a JSON job and prints a report.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the job file
    job: PathBuf,

    /// Break greedily instead of minimizing demerits
    #[arg(long, default_value_t = false)]
    greedy: bool,

    /// Run units one after another on the main thread
    #[arg(long, default_value_t = false)]
    sequential: bool,
}

fn main() -> Result<(), FolioError> {
    env_logger::init();
    let args = Args::parse();

    let job = Job::from_file(&args.job)?;
    let mut typesetter = Typesetter::new(job.config.breaking).with_page_config(job.config);
    if args.greedy {
        typesetter = typesetter.with_strategy(Strategy::FirstFit);
    }
    if args.sequential {
        typesetter = typesetter.with_executor(ExecutorImpl::sequential());
    }

    log::info!("Running {} units from {}", job.units.len(), args.job.display());
    let report = job.run(&typesetter)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
