use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use hmmtag::{evaluate_files, HmmModel, HmmTagger, Runner};

/// Assign part-of-speech tags to the sentences in a file (INPUT), one sentence per line
/// Evaluate the tagged output against a reference file (with -r option)
#[derive(Debug, Parser)]
#[command(version)]
struct Argv {
    /// read the HMM from a file (MODEL)
    #[arg(short, long, value_name = "MODEL", default_value = "hmmmodel.txt")]
    model: PathBuf,
    /// write the tagged sentences to a file (OUTPUT)
    #[arg(short, long, value_name = "OUTPUT", default_value = "hmmoutput.txt")]
    output: PathBuf,
    /// report the accuracy of the output against a word/tag reference file
    #[arg(short, long, value_name = "REFERENCE")]
    reference: Option<PathBuf>,
    /// print the evaluation report as JSON
    #[arg(long, requires = "reference")]
    json: bool,
    /// decode sentences in parallel
    #[arg(short = 'j', long)]
    parallel: bool,
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// sentences to tag, one per line
    #[arg(value_name = "INPUT")]
    input: PathBuf,
}

fn run(argv: &Argv) -> hmmtag::Result<()> {
    let model = HmmModel::from_path(&argv.model)?;
    let tagger = HmmTagger::new(&model);
    Runner::new(&tagger)
        .parallel(argv.parallel)
        .run_file(&argv.input, &argv.output)?;
    log::info!("write output to {}", argv.output.display());

    if let Some(reference) = &argv.reference {
        let report = evaluate_files(&argv.output, reference)?;
        if argv.json {
            let json = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
            println!("{json}");
        } else {
            println!("{report}");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let argv = Argv::parse();
    let level = match argv.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    log::debug!("{:?}", argv);

    match run(&argv) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
