use std::path::PathBuf;

use clap::Parser;
use log::{error, info};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use f1_core::Session;

use crate::export::{export, Options, DEFAULT_OPTIONS};
use crate::parsing::parse_valuation_arg;

mod export;
mod parsing;

#[derive(Parser, Debug)]
#[command(author, version)]
struct Cli {
    /// Sentence in bracketed form, e.g. "[S[N Ann][VP[Vi sleeps]]]".
    #[arg(value_name = "SENTENCE")]
    sentence: String,

    /// Valuation (repeatable), e.g. "1:sleeps=ann,bob;likes=<ann,bob>".
    /// A verb used both as Vi and as Vt is written "runs/Vi" or "runs/Vt".
    #[arg(short = 'v', long = "valuation", value_name = "NAME:VERB=GROUP;...")]
    valuations: Vec<String>,

    /// Output folder for the exported files.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Only list the verbs that need an extension.
    #[arg(long, action)]
    list_verbs: bool,

    /// Do not write any files.
    #[arg(long, action)]
    no_export: bool,

    /// Log level.
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();
    TermLogger::init(args.log_level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)?;
    info!("args = {:?}", args);

    let mut session = Session::analyze(&args.sentence)?;

    if args.list_verbs {
        for verb in session.verbs() {
            println!("{}\t{}\t{}", verb.name(), verb.text(), verb.denotation());
        }
        return Ok(());
    }

    for arg in &args.valuations {
        let arg = parse_valuation_arg(arg)?;
        let outcome = session
            .valuation_from_input(&arg.name, arg.entries())
            .and_then(|valuation| session.evaluate(&valuation));
        match outcome {
            Ok(value) => info!("v{}: {}", arg.name, value as u8),
            Err(e) => error!("Could not evaluate v{}: {}", arg.name, e),
        }
    }

    for row in session.log() {
        println!("{}\t{}\t{}", row.line, row.expression.replace('\n', " "), row.rule);
    }
    for result in session.results() {
        println!("v{} = {}", result.name, result.value as u8);
    }

    let options = if args.no_export {
        Options {
            write_log: false,
            write_hierarchy: false,
            ..DEFAULT_OPTIONS
        }
    } else {
        Options::default()
    };
    let written = export(&session, &args.output_dir, &options)?;
    info!("Exported {} files", written.len());

    Ok(())
}
