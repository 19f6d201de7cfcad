use std::path::PathBuf;
use std::process;

use anyhow::{self, format_err};
use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;

use qbasis::interfaces::cli::{log_heading, Cli};
use qbasis::interfaces::input::Input;
use qbasis::interfaces::InputHandle;
use qbasis::io::{read_qbasis_yaml, write_qbasis_yaml};

/// Configures `log4rs` so that the `qbasis-output` target goes to the console, or to
/// `<output>.out` if an output stem is given, and everything else at `root_level` goes to
/// standard error.
fn init_logging(output: Option<&PathBuf>, root_level: LevelFilter) -> Result<(), anyhow::Error> {
    let stderr = ConsoleAppender::builder()
        .target(log4rs::append::console::Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("[{l}] {t}: {m}{n}")))
        .build();
    let mut builder =
        Config::builder().appender(Appender::builder().build("stderr", Box::new(stderr)));

    let output_appender = if let Some(stem) = output {
        let mut path = stem.clone();
        path.set_extension("out");
        let file = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{m}{n}")))
            .append(false)
            .build(path)?;
        Appender::builder().build("qbasis-output", Box::new(file))
    } else {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{m}{n}")))
            .build();
        Appender::builder().build("qbasis-output", Box::new(stdout))
    };
    builder = builder.appender(output_appender).logger(
        Logger::builder()
            .appender("qbasis-output")
            .additive(false)
            .build("qbasis-output", LevelFilter::Info),
    );

    let config = builder
        .build(Root::builder().appender("stderr").build(root_level))
        .map_err(|err| format_err!(err))?;
    log4rs::init_config(config).map_err(|err| format_err!(err))?;
    Ok(())
}

fn run(cli: &Cli) -> Result<(), anyhow::Error> {
    if let Some(template) = cli.template.as_ref() {
        write_qbasis_yaml(template, &Input::default())?;
        log::info!(
            target: "qbasis-output",
            "Template input written to {}.yml.",
            template.display()
        );
        return Ok(());
    }

    let config = cli
        .config
        .as_ref()
        .ok_or_else(|| format_err!("No input file given. Use `--config <YAML>`."))?;
    let inp = read_qbasis_yaml::<Input, _>(config)?;
    inp.handle()
}

fn main() {
    let cli = Cli::parse();
    let root_level = if cli.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(err) = init_logging(cli.output.as_ref(), root_level) {
        eprintln!("Unable to set up logging: {err}");
        process::exit(1);
    }

    log_heading();
    if let Err(err) = run(&cli) {
        log::error!("{err:#}");
        process::exit(1);
    }
}
