use std::env;
use std::path::PathBuf;

use clap::Parser;
use quicknotes::cli::{handle_add, handle_clear, handle_delete, handle_edit, handle_list, Cli, Commands};
use quicknotes::config::{Config, DATA_DIR_ENV};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quicknotes=warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(atty::is(atty::Stream::Stderr)),
        )
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = Config::resolve(cli.dir, env::var_os(DATA_DIR_ENV).map(PathBuf::from)).and_then(
        |config| match cli.command {
            Commands::Add {
                text,
                title,
                stdin,
                json,
            } => handle_add(&config, title, text, stdin, json),
            Commands::List { json } => handle_list(&config, json),
            Commands::Edit {
                id,
                title,
                text,
                stdin,
                json,
            } => handle_edit(&config, id, title, text, stdin, json),
            Commands::Delete { id, force } => handle_delete(&config, id, force),
            Commands::Clear { force } => handle_clear(&config, force),
        },
    );

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
