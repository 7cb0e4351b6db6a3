//! HTTP Benchmarker - command-line entry point

use clap::{error::ErrorKind, Parser};
use http_benchmarker::{
    app::App,
    cli::{Cli, HelpSystem},
    error::AppError,
    PKG_NAME, VERSION,
};
use std::{error::Error, process};

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
    }));

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("{}", HelpSystem::new().usage(false));
            process::exit(1);
        }
    };

    if cli.debug {
        print_build_info();
    }

    let use_colors = cli.use_colors();
    if let Err(e) = run_application(cli).await {
        eprintln!("{}", e.format_for_console(use_colors));

        if let Some(source) = e.source() {
            eprintln!("Caused by: {}", source);
        }

        print_error_suggestions(&e);

        if e.is_usage_error() {
            eprintln!();
            eprintln!("{}", HelpSystem::new().usage(use_colors));
        }

        process::exit(e.exit_code());
    }
}

async fn run_application(cli: Cli) -> Result<(), AppError> {
    App::new(cli)?.run().await
}

fn print_build_info() {
    eprintln!("{} v{}", PKG_NAME, VERSION);
    eprintln!("  Built:  {}", option_env!("BUILD_TIME").unwrap_or("unknown"));
    eprintln!("  Commit: {}", option_env!("GIT_COMMIT").unwrap_or("unknown"));
    eprintln!("  Target: {}", option_env!("TARGET_TRIPLE").unwrap_or("unknown"));
    eprintln!();
}

fn print_error_suggestions(error: &AppError) {
    let suggestions = error.suggestions();
    if suggestions.is_empty() {
        return;
    }

    eprintln!();
    eprintln!("Suggestions:");
    for suggestion in suggestions {
        eprintln!("  - {}", suggestion);
    }
}
