//! SmarterMail log search engine binary entry point.
use clap::Parser;
use smlog_cli::{cli, commands, error, logging, search::CancelToken};

fn main() {
    enable_ansi_support::enable_ansi_support().ok(); // best-effort; no-op on non-Windows
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose);

    let cancel = CancelToken::new();
    {
        let handler_token = cancel.clone();
        ctrlc::set_handler(move || handler_token.cancel()).ok();
    }

    let result = match &args.command {
        cli::Command::Search(opts) => commands::search::run(&args.global, opts, &cancel),
        cli::Command::List(opts) => commands::list::run(&args.global, opts),
        cli::Command::Prune(opts) => commands::prune::run(&args.global, opts),
        cli::Command::Version => {
            commands::version::run();
            return;
        }
    };

    if let Err(e) = result {
        eprintln!("\x1b[31mError: {e:#}\x1b[0m");
        std::process::exit(error::exit_code_for(&e));
    }
}
