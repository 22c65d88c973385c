//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    pretty_env_logger::init();
    if let Err(err) = safespot_cli::run() {
        if let safespot_cli::CliError::ArgumentParsing(parse) = &err {
            parse.exit();
        }
        eprintln!("safespot: {err}");
        std::process::exit(1);
    }
}
