//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    env_logger::init();
    if let Err(err) = foilrank_cli::run() {
        eprintln!("foilrank: {}", foilrank_scorer::error_chain(&err));
        std::process::exit(1);
    }
}
