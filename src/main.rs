use std::process::ExitCode;
use clap::Parser as ClapParser;
use tausch::Config;

fn main() -> ExitCode {
    let config: Config = Config::parse();

    match tausch::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(message) = tausch::error_message(&err) {
                eprintln!("{}", message);
            }

            ExitCode::FAILURE
        },
    }
}
