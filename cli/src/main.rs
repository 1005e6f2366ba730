//! envprov - fail-fast provisioning of native audio and Python dependencies

use std::process::ExitCode;

use clap::Parser;

use envprov_cli::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            if json {
                if let Ok(out) = envprov_cli::output::json::format_error(&format!("{e:#}"), "ERROR") {
                    println!("{out}");
                }
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
