pub mod combine;
pub mod config;

use anyhow::Result;
use clap::Parser;

use combine::combine;
use config::CombineConfig;

/// CLI for combine: snapshot a source tree into one annotated text file.
#[derive(Parser)]
#[clap(
    name = "combine",
    version,
    about = "Concatenate every file under ./src into combined_output.txt, one header per file"
)]
pub struct Cli {}

/// Extracted CLI logic entrypoint for integration tests and main()
pub fn run(_cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    let config = CombineConfig::default();
    config.trace_loaded();

    println!("Combine starting...");
    match combine(&config) {
        Ok(report) => {
            println!("Combine complete.\nReport:");
            println!("{:#?}", report);
            println!("Result saved to {}", config.output_file.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("[ERROR] Combine failed: {}", e);
            Err(anyhow::Error::new(e))
        }
    }
    // For CLI/test parity: explicit process exit only in main(), not in run()
}
