//! imageviewer_bundler - packages PyQtImageViewer into a macOS .app and .dmg.
//!
//! Exit code 0 guarantees the reported artifacts exist; a failing external
//! tool's exit code is propagated.

use imageviewer_bundler::cli;
use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging; RUST_LOG overrides the default level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
