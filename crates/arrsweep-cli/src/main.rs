//! Entrypoint for the `arrsweep` binary.

use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let exit_code = arrsweep_cli::run().await;
    if exit_code != 0 {
        process::exit(exit_code);
    }
}
