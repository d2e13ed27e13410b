//! comfy-lock - provision ComfyUI from a lock file

use clap::Parser;

use comfy_lock::cli::Cli;
use comfy_lock::output::{OutputContext, json};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    comfy_lock::logging::init(cli.verbose);
    let (as_json, no_color) = (cli.json, cli.no_color);

    if let Err(e) = cli.run().await {
        tracing::debug!(error = ?e, "provisioning failed");
        if as_json {
            match json::format_failure(&e) {
                Ok(body) => println!("{body}"),
                Err(_) => eprintln!("Error: {e:#}"),
            }
        } else {
            OutputContext::new(no_color, false).error(&format!("Error: {e:#}"));
        }
        std::process::exit(1);
    }
}
