use config::RunConfig;
use supervisor::{Outcome, Supervisor};
use tracing::debug;
use utils::console::Console;

mod config;
mod supervisor;
mod utils;

#[tokio::main]
async fn main() {
    let config = match RunConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    if config.show_version {
        println!("{}", config::version_line());
        return;
    }

    if config.show_help {
        println!("{}", config::render_help());
        return;
    }

    utils::logging::init(&config);

    let console = Console::new(config.quiet);
    match Supervisor::new(config, console).run().await {
        Ok(Outcome::Detached { pid }) => debug!(pid, "Handed off to background process"),
        Ok(outcome) => debug!(?outcome, "Finished"),
        // Already reported by the supervisor.
        Err(_) => std::process::exit(1),
    }
}
