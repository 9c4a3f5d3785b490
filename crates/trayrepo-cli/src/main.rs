use trayrepo_core::config;
use trayrepo_core::logging::{self, LogSink};

mod cli;

use crate::cli::CliCommand;

fn main() {
    // Config is read before logging starts so `log_file` can pick the sink.
    let cfg = config::load_or_init();
    let log_file = cfg.as_ref().ok().and_then(|c| c.log_file.clone());
    logging::init_logging(LogSink::open(log_file.as_deref()));

    // Parse CLI and dispatch.
    if let Err(err) = CliCommand::run_from_args(cfg) {
        eprintln!("trayrepo error: {:#}", err);
        std::process::exit(1);
    }
}
