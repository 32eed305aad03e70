//! `order` binary entry point.
//!
//! # Responsibility
//! - Resolve configuration from the process environment.
//! - Start file logging when `ORDER_LOG_DIR` is set.
//! - Run one command and exit with its code.

use order_cli::config::Config;
use order_cli::{run_cli, CliContext};
use order_core::SystemEnvironment;

fn main() {
    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(err) => {
            println!("Error: cannot resolve current directory: {err}");
            std::process::exit(1);
        }
    };

    let config = Config::from_env(&cwd);
    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = order_core::init_logging(&config.log_level, log_dir) {
            eprintln!("warning: file logging disabled: {err}");
        }
    }

    let ctx = CliContext::new(config.notes_path, cwd, Box::new(SystemEnvironment));
    let args: Vec<String> = std::env::args().skip(1).collect();
    let out = run_cli(&args, &ctx);
    print!("{}", out.stdout);
    std::process::exit(out.exit_code);
}
