//! dracut-module - rebuild an initramfs image with dracut.
//!
//! Runs as an Ansible binary module: the host passes the path of a JSON
//! argument file, the module prints one JSON result document on stdout.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;

use dracut_module::config::Config;
use dracut_module::{logging, module};

#[derive(Parser)]
#[command(name = "dracut-module")]
#[command(about = "Ansible binary module that rebuilds an initramfs image with dracut")]
#[command(
    after_help = "ARGUMENTS FILE:\n  {\"name\": \"/boot/initramfs-6.1.img\", \"kernel\": \"6.1.0\",\n   \"add_dracut_modules\": [\"nfs\"], \"force\": true}"
)]
struct Cli {
    /// JSON module arguments file (read from stdin when omitted)
    args_file: Option<PathBuf>,

    /// Validate the arguments and print the dracut command line without running it
    #[arg(long)]
    print_command: bool,

    /// Show the resolved configuration and exit
    #[arg(long, conflicts_with = "print_command")]
    show_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    logging::init(&config.log_filter);

    if cli.show_config {
        config.print();
        return Ok(());
    }

    if cli.print_command {
        let value = module::read_module_args(cli.args_file.as_deref())?;
        let argv = module::render_command(&value, &config)?;
        println!("{}", serde_json::to_string(&argv)?);
        return Ok(());
    }

    let response = module::run_module(cli.args_file.as_deref(), &config);

    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, &response).context("Failed to write module result")?;
    writeln!(stdout)?;
    stdout.flush()?;

    std::process::exit(response.exit_code());
}
