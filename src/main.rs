use clap::Parser;
use foldersort::cli::{self, Cli};
use std::process;

fn main() {
    let args = Cli::parse();
    process::exit(cli::run(&args));
}
