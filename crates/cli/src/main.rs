//! nnbench CLI entry point.

fn main() {
    if let Err(e) = nnbench_cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
