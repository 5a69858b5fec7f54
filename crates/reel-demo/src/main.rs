#![forbid(unsafe_code)]

//! `reelfeed` entry point.

fn main() {
    if let Err(error) = reel_demo::run_from_env() {
        eprintln!("reelfeed: {error}");
        std::process::exit(1);
    }
}
