#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
// The ultimate strictness: catches things like missing documentation or overflow risks
#![warn(clippy::restriction)]

fn main() {
    if let Err(e) = crowd_watch::run() {
        eprintln!("crowd-watch: {e}");
        std::process::exit(1);
    }
}
