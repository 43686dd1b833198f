fn main() {
    if let Err(err) = borgvault::cli::run() {
        println!("borgvault failed: {err}");
        std::process::exit(1);
    }
}
