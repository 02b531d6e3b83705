fn main() {
    if let Err(e) = assetmap_cli::run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
