fn main() {
    if let Err(err) = yolosplit::run() {
        tracing::error!("Error running yolosplit: {err}");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
