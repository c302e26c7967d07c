fn main() {
    if let Err(err) = movie_ingest::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
