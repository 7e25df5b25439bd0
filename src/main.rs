fn main() {
    if let Err(err) = backlog_rank::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
