fn main() {
    if let Err(e) = cardshift::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
