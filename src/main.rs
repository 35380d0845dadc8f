fn main() {
    if let Err(err) = drawheel::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
