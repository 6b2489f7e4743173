fn main() {
    if let Err(err) = vpc_topology::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
