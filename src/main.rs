fn main() {
    if let Err(err) = fastfood_nutrition::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
