mod cli;
mod collections;
mod commands;
mod env_loader;
mod error;
mod logging;
mod mediacloud;

fn main() {
    env_loader::load_dotenv();
    logging::init();

    if let Err(err) = cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
