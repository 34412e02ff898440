use enet_probe::{config::sender_app, config::SenderConfig, logging, sender};
use std::process;
use tracing::error;

fn main() {
    let matches = sender_app().get_matches();
    if let Err(e) = logging::init(matches.occurrences_of("verbose")) {
        eprintln!("error: {}", e);
        process::exit(1);
    }

    let result = SenderConfig::from_matches(&matches).and_then(|config| {
        enet_probe::runtime()
            .and_then(|mut rt| rt.block_on(enet_probe::until_interrupted(sender::run(config))))
    });
    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}
