use enet_probe::{config::responder_app, config::ResponderConfig, logging, responder};
use std::process;
use tracing::error;

fn main() {
    let matches = responder_app().get_matches();
    if let Err(e) = logging::init(matches.occurrences_of("verbose")) {
        eprintln!("error: {}", e);
        process::exit(1);
    }

    let result = ResponderConfig::from_matches(&matches).and_then(|config| {
        enet_probe::runtime()
            .and_then(|mut rt| rt.block_on(enet_probe::until_interrupted(responder::run(config))))
    });
    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}
