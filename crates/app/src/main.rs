use app::{
    command::{parse, Input, HELP},
    render::{describe, describe_view},
};
use planner::{MapSession, Services, SessionRef};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use transit_api::ServiceConfig;

#[tokio::main]
async fn main() {
    env_logger::init();

    // services
    let config = ServiceConfig::from_env();
    log::info!(
        "backend {}, routing {} ({}), geocoder {}",
        config.backend_url,
        config.osrm_url,
        config.osrm_profile,
        config.geocoder_url
    );

    // session
    let (events_tx, mut events) = mpsc::unbounded_channel();
    let session = MapSession::start(Services::from_config(&config), events_tx);
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            println!("{}", describe(&event));
        }
    });

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(why) => {
                log::error!("reading stdin failed: {why}");
                break;
            }
        };
        let result = match parse(&line) {
            Ok(Input::Command(command)) => session.send(command).await,
            Ok(Input::AddVia(text)) => session
                .add_via(&text)
                .await
                .map(|key| println!("added via {key}")),
            Ok(Input::Show) => session
                .snapshot()
                .await
                .map(|view| println!("{}", describe_view(&view))),
            Ok(Input::Help) => {
                println!("{HELP}");
                Ok(())
            }
            Ok(Input::Quit) => break,
            Ok(Input::Empty) => Ok(()),
            Err(why) => {
                println!("{why}");
                Ok(())
            }
        };
        if let Err(why) = result {
            log::error!("session stopped: {why}");
            break;
        }
    }
}
