use std::io::{stdout, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{select, tick, unbounded};
use log::warn;
use rand::Rng;

use elevator_dispatch::config::FleetConfig;
use elevator_dispatch::controller::Controller;
use elevator_dispatch::debug;
use elevator_dispatch::request::{Request, RequestStatus};

const CONFIG_PATH: &str = "config.json";

/// Demo driver: starts a fleet from the configuration file, feeds it
/// random travel requests and repaints a status table until every request
/// has been completed.
fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // READ CONFIGURATION
    let mut config = match FleetConfig::load(CONFIG_PATH) {
        Ok(config) => config,
        Err(_) => {
            println!("No configuration file provided, using default settings...");
            FleetConfig::default()
        }
    };
    let mut num_requests: u32 = 12;
    parse_env_args(&mut config, &mut num_requests);
    if config.num_elevators == 0 || config.num_floors < 2 {
        println!(
            "nothing to run with {} elevators and {} floors",
            config.num_elevators, config.num_floors
        );
        return Ok(());
    }

    // INITIALIZE FLEET
    let controller = Arc::new(Controller::init(config.clone()));

    // INITIALIZE THREAD FOR SYNTHETIC TRAFFIC
    let (request_tx, request_rx) = unbounded();
    {
        let controller = Arc::clone(&controller);
        let request_tx = request_tx.clone();
        let num_floors = config.num_floors;
        thread::Builder::new()
            .name("traffic".to_string())
            .spawn(move || {
                let mut rng = rand::rng();
                for _ in 0..num_requests {
                    let source = rng.random_range(1..=num_floors);
                    let mut destination = rng.random_range(1..=num_floors);
                    while destination == source {
                        destination = rng.random_range(1..=num_floors);
                    }
                    match controller.submit(source, destination) {
                        Ok(request) => {
                            if request_tx.send(request).is_err() {
                                return;
                            }
                        }
                        Err(err) => warn!("request rejected: {}", err),
                    }
                    thread::sleep(Duration::from_millis(400));
                }
            })
            .unwrap();
    }

    // STATUS LOOP
    let mut stdout = stdout();
    for _ in 0..debug::table_rows(config.num_elevators as usize) {
        writeln!(stdout)?;
    }

    let redraw = tick(Duration::from_millis(100));
    let expected = num_requests as usize;
    let mut handles: Vec<Arc<Request>> = Vec::new();

    loop {
        select! {
            recv(request_rx) -> msg => {
                if let Ok(request) = msg {
                    handles.push(request);
                }
            },
            recv(redraw) -> _ => {
                let completed = handles
                    .iter()
                    .filter(|request| request.status() == RequestStatus::Completed)
                    .count();
                debug::printstatus(
                    &mut stdout,
                    &controller.status(),
                    handles.len(),
                    completed,
                    controller.pending_count(),
                )?;
                if handles.len() == expected && completed == expected {
                    break;
                }
            }
        }
    }

    controller.shutdown();
    println!("all {} requests served, shutting down", handles.len());
    Ok(())
}

fn parse_env_args(config: &mut FleetConfig, num_requests: &mut u32) {
    let args: Vec<String> = std::env::args().collect();
    for arg_pair in args.rchunks_exact(2) {
        match arg_pair[0].as_str() {
            "--elevators" => match arg_pair[1].parse::<u8>() {
                Ok(num) => config.num_elevators = num,
                Err(_) => println!("elevators {} is not a number, skipping...", arg_pair[1]),
            },
            "--floors" => match arg_pair[1].parse::<u8>() {
                Ok(num) => config.num_floors = num,
                Err(_) => println!("floors {} is not a number, skipping...", arg_pair[1]),
            },
            "--requests" => match arg_pair[1].parse::<u32>() {
                Ok(num) => *num_requests = num,
                Err(_) => println!("requests {} is not a number, skipping...", arg_pair[1]),
            },
            _ => {}
        }
    }
}
