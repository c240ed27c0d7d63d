/// ----- CONTROLLER -----
/// The public face of the subsystem. It owns the fleet and the global
/// pending queue, spawns one dispatcher thread that drains that queue on a
/// fixed tick through the assigner, and exposes exactly three operations:
/// submit a travel request, snapshot the fleet, shut everything down.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{select, tick, unbounded, Receiver, Sender};
use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::assigner;
use crate::config::FleetConfig;
use crate::elevator::{Elevator, ElevatorSnapshot};
use crate::error::InvalidRequest;
use crate::request::{Direction, Request};

pub struct Controller {
    cars: Arc<Vec<Elevator>>,
    pending: Arc<Mutex<VecDeque<Arc<Request>>>>,
    next_id: AtomicU64,
    max_floor: u8,
    stop_tx: Sender<()>,
    dispatcher: Mutex<Option<thread::JoinHandle<()>>>,
}

impl Controller {
    /// Builds the fleet, every car idle at floor 1, and starts the
    /// dispatcher thread.
    pub fn init(config: FleetConfig) -> Controller {
        let cars: Vec<Elevator> = (1..=config.num_elevators)
            .map(|id| Elevator::init(id, config.capacity, config.timing.clone()))
            .collect();
        let cars = Arc::new(cars);
        let pending = Arc::new(Mutex::new(VecDeque::new()));
        let (stop_tx, stop_rx) = unbounded();
        let dispatcher = {
            let cars = Arc::clone(&cars);
            let pending = Arc::clone(&pending);
            let tick_interval = config.timing.dispatch_tick();
            thread::Builder::new()
                .name("dispatcher".to_string())
                .spawn(move || run_dispatch(cars, pending, stop_rx, tick_interval))
                .unwrap()
        };
        info!(
            "controller started: {} elevators, {} floors",
            config.num_elevators, config.num_floors
        );
        Controller {
            cars,
            pending,
            next_id: AtomicU64::new(1),
            max_floor: config.num_floors,
            stop_tx,
            dispatcher: Mutex::new(Some(dispatcher)),
        }
    }

    /// Validates the floor pair, queues a new request and returns its
    /// handle right away. The dispatcher assigns it to a car on one of the
    /// following ticks; the caller watches progress through the handle.
    pub fn submit(&self, source: u8, destination: u8) -> Result<Arc<Request>, InvalidRequest> {
        for floor in [source, destination] {
            if floor < 1 || floor > self.max_floor {
                return Err(InvalidRequest::FloorOutOfRange {
                    floor,
                    max_floor: self.max_floor,
                });
            }
        }
        if source == destination {
            return Err(InvalidRequest::SameFloor { floor: source });
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = Arc::new(Request::new(id, source, destination));
        self.pending.lock().push_back(Arc::clone(&request));
        debug!(
            "request {} queued ({} -> {}, {})",
            id,
            source,
            destination,
            Direction::towards(source, destination).as_str()
        );
        Ok(request)
    }

    /// Read-only view of every car, in fleet order.
    pub fn status(&self) -> Vec<ElevatorSnapshot> {
        self.cars.iter().map(Elevator::snapshot).collect()
    }

    /// Number of requests waiting for a car.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    /// Administrative: takes one car out of service for good.
    pub fn set_maintenance(&self, car_id: u8) {
        match self.cars.iter().find(|car| car.id() == car_id) {
            Some(car) => car.set_maintenance(),
            None => warn!("no elevator with id {}", car_id),
        }
    }

    /// Stops the dispatcher first, so nothing new reaches the cars, then
    /// stops every car worker and waits for all of them. Requests caught
    /// mid-flight keep whatever status they last reached. Safe to call
    /// more than once; later calls return immediately.
    pub fn shutdown(&self) {
        let _ = self.stop_tx.send(());
        if let Some(dispatcher) = self.dispatcher.lock().take() {
            let _ = dispatcher.join();
            info!("dispatcher stopped");
        }
        for car in self.cars.iter() {
            car.stop();
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_dispatch(
    cars: Arc<Vec<Elevator>>,
    pending: Arc<Mutex<VecDeque<Arc<Request>>>>,
    stop_rx: Receiver<()>,
    tick_interval: Duration,
) {
    let ticker = tick(tick_interval);
    loop {
        select! {
            recv(stop_rx) -> _ => break,
            recv(ticker) -> _ => assign_pending(&cars, &pending),
        }
    }
}

/// Drains the pending queue front to back. A request nobody can take goes
/// back to the front and ends the drain until the next tick, keeping
/// arrival order among the requests still waiting.
fn assign_pending(cars: &[Elevator], pending: &Mutex<VecDeque<Arc<Request>>>) {
    loop {
        let request = match pending.lock().pop_front() {
            Some(request) => request,
            None => return,
        };
        let fleet: Vec<ElevatorSnapshot> = cars.iter().map(Elevator::snapshot).collect();
        let chosen = assigner::select_best(&fleet, &request)
            .and_then(|id| cars.iter().find(|car| car.id() == id));
        match chosen {
            Some(car) => {
                if car.enqueue(Arc::clone(&request)) {
                    debug!("request {} assigned to elevator {}", request.id, car.id());
                } else {
                    // the car flipped to maintenance after the snapshot
                    pending.lock().push_front(request);
                    return;
                }
            }
            None => {
                debug!("request {} has no car available, holding", request.id);
                pending.lock().push_front(request);
                return;
            }
        }
    }
}
