/// ----- ELEVATOR CAR -----
/// Each car owns a queue of assigned requests and serves it on a worker
/// thread of its own. The worker picks the next stop in sweep order,
/// simulates travel one floor at a time and opens the doors for every
/// pickup and drop-off that is due along the way. All waiting is done in
/// `select!` with a timeout, so a stop signal interrupts the car between
/// floors and mid-dwell without busy looping.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{select, unbounded, Receiver, Sender};
use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::config::TimingConfig;
use crate::request::{Direction, Request, RequestStatus};
use crate::requests::RequestQueue;

/// Operational state of a car. `Maintenance` is terminal and set from the
/// outside; the worker itself only ever writes the other three.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    Idle,
    MovingUp,
    MovingDown,
    Maintenance,
}

impl Behaviour {
    pub fn as_str(self) -> &'static str {
        match self {
            Behaviour::Idle => "idle",
            Behaviour::MovingUp => "movingUp",
            Behaviour::MovingDown => "movingDown",
            Behaviour::Maintenance => "maintenance",
        }
    }
}

/// Live state of one car, shared between the worker thread, the dispatcher
/// and snapshot readers. Always locked for the shortest possible span and
/// never across a sleep.
#[derive(Debug)]
pub(crate) struct ElevatorStatus {
    pub floor: u8,
    pub direction: Direction,
    pub behaviour: Behaviour,
    pub door_open: bool,
    pub queue: RequestQueue,
}

/// Read-only copy of one car's externally visible state.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct ElevatorSnapshot {
    pub id: u8,
    pub floor: u8,
    pub direction: Direction,
    pub behaviour: Behaviour,
    pub queue_depth: usize,
    pub door_open: bool,
}

/// Handle to one car and its worker thread. Dropping the handle without
/// calling `stop` ends the worker too, through the disconnected channels.
#[derive(Debug)]
pub struct Elevator {
    id: u8,
    capacity: u8,
    status: Arc<Mutex<ElevatorStatus>>,
    wakeup_tx: Sender<()>,
    stop_tx: Sender<()>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl Elevator {
    /// Creates the car parked at floor 1 and spawns its service loop.
    pub fn init(id: u8, capacity: u8, timing: TimingConfig) -> Elevator {
        let status = Arc::new(Mutex::new(ElevatorStatus {
            floor: 1,
            direction: Direction::Idle,
            behaviour: Behaviour::Idle,
            door_open: false,
            queue: RequestQueue::new(),
        }));
        let (wakeup_tx, wakeup_rx) = unbounded();
        let (stop_tx, stop_rx) = unbounded();
        let worker = {
            let status = Arc::clone(&status);
            thread::Builder::new()
                .name(format!("elevator-{}", id))
                .spawn(move || run(id, status, wakeup_rx, stop_rx, timing))
                .unwrap()
        };
        Elevator {
            id,
            capacity,
            status,
            wakeup_tx,
            stop_tx,
            worker: Mutex::new(Some(worker)),
        }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn capacity(&self) -> u8 {
        self.capacity
    }

    /// Hands a request to this car and wakes the worker. The request is
    /// marked assigned under the same lock that inserts it, so no reader
    /// ever sees it queued but still pending. Returns false without
    /// touching the request when the car is in maintenance.
    pub fn enqueue(&self, request: Arc<Request>) -> bool {
        {
            let mut status = self.status.lock();
            if status.behaviour == Behaviour::Maintenance {
                warn!(
                    "elevator {} is in maintenance, refusing request {}",
                    self.id, request.id
                );
                return false;
            }
            request.set_status(RequestStatus::Assigned);
            status.queue.push(request);
        }
        let _ = self.wakeup_tx.send(());
        true
    }

    pub fn snapshot(&self) -> ElevatorSnapshot {
        let status = self.status.lock();
        ElevatorSnapshot {
            id: self.id,
            floor: status.floor,
            direction: status.direction,
            behaviour: status.behaviour,
            queue_depth: status.queue.len(),
            door_open: status.door_open,
        }
    }

    pub fn current_floor(&self) -> u8 {
        self.status.lock().floor
    }

    pub fn behaviour(&self) -> Behaviour {
        self.status.lock().behaviour
    }

    pub fn queue_depth(&self) -> usize {
        self.status.lock().queue.len()
    }

    /// Takes the car out of service. The worker finishes the request it is
    /// currently serving, then parks; requests still queued stay assigned
    /// and unserved. There is no way back to service on this handle.
    pub fn set_maintenance(&self) {
        self.status.lock().behaviour = Behaviour::Maintenance;
        info!("elevator {} entering maintenance", self.id);
    }

    /// Asks the worker to stop and waits for it. Movement or door dwell in
    /// flight is cut short and the last recorded floor stands, possibly
    /// one short of where a real car would be. Safe to call repeatedly.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(());
        if let Some(worker) = self.worker.lock().take() {
            let _ = worker.join();
        }
    }
}

/// Worker-internal marker that a stop signal ended the current step.
struct Interrupted;

fn run(
    id: u8,
    status: Arc<Mutex<ElevatorStatus>>,
    wakeup_rx: Receiver<()>,
    stop_rx: Receiver<()>,
    timing: TimingConfig,
) {
    info!("elevator {} started", id);
    loop {
        if status.lock().behaviour == Behaviour::Maintenance {
            // parked for good, only the stop signal ends the thread
            let _ = stop_rx.recv();
            break;
        }

        let next = {
            let mut status = status.lock();
            let next = status.queue.select_next(status.floor, status.direction);
            if next.is_none() && status.behaviour != Behaviour::Maintenance {
                status.behaviour = Behaviour::Idle;
                status.direction = Direction::Idle;
            }
            next
        };

        match next {
            Some(request) => {
                if serve(id, &status, &request, &stop_rx, &timing).is_err() {
                    break;
                }
            }
            None => {
                select! {
                    recv(wakeup_rx) -> msg => {
                        if msg.is_err() {
                            break;
                        }
                    }
                    recv(stop_rx) -> _ => break,
                }
            }
        }
    }
    info!("elevator {} stopped", id);
}

/// One service cycle for the selected request: reach the source and board
/// unless the passenger already rides along, then reach the destination
/// and let them off. Both legs stop over for any other request that is due
/// at a floor crossed on the way.
fn serve(
    id: u8,
    status: &Arc<Mutex<ElevatorStatus>>,
    request: &Arc<Request>,
    stop_rx: &Receiver<()>,
    timing: &TimingConfig,
) -> Result<(), Interrupted> {
    debug!(
        "elevator {} serving request {} ({} -> {})",
        id, request.id, request.source, request.destination
    );
    if request.status() == RequestStatus::Assigned {
        travel_to(id, status, request.source, stop_rx, timing)?;
        door_stop(id, status, request.direction, stop_rx, timing)?;
    }
    if request.status() == RequestStatus::InService {
        travel_to(id, status, request.destination, stop_rx, timing)?;
        door_stop(id, status, request.direction, stop_rx, timing)?;
    }
    Ok(())
}

/// Drives the car one floor at a time until `target`, pausing for every
/// stop that is due on a floor crossed along the way. Arrival at `target`
/// itself leaves the doors to the caller.
fn travel_to(
    id: u8,
    status: &Arc<Mutex<ElevatorStatus>>,
    target: u8,
    stop_rx: &Receiver<()>,
    timing: &TimingConfig,
) -> Result<(), Interrupted> {
    let travel = {
        let mut status = status.lock();
        if status.floor == target {
            return Ok(());
        }
        let travel = Direction::towards(status.floor, target);
        status.direction = travel;
        set_moving(&mut status, travel);
        travel
    };

    loop {
        sleep_unless_stopped(stop_rx, timing.floor_travel())?;
        let (floor, arrived, stop_over) = {
            let mut status = status.lock();
            status.floor = match travel {
                Direction::Up => status.floor + 1,
                _ => status.floor - 1,
            };
            let arrived = status.floor == target;
            let stop_over = !arrived && status.queue.stop_due(status.floor, travel);
            (status.floor, arrived, stop_over)
        };
        debug!("elevator {} passing floor {}", id, floor);
        if arrived {
            return Ok(());
        }
        if stop_over {
            door_stop(id, status, travel, stop_rx, timing)?;
            set_moving(&mut status.lock(), travel);
        }
    }
}

fn set_moving(status: &mut ElevatorStatus, travel: Direction) {
    if status.behaviour != Behaviour::Maintenance {
        status.behaviour = match travel {
            Direction::Up => Behaviour::MovingUp,
            _ => Behaviour::MovingDown,
        };
    }
}

/// One full door cycle at the current floor: everyone bound for this floor
/// alights, then everyone waiting here to go `boarding` boards. A status
/// only advances once its dwell interval has fully elapsed, so a stop
/// signal never leaves a request half served on paper.
fn door_stop(
    id: u8,
    status: &Arc<Mutex<ElevatorStatus>>,
    boarding: Direction,
    stop_rx: &Receiver<()>,
    timing: &TimingConfig,
) -> Result<(), Interrupted> {
    let (floor, dropoffs, pickups) = {
        let mut status = status.lock();
        if status.behaviour != Behaviour::Maintenance {
            status.behaviour = Behaviour::Idle;
        }
        status.door_open = true;
        (
            status.floor,
            status.queue.dropoffs_here(status.floor),
            status.queue.pickups_here(status.floor, boarding),
        )
    };
    debug!("elevator {} doors open at floor {}", id, floor);

    if !dropoffs.is_empty() {
        sleep_unless_stopped(stop_rx, timing.alighting_dwell())?;
        let mut status = status.lock();
        for request in &dropoffs {
            request.set_status(RequestStatus::Completed);
            status.queue.remove(request.id);
            info!(
                "elevator {} completed request {} at floor {}",
                id, request.id, floor
            );
        }
    }

    if !pickups.is_empty() {
        sleep_unless_stopped(stop_rx, timing.boarding_dwell())?;
        for request in &pickups {
            request.set_status(RequestStatus::InService);
            debug!(
                "elevator {} picked up request {} at floor {}",
                id, request.id, floor
            );
        }
    }

    status.lock().door_open = false;
    Ok(())
}

/// Sleeps for `duration` unless a stop signal arrives first.
fn sleep_unless_stopped(stop_rx: &Receiver<()>, duration: Duration) -> Result<(), Interrupted> {
    select! {
        recv(stop_rx) -> _ => Err(Interrupted),
        default(duration) => Ok(()),
    }
}
