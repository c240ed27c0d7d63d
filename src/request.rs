use std::time::Instant;

use parking_lot::Mutex;

/// Travel direction of a request or a car. Cars park as `Idle`; a request
/// always carries `Up` or `Down`, derived from its floor pair.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Idle,
}

impl Direction {
    /// Direction of travel from one floor towards another.
    pub fn towards(from: u8, to: u8) -> Direction {
        if from < to {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Idle => "idle",
        }
    }
}

/// Lifecycle stage of a request. Advances strictly forwards; a request a
/// car refuses to take was never marked assigned in the first place.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Assigned,
    InService,
    Completed,
}

/// One floor-to-floor travel order. The floor pair and direction are fixed
/// at submission; only the status field ever changes. Shared as
/// `Arc<Request>` between the submitter, the dispatcher and the single car
/// serving it, so the submitter observes progress through the same handle
/// it got back from `submit`.
#[derive(Debug)]
pub struct Request {
    pub id: u64,
    pub source: u8,
    pub destination: u8,
    pub direction: Direction,
    pub created_at: Instant,
    status: Mutex<RequestStatus>,
}

impl Request {
    pub fn new(id: u64, source: u8, destination: u8) -> Request {
        Request {
            id,
            source,
            destination,
            direction: Direction::towards(source, destination),
            created_at: Instant::now(),
            status: Mutex::new(RequestStatus::Pending),
        }
    }

    pub fn status(&self) -> RequestStatus {
        *self.status.lock()
    }

    pub(crate) fn set_status(&self, status: RequestStatus) {
        *self.status.lock() = status;
    }

    /// Advisory priority that grows with waiting time, in milliseconds.
    pub fn priority(&self) -> u64 {
        self.created_at.elapsed().as_millis() as u64
    }

    /// The next floor the serving car has to reach for this request: the
    /// source until the passenger has boarded, the destination after.
    pub fn next_stop(&self) -> u8 {
        match self.status() {
            RequestStatus::InService | RequestStatus::Completed => self.destination,
            RequestStatus::Pending | RequestStatus::Assigned => self.source,
        }
    }
}
