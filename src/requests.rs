use std::sync::Arc;

use crate::request::{Direction, Request, RequestStatus};

/// The set of requests assigned to one car. Membership is unordered; the
/// order requests are served in is recomputed from the car's position and
/// direction every service cycle, never stored.
#[derive(Debug, Default)]
pub struct RequestQueue {
    requests: Vec<Arc<Request>>,
}

impl RequestQueue {
    pub fn new() -> RequestQueue {
        RequestQueue {
            requests: Vec::new(),
        }
    }

    pub fn push(&mut self, request: Arc<Request>) {
        self.requests.push(request);
    }

    pub fn remove(&mut self, id: u64) {
        self.requests.retain(|request| request.id != id);
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Picks the request to serve next. Requests whose next stop lies in
    /// the direction of travel win over the rest (an idle car considers
    /// every stop to lie ahead), nearest stop first, earliest submission
    /// on equal distance. When nothing is left ahead the choice falls on
    /// the other side, which is the moment the car reverses.
    pub fn select_next(&self, floor: u8, direction: Direction) -> Option<Arc<Request>> {
        let (ahead, behind): (Vec<_>, Vec<_>) = self
            .requests
            .iter()
            .partition(|request| is_ahead(request.next_stop(), floor, direction));
        nearest(&ahead, floor).or_else(|| nearest(&behind, floor))
    }

    /// Waiting requests that board at `floor` to continue in `travel`.
    pub fn pickups_here(&self, floor: u8, travel: Direction) -> Vec<Arc<Request>> {
        self.requests
            .iter()
            .filter(|request| {
                request.status() == RequestStatus::Assigned
                    && request.source == floor
                    && request.direction == travel
            })
            .cloned()
            .collect()
    }

    /// Boarded requests that get off at `floor`.
    pub fn dropoffs_here(&self, floor: u8) -> Vec<Arc<Request>> {
        self.requests
            .iter()
            .filter(|request| {
                request.status() == RequestStatus::InService && request.destination == floor
            })
            .cloned()
            .collect()
    }

    /// True when a car passing `floor` while travelling `travel` should
    /// open its doors there.
    pub fn stop_due(&self, floor: u8, travel: Direction) -> bool {
        !self.dropoffs_here(floor).is_empty() || !self.pickups_here(floor, travel).is_empty()
    }
}

fn is_ahead(stop: u8, floor: u8, direction: Direction) -> bool {
    match direction {
        Direction::Idle => true,
        _ if stop == floor => true,
        Direction::Up => stop > floor,
        Direction::Down => stop < floor,
    }
}

fn nearest(candidates: &[&Arc<Request>], floor: u8) -> Option<Arc<Request>> {
    candidates
        .iter()
        .min_by_key(|request| (request.next_stop().abs_diff(floor), request.created_at))
        .map(|request| Arc::clone(request))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queued(id: u64, source: u8, destination: u8) -> Arc<Request> {
        let request = Arc::new(Request::new(id, source, destination));
        request.set_status(RequestStatus::Assigned);
        request
    }

    #[test]
    fn empty_queue_selects_nothing() {
        let queue = RequestQueue::new();
        assert!(queue.select_next(1, Direction::Idle).is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn idle_car_picks_nearest_source() {
        let mut queue = RequestQueue::new();
        queue.push(queued(1, 5, 9));
        queue.push(queued(2, 2, 1));
        let next = queue.select_next(3, Direction::Idle).unwrap();
        assert_eq!(next.id, 2);
    }

    #[test]
    fn moving_car_prefers_stops_ahead() {
        let mut queue = RequestQueue::new();
        queue.push(queued(1, 5, 9));
        queue.push(queued(2, 2, 1));
        // floor 2 is closer, but it lies behind a car going up
        let next = queue.select_next(3, Direction::Up).unwrap();
        assert_eq!(next.id, 1);
    }

    #[test]
    fn reverses_only_when_nothing_is_ahead() {
        let mut queue = RequestQueue::new();
        queue.push(queued(1, 2, 1));
        let next = queue.select_next(3, Direction::Up).unwrap();
        assert_eq!(next.id, 1);
    }

    #[test]
    fn equal_distance_breaks_on_age() {
        let mut queue = RequestQueue::new();
        let older = queued(1, 5, 9);
        std::thread::sleep(std::time::Duration::from_millis(2));
        let newer = queued(2, 5, 9);
        queue.push(newer);
        queue.push(older);
        let next = queue.select_next(3, Direction::Up).unwrap();
        assert_eq!(next.id, 1);
    }

    #[test]
    fn boarded_request_targets_its_destination() {
        let mut queue = RequestQueue::new();
        let riding = queued(1, 2, 9);
        riding.set_status(RequestStatus::InService);
        queue.push(Arc::clone(&riding));
        // source 2 is behind, but the boarded passenger rides on to 9
        let next = queue.select_next(3, Direction::Up).unwrap();
        assert_eq!(next.id, 1);
        assert_eq!(next.next_stop(), 9);
    }

    #[test]
    fn pickups_match_floor_and_direction() {
        let mut queue = RequestQueue::new();
        queue.push(queued(1, 4, 8));
        queue.push(queued(2, 4, 1));
        queue.push(queued(3, 5, 8));
        let boarding = queue.pickups_here(4, Direction::Up);
        assert_eq!(boarding.len(), 1);
        assert_eq!(boarding[0].id, 1);
    }

    #[test]
    fn dropoffs_require_boarded_passengers() {
        let mut queue = RequestQueue::new();
        let riding = queued(1, 2, 6);
        riding.set_status(RequestStatus::InService);
        queue.push(riding);
        queue.push(queued(2, 3, 6));
        let leaving = queue.dropoffs_here(6);
        assert_eq!(leaving.len(), 1);
        assert_eq!(leaving[0].id, 1);
    }

    #[test]
    fn stop_due_covers_both_door_reasons() {
        let mut queue = RequestQueue::new();
        let riding = queued(1, 2, 6);
        riding.set_status(RequestStatus::InService);
        queue.push(riding);
        queue.push(queued(2, 4, 9));
        assert!(queue.stop_due(6, Direction::Up));
        assert!(queue.stop_due(4, Direction::Up));
        assert!(!queue.stop_due(4, Direction::Down));
        assert!(!queue.stop_due(5, Direction::Up));
    }

    #[test]
    fn remove_drops_only_the_given_id() {
        let mut queue = RequestQueue::new();
        queue.push(queued(1, 2, 6));
        queue.push(queued(2, 3, 7));
        queue.remove(1);
        assert_eq!(queue.len(), 1);
        assert!(queue.select_next(1, Direction::Idle).unwrap().id == 2);
    }
}
