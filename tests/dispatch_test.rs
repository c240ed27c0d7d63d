use std::thread;
use std::time::{Duration, Instant};

use elevator_dispatch::{Behaviour, Controller, Direction, FleetConfig, RequestStatus, TimingConfig};

fn fast_config(num_elevators: u8) -> FleetConfig {
    FleetConfig {
        num_elevators,
        num_floors: 10,
        capacity: 8,
        timing: TimingConfig {
            floor_travel_s: 0.005,
            boarding_dwell_s: 0.003,
            alighting_dwell_s: 0.003,
            dispatch_tick_s: 0.002,
        },
    }
}

fn wait_until(timeout: Duration, mut done: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if done() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    false
}

fn rank(status: RequestStatus) -> u8 {
    match status {
        RequestStatus::Pending => 0,
        RequestStatus::Assigned => 1,
        RequestStatus::InService => 2,
        RequestStatus::Completed => 3,
    }
}

#[test]
fn single_car_serves_a_round_trip() {
    let controller = Controller::init(fast_config(1));
    let up = controller.submit(1, 5).unwrap();
    let down = controller.submit(5, 1).unwrap();

    assert!(wait_until(Duration::from_secs(5), || {
        up.status() == RequestStatus::Completed && down.status() == RequestStatus::Completed
    }));

    assert!(wait_until(Duration::from_secs(1), || {
        let car = &controller.status()[0];
        car.floor == 1 && car.behaviour == Behaviour::Idle && car.direction == Direction::Idle
    }));
    assert_eq!(controller.status()[0].queue_depth, 0);
    controller.shutdown();
}

#[test]
fn request_lifecycle_never_goes_backwards() {
    let controller = Controller::init(fast_config(1));
    let request = controller.submit(2, 6).unwrap();

    let mut seen = vec![request.status()];
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        let status = request.status();
        if status != *seen.last().unwrap() {
            seen.push(status);
        }
        if status == RequestStatus::Completed {
            break;
        }
        thread::sleep(Duration::from_millis(1));
    }

    assert_eq!(*seen.last().unwrap(), RequestStatus::Completed);
    for pair in seen.windows(2) {
        assert!(
            rank(pair[0]) < rank(pair[1]),
            "status went from {:?} to {:?}",
            pair[0],
            pair[1]
        );
    }
    controller.shutdown();
}

#[test]
fn whole_fleet_in_maintenance_holds_requests_pending() {
    let controller = Controller::init(fast_config(2));
    controller.set_maintenance(1);
    controller.set_maintenance(2);

    let request = controller.submit(2, 9).unwrap();
    for _ in 0..5 {
        thread::sleep(Duration::from_millis(20));
        assert_eq!(request.status(), RequestStatus::Pending);
        for car in controller.status() {
            assert_eq!(car.behaviour, Behaviour::Maintenance);
            assert_eq!(car.queue_depth, 0);
        }
    }
    // the dispatcher may hold the request popped mid-tick, so retry
    assert!(wait_until(Duration::from_secs(1), || {
        controller.pending_count() == 1
    }));
    controller.shutdown();
}

#[test]
fn pickups_on_the_way_are_served_without_reversing() {
    let config = FleetConfig {
        num_elevators: 1,
        num_floors: 10,
        capacity: 8,
        timing: TimingConfig {
            floor_travel_s: 0.05,
            boarding_dwell_s: 0.1,
            alighting_dwell_s: 0.02,
            dispatch_tick_s: 0.005,
        },
    };
    let controller = Controller::init(config);

    let first = controller.submit(3, 8).unwrap();
    assert!(wait_until(Duration::from_secs(3), || {
        first.status() == RequestStatus::InService
    }));

    // the car is boarding at floor 3; these join the upward sweep
    let second = controller.submit(4, 8).unwrap();
    let third = controller.submit(6, 8).unwrap();

    assert!(wait_until(Duration::from_secs(3), || {
        second.status() == RequestStatus::InService
    }));
    assert_eq!(first.status(), RequestStatus::InService);
    assert!(controller.status()[0].floor < 8);

    assert!(wait_until(Duration::from_secs(3), || {
        third.status() == RequestStatus::InService
    }));
    assert_eq!(first.status(), RequestStatus::InService);
    assert_eq!(second.status(), RequestStatus::InService);
    assert!(controller.status()[0].floor < 8);

    assert!(wait_until(Duration::from_secs(5), || {
        first.status() == RequestStatus::Completed
            && second.status() == RequestStatus::Completed
            && third.status() == RequestStatus::Completed
    }));
    assert_eq!(controller.status()[0].floor, 8);
    controller.shutdown();
}

#[test]
fn two_cars_drain_mixed_traffic() {
    let controller = Controller::init(fast_config(2));
    let pairs = [(1, 6), (7, 2), (3, 9), (10, 4), (2, 5), (8, 1)];
    let requests: Vec<_> = pairs
        .iter()
        .map(|&(source, destination)| controller.submit(source, destination).unwrap())
        .collect();

    assert!(wait_until(Duration::from_secs(10), || {
        let queued: usize = controller.status().iter().map(|car| car.queue_depth).sum();
        assert!(queued <= requests.len());
        requests
            .iter()
            .all(|request| request.status() == RequestStatus::Completed)
    }));

    let fleet = controller.status();
    assert_eq!(fleet.len(), 2);
    assert_eq!(fleet[0].id, 1);
    assert_eq!(fleet[1].id, 2);
    assert!(fleet.iter().all(|car| car.queue_depth == 0));
    assert_eq!(controller.pending_count(), 0);
    controller.shutdown();
}

#[test]
fn shutdown_abandons_travel_in_flight() {
    let config = FleetConfig {
        num_elevators: 1,
        num_floors: 10,
        capacity: 8,
        timing: TimingConfig {
            floor_travel_s: 0.1,
            boarding_dwell_s: 0.01,
            alighting_dwell_s: 0.01,
            dispatch_tick_s: 0.002,
        },
    };
    let controller = Controller::init(config);
    let request = controller.submit(1, 9).unwrap();
    assert!(wait_until(Duration::from_secs(2), || {
        request.status() == RequestStatus::InService
    }));

    controller.shutdown();
    let frozen = request.status();
    assert_ne!(frozen, RequestStatus::Completed);
    assert!(controller.status()[0].floor < 9);

    thread::sleep(Duration::from_millis(100));
    assert_eq!(request.status(), frozen);

    // second call returns immediately with everything already stopped
    controller.shutdown();

    // the api stays usable, but nothing dispatches any more
    let late = controller.submit(1, 2).unwrap();
    thread::sleep(Duration::from_millis(30));
    assert_eq!(late.status(), RequestStatus::Pending);
}
