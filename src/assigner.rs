/// ----- REQUEST ASSIGNER -----
/// This module decides which car should serve a travel request. It is a
/// pure function of a fleet snapshot and the request, so the same inputs
/// always give the same answer. The dispatcher calls it on every tick;
/// tests call it directly with hand-built snapshots.

use crate::elevator::{Behaviour, ElevatorSnapshot};
use crate::request::{Direction, Request};

const DIRECTION_MISMATCH_PENALTY: u32 = 10;
const LOAD_PENALTY_PER_REQUEST: u32 = 2;
const MAINTENANCE_PENALTY: u32 = 100;

/// Cost estimate for `car` serving `request`; lower is better. Distance is
/// measured from the car's current floor only, and the work already queued
/// on the car is priced as a flat per-request load rather than a projected
/// trajectory.
pub fn cost(car: &ElevatorSnapshot, request: &Request) -> u32 {
    let mut cost = u32::from(car.floor.abs_diff(request.source));
    if car.direction != Direction::Idle && car.direction != request.direction {
        cost += DIRECTION_MISMATCH_PENALTY;
    }
    cost += LOAD_PENALTY_PER_REQUEST * car.queue_depth as u32;
    if car.behaviour == Behaviour::Maintenance {
        cost += MAINTENANCE_PENALTY;
    }
    cost
}

/// Returns the id of the cheapest car able to take `request`, or `None`
/// when every car is in maintenance. Cars in maintenance accept no new
/// requests, so they are skipped outright rather than merely penalised.
/// Equal costs keep the earlier car in fleet order.
pub fn select_best(fleet: &[ElevatorSnapshot], request: &Request) -> Option<u8> {
    let mut best: Option<(u8, u32)> = None;
    for car in fleet {
        if car.behaviour == Behaviour::Maintenance {
            continue;
        }
        let car_cost = cost(car, request);
        match best {
            Some((_, lowest)) if car_cost >= lowest => (),
            _ => best = Some((car.id, car_cost)),
        }
    }
    best.map(|(id, _)| id)
}
