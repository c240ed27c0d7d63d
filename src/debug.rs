/// ----- DEBUG MODULE -----
/// Renders a live fleet table to the terminal, redrawing in place. Only
/// the demo binary uses this; the library itself never writes to the
/// terminal. The caller prints `table_rows` blank lines once before the
/// first call, then every call moves the cursor back up and repaints.

use std::io::{Stdout, Write};

use crossterm::{cursor, terminal, ExecutableCommand, Result};

use crate::elevator::ElevatorSnapshot;

const FLEET_TOP: &str =
    "+-----------------------------------------------------------------------------------------+";
const FLEET_ROW: &str =
    "+--------------+--------------+--------------+--------------+--------------+--------------+";
const TRAFFIC_TOP: &str = "+-----------------------------+";
const TRAFFIC_ROW: &str = "+--------------+--------------+";

/// Lines one full repaint takes, for the caller's initial padding.
pub fn table_rows(fleet_len: usize) -> u16 {
    16 + 2 * fleet_len as u16
}

pub fn printstatus(
    stdout: &mut Stdout,
    fleet: &[ElevatorSnapshot],
    submitted: usize,
    completed: usize,
    pending: usize,
) -> Result<()> {
    stdout.execute(cursor::MoveUp(table_rows(fleet.len())))?;
    stdout.execute(terminal::Clear(terminal::ClearType::FromCursorDown))?;

    writeln!(stdout, "{}", FLEET_TOP)?;
    writeln!(stdout, "| {0:<87} |", "ELEVATOR FLEET")?;
    writeln!(stdout, "{}", FLEET_ROW)?;
    writeln!(
        stdout,
        "| {0:<12} | {1:<12} | {2:<12} | {3:<12} | {4:<12} | {5:<12} |",
        "CAR", "FLOOR", "DIRECTION", "BEHAVIOUR", "QUEUE", "DOOR"
    )?;
    for car in fleet {
        let door = if car.door_open { "open" } else { "closed" };
        writeln!(stdout, "{}", FLEET_ROW)?;
        writeln!(
            stdout,
            "| {0:<12} | {1:<12} | {2:<12} | {3:<12} | {4:<12} | {5:<12} |",
            car.id,
            car.floor,
            car.direction.as_str(),
            car.behaviour.as_str(),
            car.queue_depth,
            door
        )?;
    }
    writeln!(stdout, "{}\n\n", FLEET_ROW)?;

    writeln!(stdout, "{}", TRAFFIC_TOP)?;
    writeln!(stdout, "| {0:<27} |", "TRAFFIC")?;
    writeln!(stdout, "{}", TRAFFIC_ROW)?;
    writeln!(stdout, "| {0:<12} | {1:<12} |", "SUBMITTED", submitted)?;
    writeln!(stdout, "{}", TRAFFIC_ROW)?;
    writeln!(stdout, "| {0:<12} | {1:<12} |", "COMPLETED", completed)?;
    writeln!(stdout, "{}", TRAFFIC_ROW)?;
    writeln!(stdout, "| {0:<12} | {1:<12} |", "PENDING", pending)?;
    writeln!(stdout, "{}", TRAFFIC_ROW)?;

    Ok(())
}
