use thiserror::Error;

/// Why a submitted travel request was rejected. Rejected requests are not
/// created and not retried; every other failure mode in the subsystem is
/// transient and handled internally.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidRequest {
    /// A floor outside the building.
    #[error("floor {floor} is outside 1..={max_floor}")]
    FloorOutOfRange { floor: u8, max_floor: u8 },

    /// Source and destination must differ.
    #[error("source and destination are both floor {floor}")]
    SameFloor { floor: u8 },
}
