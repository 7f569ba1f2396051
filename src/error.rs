use snafu::Location;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Invalid capacity: {}, must be a power of two", capacity))]
    InvalidCapacity {
        capacity: usize,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display(
        "Region too small, provided: {}, required: {}",
        provided,
        required
    ))]
    RegionTooSmall {
        provided: usize,
        required: usize,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Region address {:#x} is not aligned for the ring header", addr))]
    MisalignedRegion {
        addr: usize,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Failed to allocate a region for capacity {}", capacity))]
    AllocFailed {
        capacity: usize,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display(
        "Not enough space, remaining: {}, expected: {}",
        remaining,
        expected
    ))]
    NotEnoughSpace {
        remaining: usize,
        expected: usize,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display(
        "Not enough data, available: {}, expected: {}",
        available,
        expected
    ))]
    NotEnoughData {
        available: usize,
        expected: usize,
        #[snafu(implicit)]
        location: Location,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
