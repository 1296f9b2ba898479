use serde::{Deserialize, Serialize};

/// Seed for a single top-level computation. Every stochastic concept builds
/// exactly one generator from this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Seed(pub u64);

/// Added to a derived seed so a "re-simulate" request gets fresh draws while the
/// displayed parameters stay the same. Zero means "no re-simulation".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeedOffset(pub u64);

impl SeedOffset {
    pub const NONE: SeedOffset = SeedOffset(0);
    /// Inclusive bounds of a freshly drawn re-simulation offset.
    pub const MIN: u64 = 1;
    pub const MAX: u64 = 10_000;
}

impl std::fmt::Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
