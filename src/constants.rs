/// Rating points to win-probability calibration (538 methodology)
pub const RATING_SCALE: f64 = 30.464 / 400.0;

/// Win likelihoods are integers out of this many
pub const LIKELIHOOD_SCALE: u32 = 10_000;

/// Draw threshold for the coin-flip probability mode
pub const EVEN_THRESHOLD: u32 = 5_000;

/// Points awarded per correct pick, Elite 8 through Champion
pub const ROUND_POINTS: [i64; 4] = [40, 80, 160, 320];

/// Most teams that can be forced into each round, Elite 8 through Champion
pub const ROUND_CAPACITY: [usize; 4] = [8, 4, 2, 1];

/// Label of the synthetic bucket for trials without a unique first or last place
pub const TIE_LABEL: &str = "tie";

/// Trials simulated per worker chunk
pub const TRIALS_PER_CHUNK: u64 = 1_000;
