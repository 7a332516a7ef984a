// Rating bounds
pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 4000.0;
// Logistic scale of the head-to-head expectation
pub const ELO_SCALE: f64 = 400.0;
pub const SEARCH_ITERATIONS: usize = 40;
// Damping polynomial f(elo) = A + B * elo + C * elo^2
pub const DAMPING_A: f64 = 0.5375590444025147;
pub const DAMPING_B: f64 = -1.609673516547565e-4;
pub const DAMPING_C: f64 = 6.436497743378832e-9;
// Baseline for participants with no stored rating
pub const DEFAULT_RAW_ELO: f64 = 1500.0;
// Displayed-rating transform
pub const DISPLAY_CENTER: f64 = 1500.0;
pub const PROVISIONAL_CONTESTS: u32 = 6;
pub const PROVISIONAL_SPAN: u32 = 11;
pub const PROVISIONAL_STEP: f64 = 100.0;
