//! Centralized balance and tuning constants for the sustainability challenge.
//!
//! These values back the defaults in [`crate::rules::GameRules`] and the
//! fixed tier thresholds in [`crate::result`]. Rules may be overridden at
//! runtime; tier thresholds may not.

// Logging targets ----------------------------------------------------------
pub(crate) const LOG_ACTION_APPLIED: &str = "ecohk_game::action";
pub(crate) const LOG_EXHAUSTED: &str = "ecohk_game::energy";
pub(crate) const LOG_TRAVELED: &str = "ecohk_game::travel";
pub(crate) const LOG_DAY_ADVANCED: &str = "ecohk_game::day";
pub(crate) const LOG_SESSION: &str = "ecohk_game::session";

// Energy tuning ------------------------------------------------------------
pub const STARTING_ENERGY: i32 = 100;
pub const MAX_ENERGY: i32 = 100;
/// Energy granted back when an action or trip drains the player to zero.
pub const EXHAUSTION_FLOOR: i32 = 10;
pub const DAY_RECOVERY: i32 = 30;
pub const TRAVEL_COST: i32 = 5;

// Session length -----------------------------------------------------------
pub const HORIZON_DAYS: u32 = 7;

// Rule validation bounds -----------------------------------------------------
pub(crate) const MAX_ENERGY_CEILING: i32 = 1_000;
pub(crate) const HORIZON_DAYS_CEILING: u32 = 365;

// Sustainability status thresholds (exclusive upper bounds) -----------------
pub(crate) const STATUS_IMPROVING_AT: f64 = 5.0;
pub(crate) const STATUS_NOTICEABLE_AT: f64 = 10.0;
pub(crate) const STATUS_REMARKABLE_AT: f64 = 20.0;

// Final message thresholds ---------------------------------------------------
pub(crate) const FINAL_POSITIVE_AT: f64 = 10.0;
pub(crate) const FINAL_GREAT_AT: f64 = 25.0;
pub(crate) const FINAL_EXTRAORDINARY_AT: f64 = 50.0;

// Eco point ranks ------------------------------------------------------------
pub(crate) const RANK_VOLUNTEER_AT: i32 = 50;
pub(crate) const RANK_ADVOCATE_AT: i32 = 150;
pub(crate) const RANK_CHAMPION_AT: i32 = 300;
