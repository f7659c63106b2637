/// Monotonic frame counter advanced once per simulation step.
pub type Tick = u64;

/// Caller-assigned identifier used to order actions within a frame.
pub type ActionId = u64;
