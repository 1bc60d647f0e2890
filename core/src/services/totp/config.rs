//! Configuration for TOTP verification.

/// Configuration for TOTP code generation and checking
#[derive(Debug, Clone)]
pub struct TotpConfig {
    /// Length of one time step in seconds
    pub step_seconds: i64,
    /// Number of code digits
    pub digits: usize,
    /// Steps of clock drift tolerated on either side of "now"
    pub window_steps: u8,
}

impl Default for TotpConfig {
    fn default() -> Self {
        Self {
            step_seconds: 30,
            digits: 6,
            window_steps: 1,
        }
    }
}
