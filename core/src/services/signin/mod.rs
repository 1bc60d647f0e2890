//! Signin orchestration: device-trust bypass, challenge flow, sessions.

mod service;
mod traits;

pub use service::SigninService;
pub use traits::SessionIssuer;
