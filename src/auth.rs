//! Identity boundary: bearer-token verification and the manager gate.

pub mod middleware;
pub mod models;
pub mod token;
