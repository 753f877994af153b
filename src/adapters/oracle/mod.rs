//! Design oracle adapters.

mod http;
mod mock;

pub use http::{HttpDesignOracle, OracleHttpConfig};
pub use mock::MockDesignOracle;
