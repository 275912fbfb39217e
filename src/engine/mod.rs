// 8.0: engine facade. one validated config, every operation behind &self.
// holds no mutable state, so one Engine can be shared across request handlers.

mod core;
mod pricing;
mod results;
mod trading;

pub use self::core::Engine;
pub use results::EngineError;
