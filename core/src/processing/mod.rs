pub mod correlation;
pub mod generalized;
pub mod scratch;
pub mod steering;

#[cfg(test)]
mod fixtures;

pub use correlation::CorrelationBeamformer;
pub use generalized::GeneralizedBeamformer;
pub use scratch::Scratch;
pub use steering::{SteeringTable, SteeringTableBuilder};
