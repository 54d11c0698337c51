mod leader_election;
pub use leader_election::*;
