pub mod blockchain;
pub mod blockchain_alloy;
pub mod prover;
