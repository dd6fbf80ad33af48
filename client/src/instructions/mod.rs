pub mod rpc;
pub mod token_instructions;
pub mod utils;
