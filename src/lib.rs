pub mod commands;
pub mod fsops;
pub mod git;
pub mod manifest;
pub mod publish;
