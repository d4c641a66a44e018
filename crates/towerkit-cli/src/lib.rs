//! towerkit-cli: command line front end for towerkit-api

pub mod cli;
pub mod commands;
pub mod logging;
pub mod manifest;
