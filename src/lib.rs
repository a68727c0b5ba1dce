extern crate serde;
extern crate serde_json;
#[macro_use]
extern crate serde_derive;

pub mod config;
pub mod model;
pub mod game;
pub mod ai;
pub mod protocol;
