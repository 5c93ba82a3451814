#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod board;
mod cell_set;
mod common;
mod config;
mod coord;
mod game;
#[cfg(feature = "std")]
mod logging;
mod observer;
mod player;
mod ship;
pub mod targeting;

pub use board::*;
pub use cell_set::CellSet;
pub use common::*;
pub use config::*;
pub use coord::{from_indices, to_indices, Coordinate};
pub use game::*;
#[cfg(feature = "std")]
pub use logging::{init_logging, init_logging_with};
pub use observer::*;
pub use player::*;
pub use ship::*;
pub use targeting::{Pursuit, TargetMode, Targeting};
