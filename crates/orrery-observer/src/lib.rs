//! Free-look observer camera driven by keyboard, pointer and scroll input.

pub mod controller;
pub mod state;

pub use controller::ObserverController;
pub use state::{MoveDirection, ObserverParams, ObserverState, WORLD_UP};
