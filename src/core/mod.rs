//! Game state and simulation (grid, doors, player, input, console).
//!
//! Re-exports:
//! - `grid`: Tile grid, text map loading, demo map
//! - `mapgen`: Random room-and-corridor maps
//! - `doors`: Door registry and open/close animation
//! - `player`: Camera position and basis
//! - `movement`: Walkability and keyboard movement
//! - `console`: Text command console

pub mod grid;
pub mod mapgen;
pub mod doors;
pub mod player;
pub mod movement;
pub mod console;
