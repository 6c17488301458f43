//! Collision-driven reaction simulator: circular atoms bounce around a 2D
//! chamber and user-defined rules bond them or change their state on contact.

pub mod analysis {
    pub mod census;
}

pub mod core {
    pub mod chemistry;
    pub mod config;
    pub mod domain;
    pub mod spatial;
}

pub mod engine {
    pub mod events;
    pub mod world;
}

pub mod error;

pub mod interface {
    pub mod state;
    pub mod store;
    pub mod ui;
}

pub mod logging;
pub mod reactions;
