// railkit-core: Types, errors, and configuration for the railkit engines.

pub mod config;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use error::{ConfigError, IkError, RailkitError, RouteError};
pub use types::{Piece, PieceId, Slot, TrackGraph};
