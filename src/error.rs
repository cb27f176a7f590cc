use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while setting up or presenting a game.
///
/// The simulation itself is total once constructed; everything here is either a
/// configuration mistake caught up front or a frontend failure passed through.
#[derive(Debug, Error)]
pub enum Error {
    /// A dot with a non-positive or non-finite radius.
    #[error("invalid radius for {name} dot: {radius}")]
    InvalidRadius { name: &'static str, radius: f32 },

    /// A dot too large to be placed anywhere on the surface.
    #[error(
        "{name} dot (radius {radius}) does not fit a {width}x{height} surface; \
         each dimension must be at least twice the radius"
    )]
    BodyDoesNotFit {
        name: &'static str,
        radius: f32,
        width: f32,
        height: f32,
    },

    /// Settings that cannot drive a game.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Drawing surface failure reported by a frontend.
    #[error("surface error: {0}")]
    Surface(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
