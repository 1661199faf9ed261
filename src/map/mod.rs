//! Map-facing side of the engine: what the engine asks of a rendering
//! surface and a position source, and the [`Session`] that drives them.

pub mod session;

use std::future::Future;

use thiserror::Error;

use crate::model::{Coord, KioskId};

pub use session::{Applied, LocationState, Pass, RequestToken, Role, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Kiosk,
    User,
    Nearest,
}

/// Drawing primitives of the map the session renders onto.
///
/// An overlay is whatever handle the surface hands out for a marker or a
/// line; the session gives each one back through [`MapSurface::remove`].
pub trait MapSurface {
    type Overlay;

    /// Places a marker. Clicks on it are reported back with `click`.
    fn place_marker(&mut self, at: Coord, kind: MarkerKind, click: Option<&KioskId>)
        -> Self::Overlay;

    fn draw_line(&mut self, from: Coord, to: Coord) -> Self::Overlay;

    fn remove(&mut self, overlay: Self::Overlay);

    fn fit_bounds(&mut self, points: &[Coord]);

    fn pan_to(&mut self, at: Coord);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    Unavailable,
    #[error("timed out waiting for a position")]
    Timeout,
    #[error("geolocation is not supported on this device")]
    Unsupported,
}

/// Source of the device's current position.
pub trait Geolocator: Send + Sync {
    fn locate(&self) -> impl Future<Output = Result<Coord, LocationError>> + Send;
}
