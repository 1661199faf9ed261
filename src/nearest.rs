use crate::distance;
use crate::model::{Coord, Kiosk, ResolvedMarker};

/// Anything with a usable map position.
pub trait Positioned {
    fn position(&self) -> Option<Coord>;
}

impl Positioned for Kiosk {
    fn position(&self) -> Option<Coord> {
        self.coord()
    }
}

impl Positioned for ResolvedMarker {
    fn position(&self) -> Option<Coord> {
        Some(self.coord)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Nearest<'a, T> {
    pub item: &'a T,
    pub coord: Coord,
    pub distance_km: f64,
}

/// Closest candidate to `origin`.
///
/// Candidates without a position are skipped. On equal distances the one
/// seen first wins. `None` when nothing is left to compare.
pub fn find_nearest<'a, T, I>(origin: Coord, candidates: I) -> Option<Nearest<'a, T>>
where
    T: Positioned + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut best: Option<Nearest<'a, T>> = None;

    for item in candidates {
        let Some(coord) = item.position() else {
            continue;
        };

        let distance_km = distance::between(origin, coord);

        if best.as_ref().is_none_or(|b| distance_km < b.distance_km) {
            best = Some(Nearest {
                item,
                coord,
                distance_km,
            });
        }
    }

    best
}
