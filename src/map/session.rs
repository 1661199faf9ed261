use futures::StreamExt;

use super::{Geolocator, LocationError, MapSurface, MarkerKind};
use crate::filter;
use crate::geocode::{Geocoder, Resolver};
use crate::model::{Coord, Filter, Kiosk, KioskId, NearestKiosk, ResolvedMarker};
use crate::nearest;

/// Identifies the filter pass a resolution was started for.
///
/// Every filter change starts a new generation; results carrying an older
/// token are dropped on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    generation: u64,
}

impl RequestToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Kiosks a filter pass has to resolve, tagged with the pass's token.
#[derive(Debug)]
pub struct Pass {
    pub token: RequestToken,
    pub kiosks: Vec<Kiosk>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Placed,
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationState {
    Idle,
    Located(Coord),
    NearestFound { user: Coord, nearest: KioskId },
}

/// Singular overlays owned by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Nearest,
    Line,
}

struct Placed<O> {
    marker: ResolvedMarker,
    overlay: O,
}

/// Marker, location and selection state of one map.
///
/// The session is the only owner of what is drawn: kiosk markers of the
/// current filter pass, at most one user marker, at most one nearest
/// highlight (marker plus connecting line) and at most one selection.
pub struct Session<S: MapSurface> {
    surface: S,
    kiosks: Vec<Kiosk>,
    filter: Filter,
    generation: u64,
    markers: Vec<Placed<S::Overlay>>,
    user: Option<S::Overlay>,
    nearest: Option<S::Overlay>,
    line: Option<S::Overlay>,
    location: LocationState,
    selected: Option<KioskId>,
}

impl<S: MapSurface> Session<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            kiosks: Vec::new(),
            filter: Filter::default(),
            generation: 0,
            markers: Vec::new(),
            user: None,
            nearest: None,
            line: None,
            location: LocationState::Idle,
            selected: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn location(&self) -> &LocationState {
        &self.location
    }

    pub fn current_token(&self) -> RequestToken {
        RequestToken {
            generation: self.generation,
        }
    }

    /// Markers of the current pass, in the order they were placed.
    pub fn markers(&self) -> impl Iterator<Item = &ResolvedMarker> {
        self.markers.iter().map(|p| &p.marker)
    }

    /// Replaces the kiosk list and starts a pass over it with the current filter.
    pub fn load(&mut self, kiosks: Vec<Kiosk>) -> Pass {
        self.kiosks = kiosks;
        self.start_pass()
    }

    /// Switches to `filter` and starts a pass; all kiosk markers are removed.
    ///
    /// Location, nearest highlight and selection are left alone.
    pub fn set_filter(&mut self, filter: Filter) -> Pass {
        self.filter = filter;
        self.start_pass()
    }

    fn start_pass(&mut self) -> Pass {
        self.generation += 1;

        for placed in self.markers.drain(..) {
            self.surface.remove(placed.overlay);
        }

        let kiosks = filter::apply(&self.kiosks, &self.filter)
            .into_iter()
            .cloned()
            .collect();

        Pass {
            token: self.current_token(),
            kiosks,
        }
    }

    /// Places `marker` if `token` still belongs to the current pass.
    pub fn apply(&mut self, token: RequestToken, marker: ResolvedMarker) -> Applied {
        if token != self.current_token() {
            log::debug!(
                "dropping stale marker for {} (pass {}, current {})",
                marker.kiosk.station_name,
                token.generation,
                self.generation
            );
            return Applied::Stale;
        }

        let overlay = self
            .surface
            .place_marker(marker.coord, MarkerKind::Kiosk, Some(&marker.kiosk.id));
        self.markers.push(Placed { marker, overlay });

        Applied::Placed
    }

    /// Ends the pass for `token`: frames its markers and drops a selection
    /// whose kiosk did not make it onto the map. `false` if the pass is stale.
    pub fn finish(&mut self, token: RequestToken) -> bool {
        if token != self.current_token() {
            return false;
        }

        let points: Vec<Coord> = self.markers().map(|m| m.coord).collect();
        if !points.is_empty() {
            self.surface.fit_bounds(&points);
        }

        if let Some(id) = &self.selected
            && !self.has_marker(id)
        {
            log::debug!("selected kiosk {id} left the map, clearing selection");
            self.selected = None;
        }

        true
    }

    /// Resolves `pass` concurrently, placing markers as they arrive.
    pub async fn run<G: Geocoder>(&mut self, pass: Pass, resolver: &Resolver<G>) -> bool {
        let token = pass.token;
        let mut resolved = std::pin::pin!(resolver.resolve_each(pass.kiosks));

        while let Some(marker) = resolved.next().await {
            self.apply(token, marker);
        }

        self.finish(token)
    }

    /// [`Session::set_filter`] followed by [`Session::run`].
    pub async fn refresh<G: Geocoder>(&mut self, filter: Filter, resolver: &Resolver<G>) -> bool {
        let pass = self.set_filter(filter);
        self.run(pass, resolver).await
    }

    /// Installs `overlay` in `role`, removing whatever held it before.
    pub fn replace(&mut self, role: Role, overlay: Option<S::Overlay>) {
        let slot = match role {
            Role::User => &mut self.user,
            Role::Nearest => &mut self.nearest,
            Role::Line => &mut self.line,
        };

        let previous = std::mem::replace(slot, overlay);
        if let Some(previous) = previous {
            self.surface.remove(previous);
        }
    }

    fn has_marker(&self, id: &KioskId) -> bool {
        self.markers().any(|m| &m.kiosk.id == id)
    }

    /// Marker click: selects the kiosk if it is on the map.
    pub fn click(&mut self, id: &KioskId) -> Option<&Kiosk> {
        if !self.has_marker(id) {
            return None;
        }

        self.selected = Some(id.clone());
        self.selected()
    }

    pub fn selected(&self) -> Option<&Kiosk> {
        let id = self.selected.as_ref()?;
        self.markers().map(|m| &m.kiosk).find(|k| &k.id == id)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Places the user marker at the device position, replacing any earlier
    /// one. Nothing changes when the position cannot be obtained.
    async fn locate<L: Geolocator>(&mut self, geolocator: &L) -> Result<Coord, LocationError> {
        let position = geolocator.locate().await.inspect_err(|e| {
            log::warn!("geolocation failed: {e}");
        })?;

        if !position.lat.is_finite() || !position.lon.is_finite() {
            log::warn!("geolocation returned a non-finite position");
            return Err(LocationError::Unavailable);
        }

        let user = self.surface.place_marker(position, MarkerKind::User, None);
        self.replace(Role::User, Some(user));

        Ok(position)
    }

    /// Centres the map on the device position.
    ///
    /// Only the user marker moves. A nearest highlight stays as drawn until
    /// the next [`Session::find_nearest`].
    pub async fn move_to_my_location<L: Geolocator>(
        &mut self,
        geolocator: &L,
    ) -> Result<Coord, LocationError> {
        let position = self.locate(geolocator).await?;

        self.location = match std::mem::replace(&mut self.location, LocationState::Idle) {
            LocationState::NearestFound { nearest, .. } => LocationState::NearestFound {
                user: position,
                nearest,
            },
            _ => LocationState::Located(position),
        };
        self.surface.pan_to(position);

        Ok(position)
    }

    /// Locates the device and highlights the closest kiosk on the map.
    ///
    /// `Ok(None)` when no kiosk is on the map; the user marker is still
    /// placed in that case.
    pub async fn find_nearest<L: Geolocator>(
        &mut self,
        geolocator: &L,
    ) -> Result<Option<NearestKiosk>, LocationError> {
        let position = self.locate(geolocator).await?;

        let Some(found) = nearest::find_nearest(position, self.markers()) else {
            log::info!("no kiosk on the map to compare against");
            self.replace(Role::Nearest, None);
            self.replace(Role::Line, None);
            self.location = LocationState::Located(position);
            return Ok(None);
        };

        let result = NearestKiosk {
            kiosk: found.item.kiosk.clone(),
            coord: found.coord,
            distance_km: found.distance_km,
        };

        // not clickable: the kiosk's own marker may be gone after a filter change
        let marker = self
            .surface
            .place_marker(result.coord, MarkerKind::Nearest, None);
        self.replace(Role::Nearest, Some(marker));

        let line = self.surface.draw_line(position, result.coord);
        self.replace(Role::Line, Some(line));

        self.surface.fit_bounds(&[position, result.coord]);
        self.location = LocationState::NearestFound {
            user: position,
            nearest: result.kiosk.id.clone(),
        };

        log::info!(
            "nearest kiosk: {} ({}) at {:.2} km",
            result.kiosk.station_name,
            result.kiosk.line,
            result.distance_km
        );

        Ok(Some(result))
    }
}
