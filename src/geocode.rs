use std::future::Future;

use futures::stream::{FuturesUnordered, Stream, StreamExt};

use crate::model::{Coord, Kiosk, ResolvedMarker};
use crate::normalize::{STATION_SUFFIX, digits, normalize};

pub const DEFAULT_CITY_PREFIX: &str = "서울";

/// Free-text place search, e.g. a keyword search API.
pub trait Geocoder: Send + Sync {
    /// Places matching `query`, best match first.
    ///
    /// `Err` means the provider did not answer successfully; an empty list
    /// means it answered with no result.
    fn search(&self, query: &str) -> impl Future<Output = anyhow::Result<Vec<Coord>>> + Send;
}

/// Resolves kiosk coordinates, geocoding the ones the store has none for.
pub struct Resolver<G> {
    geocoder: G,
    city_prefix: String,
}

impl<G: Geocoder> Resolver<G> {
    pub fn new(geocoder: G, city_prefix: impl Into<String>) -> Self {
        Self {
            geocoder,
            city_prefix: city_prefix.into(),
        }
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Search queries for `kiosk`, most specific first.
    ///
    /// Empty when the station name normalizes to nothing.
    pub fn candidates(&self, kiosk: &Kiosk) -> Vec<String> {
        let station = normalize(&kiosk.station_name);
        if station.is_empty() {
            return Vec::new();
        }

        let number = digits(&kiosk.line);
        let line = if number.is_empty() {
            String::new()
        } else {
            format!("{number}호선")
        };

        let city = &self.city_prefix;
        let suffix = STATION_SUFFIX;

        [
            format!("{city} {station}{suffix} {line}"),
            format!("{station}{suffix} {line}"),
            format!("{city} {station}{suffix}"),
            format!("{station}{suffix}"),
            station.clone(),
        ]
        .into_iter()
        .map(|query| query.trim().to_string())
        .collect()
    }

    /// Position of `kiosk`: the stored one when it has it, otherwise the
    /// first candidate query the geocoder finds anything for.
    ///
    /// Candidates are tried one after another. `None` once all of them
    /// come back empty or failed.
    pub async fn resolve(&self, kiosk: &Kiosk) -> Option<ResolvedMarker> {
        if let Some(coord) = kiosk.coord() {
            return Some(ResolvedMarker {
                kiosk: kiosk.clone(),
                coord,
                query: None,
            });
        }

        for query in self.candidates(kiosk) {
            log::debug!("geocode: trying {query:?}");

            let places = match self.geocoder.search(&query).await {
                Ok(places) => places,
                Err(e) => {
                    log::warn!("geocode: provider error for {query:?}: {e}");
                    continue;
                }
            };

            match places.first() {
                Some(&coord) => {
                    log::info!(
                        "geocode: {} ({}) -> {:.6},{:.6} via {query:?}",
                        kiosk.station_name,
                        kiosk.line,
                        coord.lat,
                        coord.lon
                    );

                    return Some(ResolvedMarker {
                        kiosk: kiosk.clone(),
                        coord,
                        query: Some(query),
                    });
                }
                None => log::debug!("geocode: no result for {query:?}"),
            }
        }

        log::warn!(
            "geocode: all candidates failed for station={:?} line={:?}",
            kiosk.station_name,
            kiosk.line
        );

        None
    }

    /// Resolves every kiosk concurrently, keeping input order and dropping
    /// the ones that could not be placed.
    pub async fn resolve_all<'k>(
        &self,
        kiosks: impl IntoIterator<Item = &'k Kiosk>,
    ) -> Vec<ResolvedMarker> {
        futures::future::join_all(kiosks.into_iter().map(|kiosk| self.resolve(kiosk)))
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    /// Resolves every kiosk concurrently, yielding markers as they complete.
    pub fn resolve_each(&self, kiosks: Vec<Kiosk>) -> impl Stream<Item = ResolvedMarker> + '_ {
        kiosks
            .into_iter()
            .map(|kiosk| async move { self.resolve(&kiosk).await })
            .collect::<FuturesUnordered<_>>()
            .filter_map(futures::future::ready)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use anyhow::anyhow;

    use super::*;

    enum Answer {
        Found(Coord),
        Empty,
        Fail,
    }

    /// Answers by candidate position; records every query it sees.
    struct Scripted {
        answers: Vec<Answer>,
        seen: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(answers: Vec<Answer>) -> Self {
            Self {
                answers,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl Geocoder for Scripted {
        async fn search(&self, query: &str) -> anyhow::Result<Vec<Coord>> {
            let mut seen = self.seen.lock().unwrap();
            let index = seen.len();
            seen.push(query.to_string());

            match self.answers.get(index) {
                Some(Answer::Found(coord)) => Ok(vec![*coord]),
                Some(Answer::Fail) => Err(anyhow!("status 500")),
                Some(Answer::Empty) | None => Ok(Vec::new()),
            }
        }
    }

    struct ByQuery(HashMap<String, Coord>);

    impl Geocoder for ByQuery {
        async fn search(&self, query: &str) -> anyhow::Result<Vec<Coord>> {
            Ok(self.0.get(query).copied().into_iter().collect())
        }
    }

    fn jamsil() -> Kiosk {
        Kiosk {
            station_name: "잠실역".into(),
            line: "2호선".into(),
            latitude: Some(0.0),
            longitude: Some(0.0),
            ..Default::default()
        }
    }

    #[test]
    fn candidate_order() {
        let resolver = Resolver::new(Scripted::new(vec![]), DEFAULT_CITY_PREFIX);

        assert_eq!(
            resolver.candidates(&jamsil()),
            ["서울 잠실역 2호선", "잠실역 2호선", "서울 잠실역", "잠실역", "잠실"]
        );
    }

    #[test]
    fn candidates_without_line_number() {
        let resolver = Resolver::new(Scripted::new(vec![]), DEFAULT_CITY_PREFIX);
        let kiosk = Kiosk {
            station_name: "온수(성공회대입구)".into(),
            line: "경인선".into(),
            ..Default::default()
        };

        assert_eq!(
            resolver.candidates(&kiosk),
            ["서울 온수역", "온수역", "서울 온수역", "온수역", "온수"]
        );
    }

    #[test]
    fn no_candidates_for_blank_station() {
        let resolver = Resolver::new(Scripted::new(vec![]), DEFAULT_CITY_PREFIX);
        let kiosk = Kiosk {
            station_name: " (임시) ".into(),
            ..Default::default()
        };

        assert!(resolver.candidates(&kiosk).is_empty());
    }

    #[tokio::test]
    async fn stored_coordinate_skips_provider() {
        let resolver = Resolver::new(Scripted::new(vec![]), DEFAULT_CITY_PREFIX);
        let kiosk = Kiosk {
            station_name: "강남역".into(),
            latitude: Some(37.497942),
            longitude: Some(127.027621),
            ..Default::default()
        };

        let marker = resolver.resolve(&kiosk).await.unwrap();

        assert_eq!(marker.coord, Coord::new(37.497942, 127.027621));
        assert_eq!(marker.query, None);
        assert!(resolver.geocoder().seen().is_empty());
    }

    #[tokio::test]
    async fn stops_at_first_hit() {
        let hit = Coord::new(37.513119, 127.100555);
        let resolver = Resolver::new(
            Scripted::new(vec![Answer::Empty, Answer::Empty, Answer::Found(hit)]),
            DEFAULT_CITY_PREFIX,
        );

        let marker = resolver.resolve(&jamsil()).await.unwrap();

        assert_eq!(marker.coord, hit);
        assert_eq!(marker.query.as_deref(), Some("서울 잠실역"));
        assert_eq!(
            resolver.geocoder().seen(),
            ["서울 잠실역 2호선", "잠실역 2호선", "서울 잠실역"]
        );
    }

    #[tokio::test]
    async fn provider_failure_moves_on() {
        let hit = Coord::new(37.5, 127.1);
        let resolver = Resolver::new(
            Scripted::new(vec![Answer::Fail, Answer::Found(hit)]),
            DEFAULT_CITY_PREFIX,
        );

        let marker = resolver.resolve(&jamsil()).await.unwrap();

        assert_eq!(marker.query.as_deref(), Some("잠실역 2호선"));
        assert_eq!(resolver.geocoder().seen().len(), 2);
    }

    #[tokio::test]
    async fn exhausted_cascade_is_unresolved() {
        let resolver = Resolver::new(Scripted::new(vec![]), DEFAULT_CITY_PREFIX);

        assert_eq!(resolver.resolve(&jamsil()).await, None);
        assert_eq!(resolver.geocoder().seen().len(), 5);
    }

    #[tokio::test]
    async fn resolve_all_drops_failures_and_keeps_order() {
        let mut places = HashMap::new();
        places.insert("서울 시청역 1호선".to_string(), Coord::new(37.5657, 126.9769));
        let resolver = Resolver::new(ByQuery(places), DEFAULT_CITY_PREFIX);

        let city_hall = Kiosk {
            station_name: "시청".into(),
            line: "1호선".into(),
            ..Default::default()
        };
        let gangnam = Kiosk {
            station_name: "강남".into(),
            latitude: Some(37.497942),
            longitude: Some(127.027621),
            ..Default::default()
        };
        let kiosks = vec![city_hall, jamsil(), gangnam];

        let stations: Vec<_> = resolver
            .resolve_all(&kiosks)
            .await
            .into_iter()
            .map(|m| m.kiosk.station_name)
            .collect();

        assert_eq!(stations, ["시청", "강남"]);
    }

    #[tokio::test]
    async fn resolve_each_yields_only_placed() {
        let resolver = Resolver::new(ByQuery(HashMap::new()), DEFAULT_CITY_PREFIX);
        let gangnam = Kiosk {
            station_name: "강남".into(),
            latitude: Some(37.497942),
            longitude: Some(127.027621),
            ..Default::default()
        };

        let markers: Vec<_> = resolver.resolve_each(vec![jamsil(), gangnam]).collect().await;

        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].kiosk.station_name, "강남");
    }
}
