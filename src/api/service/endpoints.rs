use std::sync::Arc;

use axum::extract::{Json, Query, State};

use crate::api::{kakao, store};
use crate::filter;
use crate::model::{Coord, Filter, NearestKiosk, ResolvedMarker};
use crate::nearest;

use super::KakaoResolver;
use super::types::*;

pub type Result<T> = std::result::Result<T, ErrorResponse>;

async fn resolve_markers(
    store: &store::Client,
    resolver: &KakaoResolver,
    filter: &Filter,
    city: Option<&str>,
    district: Option<&str>,
) -> Result<Vec<ResolvedMarker>> {
    let kiosks = store
        .search(city, district)
        .await
        .inspect_err(|e| log::error!("kiosk store: {e}"))
        .map_err(|e| ErrorResponse::upstream(format!("kiosk store returned error: {e}")))?;

    let filtered = filter::apply(&kiosks, filter);
    log::debug!("{} of {} kiosks pass {filter:?}", filtered.len(), kiosks.len());

    Ok(resolver.resolve_all(filtered).await)
}

fn origin(lat: f64, lon: f64) -> Result<Coord> {
    let valid = lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon);

    if !valid {
        return Err(ErrorResponse::new(format!("invalid position {lat},{lon}")));
    }

    Ok(Coord { lat, lon })
}

pub async fn markers(
    State(store): State<store::Client>,
    State(resolver): State<Arc<KakaoResolver>>,
    Query(r): Query<MarkersRequest>,
) -> Result<Json<MarkersResponse>> {
    let markers = resolve_markers(
        &store,
        &resolver,
        &r.filter(),
        r.city.as_deref(),
        r.district.as_deref(),
    )
    .await?;

    Ok(Json(MarkersResponse { markers }))
}

pub async fn nearest(
    State(store): State<store::Client>,
    State(resolver): State<Arc<KakaoResolver>>,
    Query(r): Query<NearestRequest>,
) -> Result<Json<NearestResponse>> {
    let origin = origin(r.lat, r.lon)?;
    let filter = Filter::new(r.keyword, r.line);

    let markers = resolve_markers(&store, &resolver, &filter, None, None).await?;

    let nearest = nearest::find_nearest(origin, &markers).map(|n| NearestKiosk {
        kiosk: n.item.kiosk.clone(),
        coord: n.coord,
        distance_km: n.distance_km,
    });

    Ok(Json(NearestResponse { nearest }))
}

pub async fn region(
    State(client): State<kakao::Client>,
    Query(r): Query<RegionRequest>,
) -> Result<Json<RegionResponse>> {
    let coord = origin(r.lat, r.lon)?;

    let region = client
        .region(coord)
        .await
        .map_err(|e| ErrorResponse::upstream(format!("geocoding provider returned error: {e}")))?;

    Ok(Json(RegionResponse { region }))
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn origin_bounds() {
        assert!(origin(37.5, 127.0).is_ok());
        assert!(origin(-90.0, 180.0).is_ok());

        let err = origin(91.0, 127.0).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        assert!(origin(37.5, -180.5).is_err());
        assert!(origin(f64::NAN, 127.0).is_err());
        assert!(origin(37.5, f64::INFINITY).is_err());
    }
}
