//! HTTP handler functions for the arrest map API.

use actix_web::{HttpRequest, HttpResponse, web};
use arrest_map_admin::Session;
use arrest_map_region::canonicalize_value;
use arrest_map_region_models::Region;
use arrest_map_server_models::{
    AddMediaRequest, ApiBatchResult, ApiDeleted, ApiError, ApiHealth, ApiLegend, ApiMap,
    ApiMapEntry, ApiMediaCreated, ApiRegion, ApiWrite, BatchRequest, SetCountsRequest,
};
use arrest_map_stats::color::{GREEN, NO_DATA, RED, YELLOW};
use arrest_map_stats::rank::display_name;
use arrest_map_stats::validate::CountValue;
use serde_json::{Map, Value};

use crate::AppState;
use crate::errors::error_response;

/// Header carrying the email of the user authenticated upstream.
pub const EMAIL_HEADER: &str = "X-Forwarded-Email";

fn session(state: &AppState, req: &HttpRequest) -> Session {
    let email = req
        .headers()
        .get(EMAIL_HEADER)
        .and_then(|value| value.to_str().ok());
    state.admin.session_for(email)
}

/// Region name to hand to the admin service. Resolvable names are passed as
/// their canonical key, other strings unchanged so the error can echo them,
/// and non-strings as blank, which is always an invalid region.
fn region_name(value: &Value) -> &str {
    match canonicalize_value(value) {
        Some(region) => region.key(),
        None => value.as_str().unwrap_or_default(),
    }
}

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        store_available: state.admin.is_available(),
        boundaries_loaded: state.boundaries.is_some(),
    })
}

/// `GET /api/regions`
///
/// Every canonical region, in key order, for pickers.
pub async fn regions() -> HttpResponse {
    let regions: Vec<ApiRegion> = Region::all()
        .iter()
        .map(|&key| ApiRegion {
            key,
            display_name: display_name(key),
        })
        .collect();

    HttpResponse::Ok().json(regions)
}

/// `GET /api/map`
///
/// Summary, legend and the fill of every region with data.
pub async fn map(state: web::Data<AppState>) -> HttpResponse {
    let snapshot = state.snapshot();

    let regions: Vec<ApiMapEntry> = snapshot
        .aggregation
        .map
        .iter()
        .map(|(region, counts)| ApiMapEntry {
            region,
            arrests: counts.arrests,
            fir: counts.fir,
            fill: snapshot.fill(region).to_hex(),
        })
        .collect();

    HttpResponse::Ok().json(ApiMap {
        summary: snapshot.summary,
        legend: ApiLegend::new(snapshot.summary.max_arrests, GREEN, YELLOW, RED, NO_DATA),
        regions,
        refreshed_at: snapshot.refreshed_at,
    })
}

/// `GET /api/boundaries`
///
/// The boundary `FeatureCollection` with `regionKey`, `arrests`, `fir` and
/// `fill` added to every feature's properties.
pub async fn boundaries(state: web::Data<AppState>) -> HttpResponse {
    let Some(set) = &state.boundaries else {
        return HttpResponse::ServiceUnavailable().json(ApiError {
            error: "Boundaries unavailable".to_string(),
        });
    };

    let snapshot = state.snapshot();
    let collection = set.decorated(|feature| {
        let mut properties = Map::new();
        match feature.region {
            Some(region) => {
                let key = region.map_key();
                let counts = snapshot.aggregation.map.get(key);
                properties.insert("regionKey".to_string(), Value::from(key.key()));
                properties.insert("arrests".to_string(), Value::from(counts.arrests));
                properties.insert("fir".to_string(), Value::from(counts.fir));
                properties.insert("fill".to_string(), Value::from(snapshot.fill(key).to_hex()));
            }
            None => {
                properties.insert("regionKey".to_string(), Value::Null);
                properties.insert("arrests".to_string(), Value::from(0));
                properties.insert("fir".to_string(), Value::from(0));
                properties.insert("fill".to_string(), Value::from(NO_DATA.to_hex()));
            }
        }
        properties
    });

    HttpResponse::Ok().json(collection)
}

/// `GET /api/table`
pub async fn table(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.snapshot().table())
}

/// `GET /api/tooltip/{name}`
pub async fn tooltip(state: web::Data<AppState>, name: web::Path<String>) -> HttpResponse {
    HttpResponse::Ok().json(state.snapshot().tooltip(&name))
}

/// `GET /api/media`
///
/// Media grouped by region, newest first. Read failures show as no media.
pub async fn media(state: web::Data<AppState>) -> HttpResponse {
    let media = state.admin.load_media().await.unwrap_or_else(|e| {
        log::warn!("Showing no media: {e}");
        std::collections::BTreeMap::new()
    });

    HttpResponse::Ok().json(media)
}

/// `POST /api/admin/records`
pub async fn set_counts(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<SetCountsRequest>,
) -> HttpResponse {
    let session = session(&state, &req);
    let body = body.into_inner();
    let arrests = body
        .arrests
        .unwrap_or_else(|| CountValue::Text(String::new()));
    let fir = body.fir.unwrap_or(CountValue::Integer(0));

    match state
        .admin
        .set_counts(
            &session,
            region_name(&body.region),
            &arrests,
            &fir,
            body.additive,
        )
        .await
    {
        Ok(update) => {
            state.refresh().await;
            HttpResponse::Ok().json(ApiWrite::from(update))
        }
        Err(e) => error_response(&e),
    }
}

/// `DELETE /api/admin/records/{region}`
pub async fn delete_record(
    state: web::Data<AppState>,
    req: HttpRequest,
    region: web::Path<String>,
) -> HttpResponse {
    let session = session(&state, &req);

    match state.admin.delete_record(&session, &region).await {
        Ok(region) => {
            state.refresh().await;
            HttpResponse::Ok().json(ApiDeleted {
                deleted: region.key().to_string(),
            })
        }
        Err(e) => error_response(&e),
    }
}

/// `POST /api/admin/batch`
pub async fn batch(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<BatchRequest>,
) -> HttpResponse {
    let session = session(&state, &req);

    match state
        .admin
        .batch_update(&session, &body.updates, body.additive)
        .await
    {
        Ok(written) => {
            state.refresh().await;
            HttpResponse::Ok().json(ApiBatchResult {
                written: written.into_iter().map(ApiWrite::from).collect(),
            })
        }
        Err(e) => error_response(&e),
    }
}

/// `POST /api/admin/media`
pub async fn add_media(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<AddMediaRequest>,
) -> HttpResponse {
    let session = session(&state, &req);

    match state
        .admin
        .add_media(
            &session,
            region_name(&body.region),
            &body.url,
            &body.title,
            body.kind.as_deref(),
        )
        .await
    {
        Ok(id) => HttpResponse::Created().json(ApiMediaCreated { id }),
        Err(e) => error_response(&e),
    }
}

/// `DELETE /api/admin/media/{id}`
pub async fn delete_media(
    state: web::Data<AppState>,
    req: HttpRequest,
    id: web::Path<String>,
) -> HttpResponse {
    let session = session(&state, &req);

    match state.admin.delete_media(&session, &id).await {
        Ok(()) => HttpResponse::Ok().json(ApiDeleted {
            deleted: id.into_inner(),
        }),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn region_name_resolves_or_passes_through() {
        assert_eq!(region_name(&json!("Orissa")), "odisha");
        assert_eq!(region_name(&json!("Atlantis")), "Atlantis");
        assert_eq!(region_name(&Value::Null), "");
        assert_eq!(region_name(&json!(["goa"])), "");
    }
}
