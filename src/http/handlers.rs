//! Device endpoint handlers and the route table.
//!
//! Handlers are plain functions: the device tables are in memory, so
//! nothing here awaits.

use axum::http::Method;

use crate::http::error::{ApiError, ApiResult};
use crate::http::request::{
    RegisterDeviceRequest, RouteRequest, SetSubscriptionsRequest, DEVICE_ID, INSTANCE_ID, INTEREST,
};
use crate::http::response::{
    DeviceMetadata, GetDeviceResponse, GetInterestsResponse, NewDeviceResponse, Reply,
};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::{Route, Router};
use crate::store::DeviceTable;

pub type Handler = fn(&AppState, &RouteRequest) -> ApiResult<Reply>;

/// The device API route table.
pub fn routes() -> Router<Handler> {
    const DEVICES: &str = "/instances/{instanceId}/devices/fcm";
    const DEVICE: &str = "/instances/{instanceId}/devices/fcm/{deviceId}";

    Router::new(vec![
        Route::new("register_device", Method::POST, DEVICES, register_device as Handler).with_body(),
        Route::new("update_token", Method::PUT, &format!("{DEVICE}/token"), update_token as Handler).with_body(),
        Route::new("get_device", Method::GET, DEVICE, get_device as Handler),
        Route::new("delete_device", Method::DELETE, DEVICE, delete_device as Handler),
        Route::new("associate_user", Method::PUT, &format!("{DEVICE}/user"), associate_user as Handler),
        Route::new("list_interests", Method::GET, &format!("{DEVICE}/interests"), list_interests as Handler),
        Route::new("add_interest", Method::POST, &format!("{DEVICE}/interests/{{interest}}"), add_interest as Handler),
        Route::new("remove_interest", Method::DELETE, &format!("{DEVICE}/interests/{{interest}}"), remove_interest as Handler),
        Route::new("replace_interests", Method::PUT, &format!("{DEVICE}/interests"), replace_interests as Handler).with_body(),
        Route::new("update_metadata", Method::PUT, &format!("{DEVICE}/metadata"), update_metadata as Handler),
    ])
}

fn table(state: &AppState, req: &RouteRequest) -> ApiResult<DeviceTable> {
    Ok(state.tenants.table_for(req.param(INSTANCE_ID)?))
}

fn register_device(state: &AppState, req: &RouteRequest) -> ApiResult<Reply> {
    let body: RegisterDeviceRequest = req.decode()?;
    let instance_id = req.param(INSTANCE_ID)?;
    let device = state.tenants.table_for(instance_id).register(body.token);

    metrics::record_device_registered();
    tracing::info!(
        instance_id = %instance_id,
        device_id = %device.id,
        "Device registered"
    );

    Ok(Reply::json(&NewDeviceResponse {
        id: device.id,
        initial_interest_set: device.interests,
    }))
}

fn update_token(state: &AppState, req: &RouteRequest) -> ApiResult<Reply> {
    let table = table(state, req)?;
    let device_id = req.param(DEVICE_ID)?;
    if !table.contains(device_id) {
        return Err(ApiError::DeviceNotFound(device_id.to_string()));
    }

    let body: RegisterDeviceRequest = req.decode()?;
    table.update_token(device_id, body.token)?;
    Ok(Reply::ok())
}

fn get_device(state: &AppState, req: &RouteRequest) -> ApiResult<Reply> {
    let device = table(state, req)?.get(req.param(DEVICE_ID)?)?;

    Ok(Reply::json(&GetDeviceResponse {
        id: device.id,
        user_id: device.user_id,
        device_metadata: DeviceMetadata::default(),
    }))
}

fn delete_device(state: &AppState, req: &RouteRequest) -> ApiResult<Reply> {
    let device_id = req.param(DEVICE_ID)?;
    if !table(state, req)?.delete(device_id) {
        tracing::debug!(device_id = %device_id, "Delete of unknown device");
    }
    Ok(Reply::ok())
}

fn associate_user(state: &AppState, req: &RouteRequest) -> ApiResult<Reply> {
    let table = table(state, req)?;
    let device_id = req.param(DEVICE_ID)?;
    if !table.contains(device_id) {
        return Err(ApiError::DeviceNotFound(device_id.to_string()));
    }

    let authorization = req.authorization().ok_or(ApiError::MissingAuthorization)?;
    let user_id = state.verifier.verify(authorization).map_err(|e| {
        tracing::debug!(device_id = %device_id, error = %e, "Rejected user token");
        ApiError::from(e)
    })?;

    table.associate_user(device_id, user_id.as_str())?;
    tracing::info!(device_id = %device_id, user_id = %user_id, "User associated");
    Ok(Reply::ok())
}

fn list_interests(state: &AppState, req: &RouteRequest) -> ApiResult<Reply> {
    let interests = table(state, req)?.interests(req.param(DEVICE_ID)?)?;
    Ok(Reply::json(&GetInterestsResponse { interests }))
}

fn add_interest(state: &AppState, req: &RouteRequest) -> ApiResult<Reply> {
    table(state, req)?.add_interest(req.param(DEVICE_ID)?, req.param(INTEREST)?)?;
    Ok(Reply::ok())
}

fn remove_interest(state: &AppState, req: &RouteRequest) -> ApiResult<Reply> {
    table(state, req)?.remove_interest(req.param(DEVICE_ID)?, req.param(INTEREST)?)?;
    Ok(Reply::ok())
}

fn replace_interests(state: &AppState, req: &RouteRequest) -> ApiResult<Reply> {
    let body: SetSubscriptionsRequest = req.decode()?;
    table(state, req)?.replace_interests(req.param(DEVICE_ID)?, body.interests)?;
    Ok(Reply::ok())
}

fn update_metadata(_state: &AppState, _req: &RouteRequest) -> ApiResult<Reply> {
    Ok(Reply::ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use axum::http::{header, HeaderValue, StatusCode};

    fn state() -> AppState {
        AppState::new(&ServerConfig::new(0, "secret"))
    }

    fn request(params: &[(&str, &str)], body: &str) -> RouteRequest {
        let mut req = RouteRequest {
            body: body.to_owned().into(),
            ..Default::default()
        };
        for (name, value) in params {
            req.params.insert(*name, *value);
        }
        req
    }

    #[test]
    fn test_route_table_covers_endpoints() {
        let router = routes();
        let base = "/instances/i/devices/fcm";
        let cases = [
            (Method::POST, base.to_string(), "register_device"),
            (Method::PUT, format!("{base}/d/token"), "update_token"),
            (Method::GET, format!("{base}/d"), "get_device"),
            (Method::DELETE, format!("{base}/d"), "delete_device"),
            (Method::PUT, format!("{base}/d/user"), "associate_user"),
            (Method::GET, format!("{base}/d/interests"), "list_interests"),
            (Method::POST, format!("{base}/d/interests/x"), "add_interest"),
            (Method::DELETE, format!("{base}/d/interests/x"), "remove_interest"),
            (Method::PUT, format!("{base}/d/interests"), "replace_interests"),
            (Method::PUT, format!("{base}/d/metadata"), "update_metadata"),
        ];

        for (method, path, name) in cases {
            let matched = router.match_route(&method, &path).unwrap();
            assert_eq!(matched.route.name, name, "{method} {path}");
        }
        assert!(router.match_route(&Method::GET, base).is_none());

        let body_routes: Vec<&str> = router
            .routes()
            .iter()
            .filter(|route| route.reads_body)
            .map(|route| route.name)
            .collect();
        assert_eq!(body_routes, vec!["register_device", "update_token", "replace_interests"]);
    }

    #[test]
    fn test_register_then_get() {
        let state = state();
        let reply = register_device(&state, &request(&[(INSTANCE_ID, "i")], r#"{"token":"t"}"#)).unwrap();
        let id = reply.body.unwrap()["id"].as_str().unwrap().to_string();

        let reply = get_device(&state, &request(&[(INSTANCE_ID, "i"), (DEVICE_ID, id.as_str())], "")).unwrap();
        let body = reply.body.unwrap();
        assert_eq!(body["id"], id.as_str());
        assert!(body.get("userId").is_none());
    }

    #[test]
    fn test_update_token_checks_device_before_body() {
        let state = state();
        let err = update_token(&state, &request(&[(INSTANCE_ID, "i"), (DEVICE_ID, "nope")], "garbage"))
            .unwrap_err();
        assert!(matches!(err, ApiError::DeviceNotFound(_)));
    }

    #[test]
    fn test_associate_user_requires_header() {
        let state = state();
        let id = state.tenants.table_for("i").register("t").id;
        let params = [(INSTANCE_ID, "i"), (DEVICE_ID, id.as_str())];

        let err = associate_user(&state, &request(&params, "")).unwrap_err();
        assert!(matches!(err, ApiError::MissingAuthorization));

        let mut req = request(&params, "");
        req.headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer junk"));
        let err = associate_user(&state, &req).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.tenants.table_for("i").get(&id).unwrap().user_id, None);

        let token = state.verifier.issue("u1", None).unwrap();
        let mut req = request(&params, "");
        req.headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        assert_eq!(associate_user(&state, &req).unwrap(), Reply::ok());
        assert_eq!(
            state.tenants.table_for("i").get(&id).unwrap().user_id.as_deref(),
            Some("u1")
        );
    }

    #[test]
    fn test_metadata_always_ok() {
        let state = state();
        let reply = update_metadata(&state, &request(&[(INSTANCE_ID, "i"), (DEVICE_ID, "nope")], "{")).unwrap();
        assert_eq!(reply.status, StatusCode::OK);
    }
}
