use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::*;
use crate::services::{validate_emoticon, EmoticonService};
use axum::{
    extract::{multipart::MultipartRejection, ConnectInfo, Multipart, State},
    http::StatusCode,
    Json,
};
use std::net::SocketAddr;
use std::sync::Arc;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(server_info, endpoints, ping, upload_emoticon, list_emoticons),
    components(schemas(
        ServerInfoResponse,
        ClientConfig,
        EndpointsResponse,
        UploadEmoticonResponse,
        EmoticonView
    )),
    tags(
        (name = "blivechat", description = "Live chat overlay backend")
    ),
    info(
        title = "blivechat API",
        version = "0.1.0",
        description = "Frontend bootstrap, service discovery and custom emoticons.\n\n\
                      ## Emoticons\n\
                      - Uploads are images of at most 1 MiB\n\
                      - Files are stored under the MD5 of their content\n\
                      - Identical uploads resolve to the same URL"
    )
)]
pub struct ApiDoc;

/// Version and the configuration flags the frontend reads on startup
#[utoipa::path(
    get,
    path = "/api/server_info",
    tag = "blivechat",
    responses(
        (status = 200, description = "Server version and frontend config", body = ServerInfoResponse)
    )
)]
pub async fn server_info(State(config): State<Arc<Config>>) -> Json<ServerInfoResponse> {
    Json(ServerInfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        config: ClientConfig::from(config.as_ref()),
    })
}

/// Registered endpoints for service discovery
#[utoipa::path(
    get,
    path = "/api/endpoints",
    tag = "blivechat",
    responses(
        (status = 200, description = "Configured endpoints", body = EndpointsResponse)
    )
)]
pub async fn endpoints(State(config): State<Arc<Config>>) -> Json<EndpointsResponse> {
    Json(EndpointsResponse {
        endpoints: config.registered_endpoints.clone(),
    })
}

#[utoipa::path(
    get,
    path = "/api/ping",
    tag = "blivechat",
    responses(
        (status = 204, description = "Server is alive")
    )
)]
pub async fn ping() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Upload a custom emoticon image
///
/// The file is stored as `<md5>.png` whatever its actual format, so the same
/// bytes always map to the same URL.
#[utoipa::path(
    post,
    path = "/api/emoticon",
    tag = "blivechat",
    request_body(content = inline(Vec<u8>), description = "Multipart form with an image in field `file`", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Emoticon stored", body = UploadEmoticonResponse),
        (status = 400, description = "Missing `file` field"),
        (status = 403, description = "Uploads are disabled"),
        (status = 413, description = "File larger than 1 MiB"),
        (status = 415, description = "File is not an image")
    )
)]
pub async fn upload_emoticon(
    State(config): State<Arc<Config>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadEmoticonResponse>> {
    // Feature flag wins over every body check, including a malformed body
    if !config.enable_upload_file {
        return Err(AppError::Forbidden);
    }

    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(format!("Failed to parse multipart: {}", e))
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge(e.body_text())
            } else {
                AppError::BadRequest(format!("Failed to read file data: {}", e))
            }
        })?;
        upload = Some((content_type, data));
        break;
    }

    let (content_type, data) = upload.ok_or(AppError::MissingArgument("file"))?;
    validate_emoticon(data.len(), content_type.as_deref())?;

    let client = connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let url = EmoticonService::new(&config)
        .store_emoticon(data, client)
        .await?;

    Ok(Json(UploadEmoticonResponse { url }))
}

/// Keyword table of the configured emoticons
#[utoipa::path(
    get,
    path = "/api/emoticons",
    tag = "blivechat",
    responses(
        (status = 200, description = "Emoticons in file order", body = Vec<EmoticonView>),
        (status = 404, description = "emoticons.csv does not exist")
    )
)]
pub async fn list_emoticons(
    State(config): State<Arc<Config>>,
) -> Result<Json<Vec<EmoticonView>>> {
    let emoticons = EmoticonService::new(&config).list_emoticons().await?;

    Ok(Json(emoticons.into_iter().map(EmoticonView::from).collect()))
}
