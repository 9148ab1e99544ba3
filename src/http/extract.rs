use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header;
use axum::Json;
use serde::Deserialize;

use crate::http::AppError;
use crate::AppState;

/// The create/update-post body, parsed once at the boundary. Accepts either
/// a JSON object or a multipart form; a multipart file part is ingested into
/// the upload store and surfaces here as its `/uploads/...` reference.
#[derive(Debug, Default)]
pub struct PostForm {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
}

#[derive(Deserialize)]
struct PostBody {
    title: Option<String>,
    content: Option<String>,
}

#[axum::async_trait]
impl FromRequest<AppState> for PostForm {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        if content_type.starts_with("multipart/form-data") {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(|_| AppError::bad_request("invalid multipart body"))?;

            let mut form = PostForm::default();
            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|_| AppError::bad_request("invalid multipart body"))?
            {
                if let Some(original_name) = field.file_name().map(|name| name.to_string()) {
                    let data = field
                        .bytes()
                        .await
                        .map_err(|_| AppError::bad_request("failed to read file part"))?;
                    let image = state
                        .uploads
                        .store(&original_name, &data)
                        .await
                        .map_err(|err| {
                            tracing::error!(error = ?err, "failed to store upload");
                            AppError::internal("failed to store upload")
                        })?;
                    form.image = Some(image);
                } else {
                    match field.name() {
                        Some("title") => {
                            form.title = Some(field.text().await.map_err(|_| {
                                AppError::bad_request("invalid multipart body")
                            })?);
                        }
                        Some("content") => {
                            form.content = Some(field.text().await.map_err(|_| {
                                AppError::bad_request("invalid multipart body")
                            })?);
                        }
                        _ => {}
                    }
                }
            }

            Ok(form)
        } else {
            let Json(body): Json<PostBody> = Json::from_request(req, state)
                .await
                .map_err(|_| AppError::bad_request("invalid JSON body"))?;

            Ok(PostForm {
                title: body.title,
                content: body.content,
                image: None,
            })
        }
    }
}
