//! Multipart CSV upload parsing

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart},
    http::StatusCode,
};

use crate::api::types::ApiError;

/// Fields of a CSV upload form
#[derive(Debug, Default)]
pub struct CsvUpload {
    pub dataset: Option<String>,
    pub filename: String,
    pub content: Bytes,
}

/// Read a form with a `file` part and an optional `dataset` text part.
///
/// The file name must end in `.csv`; unknown parts are skipped.
pub async fn read_csv_upload(mut multipart: Multipart) -> Result<CsvUpload, ApiError> {
    let mut dataset = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("dataset") => {
                dataset = Some(field.text().await.map_err(multipart_error)?.trim().to_string());
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                if !filename.to_ascii_lowercase().ends_with(".csv") {
                    return Err(ApiError::bad_request("File must be a CSV").with_param("file"));
                }

                let content = field.bytes().await.map_err(multipart_error)?;
                file = Some((filename, content));
            }
            _ => {}
        }
    }

    let (filename, content) =
        file.ok_or_else(|| ApiError::bad_request("No file provided").with_param("file"))?;

    Ok(CsvUpload {
        dataset,
        filename,
        content,
    })
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::payload_too_large("File too large for the configured upload limit");
    }

    ApiError::bad_request(format!("Failed to read upload: {}", err.body_text()))
}
