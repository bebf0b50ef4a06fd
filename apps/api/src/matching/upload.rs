//! Multipart intake for `POST /match_resume`.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::Bytes;

use crate::errors::AppError;
use crate::extraction::{DocumentFormat, UploadedDocument};

pub const RESUME_FIELD: &str = "resume";
pub const JOB_DESCRIPTION_FIELD: &str = "job_description";

/// A fully read `/match_resume` form.
#[derive(Debug)]
pub struct MatchUpload {
    pub resume: UploadedDocument,
    pub job_description: String,
}

struct ResumePart {
    bytes: Bytes,
    content_type: Option<String>,
    file_name: Option<String>,
}

/// Reads the whole form into memory. Unknown fields are skipped and a repeated
/// field keeps its last value. Both known fields are required; an empty
/// `job_description` is allowed.
pub async fn read_match_upload(mut multipart: Multipart) -> Result<MatchUpload, AppError> {
    let mut resume: Option<ResumePart> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(RESUME_FIELD) => resume = Some(read_resume(field).await?),
            Some(JOB_DESCRIPTION_FIELD) => {
                job_description = Some(field.text().await.map_err(multipart_error)?)
            }
            _ => {}
        }
    }

    let resume = resume.ok_or_else(|| AppError::MissingField(RESUME_FIELD.to_string()))?;
    let job_description = job_description
        .ok_or_else(|| AppError::MissingField(JOB_DESCRIPTION_FIELD.to_string()))?;

    let format =
        DocumentFormat::from_declared(resume.content_type.as_deref(), resume.file_name.as_deref())?;

    Ok(MatchUpload {
        resume: UploadedDocument {
            bytes: resume.bytes,
            format,
            file_name: resume.file_name,
        },
        job_description,
    })
}

async fn read_resume(field: Field<'_>) -> Result<ResumePart, AppError> {
    let content_type = field.content_type().map(String::from);
    let file_name = field.file_name().map(String::from);
    let bytes = field.bytes().await.map_err(multipart_error)?;

    Ok(ResumePart {
        bytes,
        content_type,
        file_name,
    })
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::InvalidUpload(err.body_text())
    }
}
