use axum::extract::multipart::Field;
use uuid::Uuid;

use crate::assets::UploadFile;
use crate::error::{AppError, AppResult};

pub async fn read_text(field: Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart field: {e}")))
}

pub async fn read_file(field: Field<'_>) -> AppResult<UploadFile> {
    let filename = field
        .file_name()
        .unwrap_or("upload.bin")
        .to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart field: {e}")))?;
    Ok(UploadFile {
        filename,
        bytes: bytes.to_vec(),
    })
}

pub fn parse_i64(name: &str, value: &str) -> AppResult<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{name} must be an integer")))
}

pub fn parse_i32(name: &str, value: &str) -> AppResult<i32> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{name} must be an integer")))
}

pub fn parse_uuid(name: &str, value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| AppError::BadRequest(format!("{name} must be a valid id")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_fields_parse_with_whitespace() {
        assert_eq!(parse_i64("price", " 1200 ").unwrap(), 1200);
        assert_eq!(parse_i32("stock", "7").unwrap(), 7);
    }

    #[test]
    fn numeric_fields_reject_garbage_as_400() {
        let err = parse_i64("price", "twelve").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn uuid_fields_reject_malformed_ids_as_400() {
        assert!(parse_uuid("category_ids", "not-a-uuid").is_err());
        let id = Uuid::new_v4();
        assert_eq!(parse_uuid("category_ids", &id.to_string()).unwrap(), id);
    }
}
