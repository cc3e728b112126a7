use crate::error::{PosterError, Result};
use bytes::Bytes;
use futures::stream;
use multer::Multipart;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Decoded `multipart/form-data` body. Parts sharing a name keep their order.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, Vec<String>>,
    pub files: HashMap<String, Vec<FilePart>>,
}

impl MultipartForm {
    pub fn first_field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn first_file(&self, name: &str) -> Option<&FilePart> {
        self.files.get(name).and_then(|files| files.first())
    }
}

/// Splits a decoded body into value and file parts using the boundary carried
/// by `content_type`. A part counts as a file when it declares a non-empty
/// filename.
pub async fn parse_multipart(body: Vec<u8>, content_type: &str) -> Result<MultipartForm> {
    let boundary = multer::parse_boundary(content_type)
        .map_err(|e| PosterError::DecodeError(format!("Invalid multipart content type: {}", e)))?;

    let body_stream = stream::once(async move { Ok::<Bytes, std::io::Error>(Bytes::from(body)) });
    let mut multipart = Multipart::new(body_stream, boundary);

    let mut form = MultipartForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PosterError::DecodeError(format!("Failed to read multipart field: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            log::debug!("Skipping unnamed multipart part");
            continue;
        };
        let file_name = field.file_name().filter(|f| !f.is_empty()).map(str::to_string);
        let content_type = field.content_type().map(|m| m.to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| PosterError::DecodeError(format!("Failed to read part '{}': {}", name, e)))?;

        match file_name {
            Some(file_name) => {
                log::debug!("File part '{}' ({}, {} bytes)", name, file_name, data.len());
                form.files.entry(name).or_default().push(FilePart {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
            None => {
                form.fields
                    .entry(name)
                    .or_default()
                    .push(String::from_utf8_lossy(&data).into_owned());
            }
        }
    }

    Ok(form)
}

/// Builds a `multipart/form-data` body for tests. Returns `(content_type, body)`.
#[cfg(test)]
pub(crate) fn encode_form(values: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> (String, Vec<u8>) {
    let boundary = "----posterTestBoundary7MA4YWxk";
    let mut body = Vec::new();

    for (name, value) in values {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    for (name, file_name, data) in files {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: image/jpeg\r\n\r\n",
                name, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    (format!("multipart/form-data; boundary={}", boundary), body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_values_and_files_are_classified() {
        let image = [0xffu8, 0xd8, 0xff, 0xe0, 0x00, 0x10, 0x4a, 0x46, 0x49, 0x46];
        let (content_type, body) =
            encode_form(&[("prompt", "a red bicycle")], &[("img", "bike.jpg", &image[..])]);

        let form = parse_multipart(body, &content_type).await.unwrap();

        assert_eq!(form.first_field("prompt"), Some("a red bicycle"));
        let file = form.first_file("img").unwrap();
        assert_eq!(file.file_name, "bike.jpg");
        assert_eq!(file.content_type.as_deref(), Some("image/jpeg"));
        assert_eq!(file.data, image);
        assert!(form.first_file("prompt").is_none());
        assert!(form.first_field("img").is_none());
    }

    #[tokio::test]
    async fn test_repeated_names_keep_order() {
        let (content_type, body) = encode_form(
            &[("prompt", "first"), ("prompt", "second")],
            &[("img", "a.jpg", &b"aaa"[..]), ("img", "b.jpg", &b"bbb"[..])],
        );

        let form = parse_multipart(body, &content_type).await.unwrap();

        assert_eq!(form.fields["prompt"], vec!["first", "second"]);
        assert_eq!(form.first_field("prompt"), Some("first"));
        assert_eq!(form.files["img"].len(), 2);
        assert_eq!(form.first_file("img").unwrap().data, b"aaa");
    }

    #[tokio::test]
    async fn test_blank_value_is_kept() {
        let (content_type, body) = encode_form(&[("prompt", "")], &[]);
        let form = parse_multipart(body, &content_type).await.unwrap();
        assert_eq!(form.first_field("prompt"), Some(""));
    }

    #[tokio::test]
    async fn test_missing_boundary_is_decode_error() {
        let err = parse_multipart(b"irrelevant".to_vec(), "application/json")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "DecodeError");
    }

    #[tokio::test]
    async fn test_truncated_body_is_decode_error() {
        let (content_type, body) = encode_form(&[("prompt", "cut short")], &[]);
        let truncated = body[..body.len() / 2].to_vec();

        let err = parse_multipart(truncated, &content_type).await.unwrap_err();
        assert_eq!(err.kind(), "DecodeError");
    }
}
