use axum::response::Response;
use http_body_util::BodyExt;

const BOUNDARY: &str = "----podu-test-boundary-7MA4YWxkTrZu0gW";

/// One part of a multipart request
pub struct MultipartFile {
    pub field: &'static str,
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub data: Vec<u8>,
}

impl MultipartFile {
    /// File of `size` bytes in the `image` field
    pub fn image(file_name: &'static str, content_type: &'static str, size: usize) -> Self {
        Self {
            field: "image",
            file_name,
            content_type,
            data: vec![0xAB; size],
        }
    }
}

/// Encodes `files` as `multipart/form-data`, returning the header value and the body
pub fn multipart_body(files: &[MultipartFile]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for file in files {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                file.field, file.file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
        body.extend_from_slice(&file.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
