// crates/clipscout-core/src/multipart.rs
//
// Minimal multipart/form-data body builder for the /analyze upload.
// One file part is all the endpoint contract needs; the framing below is the
// same layout the service's form parser consumes.

use uuid::Uuid;

const CRLF: &str = "\r\n";

/// An in-memory multipart/form-data request body.
///
/// Parts are appended with `add_file`; `finish` seals the body with the
/// closing boundary and returns the `Content-Type` header value alongside
/// the bytes.
pub struct MultipartForm {
    boundary: String,
    body:     Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        // The boundary must not occur inside any part. A UUID makes an
        // accidental collision with video bytes vanishingly unlikely.
        Self {
            boundary: format!("----clipscout-{}", Uuid::new_v4().simple()),
            body:     Vec::new(),
        }
    }

    /// Append one file part: `name` is the form field, `filename` and `mime`
    /// describe the file, `bytes` are carried verbatim.
    pub fn add_file(&mut self, name: &str, filename: &str, mime: &str, bytes: &[u8]) {
        self.body.extend_from_slice(format!("--{}{CRLF}", self.boundary).as_bytes());
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"{CRLF}"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(format!("Content-Type: {mime}{CRLF}{CRLF}").as_bytes());
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(CRLF.as_bytes());
    }

    /// Seal the body and return `(content_type_header, body_bytes)`.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body.extend_from_slice(format!("--{}--{CRLF}", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn body_carries_file_bytes_verbatim() {
        let payload = b"0123456789"; // the 10-byte scenario clip
        let mut form = MultipartForm::new();
        form.add_file("video", "clip.mp4", "video/mp4", payload);
        let (_, body) = form.finish();
        assert!(contains(&body, payload));
    }

    #[test]
    fn part_headers_name_field_filename_and_mime() {
        let mut form = MultipartForm::new();
        form.add_file("video", "clip.mp4", "video/mp4", b"xx");
        let (_, body) = form.finish();
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains(
            "Content-Disposition: form-data; name=\"video\"; filename=\"clip.mp4\"\r\n"
        ));
        assert!(text.contains("Content-Type: video/mp4\r\n\r\n"));
    }

    #[test]
    fn body_is_framed_by_the_advertised_boundary() {
        let mut form = MultipartForm::new();
        let boundary = form.boundary.clone();
        form.add_file("video", "a.webm", "video/webm", b"data");
        let (content_type, body) = form.finish();

        assert_eq!(content_type, format!("multipart/form-data; boundary={boundary}"));
        assert!(body.starts_with(format!("--{boundary}\r\n").as_bytes()));
        assert!(body.ends_with(format!("--{boundary}--\r\n").as_bytes()));
    }

    #[test]
    fn boundary_does_not_collide_with_payload() {
        let mut form = MultipartForm::new();
        let boundary = form.boundary.clone();
        form.add_file("video", "a.mp4", "video/mp4", b"plain video bytes");
        let (_, body) = form.finish();
        // Opening marker, closing marker — and nothing in between.
        let marker = format!("--{boundary}");
        let count = body
            .windows(marker.len())
            .filter(|w| *w == marker.as_bytes())
            .count();
        assert_eq!(count, 2);
    }
}
