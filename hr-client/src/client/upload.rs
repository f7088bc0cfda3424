//! Multipart upload form
//!
//! Transport-neutral description of a `multipart/form-data` body: the
//! network client turns it into a `reqwest::multipart::Form`, the in-process
//! client encodes it by hand.

/// File part of an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Text fields plus file parts, sent in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn file(
        mut self,
        field: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.files.push(FilePart {
            field: field.into(),
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        });
        self
    }

    /// Encode as a `multipart/form-data` body with the given boundary
    pub fn encode(&self, boundary: &str) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in &self.fields {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", quote(name))
                    .as_bytes(),
            );
            body.extend_from_slice(value.as_bytes());
            body.extend_from_slice(b"\r\n");
        }
        for file in &self.files {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    quote(&file.field),
                    quote(&file.file_name)
                )
                .as_bytes(),
            );
            body.extend_from_slice(
                format!("Content-Type: {}\r\n\r\n", strip_line_breaks(&file.mime)).as_bytes(),
            );
            body.extend_from_slice(&file.bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
        body
    }

    /// Convert into a reqwest form
    pub fn into_reqwest(self) -> Result<reqwest::multipart::Form, reqwest::Error> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for file in self.files {
            let part = reqwest::multipart::Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.mime)?;
            form = form.part(file.field, part);
        }
        Ok(form)
    }
}

/// Header values never span lines
fn strip_line_breaks(value: &str) -> String {
    value.chars().filter(|c| !matches!(c, '\r' | '\n')).collect()
}

/// Quoted-string content for a `Content-Disposition` parameter
fn quote(value: &str) -> String {
    strip_line_breaks(value).replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let form = UploadForm::new()
            .text("conversation_id", "12")
            .file("audio", "recording.mp3", "audio/mpeg", b"ID3".to_vec());
        let body = String::from_utf8(form.encode("XyZ")).unwrap();
        assert!(body.starts_with("--XyZ\r\nContent-Disposition: form-data; name=\"conversation_id\"\r\n\r\n12\r\n"));
        assert!(body.contains("name=\"audio\"; filename=\"recording.mp3\"\r\nContent-Type: audio/mpeg\r\n\r\nID3\r\n"));
        assert!(body.ends_with("--XyZ--\r\n"));
    }

    #[test]
    fn test_file_name_cannot_inject_headers() {
        let form = UploadForm::new().file(
            "audio",
            "a.mp3\"\r\nContent-Type: text/html\r\n\r\n<b>",
            "audio/mpeg",
            b"x".to_vec(),
        );
        let body = String::from_utf8(form.encode("B")).unwrap();
        assert!(body.contains(
            "filename=\"a.mp3\\\"Content-Type: text/html<b>\"\r\nContent-Type: audio/mpeg\r\n\r\nx\r\n"
        ));
        assert_eq!(body.matches("Content-Type:").count(), 2);
    }
}
