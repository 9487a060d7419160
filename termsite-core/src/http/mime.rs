use std::path::Path;

/// Fallback for extensions missing from the table
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Content type for a served file, chosen by (case-insensitive) extension
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => return OCTET_STREAM,
    };

    match ext.as_str() {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "text/javascript; charset=utf-8",
        "json" => "application/json; charset=utf-8",
        "txt" => "text/plain; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textual_types_carry_charset() {
        assert_eq!(content_type_for(Path::new("index.html")), "text/html; charset=utf-8");
        assert_eq!(content_type_for(Path::new("app.js")), "text/javascript; charset=utf-8");
        assert_eq!(content_type_for(Path::new("faq-data.json")), "application/json; charset=utf-8");
    }

    #[test]
    fn test_images() {
        assert_eq!(content_type_for(Path::new("assets/shot.JPEG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("favicon.ico")), "image/x-icon");
        assert_eq!(content_type_for(Path::new("logo.svg")), "image/svg+xml");
    }

    #[test]
    fn test_unknown_and_missing_extensions() {
        assert_eq!(content_type_for(Path::new("demo.mp4")), OCTET_STREAM);
        assert_eq!(content_type_for(Path::new("CNAME")), OCTET_STREAM);
        assert_eq!(content_type_for(Path::new(".html")), OCTET_STREAM);
    }
}
