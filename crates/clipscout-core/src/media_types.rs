// crates/clipscout-core/src/media_types.rs
//
// Types that flow across the channel between clipscout-media and clipscout-ui.
// No egui, no ffmpeg — just plain data.

use uuid::Uuid;

/// Results sent from the MediaWorker background threads to the UI.
pub enum MediaResult {
    Duration   { id: Uuid, seconds: f64 },
    Thumbnail  { id: Uuid, width: u32, height: u32, data: Vec<u8> },
    VideoFrame { id: Uuid, width: u32, height: u32, data: Vec<u8> },
    VideoSize  { id: Uuid, width: u32, height: u32 },
    Error      { id: Uuid, msg: String },
}

/// A decoded frame from the dedicated playback pipeline.
pub struct PlaybackFrame {
    pub id:        Uuid,
    pub timestamp: f64,
    pub width:     u32,
    pub height:    u32,
    pub data:      Vec<u8>, // RGBA
}

/// Best-effort MIME type from the file extension.
///
/// The browser original read this off the File object; a desktop client has
/// only the path to go on. Unrecognized extensions fall back to the generic
/// binary type — the analysis endpoint does its own sniffing anyway.
pub fn mime_for_path(path: &std::path::Path) -> &'static str {
    let ext = path.extension()
        .unwrap_or_default()
        .to_string_lossy()
        .to_lowercase();
    match ext.as_str() {
        "mp4"  => "video/mp4",
        "m4v"  => "video/x-m4v",
        "mov"  => "video/quicktime",
        "mkv"  => "video/x-matroska",
        "webm" => "video/webm",
        "avi"  => "video/x-msvideo",
        "mpg" | "mpeg" => "video/mpeg",
        _      => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn common_containers_map() {
        assert_eq!(mime_for_path(Path::new("clip.mp4")),  "video/mp4");
        assert_eq!(mime_for_path(Path::new("clip.MOV")),  "video/quicktime");
        assert_eq!(mime_for_path(Path::new("a/b/c.webm")), "video/webm");
    }

    #[test]
    fn unknown_extension_falls_back() {
        assert_eq!(mime_for_path(Path::new("clip.xyz")), "application/octet-stream");
        assert_eq!(mime_for_path(Path::new("noext")),    "application/octet-stream");
    }
}
