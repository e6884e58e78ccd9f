use serde_json::json;

use crate::{
    BlobRegistry, MediaFormat, MediaResolver, MediaType, PanelOptions, RowIndex,
    SupportedFileType, Viewport, frame, resolve::PDF_HIDE_TOOLBAR,
};

const PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8/5+hHgAHggJ/PchI7wAAAABJRU5ErkJggg==";

#[test]
fn test_scenario1() {
    let options = PanelOptions::load("src/tests/scenario1/options.yaml").unwrap();
    let frames = frame::load_frames("src/tests/scenario1/data.json").unwrap();
    let blobs = BlobRegistry::new();
    let resolver = MediaResolver::new(&options, &blobs);
    let views = resolver.render_all(&frames, Viewport::new(800, 600));
    assert_eq!(views.len(), 4);

    let png = &views[0];
    assert_eq!(png.media.media_type, Some(MediaType::Declared(MediaFormat::Image)));
    assert_eq!(png.media.url, format!("data:image/png;base64,{PNG}"));
    assert_eq!(png.media.field.as_deref(), Some("image"));
    assert_eq!((png.width, png.height), (100, 600));
    assert_eq!(png.description.as_deref(), Some("png"));
    let link = png.link.as_ref().unwrap();
    assert_eq!(link.title, "Open png");
    assert_eq!(link.href, "https://example.com/view?caption=png");
    assert_eq!(link.target, "_blank");

    let pdf = &views[1];
    assert_eq!(pdf.media.media_type, Some(MediaType::Declared(MediaFormat::Pdf)));
    assert!(pdf.media.url.starts_with("blob:media-panel/"));
    assert!(pdf.media.url.ends_with(PDF_HIDE_TOOLBAR));
    assert!(pdf.media.object_url.is_some());
    assert_eq!(pdf.width, 64);
    assert_eq!(pdf.link, None);
    assert_eq!(
        blobs.get(&pdf.media.url).unwrap().to_vec(),
        b"%PDF-1.7\n1 0 obj\n<<>>\nendobj\n"
    );

    let video = &views[2];
    assert_eq!(video.media.media_type, Some(MediaType::Declared(MediaFormat::Video)));
    assert_eq!(video.media.url, "https://example.com/clip.webm");
    assert_eq!(video.width, 64);

    let empty = &views[3];
    assert!(empty.media.is_none());
    assert_eq!(
        serde_json::to_value(empty).unwrap(),
        json!({
            "index": 3,
            "media": { "type": null },
            "width": 50,
            "height": 600,
            "description": "none",
            "noResultsMessage": "No media for this row"
        })
    );

    assert_eq!(blobs.len(), 1);
    drop(views);
    assert!(blobs.is_empty());
}

#[test]
fn test_scenario2_legacy_options() {
    let options = PanelOptions::load("src/tests/scenario2/options.toml").unwrap();
    let frames = frame::load_frames("src/tests/scenario2/data.json").unwrap();
    let blobs = BlobRegistry::new();
    let resolver = MediaResolver::new(&options, &blobs);

    let url = resolver.resolve(&frames, RowIndex::At(0));
    assert_eq!(
        serde_json::to_value(&url).unwrap(),
        json!({ "type": "image", "url": "https://example.com/a.png", "field": "link" })
    );

    let encoded = resolver.resolve(&frames, RowIndex::At(1));
    assert_eq!(encoded.media_type, Some(MediaType::Inferred(SupportedFileType::Png)));
    assert!(encoded.url.starts_with("data:image/png;base64,"));
    assert_eq!(encoded.field.as_deref(), Some("payload"));

    let latest = resolver.render_row(&frames, Viewport::new(320, 240), RowIndex::Latest);
    assert_eq!(latest.index, Some(2));
    assert!(latest.media.is_none());
    assert_eq!(latest.no_results_message.as_deref(), Some("Nothing here"));
    assert_eq!((latest.width, latest.height), (320, 240));
}

#[test]
fn test_row_navigation_is_repeatable() {
    let options = PanelOptions::load("src/tests/scenario1/options.yaml").unwrap();
    let frames = frame::load_frames("src/tests/scenario1/data.json").unwrap();
    let blobs = BlobRegistry::new();
    let resolver = MediaResolver::new(&options, &blobs);

    for _ in 0..3 {
        let mut media = resolver.resolve(&frames, RowIndex::At(1));
        assert_eq!(blobs.len(), 1);
        media.release();
        assert!(blobs.is_empty());
    }

    let first = resolver.resolve(&frames, RowIndex::At(0));
    let second = resolver.resolve(&frames, RowIndex::At(0));
    assert_eq!(first, second);
}
