use setor_sampah_api::upload::public_path;

// Rows written by older revisions of the service stored the image path in
// three different shapes; all must project to the same URL.
#[test]
fn stored_path_variants_normalize_identically() {
    assert_eq!(public_path("foto.jpg"), "/uploads/foto.jpg");
    assert_eq!(public_path("uploads/foto.jpg"), "/uploads/foto.jpg");
    assert_eq!(public_path("/uploads/foto.jpg"), "/uploads/foto.jpg");
}

#[test]
fn already_normalized_path_is_untouched() {
    let canonical = "/uploads/0b1c2d3e.png";
    assert_eq!(public_path(canonical), canonical);
    assert_eq!(public_path(&public_path(canonical)), canonical);
}
