//! Application info tests.

use stillframe::AppInfo;

#[test]
fn app_info_comes_from_manifest() {
    let info = AppInfo::from_manifest();

    assert_eq!(info.name, "stillframe");
    assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    assert!(!info.authors.is_empty());
    assert_eq!(info.to_string(), format!("stillframe {}", info.version));
}

#[test]
fn about_text_lists_features() {
    let info = AppInfo::from_manifest();
    let text = info.about_text();

    assert!(text.starts_with(&info.to_string()));
    assert!(text.contains(info.description));
    assert!(text.contains("Features:"));
    assert!(text.contains("Powered by FFmpeg"));
    assert!(text.contains("Authors: Stillframe Developers"));
}
