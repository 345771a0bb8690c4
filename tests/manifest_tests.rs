use std::fs;

use forklift::manifest::Manifest;
use tempfile::tempdir;

#[test]
fn load_reads_pins_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("requirements.txt");
    fs::write(&path, "flask==3.0\ngunicorn==22.0\n").unwrap();

    let manifest = Manifest::load(&path).unwrap();
    assert_eq!(manifest.len(), 2);
    assert_eq!(manifest.pins()[0].to_string(), "flask==3.0");
    assert_eq!(manifest.pins()[1].to_string(), "gunicorn==22.0");
}

#[test]
fn load_missing_file_is_fatal() {
    let dir = tempdir().unwrap();
    let err = Manifest::load(dir.path().join("requirements.txt")).unwrap_err();

    assert_eq!(err.code(), "E002");
    assert!(err.message().contains("requirements.txt"));
}

#[test]
fn full_requirements_file_shape_parses() {
    let content = "\
# runtime dependencies
flask==3.0
gunicorn==22.0       # application server

google-cloud-aiplatform==1.60.0
pymongo==4.8.0
python-dotenv==1.0.1
";
    let manifest = Manifest::parse(content).unwrap();
    assert_eq!(manifest.len(), 5);
    assert!(manifest
        .pins()
        .iter()
        .any(|p| p.name == "google-cloud-aiplatform" && p.version == "1.60.0"));
}

#[test]
fn range_specifiers_are_rejected() {
    for line in ["flask>=3.0", "flask~=3.0", "flask==3.0,<4", "flask == 3 0"] {
        let result = Manifest::parse(line);
        assert!(result.is_err(), "expected '{}' to be rejected", line);
    }
}

#[test]
fn error_reports_offending_line_number() {
    let err = Manifest::parse("flask==3.0\n\n# comment\nbad line here\n").unwrap_err();
    assert!(err.message().contains("line 4"), "got: {}", err.message());
}
