use super::Config;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_empty_file_gives_defaults() {
    let config = Config::from_toml("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.fold_levels, vec![2, 3]);
    assert!((config.max_scale - 5.0).abs() < f64::EPSILON);
}

#[test]
fn test_partial_override_keeps_other_defaults() {
    let config = Config::from_toml("excluded_titles = [\"summary\"]\nmax_scale = 3.0\n").unwrap();
    assert_eq!(config.excluded_titles, vec!["summary".to_string()]);
    assert!((config.max_scale - 3.0).abs() < f64::EPSILON);
    assert!((config.min_scale - 0.5).abs() < f64::EPSILON);
    assert_eq!(config.file_extensions, vec!["md".to_string()]);
}

#[test]
fn test_out_of_range_fold_level_is_rejected() {
    let err = Config::from_toml("fold_levels = [2, 7]\n").unwrap_err();
    assert!(err.to_string().contains("fold level 7"), "got: {err}");
}

#[test]
fn test_inverted_scale_bounds_are_rejected() {
    assert!(Config::from_toml("min_scale = 4.0\nmax_scale = 2.0\n").is_err());
}

#[test]
fn test_from_path_reads_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "fold_levels = [2]").unwrap();

    let config = Config::from_path(file.path()).unwrap();
    assert_eq!(config.fold_levels, vec![2]);
}

#[test]
fn test_from_path_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::from_path(&dir.path().join("folio.toml")).unwrap_err();
    assert!(matches!(err, crate::error::Error::Io(_)));
}

#[test]
fn test_named_config_must_load() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("site.toml");
    let err = Config::resolve(Some(&missing)).unwrap_err();
    assert!(matches!(err, crate::error::Error::Config(_)));
    assert!(err.to_string().contains("site.toml"), "got: {err}");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "max_scale = \"big\"").unwrap();
    assert!(matches!(
        Config::resolve(Some(file.path())),
        Err(crate::error::Error::Config(_))
    ));

    let mut good = NamedTempFile::new().unwrap();
    writeln!(good, "fold_levels = [3]").unwrap();
    assert_eq!(Config::resolve(Some(good.path())).unwrap().fold_levels, vec![3]);
}
