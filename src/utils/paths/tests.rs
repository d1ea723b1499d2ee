use super::*;

#[test]
fn config_file_uses_expected_filename() {
    let path = config_file().expect("config_file should resolve");
    assert_eq!(
        path.file_name().and_then(|f| f.to_str()),
        Some(CONFIG_FILE_BASENAME)
    );
}

#[test]
fn config_file_lives_in_config_dir() {
    let dir = config_dir().expect("config_dir should resolve");
    let file = config_file().expect("config_file should resolve");
    assert_eq!(file.parent(), Some(dir.as_path()));
}

#[test]
fn expand_home_leaves_plain_paths() {
    let path = Path::new("/etc/archmatrix.kdl");
    assert_eq!(expand_home(path).unwrap(), path.to_path_buf());
}

#[test]
fn expand_home_rejects_other_users() {
    assert!(expand_home(Path::new("~alice/archmatrix.kdl")).is_err());
}
