use std::path::Path;

use springforge::config::{Config, load_config};
use springforge::{HookType, SpringError};

#[test]
fn bundled_example_matches_defaults() {
    let config = Config::load(Path::new("springforge.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn missing_explicit_file_is_a_config_error() {
    let err = load_config(Some(Path::new("does/not/exist.toml"))).unwrap_err();
    assert!(matches!(err, SpringError::Config(_)), "{err}");
}

#[test]
fn compression_spring_from_toml() {
    let config = Config::from_toml(
        r#"
        [spring]
        hook_type = "none"
        height = 60.0

        [output]
        ascii = true
        "#,
    )
    .unwrap();
    assert_eq!(config.spring.hook_type, HookType::None);

    let model = springforge::generate(&config.spring, &config.rig).unwrap();
    assert_eq!(model.subtractions.len(), 2);
    assert!(config.output.ascii);
}
