use std::sync::Mutex;

use tempfile::NamedTempFile;

use framecast::{CastdConfig, PixelFormat};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "FRAMECAST_CONFIG",
        "FRAMECAST_FPS",
        "FRAMECAST_SECONDS",
        "FRAMECAST_OUT",
        "FRAMECAST_FORMAT",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn defaults_without_file_or_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = CastdConfig::load().expect("load defaults");
    assert_eq!(cfg.frame_rate, 10.0);
    assert_eq!(cfg.width, 640);
    assert_eq!(cfg.height, 480);
    assert_eq!(cfg.format, PixelFormat::I420);
    assert_eq!(cfg.snapshot_count, 3);
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let toml = r#"
        frame_rate = 24.0
        run_seconds = 30

        [source]
        width = 320
        height = 240
        format = "bgra"

        [snapshots]
        out_dir = "frames"
        count = 7
    "#;
    std::io::Write::write_all(&mut file, toml.as_bytes()).expect("write config");

    std::env::set_var("FRAMECAST_CONFIG", file.path());
    std::env::set_var("FRAMECAST_FPS", "12.5");
    std::env::set_var("FRAMECAST_OUT", "/tmp/framecast_override");

    let cfg = CastdConfig::load().expect("load config");
    assert_eq!(cfg.frame_rate, 12.5);
    assert_eq!(cfg.run_seconds, 30);
    assert_eq!(cfg.width, 320);
    assert_eq!(cfg.height, 240);
    assert_eq!(cfg.format, PixelFormat::Bgra);
    assert_eq!(cfg.out_dir.display().to_string(), "/tmp/framecast_override");
    assert_eq!(cfg.snapshot_count, 7);

    clear_env();
}

#[test]
fn rejects_non_positive_frame_rate() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("FRAMECAST_FPS", "0");
    assert!(CastdConfig::load().is_err());

    std::env::set_var("FRAMECAST_FPS", "-3");
    assert!(CastdConfig::load().is_err());

    clear_env();
}

#[test]
fn rejects_odd_i420_dimensions_from_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let toml = r#"
        [source]
        width = 321
        height = 240
        format = "i420"
    "#;
    std::io::Write::write_all(&mut file, toml.as_bytes()).expect("write config");
    std::env::set_var("FRAMECAST_CONFIG", file.path());

    assert!(CastdConfig::load().is_err());

    clear_env();
}
