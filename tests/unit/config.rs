//! Unit tests for configuration validation

use tidewatch::config::{EngineConfig, SNR_FLOOR};

#[test]
fn test_default_config_is_valid() {
    assert!(EngineConfig::default().validate().is_ok());
}

#[test]
fn test_min_signals_zero_rejected() {
    let cfg = EngineConfig {
        min_signals_required: 0,
        ..Default::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_timeframe_exceeding_lookback_rejected() {
    let cfg = EngineConfig {
        lookback_secs: 60,
        timeframes: vec![30, 120],
        ..Default::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_empty_timeframes_rejected() {
    let cfg = EngineConfig {
        timeframes: vec![],
        ..Default::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_negative_snr_threshold_rejected() {
    let cfg = EngineConfig {
        snr_threshold: -1.0,
        ..Default::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_snr_threshold_clamped_up_to_floor() {
    let cfg = EngineConfig {
        snr_threshold: 0.2,
        ..Default::default()
    };
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.effective_snr_threshold(), SNR_FLOOR);

    let strict = EngineConfig {
        snr_threshold: 2.5,
        ..Default::default()
    };
    assert_eq!(strict.effective_snr_threshold(), 2.5);
}
