use crate::tests::{EnvGuard, setup_config_dir};
use crate::{Config, WebSocketConfig};

use std::time::Duration;

use googletest::assert_that;
use googletest::prelude::{anything, eq, err, ok};
use serial_test::serial;

// =========================================================================
// Validation Tests - WebSocket
// =========================================================================

#[test]
#[serial]
fn given_env_overrides_when_load_then_websocket_values_applied() {
    // Given
    let _env = setup_config_dir();
    let _max = EnvGuard::set("WS_MAX_CONNECTIONS_PER_INSTANCE", "2");
    let _interval = EnvGuard::set("WS_HEARTBEAT_INTERVAL", "10");
    let _size = EnvGuard::set("WS_MESSAGE_MAX_SIZE", "2048");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.websocket.max_connections_per_instance, eq(2));
    assert_that!(config.websocket.heartbeat_interval_secs, eq(10));
    assert_that!(config.websocket.message_max_size, eq(2048));
    assert_that!(config.validate(), ok(anything()));
}

#[test]
#[serial]
fn given_zero_capacity_when_validate_then_error() {
    // Given
    let _env = setup_config_dir();
    let _max = EnvGuard::set("WS_MAX_CONNECTIONS_PER_INSTANCE", "0");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_heartbeat_interval_below_minimum_when_validate_then_error() {
    // Given
    let _env = setup_config_dir();
    let _interval = EnvGuard::set("WS_HEARTBEAT_INTERVAL", "1");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
fn given_tiny_message_limit_when_validate_then_error() {
    let config = WebSocketConfig {
        message_max_size: 10,
        ..WebSocketConfig::default()
    };

    assert_that!(config.validate(), err(anything()));
}

#[test]
fn given_default_tolerance_when_computing_timeout_then_twice_the_interval() {
    let config = WebSocketConfig {
        heartbeat_interval_secs: 30,
        ..WebSocketConfig::default()
    };

    assert_that!(config.heartbeat_timeout(), eq(Duration::from_secs(60)));
}
