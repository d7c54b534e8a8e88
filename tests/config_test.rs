// ABOUTME: Tests for environment-driven configuration loading
// ABOUTME: Defaults, secret handling per environment, lifetimes, and store backend selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::Duration;
use keyturn::{
    config::environment::{Environment, ServerConfig, StoreBackend},
    constants::env_vars,
    errors::ErrorCode,
};
use serial_test::serial;
use std::env;

const ALL_VARS: [&str; 10] = [
    env_vars::HTTP_PORT,
    env_vars::HOST,
    env_vars::DATABASE_URL,
    env_vars::REFRESH_STORE_BACKEND,
    env_vars::JWT_SECRET,
    env_vars::JWT_REFRESH_SECRET,
    env_vars::JWT_EXPIRES_IN,
    env_vars::JWT_REFRESH_EXPIRES_IN,
    env_vars::BCRYPT_COST,
    env_vars::ENVIRONMENT,
];

fn clean_env() {
    common::init_test_logging();
    for var in ALL_VARS {
        env::remove_var(var);
    }
}

fn set_secrets() {
    env::set_var(env_vars::JWT_SECRET, "config-test-access");
    env::set_var(env_vars::JWT_REFRESH_SECRET, "config-test-refresh");
}

#[test]
#[serial]
fn test_defaults() {
    clean_env();
    set_secrets();

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 3000);
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.database.url, "sqlite:./data/keyturn.db");
    assert_eq!(config.database.refresh_store, StoreBackend::Database);
    assert_eq!(config.auth.access_ttl, Duration::minutes(15));
    assert_eq!(config.auth.refresh_ttl, Duration::days(7));
    assert_eq!(config.auth.bcrypt_cost, 12);
    assert_eq!(config.auth.access_secret.as_bytes(), b"config-test-access");
    assert_eq!(config.bind_address(), "127.0.0.1:3000");

    clean_env();
}

#[test]
#[serial]
fn test_overrides() {
    clean_env();
    set_secrets();
    env::set_var(env_vars::HTTP_PORT, "8088");
    env::set_var(env_vars::JWT_EXPIRES_IN, "5m");
    env::set_var(env_vars::JWT_REFRESH_EXPIRES_IN, "30d");
    env::set_var(env_vars::REFRESH_STORE_BACKEND, "memory");
    env::set_var(env_vars::BCRYPT_COST, "6");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 8088);
    assert_eq!(config.auth.access_ttl, Duration::minutes(5));
    assert_eq!(config.auth.refresh_ttl, Duration::days(30));
    assert_eq!(config.database.refresh_store, StoreBackend::Memory);
    assert_eq!(config.auth.bcrypt_cost, 6);

    let summary = config.summary();
    assert!(!summary.contains("config-test-access"));

    clean_env();
}

#[test]
#[serial]
fn test_production_requires_secrets() {
    clean_env();
    env::set_var(env_vars::ENVIRONMENT, "production");

    let err = ServerConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigMissing);

    clean_env();
}

#[test]
#[serial]
fn test_development_generates_distinct_secrets() {
    clean_env();

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.auth.access_secret.as_bytes().len(), 64);
    assert_ne!(config.auth.access_secret, config.auth.refresh_secret);

    clean_env();
}

#[test]
#[serial]
fn test_invalid_values_are_rejected() {
    let cases: [(&str, &str); 5] = [
        (env_vars::JWT_EXPIRES_IN, "soon"),
        (env_vars::JWT_REFRESH_EXPIRES_IN, "0d"),
        (env_vars::REFRESH_STORE_BACKEND, "redis"),
        (env_vars::BCRYPT_COST, "40"),
        (env_vars::HTTP_PORT, "not-a-port"),
    ];

    for (var, value) in cases {
        clean_env();
        set_secrets();
        env::set_var(var, value);

        let err = ServerConfig::from_env().unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalid, "{var}={value}");
    }

    clean_env();
}

#[test]
#[serial]
fn test_shared_secret_is_rejected() {
    clean_env();
    env::set_var(env_vars::JWT_SECRET, "same-secret");
    env::set_var(env_vars::JWT_REFRESH_SECRET, "same-secret");

    let err = ServerConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigInvalid);

    clean_env();
}

#[test]
#[serial]
fn test_refresh_must_outlive_access() {
    clean_env();
    set_secrets();
    env::set_var(env_vars::JWT_EXPIRES_IN, "2h");
    env::set_var(env_vars::JWT_REFRESH_EXPIRES_IN, "1h");

    let err = ServerConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigInvalid);

    clean_env();
}
