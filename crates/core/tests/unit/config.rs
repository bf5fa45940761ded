//! Unit tests for run configuration defaults and deserialization.

use pretty_assertions::assert_eq;
use rvfs_core::config::{Config, MemoryConfig, SystemConfig, defaults};

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.system, SystemConfig::default());
    assert_eq!(config.memory, MemoryConfig::default());
}

#[test]
fn test_system_config_defaults() {
    let system = SystemConfig::default();
    assert_eq!(system.ram_base, 0x8000_0000);
    assert_eq!(system.ram_size, 128 * 1024 * 1024);
    assert_eq!(system.cache_line_bytes, 64);
    assert_eq!(system.gdb_port, 7000);
}

#[test]
fn test_memory_config_defaults() {
    let memory = MemoryConfig::default();
    assert_eq!(memory.technology, "DDR3_1600_8x8");
    assert_eq!(memory.channels, 1);
}

#[test]
fn test_ticks_per_second() {
    assert_eq!(defaults::TICKS_PER_SECOND, 1_000_000_000_000);
}

#[test]
fn test_deserialize_empty_object() {
    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_deserialize_partial_memory() {
    let config: Config = serde_json::from_str(r#"{"memory": {"channels": 4}}"#).unwrap();
    assert_eq!(config.memory.technology, defaults::MEM_TYPE);
    assert_eq!(config.memory.channels, 4);
    assert_eq!(config.system, SystemConfig::default());
}

#[test]
fn test_deserialize_full() {
    let json = r#"{
        "system": {
            "ram_base": 0,
            "ram_size": 1048576,
            "cache_line_bytes": 128,
            "gdb_port": 1234
        },
        "memory": {
            "technology": "HBM_1000_4H_1x128",
            "channels": 8
        }
    }"#;
    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.system.ram_base, 0);
    assert_eq!(config.system.ram_size, 1 << 20);
    assert_eq!(config.system.cache_line_bytes, 128);
    assert_eq!(config.system.gdb_port, 1234);
    assert_eq!(config.memory.technology, "HBM_1000_4H_1x128");
    assert_eq!(config.memory.channels, 8);
}

#[test]
fn test_deserialize_rejects_wrong_type() {
    let result: Result<Config, _> = serde_json::from_str(r#"{"memory": {"channels": "two"}}"#);
    assert!(result.is_err());
}
