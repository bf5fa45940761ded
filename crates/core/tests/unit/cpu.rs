//! Unit tests for CPU model parsing and memory mode selection.

use rstest::rstest;
use rvfs_core::common::ConfigError;
use rvfs_core::{CpuModel, MemoryMode};

#[rstest]
#[case("atomic", CpuModel::Atomic, "AtomicSimpleCPU", MemoryMode::Atomic)]
#[case("timing", CpuModel::Timing, "TimingSimpleCPU", MemoryMode::Timing)]
#[case("minor", CpuModel::Minor, "MinorCPU", MemoryMode::Timing)]
fn test_cpu_model_table(
    #[case] name: &str,
    #[case] model: CpuModel,
    #[case] class_name: &str,
    #[case] mode: MemoryMode,
) {
    let parsed: CpuModel = name.parse().unwrap();
    assert_eq!(parsed, model);
    assert_eq!(parsed.name(), name);
    assert_eq!(parsed.class_name(), class_name);
    assert_eq!(parsed.memory_mode(), mode);
    assert_eq!(parsed.to_string(), name);
}

#[rstest]
#[case("turbo")]
#[case("")]
#[case("Atomic")]
#[case("MINOR")]
#[case(" timing")]
#[case("o3")]
fn test_unsupported_cpu_model(#[case] name: &str) {
    let err = name.parse::<CpuModel>().unwrap_err();
    assert_eq!(err, ConfigError::UnsupportedCpuModel(name.to_string()));
}

#[test]
fn test_default_cpu_model() {
    assert_eq!(CpuModel::default(), CpuModel::Atomic);
}

#[test]
fn test_all_models_round_trip_names() {
    for model in CpuModel::ALL {
        assert_eq!(model.name().parse::<CpuModel>(), Ok(model));
    }
}

#[test]
fn test_memory_mode_names() {
    assert_eq!(MemoryMode::Atomic.to_string(), "atomic");
    assert_eq!(MemoryMode::Timing.as_str(), "timing");
    assert_eq!(serde_json::to_string(&MemoryMode::Timing).unwrap(), "\"timing\"");
    assert_eq!(
        serde_json::from_str::<MemoryMode>("\"atomic\"").unwrap(),
        MemoryMode::Atomic
    );
}
