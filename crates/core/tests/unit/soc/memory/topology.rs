//! Unit tests for memory controller topology and address interleaving.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use rvfs_core::MemoryMode;
use rvfs_core::common::ConfigError;
use rvfs_core::config::{MemoryConfig, SystemConfig};
use rvfs_core::soc::memory::{AddrRange, MemoryTopology, configure};

const BASE: u64 = 0x8000_0000;

fn memory(technology: &str, channels: usize) -> MemoryConfig {
    MemoryConfig {
        technology: technology.to_string(),
        channels,
    }
}

fn topology(channels: usize) -> MemoryTopology {
    configure(
        &memory("DDR3_1600_8x8", channels),
        &SystemConfig::default(),
        MemoryMode::Timing,
    )
    .unwrap()
}

#[test]
fn test_single_channel_covers_ram() {
    let topo = topology(1);
    assert_eq!(topo.len(), 1);

    let ctrl = &topo.controllers()[0];
    assert_eq!(ctrl.technology, "DDR3_1600_8x8");
    assert_eq!(ctrl.channel, 0);
    assert_eq!(ctrl.channels, Some(1));
    assert_eq!(ctrl.mem_mode, MemoryMode::Timing);
    assert_eq!(ctrl.range.start, BASE);
    assert_eq!(ctrl.range.size, 128 * 1024 * 1024);
    assert!(!ctrl.range.interleaved());
    assert_eq!(ctrl.range.granularity(), ctrl.range.size);

    assert!(ctrl.range.contains(BASE));
    assert!(ctrl.range.contains(BASE + ctrl.range.size - 1));
    assert!(!ctrl.range.contains(BASE - 1));
    assert!(!ctrl.range.contains(BASE + ctrl.range.size));
}

#[test]
fn test_two_channel_interleave_bits() {
    let topo = topology(2);
    assert_eq!(topo.len(), 2);
    for (i, ctrl) in topo.controllers().iter().enumerate() {
        assert_eq!(ctrl.channel, i);
        assert_eq!(ctrl.channels, Some(2));
        assert_eq!(ctrl.range.intlv_bits, 1);
        assert_eq!(ctrl.range.intlv_high_bit, 7);
        assert_eq!(ctrl.range.xor_high_bit, 20);
        assert_eq!(ctrl.range.intlv_match, i as u64);
        assert!(ctrl.range.hashed());
        assert_eq!(ctrl.range.granularity(), 128);
    }
}

#[rstest]
#[case(0, 0)]
#[case(128, 1)]
#[case(256, 0)]
#[case(1 << 20, 1)]
#[case((1 << 20) + 128, 0)]
fn test_two_channel_routing(#[case] offset: u64, #[case] channel: usize) {
    let topo = topology(2);
    assert_eq!(topo.controller_for(BASE + offset).unwrap().channel, channel);
}

#[test]
fn test_four_channel_interleave_bits() {
    let topo = topology(4);
    let range = topo.controllers()[3].range;
    assert_eq!(range.intlv_bits, 2);
    assert_eq!(range.intlv_high_bit, 8);
    assert_eq!(range.xor_high_bit, 21);
    assert_eq!(range.intlv_match, 3);
}

#[test]
fn test_wide_cache_line_raises_granularity() {
    let system = SystemConfig {
        cache_line_bytes: 256,
        ..SystemConfig::default()
    };
    let topo = configure(&memory("DDR3_1600_8x8", 2), &system, MemoryMode::Atomic).unwrap();
    assert_eq!(topo.controllers()[0].range.intlv_high_bit, 8);
    assert_eq!(topo.controllers()[0].range.granularity(), 256);
}

#[test]
fn test_simple_memory_has_no_channel_count() {
    let topo = configure(
        &memory("SimpleMemory", 2),
        &SystemConfig::default(),
        MemoryMode::Atomic,
    )
    .unwrap();
    assert_eq!(topo.len(), 2);
    assert!(topo.controllers().iter().all(|ctrl| ctrl.channels.is_none()));
    assert!(
        topo.controllers()
            .iter()
            .all(|ctrl| ctrl.mem_mode == MemoryMode::Atomic)
    );
}

#[test]
fn test_zero_channels_rejected() {
    let err = configure(
        &memory("DDR3_1600_8x8", 0),
        &SystemConfig::default(),
        MemoryMode::Atomic,
    )
    .unwrap_err();
    assert_eq!(err, ConfigError::ZeroMemoryChannels);
}

#[rstest]
#[case(3)]
#[case(6)]
#[case(12)]
fn test_non_power_of_two_rejected(#[case] channels: usize) {
    let err = configure(
        &memory("DDR3_1600_8x8", channels),
        &SystemConfig::default(),
        MemoryMode::Atomic,
    )
    .unwrap_err();
    assert_eq!(err, ConfigError::NonPowerOfTwoChannels(channels));
}

#[test]
fn test_channels_exceeding_memory_rejected() {
    let system = SystemConfig {
        ram_size: 256,
        ..SystemConfig::default()
    };
    let err = configure(&memory("DDR3_1600_8x8", 4), &system, MemoryMode::Atomic).unwrap_err();
    assert_eq!(
        err,
        ConfigError::ChannelsExceedMemory {
            channels: 4,
            ram_size: 256
        }
    );
}

#[test]
fn test_unknown_technology_checked_first() {
    let err = configure(
        &memory("FLASH", 0),
        &SystemConfig::default(),
        MemoryMode::Atomic,
    )
    .unwrap_err();
    assert_eq!(err, ConfigError::UnknownMemoryTechnology("FLASH".to_string()));
}

#[test]
fn test_plain_range_contains() {
    let range = AddrRange::new(0x1000, 0x100);
    assert!(!range.interleaved());
    assert!(!range.hashed());
    assert!(range.contains(0x1000));
    assert!(range.contains(0x10ff));
    assert!(!range.contains(0x0fff));
    assert!(!range.contains(0x1100));
}

#[test]
fn test_address_outside_ram_has_no_controller() {
    let topo = topology(4);
    assert!(topo.controller_for(0).is_none());
    assert!(topo.controller_for(BASE + 128 * 1024 * 1024).is_none());
}

proptest! {
    #[test]
    fn prop_every_address_has_exactly_one_controller(
        shift in 0u32..=4,
        offset in 0u64..(128 * 1024 * 1024),
    ) {
        let topo = topology(1 << shift);
        let owners = topo
            .controllers()
            .iter()
            .filter(|ctrl| ctrl.range.contains(BASE + offset))
            .count();
        prop_assert_eq!(owners, 1);
    }
}
