use ipspan_cidr::{CidrBlock, IpRange, RangeError};
use ipspan_core::{AddressFamily, Uint128};

/// Check that `blocks` tile `[first, last]` exactly with maximal aligned blocks
fn assert_exact_cover(range: &IpRange, blocks: &[CidrBlock]) {
    let bits = range.family().bits().expect("range family is concrete");

    assert!(!blocks.is_empty(), "no blocks for {}", range);
    assert!(
        blocks.len() as u32 <= 2 * (bits - 1),
        "{} blocks for {} exceeds the bound",
        blocks.len(),
        range
    );

    assert_eq!(blocks[0].network(), range.first_value(), "range {}", range);
    assert_eq!(
        blocks[blocks.len() - 1].broadcast(),
        range.last_value(),
        "range {}",
        range
    );

    for block in blocks {
        assert_eq!(block.family(), range.family());
        let host_bits = block.host_bits();
        assert!(
            block.network().is_zero() || block.network().trailing_zeros() >= host_bits,
            "{} is not aligned",
            block
        );
    }

    for pair in blocks.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        // Adjacent, ascending and disjoint.
        assert_eq!(a.broadcast() + Uint128::ONE, b.network(), "{} then {}", a, b);

        // Two equal siblings that share a parent block should have been merged.
        let mergeable = a.prefix_len() == b.prefix_len()
            && a.prefix_len() > 0
            && a.network().trailing_zeros() > a.host_bits();
        assert!(!mergeable, "{} and {} could merge", a, b);
    }
}

fn v4(value: u32) -> [u8; 4] {
    value.to_be_bytes()
}

/// Deterministic xorshift stream for sweeping ranges
struct Sweep(u64);

impl Sweep {
    fn next_u64(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }
}

#[test]
fn test_scenario_private_range_blocks() {
    let range = IpRange::new(&[192, 168, 0, 100], &[192, 168, 0, 199]).expect("valid range");
    let blocks = range.to_cidr_blocks();

    let rendered: Vec<String> = blocks.iter().map(|b| b.to_string()).collect();
    assert_eq!(
        rendered,
        [
            "192.168.0.100/30",
            "192.168.0.104/29",
            "192.168.0.112/28",
            "192.168.0.128/26",
            "192.168.0.192/29",
        ]
    );
    assert_exact_cover(&range, &blocks);
}

#[test]
fn test_scenario_private_range_contains() {
    let range = IpRange::new(&[192, 168, 0, 100], &[192, 168, 0, 199]).expect("valid range");

    assert_eq!(range.contains(&[192, 168, 0, 100]), Ok(true));
    assert_eq!(range.contains(&[192, 168, 0, 199]), Ok(true));
    assert_eq!(range.contains(&[192, 168, 0, 99]), Ok(false));
    assert_eq!(range.contains(&[192, 168, 0, 200]), Ok(false));
}

#[test]
fn test_scenario_mixed_families() {
    let mut last = [0u8; 16];
    last[0] = 0x20;
    last[1] = 0x01;

    let result = IpRange::new(&[10, 0, 0, 1], &last);
    assert!(matches!(result, Err(RangeError::FamilyMismatch { .. })));
}

#[test]
fn test_exhaustive_small_ranges() {
    for first in 0u32..70 {
        for last in (first + 1)..70 {
            let range = IpRange::new(&v4(first), &v4(last)).expect("valid range");
            assert_exact_cover(&range, &range.to_cidr_blocks());
        }
    }
}

#[test]
fn test_worst_case_block_count() {
    let range = IpRange::new(&v4(1), &v4(u32::MAX - 1)).expect("valid range");
    let blocks = range.to_cidr_blocks();
    assert_eq!(blocks.len(), 62);
    assert_exact_cover(&range, &blocks);

    let mut first = [0u8; 16];
    first[15] = 1;
    let mut last = [0xffu8; 16];
    last[15] = 0xfe;
    let range = IpRange::new(&first, &last).expect("valid range");
    let blocks = range.to_cidr_blocks();
    assert_eq!(blocks.len(), 254);
    assert_exact_cover(&range, &blocks);
}

#[test]
fn test_sweep_ipv4() {
    let mut sweep = Sweep(0x2545_f491_4f6c_dd1d);
    for _ in 0..500 {
        let a = sweep.next_u64() as u32;
        let b = sweep.next_u64() as u32;
        if a == b {
            continue;
        }

        let range = IpRange::new(&v4(a.min(b)), &v4(a.max(b))).expect("valid range");
        assert_exact_cover(&range, &range.to_cidr_blocks());
    }
}

#[test]
fn test_sweep_ipv6() {
    let mut sweep = Sweep(0x9e37_79b9_7f4a_7c15);
    for i in 0..300 {
        let a = Uint128::new(sweep.next_u64(), sweep.next_u64());
        // Keep some ranges short so the low half carries into the high half.
        let b = if i % 2 == 0 {
            Uint128::new(sweep.next_u64(), sweep.next_u64())
        } else {
            a.wrapping_add(Uint128::from(sweep.next_u64() >> 40))
        };
        if a == b {
            continue;
        }

        let (first, last) = if a < b { (a, b) } else { (b, a) };
        let range = IpRange::new(&first.to_bytes(), &last.to_bytes()).expect("valid range");
        assert_exact_cover(&range, &range.to_cidr_blocks());
    }
}

#[test]
fn test_blocks_contain_every_range_edge() {
    let range = IpRange::new(&v4(0x0a00_0005), &v4(0x0a00_1003)).expect("valid range");
    let blocks = range.to_cidr_blocks();

    for value in [0x0a00_0005u32, 0x0a00_0006, 0x0a00_0fff, 0x0a00_1000, 0x0a00_1003] {
        let hits = blocks
            .iter()
            .filter(|b| b.contains(Uint128::from(value)))
            .count();
        assert_eq!(hits, 1, "value {:#x}", value);
    }

    for value in [0x0a00_0004u32, 0x0a00_1004] {
        assert!(blocks.iter().all(|b| !b.contains(Uint128::from(value))));
    }
}

#[test]
fn test_from_values_matches_bytes() {
    let by_bytes = IpRange::new(&v4(100), &v4(200)).expect("valid range");
    let by_values = IpRange::from_values(
        AddressFamily::Ipv4,
        Uint128::from(100u64),
        Uint128::from(200u64),
    )
    .expect("valid range");

    assert_eq!(by_bytes, by_values);
    assert_eq!(by_bytes.to_cidr_blocks(), by_values.to_cidr_blocks());
}
