//! End-to-end properties of the encoder.

use proptest::prelude::*;
use qrenc::bch::format_info_bits;
use qrenc::tables::VERSIONS;
use qrenc::{encode_data, EcLevel, EncodeOptions, Mask, QrError, Symbol, Version};

const LEVELS: [EcLevel; 4] = [EcLevel::Low, EcLevel::Medium, EcLevel::Quartile, EcLevel::High];

fn level_strategy() -> impl Strategy<Value = EcLevel> {
    prop::sample::select(LEVELS.to_vec())
}

fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 1..120),
        "[0-9]{1,200}".prop_map(String::into_bytes),
        "[0-9A-Z $%*+./:-]{1,150}".prop_map(String::into_bytes),
        "[a-z0-9 ]{1,100}".prop_map(String::into_bytes),
    ]
}

#[test]
fn test_block_tables_are_consistent() {
    for info in VERSIONS.iter() {
        for level in LEVELS {
            let blocks = info.blocks(level);
            let data: usize = blocks.iter().map(|b| b.count * b.data).sum();
            let total: usize = blocks.iter().map(|b| b.count * b.total).sum();
            assert_eq!(data, info.data_codewords(level), "version {}", info.number);
            assert_eq!(total, info.total_codewords, "version {}", info.number);
            for b in blocks.iter().filter(|b| b.count > 0) {
                assert_eq!(b.data + b.ecc(), b.total);
            }
        }
    }
}

#[test]
fn test_byte_capacity_boundary() {
    let options = EncodeOptions::new(EcLevel::Low);
    let qr = Symbol::encode(&[b'a'; 17], &options).unwrap();
    assert_eq!(qr.version(), Version::new(1));

    let fixed = options.with_version(Version::new(1));
    assert!(matches!(
        Symbol::encode(&[b'a'; 18], &fixed),
        Err(QrError::CapacityExceeded { .. })
    ));
    let qr = Symbol::encode(&[b'a'; 18], &fixed.auto_extend(true)).unwrap();
    assert_eq!(qr.version(), Version::new(2));
    assert_eq!(qr.size(), 25);
}

#[test]
fn test_too_long_for_any_version() {
    let data = vec![b'a'; 3000];
    let err = Symbol::encode(&data, &EncodeOptions::new(EcLevel::Low).auto_extend(true));
    assert!(matches!(err, Err(QrError::CapacityExceeded { level: EcLevel::Low, .. })));
}

#[test]
fn test_largest_symbol() {
    let data = vec![b'7'; 7089];
    let qr = Symbol::encode(&data, &EncodeOptions::new(EcLevel::Low)).unwrap();
    assert_eq!(qr.version(), Version::MAX);
    assert_eq!(qr.size(), 177);
}

#[test]
fn test_kanji_input() {
    let data: [u8; 6] = [0x93, 0x5f, 0xe4, 0xaa, 0x93, 0x5f];
    let qr = Symbol::encode(&data, &EncodeOptions::new(EcLevel::High)).unwrap();
    assert_eq!(qr.version(), Version::new(1));
}

#[test]
fn test_raw_boundary_matches_typed_api() {
    let raw = encode_data(2, 0, false, -1, b"HELLO WORLD", 0).unwrap();
    assert_eq!(raw, Symbol::encode_text("HELLO WORLD", EcLevel::Quartile).unwrap());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    // Property: identical requests give identical grids
    #[test]
    fn test_idempotent(data in payload_strategy(), level in level_strategy()) {
        let options = EncodeOptions::new(level);
        let a = Symbol::encode(&data, &options).unwrap();
        let b = Symbol::encode(&data, &options).unwrap();
        prop_assert_eq!(a, b);
    }

    // Property: fixing the automatically chosen mask reproduces the grid
    #[test]
    fn test_fixed_mask_matches_auto(data in payload_strategy(), level in level_strategy()) {
        let auto = Symbol::encode(&data, &EncodeOptions::new(level)).unwrap();
        let options = EncodeOptions::new(level).with_mask(auto.mask());
        let fixed = Symbol::encode(&data, &options).unwrap();
        prop_assert_eq!(auto, fixed);
    }

    // Property: a stronger level never picks a smaller version
    #[test]
    fn test_level_monotonic(data in payload_strategy()) {
        let versions: Vec<Version> = LEVELS
            .iter()
            .map(|&level| Symbol::encode(&data, &EncodeOptions::new(level)).unwrap().version())
            .collect();
        prop_assert!(versions.windows(2).all(|w| w[0] <= w[1]), "{:?}", versions);
    }

    // Property: the placed format strip reads back as the level and mask used
    #[test]
    fn test_format_info_readback(
        data in payload_strategy(),
        level in level_strategy(),
        mask in 0u8..8
    ) {
        let mask = Mask::new(mask);
        let qr = Symbol::encode(&data, &EncodeOptions::new(level).with_mask(mask)).unwrap();
        prop_assert_eq!(u32::from(qr.format_info()), format_info_bits(level, mask));
        prop_assert_eq!(qr.ec_level(), level);
        prop_assert_eq!(qr.size(), usize::from(qr.version().value()) * 4 + 17);
    }

    // Property: the three finder patterns survive masking
    #[test]
    fn test_finders_intact(data in payload_strategy(), level in level_strategy()) {
        let qr = Symbol::encode(&data, &EncodeOptions::new(level)).unwrap();
        let n = qr.size() as i32;
        for (cx, cy) in [(3, 3), (n - 4, 3), (3, n - 4)] {
            for d in -4i32..=4 {
                let ring = |x: i32, y: i32| {
                    let dist = (x - cx).abs().max((y - cy).abs());
                    dist != 2 && dist != 4
                };
                let inside = |k: i32| (0..n).contains(&k);
                prop_assert_eq!(qr.get_module(cx + d, cy), ring(cx + d, cy) && inside(cx + d));
                prop_assert_eq!(qr.get_module(cx, cy + d), ring(cx, cy + d) && inside(cy + d));
            }
        }
    }
}
