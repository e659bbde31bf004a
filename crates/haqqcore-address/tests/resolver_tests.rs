//! Integration tests for the address resolver.
//!
//! Fixtures are built from fixed 20-byte bodies so every expected
//! string is deterministic. The "legacy" wallet models a pre-migration
//! import whose stored Tron address was derived under a different
//! scheme and cannot be recomputed from its hex form.

use std::sync::Arc;

use haqqcore_address::{classify, cosmos, eth, tron, AddressResolver};
use haqqcore_types::{AddressKind, CustodyKind, WalletDirectory, WalletRecord};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const BODY_MAIN: [u8; 20] = [0x11; 20];
const BODY_LEGACY: [u8; 20] = [0x22; 20];
/// The body the legacy wallet's Tron key was actually derived from.
const BODY_LEGACY_TRON: [u8; 20] = [0x33; 20];
const BODY_UNKNOWN: [u8; 20] = [0x44; 20];

struct FixtureDirectory {
    wallets: Vec<WalletRecord>,
}

impl WalletDirectory for FixtureDirectory {
    fn get_all(&self) -> Vec<WalletRecord> {
        self.wallets.clone()
    }
}

fn wallet(body: &[u8; 20], tron_address: Option<String>, account_id: &str) -> WalletRecord {
    WalletRecord {
        address: eth::encode_lower(body),
        cosmos_address: cosmos::encode(body).expect("fixed hrp"),
        tron_address,
        account_id: account_id.into(),
        hd_path: "m/44'/60'/0'/0/0".into(),
        custody: CustodyKind::Mnemonic,
        name: account_id.into(),
        is_hidden: false,
    }
}

fn resolver() -> AddressResolver {
    let directory = FixtureDirectory {
        wallets: vec![
            wallet(&BODY_MAIN, Some(tron::encode(&BODY_MAIN)), "acc-main"),
            // Legacy import: stored Tron form disagrees with computation.
            wallet(&BODY_LEGACY, Some(tron::encode(&BODY_LEGACY_TRON)), "acc-legacy"),
            // Pre-migration wallet with no Tron form at all.
            wallet(&BODY_UNKNOWN, None, "acc-no-tron"),
        ],
    };
    AddressResolver::new(Arc::new(directory))
}

// ---------------------------------------------------------------------------
// Scenario A: cross-encoding canonicalization and equality
// ---------------------------------------------------------------------------

#[test]
fn haqq_form_canonicalizes_to_known_hex() {
    let r = resolver();
    let haqq = cosmos::encode(&BODY_MAIN).expect("fixed hrp");
    assert_eq!(r.to_eth(&haqq), eth::encode_lower(&BODY_MAIN));
}

#[test]
fn mixed_case_hex_equals_haqq_form() {
    let r = resolver();
    let haqq = cosmos::encode(&BODY_MAIN).expect("fixed hrp");
    let eip55 = eth::to_eip55(&BODY_MAIN);
    assert_ne!(eip55, eip55.to_ascii_lowercase(), "vector must be mixed-case");
    assert!(r.equals(&eip55, &haqq));
}

// ---------------------------------------------------------------------------
// Round-trip and idempotence properties
// ---------------------------------------------------------------------------

#[test]
fn eth_haqq_eth_roundtrip_is_identity() {
    let r = resolver();
    for body in [BODY_MAIN, BODY_UNKNOWN, [0x77u8; 20]] {
        let canonical = eth::encode_lower(&body);
        let roundtripped = r.to_eth(&r.to_haqq(&r.to_eth(&canonical)));
        assert_eq!(roundtripped, canonical);
    }
}

#[test]
fn eth_tron_eth_roundtrip_is_identity_for_unknown_addresses() {
    let r = resolver();
    let canonical = eth::encode_lower(&[0x99u8; 20]);
    assert_eq!(r.to_eth(&r.to_tron(&canonical)), canonical);
}

#[test]
fn to_eth_is_idempotent() {
    let r = resolver();
    let upper = format!("0x{}", hex_upper(&BODY_MAIN));
    let once = r.to_eth(&upper);
    assert_eq!(once, eth::encode_lower(&BODY_MAIN));
    assert_eq!(r.to_eth(&once), once);
}

fn hex_upper(body: &[u8; 20]) -> String {
    body.iter().map(|b| format!("{b:02X}")).collect()
}

// ---------------------------------------------------------------------------
// Equality invariant
// ---------------------------------------------------------------------------

#[test]
fn equals_is_reflexive_across_encodings() {
    let r = resolver();
    let forms = [
        eth::encode_lower(&BODY_MAIN),
        cosmos::encode(&BODY_MAIN).expect("fixed hrp"),
        tron::encode(&BODY_MAIN),
    ];
    for form in &forms {
        assert!(r.equals(form, form), "equals({form}, {form}) must hold");
    }
}

#[test]
fn equals_is_symmetric_across_encodings() {
    let r = resolver();
    let hex_form = eth::encode_lower(&BODY_MAIN);
    let haqq_form = cosmos::encode(&BODY_MAIN).expect("fixed hrp");
    let tron_form = tron::encode(&BODY_MAIN);

    for (a, b) in [
        (&hex_form, &haqq_form),
        (&hex_form, &tron_form),
        (&haqq_form, &tron_form),
    ] {
        assert_eq!(r.equals(a, b), r.equals(b, a));
        assert!(r.equals(a, b), "equals({a}, {b}) must hold");
    }
}

#[test]
fn equals_rejects_different_keys() {
    let r = resolver();
    let a = eth::encode_lower(&BODY_MAIN);
    let b = eth::encode_lower(&BODY_LEGACY);
    assert!(!r.equals(&a, &b));
}

// ---------------------------------------------------------------------------
// Tron directory precedence
// ---------------------------------------------------------------------------

#[test]
fn stored_tron_address_wins_over_computation() {
    let r = resolver();
    let legacy_hex = eth::encode_lower(&BODY_LEGACY);
    // The stored form was derived pre-migration; recomputing from the
    // hex body would silently produce an address with no signing key.
    assert_eq!(r.to_tron(&legacy_hex), tron::encode(&BODY_LEGACY_TRON));
    assert_ne!(r.to_tron(&legacy_hex), tron::encode(&BODY_LEGACY));
}

#[test]
fn legacy_tron_form_equals_its_hex_form() {
    let r = resolver();
    let legacy_hex = eth::encode_lower(&BODY_LEGACY);
    let stored_tron = tron::encode(&BODY_LEGACY_TRON);
    assert!(r.equals(&legacy_hex, &stored_tron));
    assert!(r.equals(&stored_tron, &legacy_hex));
}

#[test]
fn missing_stored_tron_form_falls_back_to_computation() {
    let r = resolver();
    let hex_form = eth::encode_lower(&BODY_UNKNOWN);
    assert_eq!(r.to_tron(&hex_form), tron::encode(&BODY_UNKNOWN));
}

#[test]
fn unknown_address_computes_tron_form_purely() {
    let r = resolver();
    let hex_form = eth::encode_lower(&[0xEEu8; 20]);
    assert_eq!(r.to_tron(&hex_form), tron::encode(&[0xEEu8; 20]));
}

// ---------------------------------------------------------------------------
// Reverse lookup
// ---------------------------------------------------------------------------

#[test]
fn resolve_wallet_by_each_encoding() {
    let r = resolver();

    let by_hex = r.resolve_wallet(&eth::encode_lower(&BODY_MAIN));
    assert_eq!(by_hex.map(|w| w.account_id), Some("acc-main".to_string()));

    let by_haqq = r.resolve_wallet(&cosmos::encode(&BODY_MAIN).expect("fixed hrp"));
    assert_eq!(by_haqq.map(|w| w.account_id), Some("acc-main".to_string()));

    let by_tron = r.resolve_wallet(&tron::encode(&BODY_LEGACY_TRON));
    assert_eq!(by_tron.map(|w| w.account_id), Some("acc-legacy".to_string()));
}

#[test]
fn resolve_wallet_misses_unknown_and_invalid() {
    let r = resolver();
    assert!(r.resolve_wallet(&eth::encode_lower(&[0xEEu8; 20])).is_none());
    assert!(r.resolve_wallet("garbage").is_none());
}

// ---------------------------------------------------------------------------
// Classification chain
// ---------------------------------------------------------------------------

#[test]
fn classification_covers_all_namespaces() {
    assert_eq!(
        classify(&eth::encode_lower(&BODY_MAIN)),
        AddressKind::EthereumHex
    );
    assert_eq!(
        classify(&cosmos::encode(&BODY_MAIN).expect("fixed hrp")),
        AddressKind::CosmosBech32
    );
    assert_eq!(classify(&tron::encode(&BODY_MAIN)), AddressKind::TronBase58);
    assert_eq!(classify("junk"), AddressKind::Invalid);
}

#[test]
fn conversion_never_panics_on_hostile_input() {
    let r = resolver();
    for input in [
        "",
        "0x",
        "0x41",
        "T",
        "haqq1",
        "haqqvaloper1",
        "\u{0}\u{1}\u{2}",
        "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaedffff",
    ] {
        let _ = r.to_eth(input);
        let _ = r.to_haqq(input);
        let _ = r.to_tron(input);
        let _ = r.equals(input, input);
        let _ = r.resolve_wallet(input);
    }
}
