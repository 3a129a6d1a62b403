//! End-to-end scenarios across the workbench components

use std::cell::RefCell;
use std::rc::Rc;
use tapscript_workbench::template::DEFAULT_TEMPLATE_KEY;
use tapscript_workbench::{
    Algorithm, ErrorCode, FileStore, KeyPath, KeySource, KeyValueStore, MemoryStore, Network,
    SignatureWorkbench, TapleafVersion, TaprootResult, TaprootTweakEngine, TemplateListener,
    TransactionTemplateStore, TxInput, TxOutput, TxTemplate, WorkbenchConfig, INVALID_RESULT,
    UNKNOWN_DISCRETE_LOG_KEY,
};

// =============================================================================
// Taproot
// =============================================================================

#[test]
fn unspendable_key_with_op_true_is_stable() {
    let mut engine = TaprootTweakEngine::new(Network::Bitcoin);
    assert_eq!(engine.inner_key_display(), UNKNOWN_DISCRETE_LOG_KEY);
    assert_eq!(UNKNOWN_DISCRETE_LOG_KEY.len(), 66);

    engine.set_compiled_script("0x51");
    let first = engine.result().clone();

    for field in [first.tweak(), first.script_pubkey(), first.bech32()] {
        assert!(!field.is_empty());
        assert_ne!(field, INVALID_RESULT);
    }
    assert!(first.bech32().starts_with("bc1p"));

    for _ in 0..3 {
        engine.recompute();
        assert_eq!(engine.result(), &first);
    }
}

#[test]
fn two_char_custom_key_is_sentinel() {
    let mut engine = TaprootTweakEngine::new(Network::Bitcoin);
    engine.set_compiled_script("0x51");
    engine.select_key_path(KeyPath::Custom);
    engine.set_inner_key_input("ab");

    let result = engine.result();
    assert_eq!(result, &TaprootResult::Invalid);
    assert_eq!(result.tweak(), INVALID_RESULT);
    assert_eq!(result.script_pubkey(), INVALID_RESULT);
    assert_eq!(result.bech32(), INVALID_RESULT);
}

#[test]
fn out_of_field_key_is_sentinel() {
    let mut engine = TaprootTweakEngine::new(Network::Bitcoin);
    engine.set_compiled_script("0x51");
    engine.select_key_path(KeyPath::Custom);
    // Above the field prime, so not a valid x coordinate
    engine.set_inner_key_input(&"ff".repeat(32));
    assert!(engine.result().is_invalid());
}

#[test]
fn liquid_network_changes_domain_and_prefix() {
    let mut engine = TaprootTweakEngine::new(Network::Bitcoin);
    engine.set_compiled_script("0x51");
    let bitcoin = engine.result().clone();

    engine.set_network(Network::Liquid);
    let liquid = engine.result().clone();

    assert!(liquid.bech32().starts_with("ex1p"));
    assert_ne!(bitcoin.tweak(), liquid.tweak());
    assert_eq!(engine.tapleaf_display(), "0xc4");
}

#[test]
fn explicit_default_tapleaf_matches_default_selection() {
    let mut engine = TaprootTweakEngine::new(Network::Liquid);
    engine.set_compiled_script("0x51");
    let by_default = engine.result().clone();

    engine.select_tapleaf_version(TapleafVersion::Custom);
    engine.set_tapleaf_input("0xc4");
    assert_eq!(engine.result(), &by_default);

    engine.set_tapleaf_input("0xc0");
    assert!(!engine.result().is_invalid());
    assert_ne!(engine.result(), &by_default);

    engine.set_tapleaf_input("0xc1");
    assert!(engine.result().is_invalid());
}

// =============================================================================
// Signatures
// =============================================================================

#[test]
fn ecdsa_and_schnorr_sessions() {
    let mut bench = SignatureWorkbench::new();
    bench.generate();
    let keys = bench.key_pair().unwrap().clone();
    assert_eq!(keys.private_key().len(), 64);
    assert_eq!(keys.public_key().len(), 66);
    assert_eq!(keys.uncompressed_public_key().len(), 130);

    bench.set_message("68656c6c6f");
    bench.sign().unwrap();
    assert!(bench.signature().unwrap().der_encoded().is_some());

    bench.set_algorithm(Algorithm::Schnorr);
    assert!(bench.key_pair().is_none());
    assert!(bench.signature().is_none());

    bench.generate();
    assert_eq!(bench.key_pair().unwrap().public_key().len(), 64);
    bench.set_message("68656c6c6f");
    bench.sign().unwrap();
    let sig = bench.signature().unwrap();
    assert_eq!(sig.signature().len(), 128);
    assert_eq!(sig.der_encoded(), None);
}

#[test]
fn import_out_of_range_key_reports_error() {
    let mut bench = SignatureWorkbench::new();
    bench.set_key_source(KeySource::Import);
    bench.set_private_key_input(&"ff".repeat(32));
    assert!(bench.can_generate());

    bench.submit_keys();
    assert!(bench.key_pair().is_none());
    assert!(bench.keys_error().is_some());
    assert!(!bench.can_sign());
    assert_eq!(bench.sign().unwrap_err().code, ErrorCode::PreconditionFailed);
}

#[test]
fn imported_key_is_deterministic() {
    let mut one = [0u8; 32];
    one[31] = 1;

    let mut bench = SignatureWorkbench::new();
    bench.import_private_key(&hex::encode(one));
    assert_eq!(
        bench.key_pair().unwrap().public_key(),
        "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
    );

    bench.set_algorithm(Algorithm::Schnorr);
    bench.import_private_key(&hex::encode(one));
    assert_eq!(
        bench.key_pair().unwrap().public_key(),
        "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
    );
}

// =============================================================================
// Templates
// =============================================================================

struct SaveCounter(Rc<RefCell<Vec<TxTemplate>>>);

impl TemplateListener for SaveCounter {
    fn on_save(&mut self, template: &TxTemplate) {
        self.0.borrow_mut().push(template.clone());
    }

    fn on_clear(&mut self) {
        self.0.borrow_mut().clear();
    }
}

fn sample_input() -> TxInput {
    TxInput {
        previous_tx_id: "aa".repeat(32),
        vout: "00000000".into(),
        sequence: "ffffffff".into(),
        script_pub_key: format!("5120{}", "bb".repeat(32)),
        amount: "00e1f50500000000".into(),
        asset_id: Some("6f0279e9ed041c3d710a9f57d0c02928416460c4b722ae3457a11eec381c526d".into()),
    }
}

#[test]
fn template_round_trip_across_sessions() {
    let saved_events = Rc::new(RefCell::new(Vec::new()));
    let mut store = TransactionTemplateStore::open(MemoryStore::new())
        .with_listener(Box::new(SaveCounter(saved_events.clone())));

    store.update_input(0, sample_input(), false);
    store.add_input();
    store.update_input(1, TxInput { amount: "12".into(), ..sample_input() }, true);
    store.update_output(
        0,
        TxOutput {
            script_pub_key: "0014".to_string() + &"cc".repeat(20),
            amount: "0000000000000001".into(),
            asset_id: None,
        },
    );
    store.set_version("02000000");
    store.set_timelock("00000000");
    assert!(!store.validate().is_valid());

    store.save();
    let saved = store.template().clone();
    assert_eq!(saved_events.borrow().as_slice(), &[saved.clone()]);

    let fresh = TransactionTemplateStore::open(store.into_store());
    assert_eq!(fresh.template(), &saved);
    assert_eq!(fresh.template().current_input_index, 1);
}

#[test]
fn cleared_template_is_not_restored() {
    let mut store = TransactionTemplateStore::open(MemoryStore::new());
    store.set_version("02000000");
    store.save();
    store.clear();

    let backend = store.into_store();
    assert_eq!(backend.get(DEFAULT_TEMPLATE_KEY).unwrap(), None);
    let fresh = TransactionTemplateStore::open(backend);
    assert!(fresh.template().is_pristine());
}

#[test]
fn file_backed_template_via_config() {
    let mut dir = std::env::temp_dir();
    dir.push(format!("tapscript-workbench-it-{}", std::process::id()));

    let config = WorkbenchConfig {
        storage_dir: Some(dir.clone()),
        template_key: "scratch".into(),
        ..Default::default()
    };

    let mut store = config.open_template_store().unwrap();
    store.update_input(0, sample_input(), true);
    store.save();
    let saved = store.template().clone();
    drop(store);

    let files = FileStore::open(&dir).unwrap();
    assert!(files.get("scratch").unwrap().is_some());

    let reopened = config.open_template_store().unwrap();
    assert_eq!(reopened.template(), &saved);

    let _ = std::fs::remove_dir_all(&dir);
}
