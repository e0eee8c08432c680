//! End-to-end tests of the predicate surface against the default provider.

use ed25519_dalek::{Signer, SigningKey};
use p256::ecdsa::signature::hazmat::PrehashSigner;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use termcrypt_crypto::sha256;
use termcrypt_logic::{
    bytes_to_hex_atom, bytes_to_list, solve, Cont, Context, CryptoPredicates, EngineError,
    ErrorKind, LogicError, Promise, Stage, TermCodec, DEFAULT_MAX_BYTES,
};
use termcrypt_types::{Env, Term, ValidType, Variable};

fn run(goal: impl FnOnce(Cont, &Env) -> Promise) -> Result<Option<Env>, EngineError> {
    solve(goal, &Env::new(), &Context::new())
}

fn expect_logic_error(result: Result<Option<Env>, EngineError>) -> LogicError {
    match result {
        Err(EngineError::Logic(err)) => err,
        Err(other) => panic!("unexpected engine error: {}", other),
        Ok(solution) => panic!("expected an error, got solution: {}", solution.is_some()),
    }
}

fn options(entries: &[(&str, &str)]) -> Term {
    Term::list(
        entries
            .iter()
            .map(|(key, value)| Term::compound(key, [Term::atom(value)])),
    )
}

/// Continuation that counts how often it is invoked.
fn counting_cont(counter: &Arc<AtomicUsize>) -> Cont {
    let counter = counter.clone();
    Box::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Promise::Bool(true)
    })
}

struct Ed25519Fixture {
    key: Vec<u8>,
    message: Vec<u8>,
    signature: Vec<u8>,
}

fn ed25519_fixture() -> Ed25519Fixture {
    let signing_key = SigningKey::from_bytes(&[0x5a; 32]);
    let message = b"9b038f8ef6918cbb56040dfda401b56b".to_vec();
    let signature = signing_key.sign(&message).to_bytes().to_vec();
    Ed25519Fixture {
        key: signing_key.verifying_key().to_bytes().to_vec(),
        message,
        signature,
    }
}

#[test_log::test]
fn hex_bytes_decodes_hex_atom() {
    let preds = CryptoPredicates::default();
    let bytes = Variable::fresh();
    let env = run(|cont, env| {
        preds.hex_bytes(&Term::atom("48656c6c6f"), &Term::Variable(bytes), cont, env)
    })
    .unwrap()
    .unwrap();

    assert_eq!(
        env.simplify(&Term::Variable(bytes)),
        Term::list([72, 101, 108, 108, 111].map(Term::integer))
    );
}

#[test_log::test]
fn hex_bytes_encodes_byte_list() {
    let preds = CryptoPredicates::default();
    let hex = Variable::fresh();
    let bytes = Term::list([72, 101, 108, 108, 111].map(Term::integer));
    let env = run(|cont, env| preds.hex_bytes(&Term::Variable(hex), &bytes, cont, env))
        .unwrap()
        .unwrap();

    assert_eq!(env.resolve(&Term::Variable(hex)), Term::atom("48656c6c6f"));
}

#[test_log::test]
fn hex_bytes_invalid_digits_leave_bytes_unbound() {
    let preds = CryptoPredicates::default();
    let calls = Arc::new(AtomicUsize::new(0));
    let bytes = Term::var();

    let promise = preds.hex_bytes(&Term::atom("xyz"), &bytes, counting_cont(&calls), &Env::new());
    let err = match promise.force(&Context::new()) {
        Err(EngineError::Logic(err)) => err,
        other => panic!("expected a syntax error, got {:?}", other),
    };

    assert_eq!(err.predicate, "hex_bytes/2");
    assert_eq!(err.stage, Stage::Hex);
    assert!(err.kind.is_syntax());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let err = expect_logic_error(run(|cont, env| preds.hex_bytes(&Term::atom("zz"), &bytes, cont, env)));
    assert!(err.kind.is_syntax());
}

#[test_log::test]
fn hex_bytes_rejects_out_of_range_list() {
    let preds = CryptoPredicates::default();
    let bytes = Term::list([Term::integer(1), Term::integer(256)]);
    let err = expect_logic_error(run(|cont, env| preds.hex_bytes(&Term::var(), &bytes, cont, env)));

    assert_eq!(err.stage, Stage::Bytes);
    assert_eq!(
        err.kind,
        ErrorKind::Type {
            expected: ValidType::Byte,
            culprit: Term::integer(256),
        }
    );
}

#[test_log::test]
fn sha_hash_is_deterministic() {
    let preds = CryptoPredicates::default();
    let expected = bytes_to_list(&sha256(b"Hello OKP4"));

    for _ in 0..2 {
        let hash = Variable::fresh();
        let env = run(|cont, env| {
            preds.sha_hash(&Term::atom("Hello OKP4"), &Term::Variable(hash), cont, env)
        })
        .unwrap()
        .unwrap();
        assert_eq!(env.simplify(&Term::Variable(hash)), expected);
    }
}

#[test_log::test]
fn sha_hash_treats_atom_as_text() {
    let preds = CryptoPredicates::default();
    let hash = Variable::fresh();
    let env = run(|cont, env| preds.sha_hash(&Term::atom("00ff"), &Term::Variable(hash), cont, env))
        .unwrap()
        .unwrap();
    assert_eq!(env.simplify(&Term::Variable(hash)), bytes_to_list(&sha256(b"00ff")));
}

#[test_log::test]
fn eddsa_verify_succeeds_once() {
    let preds = CryptoPredicates::default();
    let fx = ed25519_fixture();
    let calls = Arc::new(AtomicUsize::new(0));

    let promise = preds.eddsa_verify(
        &bytes_to_list(&fx.key),
        &bytes_to_hex_atom(&fx.message),
        &bytes_to_list(&fx.signature),
        &Term::nil(),
        counting_cont(&calls),
        &Env::new(),
    );
    assert_eq!(promise.force(&Context::new()), Ok(true));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test_log::test]
fn eddsa_verify_with_octet_data() {
    let preds = CryptoPredicates::default();
    let fx = ed25519_fixture();
    let opts = options(&[("encoding", "octet"), ("type", "ed25519")]);

    let env = Env::new();
    let solution = run(|cont, env| {
        preds.eddsa_verify(
            &bytes_to_list(&fx.key),
            &bytes_to_list(&fx.message),
            &bytes_to_list(&fx.signature),
            &opts,
            cont,
            env,
        )
    })
    .unwrap()
    .unwrap();
    // No bindings are introduced by verification
    assert_eq!(solution.len(), env.len());
}

#[test_log::test]
fn eddsa_verify_flipped_bit_is_logic_failure() {
    let preds = CryptoPredicates::default();
    let fx = ed25519_fixture();

    for bit in 0..fx.signature.len() * 8 {
        let mut tampered = fx.signature.clone();
        tampered[bit / 8] ^= 1 << (bit % 8);

        let result = run(|cont, env| {
            preds.eddsa_verify(
                &bytes_to_list(&fx.key),
                &bytes_to_hex_atom(&fx.message),
                &bytes_to_list(&tampered),
                &Term::nil(),
                cont,
                env,
            )
        });
        assert_eq!(result.map(|s| s.is_some()), Ok(false), "bit {}", bit);
    }
}

#[test_log::test]
fn eddsa_verify_rejects_ecdsa_type() {
    let preds = CryptoPredicates::default();
    let fx = ed25519_fixture();
    let err = expect_logic_error(run(|cont, env| {
        preds.eddsa_verify(
            &bytes_to_list(&fx.key),
            &bytes_to_hex_atom(&fx.message),
            &bytes_to_list(&fx.signature),
            &options(&[("type", "secp256k1")]),
            cont,
            env,
        )
    }));
    assert_eq!(
        err.to_string(),
        "eddsa_verify/4: failed to resolve options: domain error: invalid type secp256k1. \
         Possible values: ed25519"
    );
}

#[test_log::test]
fn eddsa_verify_reports_decoding_stage() {
    let preds = CryptoPredicates::default();
    let fx = ed25519_fixture();
    let err = expect_logic_error(run(|cont, env| {
        preds.eddsa_verify(
            &bytes_to_hex_atom(&fx.key),
            &bytes_to_hex_atom(&fx.message),
            &bytes_to_list(&fx.signature),
            &Term::nil(),
            cont,
            env,
        )
    }));
    assert_eq!(err.stage, Stage::PublicKey);
    assert!(err.to_string().starts_with("eddsa_verify/4: failed to decode public key:"));
}

#[test_log::test]
fn ecdsa_verify_secp256r1_default() {
    let preds = CryptoPredicates::default();
    let digest = sha256(b"ecdsa message");
    let signing_key = p256::ecdsa::SigningKey::from_slice(&[3u8; 32]).unwrap();
    let signature: p256::ecdsa::Signature = signing_key.sign_prehash(&digest).unwrap();
    let key = signing_key.verifying_key().to_encoded_point(true);

    let result = run(|cont, env| {
        preds.ecdsa_verify(
            &bytes_to_list(key.as_bytes()),
            &bytes_to_hex_atom(&digest),
            &bytes_to_list(signature.to_der().as_bytes()),
            &Term::nil(),
            cont,
            env,
        )
    });
    assert_eq!(result.map(|s| s.is_some()), Ok(true));
}

#[test_log::test]
fn ecdsa_verify_secp256k1() {
    let preds = CryptoPredicates::default();
    let digest = sha256(b"ecdsa message");
    let signing_key = k256::ecdsa::SigningKey::from_slice(&[4u8; 32]).unwrap();
    let signature: k256::ecdsa::Signature = signing_key.sign_prehash(&digest).unwrap();
    let key = signing_key.verifying_key().to_encoded_point(true);
    let opts = options(&[("encoding", "octet"), ("type", "secp256k1")]);

    let verify = |digest: &[u8]| {
        run(|cont, env| {
            preds.ecdsa_verify(
                &bytes_to_list(key.as_bytes()),
                &bytes_to_list(digest),
                &bytes_to_list(signature.to_der().as_bytes()),
                &opts,
                cont,
                env,
            )
        })
        .map(|s| s.is_some())
    };

    assert_eq!(verify(&digest), Ok(true));
    assert_eq!(verify(&sha256(b"another message")), Ok(false));
}

#[test_log::test]
fn ecdsa_verify_unsupported_type() {
    let preds = CryptoPredicates::default();
    let err = expect_logic_error(run(|cont, env| {
        preds.ecdsa_verify(
            &bytes_to_list(&[2u8; 33]),
            &Term::atom("00"),
            &bytes_to_list(&[0x30]),
            &options(&[("type", "secp384r1")]),
            cont,
            env,
        )
    }));

    assert_eq!(err.predicate, "ecdsa_verify/4");
    match err.kind {
        ErrorKind::Domain { permitted, culprit, .. } => {
            assert_eq!(permitted, vec!["secp256r1", "secp256k1"]);
            assert_eq!(culprit, Term::atom("secp384r1"));
        }
        other => panic!("expected a domain error, got {}", other),
    }
}

#[test_log::test]
fn list_to_bytes_edge_cases() {
    let codec = TermCodec::default();
    let env = Env::new();

    for bad in [256, -1] {
        let err = codec
            .list_to_bytes(&Term::list([Term::integer(bad)]), &env)
            .unwrap_err();
        assert!(err.is_type());
    }

    let open = Term::partial_list([Term::integer(1)], Term::var());
    assert!(codec.list_to_bytes(&open, &env).unwrap_err().is_instantiation());
}

#[test_log::test]
fn dispatch_by_name() {
    let preds = CryptoPredicates::default();
    let hex = Variable::fresh();
    let args = [Term::Variable(hex), bytes_to_list(&[0xde, 0xad])];

    let env = run(|cont, env| preds.call("hex_bytes", &args, cont, env).unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(env.resolve(&Term::Variable(hex)), Term::atom("dead"));
}

#[test_log::test]
fn cancelled_context_runs_nothing() {
    let preds = CryptoPredicates::default();
    let calls = Arc::new(AtomicUsize::new(0));
    let ctx = Context::new();
    ctx.cancel();

    let promise = preds.sha_hash(&Term::atom("data"), &Term::var(), counting_cont(&calls), &Env::new());
    assert_eq!(promise.force(&ctx), Err(EngineError::Cancelled));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test_log::test]
fn codec_limit_from_config() {
    let config = termcrypt_logic::LogicConfig::from_toml_str("max_bytes = 4").unwrap();
    let preds = CryptoPredicates::new(Arc::new(termcrypt_crypto::DefaultProvider), &config);

    let err = expect_logic_error(run(|cont, env| {
        preds.hex_bytes(&Term::atom("0011223344"), &Term::var(), cont, env)
    }));
    assert!(matches!(err.kind, ErrorKind::Resource { limit: 4, .. }));
}

fn large_payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

#[test_log::test]
fn hex_bytes_at_default_limit() {
    let preds = CryptoPredicates::default();
    let payload = large_payload(DEFAULT_MAX_BYTES);
    let hex = bytes_to_hex_atom(&payload);
    let bytes = Variable::fresh();

    let env = run(|cont, env| preds.hex_bytes(&hex, &Term::Variable(bytes), cont, env))
        .unwrap()
        .unwrap();
    let decoded = TermCodec::default()
        .list_to_bytes(&env.resolve(&Term::Variable(bytes)), &env)
        .unwrap();
    assert_eq!(decoded, payload);

    let full = env.simplify(&Term::Variable(bytes));
    assert_eq!(full, bytes_to_list(&payload));
    drop(full);
    drop(env);
}

#[test_log::test]
fn hex_bytes_encodes_list_at_default_limit() {
    let preds = CryptoPredicates::default();
    let payload = large_payload(DEFAULT_MAX_BYTES);
    let list = bytes_to_list(&payload);
    let hex = Variable::fresh();

    let env = run(|cont, env| preds.hex_bytes(&Term::Variable(hex), &list, cont, env))
        .unwrap()
        .unwrap();
    assert_eq!(env.resolve(&Term::Variable(hex)), bytes_to_hex_atom(&payload));
}

#[test_log::test]
fn hex_bytes_just_over_default_limit() {
    let preds = CryptoPredicates::default();
    let payload = large_payload(DEFAULT_MAX_BYTES + 1);

    let err = expect_logic_error(run(|cont, env| {
        preds.hex_bytes(&bytes_to_hex_atom(&payload), &Term::var(), cont, env)
    }));
    assert_eq!(err.stage, Stage::Hex);
    assert!(matches!(err.kind, ErrorKind::Resource { .. }));

    let err = expect_logic_error(run(|cont, env| {
        preds.hex_bytes(&Term::var(), &bytes_to_list(&payload), cont, env)
    }));
    assert_eq!(err.stage, Stage::Bytes);
    assert!(matches!(err.kind, ErrorKind::Resource { .. }));
}

#[test_log::test]
fn eddsa_verify_large_octet_message() {
    let preds = CryptoPredicates::default();
    let signing_key = SigningKey::from_bytes(&[0x21; 32]);
    let message = large_payload(DEFAULT_MAX_BYTES - 1);
    let signature = signing_key.sign(&message).to_bytes();

    let result = run(|cont, env| {
        preds.eddsa_verify(
            &bytes_to_list(&signing_key.verifying_key().to_bytes()),
            &bytes_to_list(&message),
            &bytes_to_list(&signature),
            &options(&[("encoding", "octet")]),
            cont,
            env,
        )
    });
    assert_eq!(result.map(|s| s.is_some()), Ok(true));
}

#[test_log::test]
fn unbound_tail_error_names_the_tail() {
    let codec = TermCodec::default();
    let tail = Term::var();
    let elements = large_payload(10_000).into_iter().map(|b| Term::integer(i64::from(b)));
    let open = Term::partial_list(elements, tail.clone());

    let err = codec.list_to_bytes(&open, &Env::new()).unwrap_err();
    assert_eq!(err, ErrorKind::Instantiation(tail));
}
