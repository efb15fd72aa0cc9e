use crate::{error::PhsError, schemes::twocats::phs};

#[test]
fn deterministic() {
    let mut a = [0u8; 32];
    let mut b = [0u8; 32];
    phs(&mut a, b"pwd", b"salt", 0, 0).unwrap();
    phs(&mut b, b"pwd", b"salt", 0, 0).unwrap();
    assert_eq!(a, b);
}

#[test]
fn salt_sensitive() {
    let mut a = [0u8; 32];
    let mut b = [0u8; 32];
    phs(&mut a, b"pwd", b"salt-one", 0, 0).unwrap();
    phs(&mut b, b"pwd", b"salt-two", 0, 0).unwrap();
    assert_ne!(a, b);
}

#[test]
fn length_correctness() {
    for outlen in [16, 32, 64] {
        let mut out = vec![0u8; outlen];
        phs(&mut out, b"pwd", b"salt", 0, 0).unwrap();
        assert_eq!(out.len(), outlen);
    }
}

#[test]
fn zero_input_password() {
    let mut out = [0u8; 32];
    phs(&mut out, b"", b"salt", 0, 0).unwrap();
    assert_ne!(out, [0u8; 32]);
}

#[test]
fn param_combinations_distinct_and_reproducible() {
    let combos = [(0u32, 0u32), (0, 1), (1, 0), (1, 1)];
    let mut outputs = Vec::new();
    for (t, m) in combos {
        let mut out = vec![0u8; 32];
        phs(&mut out, b"x", b"s", t, m).unwrap();
        let mut again = vec![0u8; 32];
        phs(&mut again, b"x", b"s", t, m).unwrap();
        assert_eq!(out, again, "not reproducible for t={t} m={m}");
        outputs.push(out);
    }
    super::assert_all_distinct(&outputs);
}

#[test]
fn many_passwords_distinct() {
    let salt = [0u8; 16];
    let outputs: Vec<Vec<u8>> = (0u8..=255)
        .map(|i| {
            let mut out = vec![0u8; 64];
            phs(&mut out, &[i], &salt, 0, 0).unwrap();
            out
        })
        .collect();
    super::assert_all_distinct(&outputs);
}

#[test]
fn moderate_m_cost_succeeds_above_max_rejected() {
    let mut out = [0u8; 32];
    assert!(phs(&mut out, b"pwd", b"salt", 0, 4).is_ok());
    assert_eq!(
        phs(&mut out, b"pwd", b"salt", 0, 25).unwrap_err(),
        PhsError::InvalidMemoryCost { requested: 25, min: 0, max: 24 }
    );
}
