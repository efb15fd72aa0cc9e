use crate::{error::PhsError, schemes::lyra2::phs};

#[test]
fn deterministic() {
    let mut a = [0u8; 32];
    let mut b = [0u8; 32];
    phs(&mut a, b"pwd", b"salt", 1, 3).unwrap();
    phs(&mut b, b"pwd", b"salt", 1, 3).unwrap();
    assert_eq!(a, b);
}

#[test]
fn salt_sensitive() {
    let mut a = [0u8; 32];
    let mut b = [0u8; 32];
    phs(&mut a, b"pwd", b"salt-one", 1, 3).unwrap();
    phs(&mut b, b"pwd", b"salt-two", 1, 3).unwrap();
    assert_ne!(a, b);
}

#[test]
fn length_correctness() {
    for outlen in [16, 32, 64] {
        let mut out = vec![0u8; outlen];
        phs(&mut out, b"pwd", b"salt", 1, 3).unwrap();
        assert_eq!(out.len(), outlen);
    }
}

#[test]
fn zero_input_password() {
    let mut out = [0u8; 32];
    phs(&mut out, b"", b"salt", 1, 3).unwrap();
    assert_ne!(out, [0u8; 32]);
}

#[test]
fn param_combinations_distinct_and_reproducible() {
    let combos = [(1u32, 3u32), (1, 4), (2, 3), (2, 4)];
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
            phs(&mut out, &[i], &salt, 1, 3).unwrap();
            out
        })
        .collect();
    super::assert_all_distinct(&outputs);
}

#[test]
fn below_min_m_cost_rejected() {
    let mut out = [0u8; 32];
    assert_eq!(
        phs(&mut out, b"pwd", b"salt", 1, 2).unwrap_err(),
        PhsError::InvalidMemoryCost { requested: 2, min: 3, max: 24 }
    );
}

#[test]
fn moderate_m_cost_succeeds_above_max_rejected() {
    let mut out = [0u8; 32];
    assert!(phs(&mut out, b"pwd", b"salt", 1, 6).is_ok());
    assert_eq!(
        phs(&mut out, b"pwd", b"salt", 1, 25).unwrap_err(),
        PhsError::InvalidMemoryCost { requested: 25, min: 3, max: 24 }
    );
}
