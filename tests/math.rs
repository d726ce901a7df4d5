use numk::{
    angle, c64, convolve, is_close_array, is_close_complex, nkabs, nklog, nklog_base, nkpow,
    ConvolveMode, NdArray, NumkError, Tolerance, Value, ValueKind,
};
use approx::assert_relative_eq;

fn sample(kind: ValueKind) -> Value {
    match kind {
        ValueKind::Real => Value::Real(2.0),
        ValueKind::Complex => Value::Complex(c64(1.0, 1.0)),
        ValueKind::Array => Value::Array(NdArray::of(&[1.0, 2.0])),
    }
}

const KINDS: [ValueKind; 3] = [ValueKind::Real, ValueKind::Complex, ValueKind::Array];

// ----------------------------------------------------------------------
// Dispatch totality: every registered combination resolves, every other
// combination errors with the unmatched-dispatch report.
// ----------------------------------------------------------------------

#[test]
fn test_unary_families_are_total() {
    for kind in KINDS {
        assert!(angle(sample(kind)).is_ok(), "angle({kind})");
        assert!(nkabs(sample(kind)).is_ok(), "nkabs({kind})");
        assert!(nklog(sample(kind)).is_ok(), "nklog({kind})");
    }
}

#[test]
fn test_nklog_base_registration_set() {
    use ValueKind::{Array, Complex, Real};
    let registered = [(Real, Complex), (Real, Real), (Complex, Real), (Array, Real)];
    for x in KINDS {
        for base in KINDS {
            let result = nklog_base(sample(x), sample(base));
            if registered.contains(&(x, base)) {
                assert!(result.is_ok(), "nklog_base({x}, {base})");
            } else {
                match result {
                    Err(NumkError::UnmatchedDispatch { function, kinds }) => {
                        assert_eq!(function, "nklog_base");
                        assert_eq!(kinds, vec![x, base]);
                    }
                    other => panic!("nklog_base({x}, {base}) resolved: {other:?}"),
                }
            }
        }
    }
}

#[test]
fn test_nkpow_registration_set() {
    use ValueKind::{Array, Complex, Real};
    let registered = [
        (Real, Complex),
        (Real, Real),
        (Complex, Complex),
        (Complex, Real),
        (Array, Real),
        (Array, Complex),
    ];
    for x in KINDS {
        for y in KINDS {
            let result = nkpow(sample(x), sample(y));
            if registered.contains(&(x, y)) {
                assert!(result.is_ok(), "nkpow({x}, {y})");
            } else {
                assert!(
                    matches!(result, Err(NumkError::UnmatchedDispatch { .. })),
                    "nkpow({x}, {y}) should be unmatched"
                );
            }
        }
    }
}

// ----------------------------------------------------------------------
// Reference fixtures
// ----------------------------------------------------------------------

#[test]
fn test_log_fixture() {
    let z = nklog(c64(1.0, 1.0)).unwrap().to_complex().unwrap();
    assert!(is_close_complex(
        z,
        c64(0.34657359027997264, 0.7853981633974483),
        Tolerance::default()
    ));
}

#[test]
fn test_pow_fixture() {
    let z = nkpow(c64(1.0, 1.0), c64(1.2, 3.2))
        .unwrap()
        .to_complex()
        .unwrap();
    assert!(is_close_complex(
        z,
        c64(-0.056773912376423395, 0.10886187325245357),
        Tolerance::default()
    ));
}

#[test]
fn test_log_and_pow_agree() {
    // exp-of-log through nkpow: E^(nklog z) == z.
    let z = c64(2.0, -1.5);
    let lz = nklog(z).unwrap().to_complex().unwrap();
    let back = nkpow(std::f64::consts::E, lz)
        .unwrap()
        .to_complex()
        .unwrap();
    assert!(is_close_complex(back, z, Tolerance::default()));
}

#[test]
fn test_convolve_fixture() {
    let a = NdArray::of(&[1.0, 2.0, 3.0]);
    let v = NdArray::of(&[0.0, 1.0, 0.5]);
    assert_eq!(
        convolve(&a, &v, "full".parse().unwrap()).unwrap(),
        NdArray::of(&[0.0, 1.0, 2.5, 4.0, 1.5])
    );
    assert_eq!(
        convolve(&a, &v, "same".parse().unwrap()).unwrap(),
        NdArray::of(&[1.0, 2.5, 4.0])
    );
    assert_eq!(
        convolve(&a, &v, "valid".parse().unwrap()).unwrap(),
        NdArray::of(&[2.5])
    );
    assert!(matches!(
        "reflect".parse::<ConvolveMode>(),
        Err(NumkError::UnknownConvolveMode(_))
    ));
}

#[test]
fn test_complex_convolution() {
    // (1+1j) * (1-1j) = 2 at the single valid overlap.
    let a = NdArray::of(&[c64(1.0, 1.0)]);
    let v = NdArray::of(&[c64(1.0, -1.0)]);
    let out = convolve(&a, &v, ConvolveMode::Full).unwrap();
    assert_eq!(out, NdArray::of(&[c64(2.0, 0.0)]));
}

// ----------------------------------------------------------------------
// Elementwise dispatch over arrays
// ----------------------------------------------------------------------

#[test]
fn test_array_log_matches_scalar_log() {
    let values = [c64(1.0, 0.0), c64(1.0, 1.0), c64(0.5, -2.0)];
    let a = NdArray::of(&values);
    let logs = nklog(a).unwrap().into_array().unwrap();
    for (i, &z) in values.iter().enumerate() {
        let scalar = nklog(z).unwrap().to_complex().unwrap();
        assert_eq!(logs.get(&[i]).unwrap(), scalar);
    }
}

#[test]
fn test_array_angle_and_abs() {
    let a = NdArray::of(&[c64(0.0, 2.0), c64(-1.0, 0.0)]);
    let angles = angle(a.clone()).unwrap().into_array().unwrap();
    assert_relative_eq!(
        angles.get(&[0]).unwrap().re,
        std::f64::consts::FRAC_PI_2,
        epsilon = 1e-12
    );
    assert_relative_eq!(
        angles.get(&[1]).unwrap().re,
        std::f64::consts::PI,
        epsilon = 1e-12
    );
    let mags = nkabs(a).unwrap().into_array().unwrap();
    assert_eq!(mags, NdArray::of(&[2.0, 1.0]));
}

#[test]
fn test_is_close_array_complex_components() {
    let a = NdArray::of(&[c64(1.0, 1.0), c64(1.0, 1.0)]);
    let b = NdArray::of(&[c64(1.0, 1.0 + 1e-9), c64(1.0, 1.5)]);
    let mask = is_close_array(&a, &b, Tolerance::default()).unwrap();
    assert_eq!(mask, NdArray::of(&[1.0, 0.0]));
}

#[test]
fn test_angle_real_convention_is_log_consistent() {
    // nklog of a negative real gets phase pi, matching angle(-x).
    let z = nklog(c64(-1.0, 0.0)).unwrap().to_complex().unwrap();
    let a = angle(-1.0).unwrap().as_real().unwrap();
    assert_relative_eq!(z.im, a, epsilon = 1e-12);
}
