use super::*;

#[test]
fn stems_use_amplitude_modulus() {
    let s = Spectrum::new(
        vec![Complex64::new(0.9, 0.3), Complex64::new(0.9, -0.3)],
        vec![Complex64::new(3.0, 4.0), Complex64::new(0.0, -2.0)],
    )
    .unwrap();
    let stems: Vec<Stem> = s.stems().collect();
    assert_eq!(stems.len(), 2);
    assert_eq!(stems[0], Stem { re: 0.9, im: 0.3, height: 5.0 });
    assert_eq!(stems[1].height, 2.0);
}

#[test]
fn unequal_counts_are_dimension_mismatch() {
    let err = Spectrum::new(vec![Complex64::new(1.0, 0.0)], vec![]).unwrap_err();
    assert!(matches!(err, ModevizError::DimensionMismatch(_)));
}

#[test]
fn empty_spectrum_is_empty_series() {
    let err = Spectrum::new(vec![], vec![]).unwrap_err();
    assert!(matches!(err, ModevizError::EmptySeries(_)));
}

#[test]
fn load_spectrum_reads_both_tables() {
    let dir = tempfile::tempdir().unwrap();
    let eig = dir.path().join("eig.csv");
    let amp = dir.path().join("amp.csv");
    std::fs::write(&eig, "1,0\n0,1\n").unwrap();
    std::fs::write(&amp, "0.5,0\n0,0.25\n").unwrap();
    let s = load_spectrum(&eig, &amp).unwrap();
    assert_eq!(s.len(), 2);
    assert_eq!(s.amplitudes[1], Complex64::new(0.0, 0.25));

    std::fs::write(&amp, "0.5,0\n").unwrap();
    assert!(matches!(
        load_spectrum(&eig, &amp),
        Err(ModevizError::DimensionMismatch(_))
    ));
}
