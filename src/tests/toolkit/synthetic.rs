use crate::prelude::*;

/*
 * 2D regional response, expressed in the strike frame:
 *   Z0 = [[0, Zxy], [Zyx, 0]]
 * with frequency dependent phases, which never coincide
 * (the phase tensor is never circular).
 * Diagonal components are true zeros, flagged as valid.
 */
pub fn regional_2d(frequencies: &[f64]) -> Impedance {
    let mut values = Vec::with_capacity(frequencies.len());
    let mut errors = Vec::with_capacity(frequencies.len());

    for f in frequencies {
        let x = f.log10();
        let phase_xy = (60.0 + 10.0 * x.sin()).to_radians();
        let phase_yx = (30.0 + 10.0 * x.cos()).to_radians();

        // rho_xy = 100 Ohm.m, rho_yx = 10 Ohm.m
        let amp_xy = (100.0 * f / 0.2).sqrt();
        let amp_yx = (10.0 * f / 0.2).sqrt();

        let zxy = Complex64::from_polar(amp_xy, phase_xy);
        let zyx = -Complex64::from_polar(amp_yx, phase_yx);

        values.push(Tensor::<2>::new(Complex64::new(0.0, 0.0), zxy, zyx, Complex64::new(0.0, 0.0)));
        errors.push(ErrorTensor::<2>::new(
            0.01 * amp_xy,
            0.05 * amp_xy,
            0.05 * amp_yx,
            0.01 * amp_yx,
        ));
    }

    let mask = vec![Mask::<2>::from_element(true); frequencies.len()];
    Impedance::with_mask(values, errors, mask, frequencies.to_vec()).unwrap()
}

/// Smoothly varying tipper, 0.02 uncertainty
pub fn synthetic_tipper(frequencies: &[f64]) -> Tipper {
    let values = frequencies
        .iter()
        .map(|f| {
            let x = f.log10();
            let tx = Complex64::new(0.2 + 0.05 * x.sin(), 0.1 * x.cos());
            let ty = Complex64::new(-0.1 + 0.02 * x, 0.05 + 0.01 * x.sin());
            Tensor::<1>::new(tx, ty)
        })
        .collect::<Vec<_>>();
    let errors = vec![ErrorTensor::<1>::from_element(0.02); frequencies.len()];
    Tipper::new(values, errors, frequencies.to_vec()).unwrap()
}
