#[cfg(test)]
mod test {
    use crate::prelude::*;
    use crate::tests::toolkit::{
        assert_matrix_close, assert_values_close, left_multiply, log_frequencies, regional_2d,
    };
    use crate::{c64, tensor2};

    /// Twist & shear like distortion, unit norm columns, positive diagonal
    fn distortion_matrix() -> Matrix2<f64> {
        let (a, b) = (20.0_f64.to_radians(), 30.0_f64.to_radians());
        Matrix2::new(a.cos(), b.sin(), a.sin(), b.cos())
    }

    #[test]
    fn round_trip() {
        let freqs = log_frequencies(-3.0, 3.0, 20);
        let z0 = regional_2d(&freqs);
        let d = distortion_matrix();
        let z = left_multiply(&z0, &d);

        let (distortion, corrected) = remove_distortion(&z, None).unwrap();

        assert!(distortion.strike().abs() < 1E-6, "strike: {}", distortion.strike());
        assert_eq!(distortion.samples(), 20);
        assert_matrix_close(distortion.matrix(), &d, 1E-9);
        assert!(distortion.error().max() < 1E-6, "D error: {}", distortion.error());
        assert!(distortion.condition_number() > 1.0);

        assert_values_close(&corrected, &z0, 1E-9);
        assert_eq!(corrected.rotation_angle(), z.rotation_angle());
    }

    #[test]
    fn undistorted() {
        let freqs = log_frequencies(-2.0, 2.0, 10);
        let z0 = regional_2d(&freqs);

        let (distortion, corrected) = remove_distortion(&z0, None).unwrap();
        assert_matrix_close(distortion.matrix(), &Matrix2::identity(), 1E-9);
        assert_values_close(&corrected, &z0, 1E-9);

        // 1st order propagation of measurement errors through I
        for index in 0..z0.len() {
            let (_, err) = corrected.entry(index, 0, 1).unwrap();
            let (_, err_ref) = z0.entry(index, 0, 1).unwrap();
            assert!((err - err_ref).abs() < 1E-6 * err_ref);
        }
    }

    #[test]
    fn regional_strike() {
        // regional structure striking 25° away from the measurement frame
        let freqs = log_frequencies(-2.0, 3.0, 12);
        let z = regional_2d(&freqs).rotate(-25.0);

        let distortion = Distortion::estimate(&z, None).unwrap();
        assert!(
            (distortion.strike() - 25.0).abs() < 1E-6,
            "strike: {}",
            distortion.strike()
        );
        assert_matrix_close(distortion.matrix(), &Matrix2::identity(), 1E-9);

        let corrected = distortion.remove(&z).unwrap();
        assert_values_close(&corrected, &z, 1E-9);
    }

    #[test]
    fn highest_frequencies() {
        let freqs = log_frequencies(-3.0, 3.0, 16);
        let z = left_multiply(&regional_2d(&freqs), &distortion_matrix());

        let distortion = Distortion::estimate(&z, Some(6)).unwrap();
        assert_eq!(distortion.samples(), 6);
        assert_matrix_close(distortion.matrix(), &distortion_matrix(), 1E-9);

        let distortion = Distortion::estimate(&z, Some(4)).unwrap();
        assert_eq!(distortion.samples(), 4);
    }

    #[test]
    fn invalid_num_freq() {
        let freqs = log_frequencies(-3.0, 3.0, 8);
        let z = regional_2d(&freqs);

        for num_freq in [0, 3, 9, 100] {
            let result = remove_distortion(&z, Some(num_freq));
            assert!(
                matches!(result, Err(Error::InvalidParameter(_))),
                "num_freq={} should be rejected",
                num_freq
            );
        }

        let z = regional_2d(&freqs[..3]);
        assert!(matches!(
            remove_distortion(&z, None),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn incomplete_tensors() {
        // zxx is missing everywhere (zero sentinel)
        let freqs = log_frequencies(-3.0, 3.0, 8);
        let values = freqs
            .iter()
            .map(|f| tensor2!(c64!(0.0, 0.0), c64!(*f, *f), c64!(-*f, -*f), c64!(0.1, 0.1)))
            .collect::<Vec<_>>();
        let z = Impedance::new(values, vec![ErrorTensor::<2>::from_element(0.1); 8], freqs).unwrap();
        assert!(matches!(
            remove_distortion(&z, None),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn singular() {
        // both columns share the same direction
        let d = Matrix2::new(0.6, 0.6, 0.8, 0.8);
        let freqs = log_frequencies(-3.0, 3.0, 10);
        let z = left_multiply(&regional_2d(&freqs), &d);

        match remove_distortion(&z, None) {
            Err(Error::SingularDistortion(condition)) => {
                assert!(condition > 1E6, "condition number: {}", condition);
            },
            other => panic!("expecting singular distortion, got {:?}", other),
        }

        assert!(matches!(
            Distortion::from_matrix(d),
            Err(Error::SingularDistortion(_))
        ));
    }

    #[test]
    fn known_matrix() {
        let freqs = log_frequencies(-1.0, 1.0, 5);
        let z0 = regional_2d(&freqs);
        let d = Matrix2::new(1.5, 0.2, -0.3, 0.8);
        let z = left_multiply(&z0, &d);

        let distortion = Distortion::from_matrix(d).unwrap();
        assert_eq!(distortion.error(), &Matrix2::zeros());
        let corrected = distortion.remove(&z).unwrap();
        assert_values_close(&corrected, &z0, 1E-9);
    }

    #[test]
    fn station_untouched() {
        let freqs = log_frequencies(-3.0, 3.0, 10);
        let z = left_multiply(&regional_2d(&freqs), &distortion_matrix());
        let station = Station::new("MT01").with_impedance(z.clone());

        let (_, corrected) = station.remove_distortion(Some(5)).unwrap();
        assert_eq!(station.impedance(), &z);
        assert_ne!(&corrected, station.impedance());
    }
}
