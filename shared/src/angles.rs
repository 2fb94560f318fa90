//! Rotations are stored in radians. Degrees only exist at the console boundary.

pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees.to_radians()
}

pub fn rad_to_deg(radians: f64) -> f64 {
    radians.to_degrees()
}

pub fn rotation_to_degrees(rotation: [f64; 3]) -> [f64; 3] {
    [
        rad_to_deg(rotation[0]),
        rad_to_deg(rotation[1]),
        rad_to_deg(rotation[2]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degrees_survive_round_trip() {
        let mut degrees = -180.0;
        while degrees <= 180.0 {
            let back = rad_to_deg(deg_to_rad(degrees));
            assert!((back - degrees).abs() < 1e-6, "{} came back as {}", degrees, back);
            degrees += 0.5;
        }
    }

    #[test]
    fn quarter_turn() {
        assert!((deg_to_rad(90.0) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        let converted = rotation_to_degrees([0.0, std::f64::consts::PI, -std::f64::consts::FRAC_PI_2]);
        assert!((converted[1] - 180.0).abs() < 1e-9);
        assert!((converted[2] + 90.0).abs() < 1e-9);
    }
}
