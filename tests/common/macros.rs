/// Asserts that every live particle lies in the half-open unit square.
#[macro_export]
macro_rules! assert_in_unit_torus {
    ($engine:expr) => {
        for i in 0..$engine.particle_count() {
            let p = $engine.position(i);
            assert!(
                (0.0..1.0).contains(&p.x) && (0.0..1.0).contains(&p.y),
                "particle {} at ({}, {}) escaped [0, 1)",
                i,
                p.x,
                p.y
            );
        }
    };
}

/// Asserts that every live particle lies in the closed unit square.
#[macro_export]
macro_rules! assert_in_closed_box {
    ($engine:expr) => {
        for i in 0..$engine.particle_count() {
            let p = $engine.position(i);
            assert!(
                (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y),
                "particle {} at ({}, {}) escaped [0, 1]",
                i,
                p.x,
                p.y
            );
        }
    };
}

/// Asserts the live particle count.
#[macro_export]
macro_rules! assert_population {
    ($engine:expr, $count:expr) => {
        assert_eq!(
            $engine.particle_count(),
            $count,
            "Population count mismatch"
        );
    };
}
