use crate::{
    body::BodyState,
    config::{Parameters, SystemConfig},
    driver::Outcome,
    error::{allocate, Error},
    force::Gravity,
    trace::Trace,
    vector::Vector,
};

/// Integrates `config` on the calling thread, recording every step into `trace`.
///
/// Produces the same trajectory as [`BruteForce`](super::parallel::BruteForce), bit for bit, for
/// any number of workers.
pub fn run<T: Trace>(
    config: &SystemConfig,
    parameters: &Parameters,
    mut trace: T,
) -> Result<Outcome<T>, Error> {
    let gravity = Gravity::new(config.gravity, parameters.softening);
    let len = config.bodies.len();

    let mut bodies = allocate("bodies", len, |i| BodyState {
        position: config.bodies[i].position,
        velocity: config.bodies[i].velocity,
        acceleration: Vector::ZERO,
    })?;

    log::info!(
        "integrating {len} bodies over {} steps on the calling thread",
        config.time_steps
    );
    trace.header(len);

    for step in 0..config.time_steps {
        trace.cycle(step + 1);

        for i in 0..len {
            let position = bodies[i].position;
            bodies[i].acceleration = (0..len)
                .filter(|&j| j != i)
                .fold(Vector::ZERO, |acceleration, j| {
                    let mass = config.bodies[j].mass;
                    acceleration + gravity.acceleration(position, bodies[j].position, mass)
                });
        }

        for (i, body) in bodies.iter_mut().enumerate() {
            body.position += body.velocity * parameters.dt;
            body.velocity += body.acceleration * parameters.dt;

            trace.body(i, body);
        }
    }

    Ok(Outcome { bodies, trace })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compute_method::tests, trace::Recording};

    #[test]
    fn trace_order() {
        let outcome = run(&tests::spiral(4, 7), &Parameters::default(), Recording::new()).unwrap();
        tests::trace_order(&outcome.trace, 4, 7);
    }

    #[test]
    fn single_body_drifts() {
        let mut config = tests::spiral(1, 10);
        config.bodies[0].velocity = Vector::new(1.0, -2.0);
        config.bodies[0].position = Vector::ZERO;

        let parameters = Parameters {
            dt: 0.5,
            ..Parameters::default()
        };
        let outcome = run(&config, &parameters, Recording::new()).unwrap();

        assert_eq!(outcome.bodies[0].position, Vector::new(5.0, -10.0));
        assert_eq!(outcome.bodies[0].velocity, Vector::new(1.0, -2.0));
        assert_eq!(outcome.bodies[0].acceleration, Vector::ZERO);
    }

    #[test]
    fn momentum_is_conserved() {
        let config = tests::spiral(5, 50);
        let outcome = run(&config, &Parameters::default(), Recording::new()).unwrap();

        let momentum = |velocities: Vec<Vector>| {
            config
                .bodies
                .iter()
                .zip(velocities)
                .fold(Vector::ZERO, |p, (body, v)| p + v * body.mass)
        };

        let initial = momentum(config.bodies.iter().map(|body| body.velocity).collect());
        let last = momentum(outcome.bodies.iter().map(|body| body.velocity).collect());

        assert!((initial - last).length() < 1e-9);
    }
}
