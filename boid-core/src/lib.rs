#![cfg_attr(not(feature = "std"), no_std)]

use core::fmt;

#[cfg(feature = "std")]
use rand::Rng;

/// Stable identifier the coordinator hands out to each agent.
pub type AgentId = usize;

/// Perception radius of the clamping rule set.
pub const DEFAULT_PERCEPTION_RADIUS: f64 = 40.0;

/// Perception radius of the averaging rule set.
pub const AVERAGING_PERCEPTION_RADIUS: f64 = 20.0;

/// Largest speed a single tick may leave an agent with under clamping.
pub const DEFAULT_MAX_SPEED: f64 = 3.0;

/// Length of the goal-seeking pull.
pub const DEFAULT_GOAL_STRENGTH: f64 = 0.05;

fn sqrt(value: f64) -> f64 {
    #[cfg(feature = "std")]
    {
        value.sqrt()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::sqrt(value)
    }
}

/// Failure of a checked vector operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorError {
    /// `divide` was called with a scalar of exactly zero
    DivisionByZero,
    /// `normalize` was called on the zero vector
    ZeroMagnitude,
}

impl fmt::Display for VectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VectorError::DivisionByZero => write!(f, "cannot divide a vector by zero"),
            VectorError::ZeroMagnitude => write!(f, "cannot normalize a zero-length vector"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for VectorError {}

/// A 2D vector used for position and velocity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Sum of `self` and every vector in `others`.
    pub fn add_all<I>(self, others: I) -> Self
    where
        I: IntoIterator<Item = Vector2D>,
    {
        others.into_iter().fold(self, |acc, v| acc + v)
    }

    /// `self` minus every vector in `others`.
    pub fn sub_all<I>(self, others: I) -> Self
    where
        I: IntoIterator<Item = Vector2D>,
    {
        others.into_iter().fold(self, |acc, v| acc - v)
    }

    pub fn scale(&self, scalar: f64) -> Self {
        *self * scalar
    }

    /// Component-wise division. A scalar of exactly zero is rejected rather
    /// than producing infinities.
    pub fn divide(&self, scalar: f64) -> Result<Self, VectorError> {
        if scalar == 0.0 {
            return Err(VectorError::DivisionByZero);
        }
        Ok(Self {
            x: self.x / scalar,
            y: self.y / scalar,
        })
    }

    pub fn magnitude(&self) -> f64 {
        sqrt(self.x * self.x + self.y * self.y)
    }

    /// Unit vector with the same direction. The zero vector has no direction
    /// and yields `VectorError::ZeroMagnitude`.
    pub fn normalize(&self) -> Result<Self, VectorError> {
        let mag = self.magnitude();
        if mag == 0.0 {
            return Err(VectorError::ZeroMagnitude);
        }
        self.divide(mag)
    }

    /// Rescales to exactly `max` when longer than `max`, otherwise returns
    /// the vector unchanged.
    pub fn clamp_magnitude(&self, max: f64) -> Self {
        let max = max.max(0.0);
        let mag = self.magnitude();
        if mag > max {
            *self * (max / mag)
        } else {
            *self
        }
    }

    pub fn distance(&self, other: &Vector2D) -> f64 {
        (*self - *other).magnitude()
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Component-wise average of two vectors.
    pub fn midpoint(&self, other: &Vector2D) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

impl core::ops::Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl core::ops::Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl core::ops::Mul<f64> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl core::ops::AddAssign for Vector2D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

/// How a freshly spawned agent gets its first velocity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InitialVelocity {
    /// Each component drawn from `[0, 0.01)`
    NearZero,
    /// Every agent starts with the same velocity
    Fixed(Vector2D),
}

impl Default for InitialVelocity {
    fn default() -> Self {
        InitialVelocity::NearZero
    }
}

/// A single boid entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boid {
    pub position: Vector2D,
    pub velocity: Vector2D,
}

impl Boid {
    pub fn new(position: Vector2D, velocity: Vector2D) -> Self {
        Self { position, velocity }
    }

    /// Places a boid uniformly inside `[0, width) x [0, height)`.
    #[cfg(feature = "std")]
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        width: f64,
        height: f64,
        initial: InitialVelocity,
    ) -> Self {
        let position = Vector2D::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height));
        let velocity = match initial {
            InitialVelocity::NearZero => {
                Vector2D::new(rng.gen_range(0.0..0.01), rng.gen_range(0.0..0.01))
            }
            InitialVelocity::Fixed(v) => v,
        };
        Self::new(position, velocity)
    }

    /// Moves by one velocity step with no boundary.
    pub fn integrate_free(&mut self) {
        self.position += self.velocity;
    }

    /// Moves by one velocity step on a torus of the given size: leaving one
    /// edge re-enters from the opposite one.
    pub fn integrate_wrapped(&mut self, width: f64, height: f64) {
        self.position = Vector2D::new(
            wrap_axis(self.position.x + self.velocity.x, width),
            wrap_axis(self.position.y + self.velocity.y, height),
        );
    }
}

/// Folds `raw` into `[0, dimension)`.
fn wrap_axis(raw: f64, dimension: f64) -> f64 {
    let wrapped = if raw < 0.0 {
        dimension - (-raw % dimension)
    } else {
        raw % dimension
    };
    // -640.0 on a 640 wide axis lands on the far edge itself
    if wrapped >= dimension {
        0.0
    } else {
        wrapped
    }
}

/// How the summed rule pull turns into the next velocity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CombinationPolicy {
    /// `clamp_magnitude(velocity + pull, max_speed)`
    Clamp { max_speed: f64 },
    /// `midpoint(velocity, pull)`
    AverageWithPrevious,
}

/// A rule parameter that failed validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfigError {
    pub parameter: &'static str,
    pub value: f64,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value {} for {}", self.value, self.parameter)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Weights and parameters for the flocking rules.
///
/// Each weight divides its rule's raw output, so a larger weight means a
/// weaker pull.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleConfig {
    pub cohesion_weight: f64,
    pub separation_weight: f64,
    pub alignment_weight: f64,
    /// Neighbors at or beyond this distance are ignored by cohesion,
    /// separation and alignment.
    pub perception_radius: f64,
    pub goal_strength: f64,
    /// Shared goal point. `None` turns goal seeking off.
    pub desire: Option<Vector2D>,
    pub combination: CombinationPolicy,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            cohesion_weight: 60.0,
            separation_weight: 1.12,
            alignment_weight: 1.72,
            perception_radius: DEFAULT_PERCEPTION_RADIUS,
            goal_strength: DEFAULT_GOAL_STRENGTH,
            desire: None,
            combination: CombinationPolicy::Clamp {
                max_speed: DEFAULT_MAX_SPEED,
            },
        }
    }
}

impl RuleConfig {
    /// Plain averaging rule set: shorter perception radius, no goal, and the
    /// new velocity is the midpoint of the old velocity and the pull.
    pub fn averaging() -> Self {
        Self {
            perception_radius: AVERAGING_PERCEPTION_RADIUS,
            combination: CombinationPolicy::AverageWithPrevious,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive_finite("cohesion_weight", self.cohesion_weight)?;
        positive_finite("separation_weight", self.separation_weight)?;
        positive_finite("alignment_weight", self.alignment_weight)?;
        // An infinite radius is allowed and means every neighbor is perceived
        if self.perception_radius.is_nan() || self.perception_radius <= 0.0 {
            return Err(ConfigError {
                parameter: "perception_radius",
                value: self.perception_radius,
            });
        }
        if !self.goal_strength.is_finite() || self.goal_strength < 0.0 {
            return Err(ConfigError {
                parameter: "goal_strength",
                value: self.goal_strength,
            });
        }
        if let CombinationPolicy::Clamp { max_speed } = self.combination {
            if !max_speed.is_finite() || max_speed < 0.0 {
                return Err(ConfigError {
                    parameter: "max_speed",
                    value: max_speed,
                });
            }
        }
        Ok(())
    }
}

fn positive_finite(parameter: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError { parameter, value })
    }
}

/// The flocking rules.
///
/// Every function is pure: the same neighbor slice and parameters always
/// give bit-identical output. None of them panic on an empty neighbor set.
pub mod rules {
    use super::*;

    /// Divides by a rule factor, treating a zero factor as "no pull".
    fn weaken(v: Vector2D, factor: f64) -> Vector2D {
        v.divide(factor).unwrap_or_else(|_| Vector2D::zero())
    }

    fn perceived<'a, I>(
        boid: &'a Boid,
        neighbors: I,
        radius: f64,
    ) -> impl Iterator<Item = (&'a Boid, f64)>
    where
        I: IntoIterator<Item = &'a Boid>,
        I::IntoIter: 'a,
    {
        neighbors.into_iter().filter_map(move |other| {
            let distance = boid.position.distance(&other.position);
            (distance < radius).then_some((other, distance))
        })
    }

    /// Cohesion: pull toward the centroid of perceived neighbors.
    pub fn cohesion<'a, I>(boid: &'a Boid, neighbors: I, factor: f64, radius: f64) -> Vector2D
    where
        I: IntoIterator<Item = &'a Boid>,
        I::IntoIter: 'a,
    {
        let mut sum = Vector2D::zero();
        let mut count = 0usize;

        for (other, _) in perceived(boid, neighbors, radius) {
            sum += other.position;
            count += 1;
        }

        match sum.divide(count as f64) {
            Ok(centroid) => weaken(centroid - boid.position, factor),
            Err(_) => Vector2D::zero(),
        }
    }

    /// Separation: unit-scaled push away from every perceived neighbor,
    /// averaged over those neighbors.
    pub fn separation<'a, I>(boid: &'a Boid, neighbors: I, factor: f64, radius: f64) -> Vector2D
    where
        I: IntoIterator<Item = &'a Boid>,
        I::IntoIter: 'a,
    {
        let mut push = Vector2D::zero();
        let mut count = 0usize;

        for (other, distance) in perceived(boid, neighbors, radius) {
            // coincident boids have no direction to push along
            if let Ok(away) = (boid.position - other.position).divide(distance) {
                push += away;
                count += 1;
            }
        }

        match push.divide(count as f64) {
            Ok(mean) => weaken(mean, factor),
            Err(_) => Vector2D::zero(),
        }
    }

    /// Alignment: average heading of perceived neighbors.
    pub fn alignment<'a, I>(boid: &'a Boid, neighbors: I, factor: f64, radius: f64) -> Vector2D
    where
        I: IntoIterator<Item = &'a Boid>,
        I::IntoIter: 'a,
    {
        let mut sum = Vector2D::zero();
        let mut count = 0usize;

        for (other, _) in perceived(boid, neighbors, radius) {
            sum += other.velocity;
            count += 1;
        }

        match sum.divide(count as f64) {
            Ok(mean) => weaken(mean, factor),
            Err(_) => Vector2D::zero(),
        }
    }

    /// Goal seeking: fixed-length pull toward `target`. A boid sitting
    /// exactly on the target is left alone.
    pub fn seek(boid: &Boid, target: Vector2D, strength: f64) -> Vector2D {
        match (target - boid.position).normalize() {
            Ok(direction) => direction * strength,
            Err(_) => Vector2D::zero(),
        }
    }

    /// Sum of all four rules for one boid.
    pub fn steer(boid: &Boid, neighbors: &[Boid], config: &RuleConfig) -> Vector2D {
        let radius = config.perception_radius;
        let goal = config
            .desire
            .map(|target| seek(boid, target, config.goal_strength))
            .unwrap_or_else(Vector2D::zero);

        goal.add_all([
            alignment(boid, neighbors, config.alignment_weight, radius),
            separation(boid, neighbors, config.separation_weight, radius),
            cohesion(boid, neighbors, config.cohesion_weight, radius),
        ])
    }

    /// The velocity `boid` should carry into its next position update.
    pub fn next_velocity(boid: &Boid, neighbors: &[Boid], config: &RuleConfig) -> Vector2D {
        let pull = steer(boid, neighbors, config);
        match config.combination {
            CombinationPolicy::Clamp { max_speed } => {
                (boid.velocity + pull).clamp_magnitude(max_speed)
            }
            CombinationPolicy::AverageWithPrevious => boid.velocity.midpoint(&pull),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;
    use proptest::prelude::*;

    fn at(x: f64, y: f64) -> Boid {
        Boid::new(Vector2D::new(x, y), Vector2D::zero())
    }

    #[test]
    fn test_vector2d_magnitude() {
        let v = Vector2D::new(3.0, 4.0);
        assert_eq!(v.magnitude(), 5.0);
    }

    #[test]
    fn test_vector2d_normalize() {
        let v = Vector2D::new(3.0, 4.0);
        let normalized = v.normalize().unwrap();
        assert!((normalized.magnitude() - 1.0).abs() < 1e-12);
        assert_eq!(Vector2D::zero().normalize(), Err(VectorError::ZeroMagnitude));
    }

    #[test]
    fn test_vector2d_operations() {
        let v1 = Vector2D::new(1.0, 2.0);
        let v2 = Vector2D::new(3.0, 4.0);

        assert_eq!(v1 + v2, Vector2D::new(4.0, 6.0));
        assert_eq!(v2 - v1, Vector2D::new(2.0, 2.0));
        assert_eq!(v1.scale(2.0), Vector2D::new(2.0, 4.0));
        assert_eq!(v1.midpoint(&v2), Vector2D::new(2.0, 3.0));
        assert_eq!(v1.add_all([v2, v2]), Vector2D::new(7.0, 10.0));
        assert_eq!(v2.sub_all([v1, v1]), Vector2D::new(1.0, 0.0));
        assert_eq!(v1.distance(&v2), v2.distance(&v1));
    }

    #[test]
    fn test_vector2d_divide() {
        let v = Vector2D::new(4.0, -2.0);
        assert_eq!(v.divide(2.0), Ok(Vector2D::new(2.0, -1.0)));
        assert_eq!(v.divide(0.0), Err(VectorError::DivisionByZero));
        assert_eq!(v.divide(-0.0), Err(VectorError::DivisionByZero));
    }

    #[test]
    fn test_is_zero() {
        assert!(Vector2D::zero().is_zero());
        assert!(!Vector2D::new(0.0, 1e-300).is_zero());
    }

    #[test]
    fn test_clamp_magnitude() {
        let long = Vector2D::new(30.0, 40.0);
        let clamped = long.clamp_magnitude(5.0);
        assert!((clamped.magnitude() - 5.0).abs() < 1e-12);
        assert!((clamped.x - 3.0).abs() < 1e-12);

        let short = Vector2D::new(1.0, 1.0);
        assert_eq!(short.clamp_magnitude(5.0), short);
        assert_eq!(long.clamp_magnitude(0.0), Vector2D::zero());
    }

    #[test]
    fn test_wrap_right_edge() {
        let mut boid = Boid::new(Vector2D::new(638.0, 10.0), Vector2D::new(5.0, 0.0));
        boid.integrate_wrapped(640.0, 480.0);
        assert_eq!(boid.position, Vector2D::new(3.0, 10.0));
    }

    #[test]
    fn test_wrap_left_edge() {
        let mut boid = Boid::new(Vector2D::new(1.0, 10.0), Vector2D::new(-5.0, 0.0));
        boid.integrate_wrapped(640.0, 480.0);
        assert_eq!(boid.position, Vector2D::new(636.0, 10.0));
    }

    #[test]
    fn test_wrap_exact_negative_multiple() {
        let mut boid = Boid::new(Vector2D::new(0.0, 0.0), Vector2D::new(-640.0, -480.0));
        boid.integrate_wrapped(640.0, 480.0);
        assert_eq!(boid.position, Vector2D::zero());
    }

    #[test]
    fn test_integrate_free() {
        let mut boid = Boid::new(Vector2D::new(638.0, -1.0), Vector2D::new(5.0, -5.0));
        boid.integrate_free();
        assert_eq!(boid.position, Vector2D::new(643.0, -6.0));
    }

    #[test]
    fn test_rules_on_empty_neighbors() {
        let boid = Boid::new(Vector2D::new(5.0, 5.0), Vector2D::new(1.0, 0.0));
        let none: [Boid; 0] = [];
        assert!(cohesion(&boid, &none, 1.0, 40.0).is_zero());
        assert!(separation(&boid, &none, 1.0, 40.0).is_zero());
        assert!(alignment(&boid, &none, 1.0, 40.0).is_zero());
    }

    #[test]
    fn test_cohesion_centroid() {
        let boid = at(5.0, 0.0);
        let neighbors = [at(0.0, 0.0), at(10.0, 0.0)];
        let result = cohesion(&boid, &neighbors, 1.0, f64::INFINITY);
        assert!(result.is_zero());

        let off_center = at(0.0, 0.0);
        let result = cohesion(&off_center, &[at(10.0, 0.0)], 2.0, f64::INFINITY);
        assert_eq!(result, Vector2D::new(5.0, 0.0));
    }

    #[test]
    fn test_cohesion_ignores_distant() {
        let boid = at(0.0, 0.0);
        let result = cohesion(&boid, &[at(100.0, 0.0)], 1.0, 40.0);
        assert!(result.is_zero());
    }

    #[test]
    fn test_separation_pushes_apart() {
        let a = at(0.0, 0.0);
        let b = at(5.0, 0.0);

        let on_a = separation(&a, &[b], 1.0, 40.0);
        let on_b = separation(&b, &[a], 1.0, 40.0);
        assert!(on_a.x < 0.0);
        assert!(on_b.x > 0.0);
        assert_eq!(on_a, Vector2D::new(-1.0, 0.0));
    }

    #[test]
    fn test_separation_outside_radius() {
        let a = at(0.0, 0.0);
        assert!(separation(&a, &[at(40.0, 0.0)], 1.0, 40.0).is_zero());
        assert!(separation(&a, &[at(50.0, 0.0)], 1.0, 40.0).is_zero());
    }

    #[test]
    fn test_separation_skips_coincident() {
        let a = at(3.0, 3.0);
        let result = separation(&a, &[at(3.0, 3.0)], 1.0, 40.0);
        assert!(result.is_zero());
        assert!(!result.x.is_nan());
    }

    #[test]
    fn test_alignment_average_heading() {
        let boid = at(0.0, 0.0);
        let neighbors = [
            Boid::new(Vector2D::new(1.0, 0.0), Vector2D::new(2.0, 0.0)),
            Boid::new(Vector2D::new(0.0, 1.0), Vector2D::new(0.0, 2.0)),
        ];
        assert_eq!(
            alignment(&boid, &neighbors, 2.0, 40.0),
            Vector2D::new(0.5, 0.5)
        );
    }

    #[test]
    fn test_zero_factor_yields_zero() {
        let boid = at(0.0, 0.0);
        assert!(cohesion(&boid, &[at(10.0, 0.0)], 0.0, 40.0).is_zero());
    }

    #[test]
    fn test_seek() {
        let boid = at(0.0, 0.0);
        let pull = seek(&boid, Vector2D::new(0.0, 100.0), 0.5);
        assert_eq!(pull, Vector2D::new(0.0, 0.5));
        assert!(seek(&boid, Vector2D::zero(), 0.5).is_zero());
    }

    #[test]
    fn test_next_velocity_clamped() {
        let boid = Boid::new(Vector2D::new(0.0, 0.0), Vector2D::new(10.0, 0.0));
        let config = RuleConfig::default();
        let velocity = next_velocity(&boid, &[], &config);
        assert!((velocity.magnitude() - DEFAULT_MAX_SPEED).abs() < 1e-12);
    }

    #[test]
    fn test_next_velocity_averaged() {
        let boid = Boid::new(Vector2D::new(0.0, 0.0), Vector2D::new(4.0, 2.0));
        let config = RuleConfig::averaging();
        let velocity = next_velocity(&boid, &[], &config);
        assert_eq!(velocity, Vector2D::new(2.0, 1.0));
    }

    #[test]
    fn test_steer_includes_goal() {
        let boid = at(0.0, 0.0);
        let config = RuleConfig {
            desire: Some(Vector2D::new(10.0, 0.0)),
            goal_strength: 1.0,
            ..RuleConfig::default()
        };
        assert_eq!(steer(&boid, &[], &config), Vector2D::new(1.0, 0.0));
    }

    #[test]
    fn test_rules_deterministic() {
        let boid = Boid::new(Vector2D::new(12.3, 45.6), Vector2D::new(0.7, -0.2));
        let neighbors = [
            Boid::new(Vector2D::new(20.0, 40.0), Vector2D::new(1.0, 1.0)),
            Boid::new(Vector2D::new(5.5, 50.1), Vector2D::new(-0.3, 0.9)),
            Boid::new(Vector2D::new(30.0, 70.0), Vector2D::new(0.0, -1.0)),
        ];
        let config = RuleConfig {
            desire: Some(Vector2D::new(300.0, 200.0)),
            ..RuleConfig::default()
        };

        let first = next_velocity(&boid, &neighbors, &config);
        for _ in 0..10 {
            let again = next_velocity(&boid, &neighbors, &config);
            assert_eq!(first.x.to_bits(), again.x.to_bits());
            assert_eq!(first.y.to_bits(), again.y.to_bits());
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(RuleConfig::default().validate().is_ok());
        assert!(RuleConfig::averaging().validate().is_ok());

        let bad = RuleConfig {
            separation_weight: 0.0,
            ..RuleConfig::default()
        };
        assert_eq!(bad.validate().unwrap_err().parameter, "separation_weight");

        let unbounded = RuleConfig {
            perception_radius: f64::INFINITY,
            ..RuleConfig::default()
        };
        assert!(unbounded.validate().is_ok());
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_random_boid_in_bounds() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let boid = Boid::random(&mut rng, 640.0, 480.0, InitialVelocity::NearZero);
            assert!((0.0..640.0).contains(&boid.position.x));
            assert!((0.0..480.0).contains(&boid.position.y));
            assert!(boid.velocity.magnitude() < 0.02);
        }

        let fixed = Boid::random(
            &mut rng,
            640.0,
            480.0,
            InitialVelocity::Fixed(Vector2D::new(1.0, 2.0)),
        );
        assert_eq!(fixed.velocity, Vector2D::new(1.0, 2.0));
    }

    proptest! {
        #[test]
        fn clamp_never_exceeds_bound(
            x in -1e6f64..1e6,
            y in -1e6f64..1e6,
            max in 0.0f64..100.0,
        ) {
            let v = Vector2D::new(x, y);
            let clamped = v.clamp_magnitude(max);
            prop_assert!(clamped.magnitude() <= max * (1.0 + 1e-12));

            let twice = clamped.clamp_magnitude(max);
            prop_assert!((twice.x - clamped.x).abs() <= 1e-9 * max.max(1.0));
            prop_assert!((twice.y - clamped.y).abs() <= 1e-9 * max.max(1.0));
        }

        #[test]
        fn clamp_keeps_short_vectors(x in -10.0f64..10.0, y in -10.0f64..10.0) {
            let v = Vector2D::new(x, y);
            prop_assert_eq!(v.clamp_magnitude(20.0), v);
        }

        #[test]
        fn wrapped_position_stays_in_bounds(
            px in 0.0f64..640.0,
            py in 0.0f64..480.0,
            vx in -2000.0f64..2000.0,
            vy in -2000.0f64..2000.0,
        ) {
            let mut boid = Boid::new(Vector2D::new(px, py), Vector2D::new(vx, vy));
            boid.integrate_wrapped(640.0, 480.0);
            prop_assert!((0.0..640.0).contains(&boid.position.x));
            prop_assert!((0.0..480.0).contains(&boid.position.y));
        }
    }
}
