//! Feature animation: hovering wings, flapping wings, bouncing legs and eyes
//! that follow the pointer.

use crate::config::CreatureConfig;
use crate::drag::PointerWorld;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// Pupil diameter relative to its eye.
pub const PUPIL_SCALE: f32 = 0.5;

/// How far a pupil may travel from the eye centre, in eye units.
pub const PUPIL_TRAVEL: f32 = 0.25;

/// Holds a winged body aloft with a gentle vertical bob.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct WingHover {
    /// Peak vertical speed.
    pub amplitude: f32,
    /// rad / s.
    pub frequency: f32,
    pub phase: f32,
}

impl WingHover {
    pub fn vertical_speed(&self, t: f32) -> f32 {
        (t * self.frequency + self.phase).cos() * self.amplitude
    }
}

/// Bursts of quick flaps separated by a rest.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct WingFlap {
    /// Rest rotation, radians.
    pub base_angle: f32,
    pub interval: f32,
    pub pause: f32,
    pub burst: u32,
    timer: f32,
    flaps: u32,
    pausing: bool,
    flapped: bool,
}

impl WingFlap {
    pub fn new(base_angle: f32, config: &CreatureConfig) -> Self {
        Self {
            base_angle,
            interval: config.flap_interval,
            pause: config.flap_pause,
            burst: config.flaps_per_burst,
            timer: 0.0,
            flaps: 0,
            pausing: false,
            flapped: false,
        }
    }

    /// Step the flap clock.  Returns the new pose when it toggles.
    pub fn advance(&mut self, dt: f32) -> Option<bool> {
        self.timer += dt;
        if self.pausing {
            if self.timer >= self.pause {
                self.pausing = false;
                self.flaps = 0;
                self.timer = 0.0;
            }
            return None;
        }
        if self.timer < self.interval {
            return None;
        }
        self.flapped = !self.flapped;
        self.flaps += 1;
        self.timer = 0.0;
        if self.flaps >= self.burst {
            self.pausing = true;
        }
        Some(self.flapped)
    }

    pub fn is_flapped(&self) -> bool {
        self.flapped
    }

    /// Current rotation: a quarter turn clockwise while flapped.
    pub fn angle(&self) -> f32 {
        if self.flapped {
            self.base_angle - std::f32::consts::FRAC_PI_2
        } else {
            self.base_angle
        }
    }
}

/// Sinusoidal bob and squish of a leg around its rest pose.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct LegBounce {
    pub rest_translation: Vec3,
    pub rest_scale: Vec3,
    /// rad / s.
    pub speed: f32,
    /// Bob height as a fraction of the leg's height.
    pub amount: f32,
    /// Extra height at full squish, as a fraction of the leg's height.
    pub squish: f32,
}

impl LegBounce {
    /// Local translation and scale at time `t`.
    pub fn pose(&self, t: f32) -> (Vec3, Vec3) {
        let wave = (t * self.speed).sin();
        let height = self.rest_scale.y;
        let translation = self.rest_translation + Vec3::new(0.0, wave * self.amount * height, 0.0);
        let scale = Vec3::new(
            self.rest_scale.x,
            height + wave.abs() * self.squish * height,
            self.rest_scale.z,
        );
        (translation, scale)
    }
}

/// Eye whose pupil looks toward the pointer.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct EyeFollow {
    pub pupil: Entity,
    pub travel: f32,
}

// ── Systems ───────────────────────────────────────────────────────────────────

pub fn wing_hover_system(
    time: Res<Time>,
    mut bodies: Query<(&WingHover, &mut Velocity, &mut GravityScale)>,
) {
    let t = time.elapsed_secs();
    for (hover, mut velocity, mut gravity) in bodies.iter_mut() {
        gravity.0 = 0.0;
        velocity.linvel.y = hover.vertical_speed(t);
    }
}

pub fn wing_flap_system(time: Res<Time>, mut wings: Query<(&mut WingFlap, &mut Transform)>) {
    let dt = time.delta_secs();
    for (mut flap, mut transform) in wings.iter_mut() {
        if flap.advance(dt).is_some() {
            transform.rotation = Quat::from_rotation_z(flap.angle());
        }
    }
}

pub fn leg_bounce_system(time: Res<Time>, mut legs: Query<(&LegBounce, &mut Transform)>) {
    let t = time.elapsed_secs();
    for (leg, mut transform) in legs.iter_mut() {
        let (translation, scale) = leg.pose(t);
        transform.translation = translation;
        transform.scale = scale;
    }
}

pub fn eye_follow_system(
    pointer: Res<PointerWorld>,
    eyes: Query<(&GlobalTransform, &EyeFollow)>,
    mut pupils: Query<&mut Transform>,
) {
    let Some(target) = pointer.0 else {
        return;
    };
    for (eye, follow) in eyes.iter() {
        let direction = (target - eye.translation().truncate()).normalize_or_zero();
        if let Ok(mut pupil) = pupils.get_mut(follow.pupil) {
            let offset = direction * follow.travel;
            pupil.translation.x = offset.x;
            pupil.translation.y = offset.y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flap() -> WingFlap {
        WingFlap::new(0.0, &CreatureConfig::default())
    }

    #[test]
    fn flaps_six_times_then_rests() {
        let mut wing = flap();
        let toggles: Vec<bool> = (0..6).filter_map(|_| wing.advance(0.11)).collect();
        assert_eq!(toggles, vec![true, false, true, false, true, false]);
        // Pausing: no toggles until the pause has elapsed.
        assert_eq!(wing.advance(0.3), None);
        assert_eq!(wing.advance(0.3), None);
        assert!(!wing.is_flapped());
        // Burst restarts.
        assert_eq!(wing.advance(0.11), Some(true));
    }

    #[test]
    fn flap_does_not_toggle_before_interval() {
        let mut wing = flap();
        assert_eq!(wing.advance(0.05), None);
        assert_eq!(wing.advance(0.06), Some(true));
    }

    #[test]
    fn flapped_angle_is_a_quarter_turn_from_rest() {
        let mut wing = WingFlap::new(0.5, &CreatureConfig::default());
        assert_eq!(wing.angle(), 0.5);
        wing.advance(0.2);
        assert!((wing.angle() - (0.5 - std::f32::consts::FRAC_PI_2)).abs() < 1e-6);
    }

    #[test]
    fn hover_speed_peaks_at_amplitude() {
        let hover = WingHover {
            amplitude: 24.0,
            frequency: 1.5,
            phase: 0.0,
        };
        assert_eq!(hover.vertical_speed(0.0), 24.0);
        let quarter = std::f32::consts::FRAC_PI_2 / 1.5;
        assert!(hover.vertical_speed(quarter).abs() < 1e-4);
    }

    #[test]
    fn leg_pose_bobs_around_rest() {
        let leg = LegBounce {
            rest_translation: Vec3::new(10.0, 20.0, 0.0),
            rest_scale: Vec3::new(5.0, 30.0, 1.0),
            speed: 3.0,
            amount: 0.1,
            squish: 0.05,
        };
        let (t0, s0) = leg.pose(0.0);
        assert_eq!(t0, leg.rest_translation);
        assert_eq!(s0, leg.rest_scale);
        let peak = std::f32::consts::FRAC_PI_2 / 3.0;
        let (t1, s1) = leg.pose(peak);
        assert!((t1.y - 23.0).abs() < 1e-4);
        assert!((s1.y - 31.5).abs() < 1e-4);
        assert_eq!(s1.x, 5.0);
    }

    #[test]
    fn hover_system_zeroes_gravity_and_drives_vertical_velocity() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_systems(Update, wing_hover_system);
        let body = app
            .world_mut()
            .spawn((
                WingHover {
                    amplitude: 10.0,
                    frequency: 0.0,
                    phase: 0.0,
                },
                Velocity::linear(Vec2::new(3.0, -50.0)),
                GravityScale(1.0),
            ))
            .id();
        app.update();
        let e = app.world().entity(body);
        assert_eq!(e.get::<GravityScale>().unwrap().0, 0.0);
        let v = e.get::<Velocity>().unwrap();
        assert_eq!(v.linvel, Vec2::new(3.0, 10.0));
    }
}
