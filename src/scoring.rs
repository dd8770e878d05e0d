//! Score context and the win condition.
//!
//! [`ScoreBoard`] is the one place the score lives; anything interested in it
//! listens for [`ScoreChanged`] instead of polling.  The "all targets captured"
//! predicate is evaluated only when a capture lands, never per frame.

use crate::creature::Creature;
use crate::population::{PopulationChanged, Roster};
use bevy::prelude::*;

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBoard {
    pub score: u32,
}

impl ScoreBoard {
    pub fn add(&mut self, points: u32) -> u32 {
        self.score = self.score.saturating_add(points);
        self.score
    }
}

/// A photo captured `creature` for `points`.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetCaptured {
    pub creature: Entity,
    pub points: u32,
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreChanged {
    pub score: u32,
}

/// Every creature of the current population has been captured.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllTargetsCaptured {
    pub final_score: u32,
}

/// Whether the current population has been won.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WinState {
    pub won: bool,
}

/// True when the roster is non-empty and every live creature in it is captured.
pub fn all_captured<'a>(
    roster: &Roster,
    captured: impl Fn(Entity) -> Option<&'a Creature>,
) -> bool {
    !roster.is_empty()
        && roster
            .creatures
            .iter()
            .filter_map(|e| captured(*e))
            .all(|c| c.captured)
}

/// Mark captured creatures, add their points and check the win condition.
pub fn apply_captures_system(
    mut captures: MessageReader<TargetCaptured>,
    mut creatures: Query<&mut Creature>,
    mut board: ResMut<ScoreBoard>,
    mut win: ResMut<WinState>,
    roster: Res<Roster>,
    mut score_changed: MessageWriter<ScoreChanged>,
    mut all_done: MessageWriter<AllTargetsCaptured>,
) {
    let mut any = false;
    for capture in captures.read() {
        let Ok(mut creature) = creatures.get_mut(capture.creature) else {
            continue;
        };
        if creature.captured {
            continue;
        }
        creature.captured = true;
        let score = board.add(capture.points);
        info!("Captured {:?} for {} points (score {score})", capture.creature, capture.points);
        score_changed.write(ScoreChanged { score });
        any = true;
    }

    if any && !win.won && all_captured(&roster, |e| creatures.get(e).ok()) {
        win.won = true;
        info!("All targets captured! Final score: {}", board.score);
        all_done.write(AllTargetsCaptured {
            final_score: board.score,
        });
    }
}

/// A new population starts a new round.
pub fn reset_win_system(
    mut changes: MessageReader<PopulationChanged>,
    mut win: ResMut<WinState>,
) {
    if changes.read().count() > 0 {
        win.won = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::CreatureRole;
    use crate::population::PopulationState;

    fn creature(captured: bool) -> Creature {
        Creature {
            role: CreatureRole::Flying,
            base_points: 100,
            captured,
        }
    }

    fn scoring_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<ScoreBoard>();
        app.init_resource::<WinState>();
        app.init_resource::<Roster>();
        app.add_message::<TargetCaptured>();
        app.add_message::<ScoreChanged>();
        app.add_message::<AllTargetsCaptured>();
        app.add_systems(Update, apply_captures_system);
        app
    }

    #[test]
    fn empty_roster_is_never_all_captured() {
        let roster = Roster::default();
        assert!(!all_captured(&roster, |_| None));
    }

    #[test]
    fn capture_adds_points_once() {
        let mut app = scoring_app();
        let a = app.world_mut().spawn(creature(false)).id();
        let b = app.world_mut().spawn(creature(false)).id();
        {
            let mut roster = app.world_mut().resource_mut::<Roster>();
            roster.creatures = vec![a, b];
            roster.state = PopulationState::Populated;
        }

        app.world_mut().write_message(TargetCaptured { creature: a, points: 40 });
        app.world_mut().write_message(TargetCaptured { creature: a, points: 40 });
        app.update();

        assert_eq!(app.world().resource::<ScoreBoard>().score, 40);
        assert!(app.world().entity(a).get::<Creature>().unwrap().captured);
        assert!(!app.world().resource::<WinState>().won);

        app.world_mut().write_message(TargetCaptured { creature: b, points: 60 });
        app.update();
        assert_eq!(app.world().resource::<ScoreBoard>().score, 100);
        assert!(app.world().resource::<WinState>().won);
    }
}
