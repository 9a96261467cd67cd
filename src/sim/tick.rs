//! Fixed timestep simulation tick
//!
//! Advances a run by one step: input intents, runner movement, segment
//! spawning, pickups and crashes, then the crash/fade/restart sequence.

use super::collision::{collects_coin, hits_obstacle};
use super::state::{GameEvent, RunPhase, RunState};

/// Input intents for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// -1 left, +1 right, 0 stay
    pub lane_change: i32,
    pub jump: bool,
    pub slide: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the run by one fixed timestep
pub fn tick(state: &mut RunState, input: &TickInput, dt: f32) {
    if input.pause {
        match state.phase {
            RunPhase::Running => {
                state.phase = RunPhase::Paused;
                return;
            }
            RunPhase::Paused => state.phase = RunPhase::Running,
            _ => {}
        }
    }

    match state.phase {
        RunPhase::Paused => return,
        RunPhase::Running => run_step(state, input, dt),
        RunPhase::Crashed => {
            state.phase_timer += dt;
            if state.phase_timer >= state.settings.run.crash_stun_duration {
                state.phase = RunPhase::FadingOut;
                state.phase_timer = 0.0;
                state.events.push(GameEvent::FadeOut);
            }
        }
        RunPhase::FadingOut => {
            state.phase_timer += dt;
            if state.phase_timer >= state.settings.run.fade_duration {
                state.restart();
            }
        }
    }

    let target = state.camera_target();
    state.camera.update(Some(target), dt);
    state.time_ticks += 1;
}

fn run_step(state: &mut RunState, input: &TickInput, dt: f32) {
    let config = &state.settings.player;

    if input.lane_change != 0 {
        let lane_count = state.lane_xs.len();
        if state.player.request_lane_change(input.lane_change, lane_count) {
            state.events.push(GameEvent::LaneChanged {
                lane: state.player.lane,
            });
        }
    }
    if input.jump && state.player.jump(config) {
        state.events.push(GameEvent::Jumped);
    }
    if input.slide && state.player.start_slide(config) {
        state.events.push(GameEvent::SlideStarted);
    }

    let step = state.player.update(dt, config, &state.lane_xs);
    if step.landed {
        state.events.push(GameEvent::Landed);
    }
    if step.slide_ended {
        state.events.push(GameEvent::SlideEnded);
    }

    let runner_z = state.player.position.z;
    state.track.update(
        dt,
        runner_z,
        &state.settings.track,
        &state.settings.layout_variants,
        &mut state.rng,
        &mut state.events,
    );

    // Pickups and crashes only against segments around the runner
    let bounds = state.player.bounds(config);
    let reach = state.settings.run.coin_pickup_radius;
    let mut crash = None;
    for segment in state.track.segments_near(bounds.min.z - reach, bounds.max.z + reach) {
        for coin in segment.coins.iter_mut().filter(|c| c.active) {
            if collects_coin(&bounds, coin.position, reach) {
                coin.active = false;
                let score = state.score.add_coin();
                state.events.push(GameEvent::CoinCollected {
                    segment: segment.id,
                    coin: coin.id,
                    score,
                });
            }
        }
        if crash.is_none() {
            crash = segment
                .obstacles
                .iter()
                .find(|o| hits_obstacle(&bounds, &o.bounds))
                .map(|o| (segment.id, o.id));
        }
    }

    if let Some((segment, obstacle)) = crash {
        log::info!(
            "Crashed into obstacle {} on segment {} at z={:.1}",
            obstacle,
            segment,
            runner_z
        );
        state.phase = RunPhase::Crashed;
        state.phase_timer = 0.0;
        state.events.push(GameEvent::Crashed { segment, obstacle });
    }
}

/// Demo-mode input: dodge whatever is ahead in the runner's lane
///
/// Jumps what it can clear, slides under what it can fit beneath, and
/// otherwise moves to an adjacent lane that is clear.
pub fn autopilot(state: &RunState) -> TickInput {
    let mut input = TickInput::default();
    let player = &state.player;
    let config = &state.settings.player;
    if state.phase != RunPhase::Running || !player.is_grounded() || player.changing_lanes {
        return input;
    }

    let front = player.position.z + config.half_depth;
    let react = config.forward_speed * AUTOPILOT_REACTION_TIME;
    let blocked = |lane: usize, within: f32| {
        state.track.segments.iter().find_map(|segment| {
            segment
                .obstacles
                .iter()
                .find(|o| {
                    o.lane == lane && o.bounds.max.z > front && o.bounds.min.z - front < within
                })
                .map(|o| &segment.layout.config().obstacle_types[o.obstacle_type])
        })
    };

    let Some(ty) = blocked(player.lane, react) else {
        return input;
    };

    let apex = config.jump_height / config.low_jump_multiplier;
    if ty.top < apex * 0.75 {
        input.jump = true;
    } else if ty.bottom > config.slide_height {
        input.slide = !player.is_sliding();
    } else {
        let lane_count = state.lane_xs.len();
        input.lane_change = [-1, 1]
            .into_iter()
            .find(|&dir| {
                let lane = player.lane as i64 + dir as i64;
                lane >= 0
                    && (lane as usize) < lane_count
                    && blocked(lane as usize, react * 2.0).is_none()
            })
            .unwrap_or(0);
    }
    input
}

/// Seconds of look-ahead the autopilot reacts within
const AUTOPILOT_REACTION_TIME: f32 = 0.4;
