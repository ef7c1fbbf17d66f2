//! Live feed: periodically nudges the loaded scenario readings in place so
//! the dashboard behaves as if fresh field data were streaming in.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::forest::ForestDataInput;
use crate::scenario::{self, ActiveScenario};

/// Seconds between feed updates while streaming.
const FEED_INTERVAL_SECS: f32 = 3.0;

/// Default seed used when no explicit seed is provided.
const DEFAULT_SEED: u64 = 42;

/// Deterministic RNG for feed randomness.
///
/// Systems that need randomness take `ResMut<FeedRng>` and use `rng.0`
/// (a `ChaCha8Rng` implementing `rand::Rng`) so identical seeds produce
/// identical streams.
#[derive(Resource)]
pub struct FeedRng(pub ChaCha8Rng);

impl Default for FeedRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(DEFAULT_SEED))
    }
}

impl FeedRng {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

/// Streaming state, toggled from the control panel. The timer keeps running
/// while an analysis is in flight; readings simply keep drifting.
#[derive(Resource)]
pub struct LiveFeed {
    pub active: bool,
    pub timer: Timer,
}

impl Default for LiveFeed {
    fn default() -> Self {
        Self {
            active: false,
            timer: Timer::from_seconds(FEED_INTERVAL_SECS, TimerMode::Repeating),
        }
    }
}

impl LiveFeed {
    /// Begin streaming from a freshly reset interval.
    pub fn start(&mut self) {
        self.active = true;
        self.timer.reset();
    }

    pub fn stop(&mut self) {
        self.active = false;
    }
}

/// Advance the loaded readings on the feed cadence.
pub fn stream_feed_updates(
    time: Res<Time>,
    mut feed: ResMut<LiveFeed>,
    active: Res<ActiveScenario>,
    mut rng: ResMut<FeedRng>,
    mut input: ResMut<ForestDataInput>,
) {
    if !feed.active {
        return;
    }
    if !feed.timer.tick(time.delta()).just_finished() {
        return;
    }
    scenario::advance(&mut input, active.0, &mut rng.0);
    debug!(scenario = active.0.label(), "live feed tick applied");
}

pub struct LiveFeedPlugin;

impl Plugin for LiveFeedPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FeedRng>()
            .init_resource::<LiveFeed>()
            .add_systems(Update, stream_feed_updates);
    }
}
