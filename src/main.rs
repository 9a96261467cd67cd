//! Lane Runner headless driver
//!
//! Runs the simulation without a renderer: either a demo run steered by the
//! autopilot, or a single segment layout dumped as JSON.
//!
//! Usage:
//!   lane-runner [run] [seed] [seconds] [easy|normal|hard]
//!   lane-runner layout [seed]

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use lane_runner::consts::*;
    use lane_runner::sim::{GameEvent, LayoutConfig, RunState, SegmentLayout, autopilot, tick};
    use lane_runner::{Difficulty, Settings};

    /// Fixed-step driver, the host side of the simulation
    pub struct Driver {
        pub state: RunState,
        accumulator: f32,
        pub coins: u32,
        pub crashes: u32,
    }

    impl Driver {
        pub fn new(settings: Settings, seed: u64) -> Self {
            Self {
                state: RunState::with_settings(settings, seed),
                accumulator: 0.0,
                coins: 0,
                crashes: 0,
            }
        }

        /// Advance by one rendered frame
        pub fn update(&mut self, frame_dt: f32) {
            let dt = frame_dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = autopilot(&self.state);
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            // Stand-in for audio/animation: just count and log the cues
            for event in self.state.drain_events() {
                match event {
                    GameEvent::CoinCollected { .. } => self.coins += 1,
                    GameEvent::Crashed { segment, obstacle } => {
                        self.crashes += 1;
                        log::info!("Crash: segment {} obstacle {}", segment, obstacle);
                    }
                    GameEvent::RunRestarted { run } => log::info!("Run {} started", run),
                    other => log::debug!("{:?}", other),
                }
            }
        }
    }

    pub fn run(args: &[String]) {
        let seed = args.first().and_then(|s| s.parse().ok()).unwrap_or(12345);
        let seconds: f32 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(60.0);
        let difficulty = args
            .get(2)
            .and_then(|s| Difficulty::from_str(s))
            .unwrap_or_default();

        let settings = Settings::from_difficulty(difficulty);
        if let Err(e) = settings.validate() {
            log::error!("Invalid settings: {}", e);
            return;
        }

        log::info!(
            "Demo run: seed {}, {}s, {}",
            seed,
            seconds,
            difficulty.as_str()
        );
        let mut driver = Driver::new(settings, seed);
        // Simulate a 60 fps host
        let frames = (seconds * 60.0) as u32;
        for _ in 0..frames {
            driver.update(1.0 / 60.0);
        }

        let state = &driver.state;
        println!("Seed:        {}", seed);
        println!("Runs:        {}", state.run_index + 1);
        println!("Crashes:     {}", driver.crashes);
        println!("Coins:       {}", driver.coins);
        println!("{}", state.score.display_text());
        println!("Best score:  {}", state.best_score.max(state.score.points));
        println!("Distance:    {:.1}", state.distance());
        println!("Segments:    {}", state.track.segments.len());
    }

    pub fn layout(args: &[String]) {
        let seed = args.first().and_then(|s| s.parse().ok()).unwrap_or(12345);
        let layout = SegmentLayout::generated(LayoutConfig::default(), seed);
        match serde_json::to_string_pretty(layout.result()) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize layout: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("layout") => headless::layout(&args[1..]),
        Some("run") => headless::run(&args[1..]),
        _ => headless::run(&args),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the wasm surface; there is no wasm binary
}
