//! Helix Fall entry point
//!
//! On the web the page drives the game through the library's `HelixFall`
//! export. Natively this runs a headless demo game steered by the autopilot
//! and prints the score history.
//!
//! Usage: `helix-fall [seed] [games] [query]`, where `query` takes the page's
//! launch parameters, e.g. `useCharacter=true&userId=demo`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use helix_fall::score::{GameResult, ScoreSink, SubmitError};
    use helix_fall::sim::GamePhase;
    use helix_fall::{GameOptions, LaunchConfig, LogSink, MemorySink, Session};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Logs each result and keeps it for the summary
    struct DemoSink {
        history: Rc<RefCell<MemorySink>>,
    }

    impl ScoreSink for DemoSink {
        fn submit(&mut self, result: &GameResult) -> Result<(), SubmitError> {
            LogSink.submit(result)?;
            self.history.borrow_mut().submit(result)
        }
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| helix_fall::platform::now_ms() as u64);
    let games = args
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(3);
    let launch = LaunchConfig::default().with_query(&args.next().unwrap_or_default());

    log::info!("Helix Fall (native demo) starting, seed {}", seed);

    let history = Rc::new(RefCell::new(MemorySink::new()));
    let sink = DemoSink {
        history: Rc::clone(&history),
    };
    let mut session = Session::new(
        seed,
        GameOptions::default(),
        launch,
        16.0 / 9.0,
        Box::new(sink),
    );
    session.set_autopilot(true);

    const DT: f32 = 1.0 / 60.0;
    // Generous cap so a stuck run cannot spin forever
    const MAX_FRAMES: usize = 60 * 60 * 10;

    let mut finished = 0;
    let mut was_over = false;
    for _ in 0..MAX_FRAMES {
        session.frame(DT);
        let over = session.state.phase == GamePhase::GameOver;
        if over && !was_over {
            finished += 1;
            if finished >= games {
                break;
            }
        }
        was_over = over;
    }

    let history = history.borrow();
    println!("Played {} game(s)", history.len());
    for (i, result) in history.history.iter().enumerate() {
        println!(
            "  #{:<2} score {:>3}  time left {:>4.1}s",
            i + 1,
            result.score,
            result.time_left
        );
    }
    println!("High score: {}", history.high_score());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `helix_fall::web::start`, this is just to satisfy the compiler
}
