//! # Delve Main Entry Point
//!
//! Generates a world, then either replays a scripted key string and prints the
//! result, or opens a macroquad window for live play.

use clap::Parser;
use delve::cli::{Args, FailureSlot, SessionMode};
use delve::{
    DelveResult, FrameRecorder, GameState, GeneratedWorld, GenerationConfig, Generator,
    KeyboardInput, MacroquadDisplay, MovementPolicy, RenderSink, ScriptedInput, StepOutcome,
    TickOutcome, WorldBuilder,
};
use log::{error, info};
use macroquad::window::{next_frame, Conf};
use macroquad::Window;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    initialize_logging(&args.log_level);
    info!("Starting Delve v{}", delve::VERSION);

    let result = args.generation_config().and_then(|config| match args.mode() {
        SessionMode::Scripted(script) => run_scripted(&config, &script, args.movement, args.json),
        SessionMode::Keyboard => run_keyboard(&config, args.movement),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("delve: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        use tracing::Level;

        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::INFO,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
            .format_timestamp(None)
            .init();
    }
}

/// Builds and validates the world for this run.
fn generate_world(config: &GenerationConfig) -> DelveResult<GeneratedWorld> {
    info!("Generating {}x{} world with seed {}", config.width, config.height, config.seed);
    let world = WorldBuilder::build(config)?;
    WorldBuilder::new().validate(&world, config)?;
    Ok(world)
}

/// Replays `script` against a freshly generated world and prints the outcome.
fn run_scripted(
    config: &GenerationConfig,
    script: &str,
    policy: MovementPolicy,
    json: bool,
) -> DelveResult<()> {
    let mut input = ScriptedInput::parse(script)?;
    let world = generate_world(config)?;
    info!("Replaying {} keys with seed {}", input.remaining(), world.seed);

    let mut state = GameState::from_world(world, policy);
    let mut frames = FrameRecorder::new();
    let summary = state.run(&mut input, &mut frames)?;
    info!(
        "Session ended after {} turns, {} frames rendered",
        summary.turns,
        frames.frames.len()
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary.grid);
    }
    Ok(())
}

/// Generates the world, then hands it to a macroquad window.
fn run_keyboard(config: &GenerationConfig, policy: MovementPolicy) -> DelveResult<()> {
    let world = generate_world(config)?;
    let display = MacroquadDisplay::new();
    let (width, height) = display.window_size(config.width, config.height);

    let conf = Conf {
        window_title: "Delve".to_string(),
        window_width: width as i32,
        window_height: height as i32,
        window_resizable: false,
        ..Default::default()
    };

    let failure = FailureSlot::new();
    let slot = failure.clone();
    Window::from_config(conf, async move {
        let state = GameState::from_world(world, policy);
        slot.record(run_game_loop(state, display).await);
    });
    failure.into_result()
}

/// Main game loop: drain this frame's keys, redraw, wait for the next frame.
async fn run_game_loop(mut state: GameState, mut display: MacroquadDisplay) -> DelveResult<()> {
    let mut input = KeyboardInput::new();
    display.add_message(format!("Seed {}", state.seed()));
    display.add_message("WASD to move, Q to quit".to_string());

    loop {
        while let TickOutcome::Step(outcome) = state.tick(&mut input, &mut display)? {
            if let StepOutcome::Blocked { target } = outcome {
                display.add_message(format!("Blocked at {}", target));
            }
            if state.is_terminated() {
                break;
            }
        }

        if state.is_terminated() {
            info!("Player quit after {} turns", state.turn_number);
            break;
        }

        // Redraw every frame, moved or not
        display.render(state.grid())?;
        next_frame().await;
    }

    Ok(())
}
