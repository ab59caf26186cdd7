mod arrows;
mod config;
mod error;
mod flow;
mod input;
mod logging;
mod physics;
mod renderer;
mod state;
mod vec2;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::TryRecvError;
use std::sync::Arc;
use std::time::{Duration, Instant};

use minifb::{Key, MouseButton, MouseMode, Window, WindowOptions};

use config::Config;
use error::{AppError, AppResult};
use flow::ElementKind;
use input::{Gesture, PICK_RADIUS_PX};
use physics::{spawn_physics_thread, PhysicsChannels};
use state::{FrameSnapshot, SimState};

struct Defaults;

impl Defaults {
    const HEADLESS_TICKS: u64 = 2000;
}

/// Held key selecting the element kind for a placement click.
const KIND_KEYS: [(Key, ElementKind); 3] = [
    (Key::S, ElementKind::Source),
    (Key::V, ElementKind::Vortex),
    (Key::D, ElementKind::Dipole),
];

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    headless: bool,
    ticks: Option<u64>,
    config: Option<String>,
    log_level: Option<String>,
}

impl CliArgs {
    fn parse(args: &[String]) -> AppResult<Self> {
        let mut cli = CliArgs::default();
        let mut it = args.iter();
        while let Some(arg) = it.next() {
            let mut value = |flag: &str| {
                it.next()
                    .cloned()
                    .ok_or_else(|| AppError::Args(format!("{flag} needs a value")))
            };
            match arg.as_str() {
                "--headless" => cli.headless = true,
                "--ticks" => {
                    let v = value("--ticks")?;
                    let n = v
                        .parse::<u64>()
                        .map_err(|_| AppError::Args(format!("--ticks expects a number, got `{v}`")))?;
                    cli.ticks = Some(n);
                }
                "--config" => cli.config = Some(value("--config")?),
                "--log-level" => cli.log_level = Some(value("--log-level")?),
                other => return Err(AppError::Args(format!("unknown argument `{other}`"))),
            }
        }
        Ok(cli)
    }
}

fn kind_for_keys(keys: &[Key]) -> Option<ElementKind> {
    KIND_KEYS
        .iter()
        .find(|(key, _)| keys.contains(key))
        .map(|&(_, kind)| kind)
}

fn rgba_to_argb(rgba: &[u8], out: &mut [u32]) {
    for (i, pixel) in rgba.chunks_exact(4).enumerate() {
        out[i] = (pixel[0] as u32) << 16 | (pixel[1] as u32) << 8 | pixel[2] as u32;
    }
}

fn build_sim(cfg: &Config) -> SimState {
    let params = cfg.to_flow_params();
    log::info!(
        "domain {}x{}, dt {}, {} particle slots",
        params.width,
        params.height,
        params.dt,
        params.particle_count()
    );
    let sim = SimState::new(
        params,
        &cfg.scene,
        cfg.flow.seed_grid,
        cfg.display.arrow_cols,
        cfg.display.arrow_rows,
    );
    log::info!(
        "scene: {} source(s), {} vortex(es), {} dipole(s)",
        sim.elements.active_count(ElementKind::Source),
        sim.elements.active_count(ElementKind::Vortex),
        sim.elements.active_count(ElementKind::Dipole)
    );
    sim
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match CliArgs::parse(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("potflow: {e}");
            eprintln!("usage: potflow [--headless [--ticks N]] [--config PATH] [--log-level LEVEL]");
            std::process::exit(2);
        }
    };
    logging::init(cli.log_level.as_deref());
    let cfg = config::load(cli.config.as_deref());

    let result = if cli.headless {
        run_headless(&cfg, cli.ticks.unwrap_or(Defaults::HEADLESS_TICKS))
    } else {
        run_gui(&cfg)
    };
    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run_gui(cfg: &Config) -> AppResult<()> {
    let render_cfg =
        renderer::RenderConfig::fit(cfg.window_size(), cfg.display.arrow_cols, cfg.display.arrow_rows);
    let (w, h) = (render_cfg.width, render_cfg.height);

    let mut window = Window::new(
        "potflow",
        w,
        h,
        WindowOptions {
            resize: true,
            ..WindowOptions::default()
        },
    )?;
    window.set_target_fps(cfg.display.target_fps);

    // Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let (channels, physics_thread) = spawn_physics_thread(build_sim(cfg), running.clone());
    let PhysicsChannels { action_tx, snap_rx, snap_return_tx } = channels;

    // Main thread: input + render + display
    let mut framebuf = vec![0u32; w * h];
    let mut rgba_buf: Vec<u8> = Vec::new();
    let mut frame_count = 0u32;
    let mut last_fps_time = Instant::now();
    let mut last_snap: Option<FrameSnapshot> = None;
    let (mut prev_left, mut prev_right) = (false, false);

    while window.is_open() && running.load(Ordering::SeqCst) {
        if window.is_key_down(Key::Escape) {
            break;
        }

        // --- Mouse: act on the press edge of either button ---
        let left = window.get_mouse_down(MouseButton::Left);
        let right = window.get_mouse_down(MouseButton::Right);
        let pressed = (left && !prev_left) || (right && !prev_right);
        prev_left = left;
        prev_right = right;
        if pressed {
            if let Some((mx, my)) = window.get_mouse_pos(MouseMode::Discard) {
                let (win_w, win_h) = window.get_size();
                let gesture = Gesture {
                    left,
                    right,
                    kind_key: kind_for_keys(&window.get_keys()),
                    cursor: input::cursor_to_domain(mx, my, win_w, win_h),
                };
                let pick_radius = PICK_RADIUS_PX / win_h.max(1) as f64;
                if let Some(action) = input::map_gesture(&gesture, pick_radius) {
                    log::debug!("{action:?}");
                    if action_tx.send(action).is_err() {
                        break;
                    }
                }
            }
        }

        match snap_rx.try_recv() {
            Ok(s) => {
                renderer::render_into(&mut rgba_buf, &s, &render_cfg);
                rgba_to_argb(&rgba_buf, &mut framebuf);
                // Return old snapshot buffer to physics thread for reuse
                if let Some(old) = last_snap.take() {
                    let _ = snap_return_tx.send(old);
                }
                last_snap = Some(s);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => break,
        }

        window.update_with_buffer(&framebuf, w, h)?;

        frame_count += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let live = last_snap.as_ref().map_or(0, |s| s.live_particles);
            window.set_title(&format!("potflow | {frame_count} fps | {live} particles"));
            frame_count = 0;
            last_fps_time = now;
        }
    }

    // Shutdown
    running.store(false, Ordering::SeqCst);
    drop(snap_rx);
    drop(action_tx);
    physics_thread.join().map_err(|_| AppError::PhysicsThread)
}

fn run_headless(cfg: &Config, ticks: u64) -> AppResult<()> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let mut sim = build_sim(cfg);
    let start = Instant::now();
    while sim.tick < ticks && running.load(Ordering::SeqCst) {
        if let Some(outcome) = sim.step() {
            log::info!(
                "tick {:>6}: {} live, {} reseeded{}",
                sim.tick,
                sim.particles.live_count(),
                outcome.placed,
                if outcome.lap_completed { " (full lap)" } else { "" }
            );
        }
    }
    log::info!("ran {} ticks in {:.2?}", sim.tick, start.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_no_args_is_gui() {
        assert_eq!(CliArgs::parse(&[]).unwrap(), CliArgs::default());
    }

    #[test]
    fn test_parse_headless_with_ticks() {
        let cli = CliArgs::parse(&args(&["--headless", "--ticks", "500", "--log-level", "debug"])).unwrap();
        assert!(cli.headless);
        assert_eq!(cli.ticks, Some(500));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.config, None);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(CliArgs::parse(&args(&["--ticks", "many"])), Err(AppError::Args(_))));
        assert!(matches!(CliArgs::parse(&args(&["--config"])), Err(AppError::Args(_))));
        assert!(matches!(CliArgs::parse(&args(&["--bogus"])), Err(AppError::Args(_))));
    }

    #[test]
    fn test_kind_for_keys() {
        assert_eq!(kind_for_keys(&[Key::V]), Some(ElementKind::Vortex));
        assert_eq!(kind_for_keys(&[Key::A, Key::D]), Some(ElementKind::Dipole));
        assert_eq!(kind_for_keys(&[Key::Space]), None);
    }

    #[test]
    fn test_rgba_to_argb() {
        let rgba = [0x2E, 0x94, 0xB9, 0xFF, 1, 2, 3, 0];
        let mut out = [0u32; 2];
        rgba_to_argb(&rgba, &mut out);
        assert_eq!(out, [0x2E94B9, 0x010203]);
    }

    #[test]
    fn test_pipeline_no_panic() {
        let cfg = Config::default();
        let mut sim = build_sim(&cfg);
        let render_cfg =
            renderer::RenderConfig::fit(cfg.window_size(), cfg.display.arrow_cols, cfg.display.arrow_rows);
        let mut snap = FrameSnapshot::new_empty(sim.particles.len());
        let mut rgba = Vec::new();
        let mut framebuf = vec![0u32; render_cfg.width * render_cfg.height];
        for _ in 0..3 * cfg.flow.refill_interval {
            sim.step();
            sim.snapshot_into(&mut snap);
            renderer::render_into(&mut rgba, &snap, &render_cfg);
            rgba_to_argb(&rgba, &mut framebuf);
        }
        assert_eq!((render_cfg.width, render_cfg.height), cfg.window_size());
        assert_eq!(rgba.len(), render_cfg.width * render_cfg.height * 4);
        assert!(snap.live_particles > 0);
        assert!(framebuf.iter().any(|&p| p != 0));
    }
}
