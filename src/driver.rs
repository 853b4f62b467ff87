// Copyright (c) 2026 oxyzenq

use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEventKind};

use crate::config::EffectKind;
use crate::effect::Effect;
use crate::engine::Engine;
use crate::frame::Frame;
use crate::grove::Grove;
use crate::palette::ColorMode;
use crate::rain::Rain;
use crate::surface::Surface;
use crate::terminal::Terminal;
use crate::theme::{RainTuning, Theme};

fn build_effect(
    kind: EffectKind,
    theme: Theme,
    color_mode: ColorMode,
    seed: u64,
    width: f32,
    height: f32,
) -> Box<dyn Effect> {
    match kind {
        EffectKind::Rain => Box::new(Rain::new(
            width,
            height,
            RainTuning::for_theme(theme),
            color_mode,
            seed,
        )),
        EffectKind::Grove => Box::new(Grove::new(width, height, color_mode, seed)),
    }
}

fn mount(
    kind: EffectKind,
    theme: Theme,
    color_mode: ColorMode,
    seed: u64,
    cols: u16,
    lines: u16,
    now: Instant,
) -> Option<Engine> {
    let surface = Surface::acquire(cols, lines);
    let (width, height) = surface
        .as_ref()
        .map(|s| (s.width(), s.height()))
        .unwrap_or((0.0, 0.0));
    let effect = build_effect(kind, theme, color_mode, seed, width, height);
    Engine::mount(surface, effect, cols, lines, now)
}

/// Single-threaded driver: sleeps in the event poll until the clock
/// deadline, handles input and resizes, then runs one step+render+draw.
/// An unavailable drawing surface means no loop at all.
pub fn run(
    mut kind: EffectKind,
    mut theme: Theme,
    color_mode: ColorMode,
    seed: u64,
    duration_s: Option<f64>,
    screensaver: bool,
    start: Instant,
) -> std::io::Result<()> {
    let Ok(mut term) = Terminal::new() else {
        return Ok(());
    };
    let (mut cols, mut lines) = term.size()?;

    let Some(mut engine) = mount(kind, theme, color_mode, seed, cols, lines, start) else {
        return Ok(());
    };
    let mut frame = Frame::new(cols, lines, engine.effect().palette().bg);

    let end_time = duration_s.map(|s| start + Duration::from_secs_f64(s));

    let mut running = true;
    let mut paused = false;
    let mut pause_start: Option<Instant> = None;

    while running {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            break;
        }
        let mut pending_resize: Option<(u16, u16)> = None;

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                let ev = Terminal::read_event()?;
                match ev {
                    Event::Resize(nw, nh) => {
                        pending_resize = Some((nw, nh));
                    }
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        if screensaver {
                            running = false;
                            break;
                        }
                        let now = Instant::now();
                        match k.code {
                            KeyCode::Esc | KeyCode::Char('q') => running = false,
                            KeyCode::Char(' ') => engine.restart(now),
                            KeyCode::Tab => {
                                kind = kind.other();
                                match mount(kind, theme, color_mode, seed, cols, lines, now) {
                                    Some(e) => {
                                        engine = e;
                                        frame =
                                            Frame::new(cols, lines, engine.effect().palette().bg);
                                    }
                                    None => running = false,
                                }
                            }
                            KeyCode::Char('t') => {
                                // Theme selects rain tuning only; switching
                                // goes through a full remount, never a
                                // mid-run mutation.
                                if kind == EffectKind::Rain {
                                    theme = match theme {
                                        Theme::Dark => Theme::Light,
                                        Theme::Light => Theme::Dark,
                                    };
                                    match mount(kind, theme, color_mode, seed, cols, lines, now) {
                                        Some(e) => {
                                            engine = e;
                                            frame = Frame::new(
                                                cols,
                                                lines,
                                                engine.effect().palette().bg,
                                            );
                                        }
                                        None => running = false,
                                    }
                                }
                            }
                            KeyCode::Char('p') => {
                                paused = !paused;
                                if paused {
                                    pause_start = Some(now);
                                } else if let Some(t0) = pause_start.take() {
                                    engine.defer(now.saturating_duration_since(t0));
                                }
                            }
                            _ => {}
                        }
                    }
                    _ => {}
                }
            }

            if !running || pending_resize.is_some() {
                break;
            }

            let now = Instant::now();
            if engine.clock().due(now) {
                break;
            }

            let mut timeout = engine.clock().deadline() - now;
            if let Some(end) = end_time {
                if now >= end {
                    break;
                }
                timeout = timeout.min(end - now);
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if !running {
            break;
        }

        if let Some((nw, nh)) = pending_resize {
            cols = nw;
            lines = nh;
            engine.resize(cols, lines);
            frame = Frame::new(cols, lines, engine.effect().palette().bg);
        }

        let now = Instant::now();
        if paused {
            engine.skip(now);
            continue;
        }

        engine.tick(now);
        engine.blit(&mut frame);
        term.draw(&mut frame)?;
    }

    Ok(())
}
