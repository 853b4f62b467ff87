// Copyright (c) 2026 oxyzenq

use std::io::{stdout, Result, Stdout, Write};

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::frame::Cell;
use crate::frame::Frame;

pub struct Terminal {
    stdout: Stdout,
    last: Option<Vec<Cell>>,
    last_size: (u16, u16),
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore_terminal_best_effort();
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            last: None,
            last_size: (0, 0),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: std::time::Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let size = (frame.width, frame.height);
        let total = frame.width as usize * frame.height as usize;
        let resized = self.last.is_none() || self.last_size != size;

        // A mostly-dirty frame is cheaper to repaint in one sweep.
        let dirty_is_large = total > 0 && frame.dirty_indices().len() >= total / 3;

        if resized || frame.is_dirty_all() || dirty_is_large {
            self.full_redraw(frame, resized)?;
        } else {
            self.patch_redraw(frame)?;
        }

        self.last_size = size;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        frame.clear_dirty();
        Ok(())
    }

    fn full_redraw(&mut self, frame: &Frame, clear_screen: bool) -> Result<()> {
        if clear_screen {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
        }

        let total = frame.width as usize * frame.height as usize;
        let mut last = vec![Cell::blank_with_bg(None); total];
        let mut pen = Pen::default();

        for y in 0..frame.height {
            self.stdout.queue(cursor::MoveTo(0, y))?;
            for x in 0..frame.width {
                let idx = y as usize * frame.width as usize + x as usize;
                let cell = frame.cell_at_index(idx);
                pen.apply(&mut self.stdout, &cell)?;
                self.stdout.queue(Print(cell.ch))?;
                last[idx] = cell;
            }
        }

        self.last = Some(last);
        Ok(())
    }

    fn patch_redraw(&mut self, frame: &Frame) -> Result<()> {
        let last = self.last.as_mut().expect("patch only after a full draw");
        let width = frame.width as usize;

        let mut dirty: Vec<usize> = frame.dirty_indices().to_vec();
        dirty.sort_unstable();

        let mut pen = Pen::default();
        let mut cur_pos: Option<(u16, u16)> = None;

        for idx in dirty {
            let cell = frame.cell_at_index(idx);
            if last.get(idx).copied() == Some(cell) {
                continue;
            }
            last[idx] = cell;

            let x = (idx % width) as u16;
            let y = (idx / width) as u16;
            if cur_pos != Some((x, y)) {
                self.stdout.queue(cursor::MoveTo(x, y))?;
            }
            pen.apply(&mut self.stdout, &cell)?;
            self.stdout.queue(Print(cell.ch))?;

            let next_x = x.saturating_add(1);
            cur_pos = if next_x < frame.width {
                Some((next_x, y))
            } else {
                None
            };
        }
        Ok(())
    }
}

/// Tracks the attributes last sent so redundant escape sequences are skipped.
#[derive(Default)]
struct Pen {
    fg: Option<Option<Color>>,
    bg: Option<Option<Color>>,
    bold: Option<bool>,
}

impl Pen {
    fn apply(&mut self, out: &mut Stdout, cell: &Cell) -> Result<()> {
        if self.fg != Some(cell.fg) {
            out.queue(SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
            self.fg = Some(cell.fg);
        }
        if self.bg != Some(cell.bg) {
            out.queue(SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)))?;
            self.bg = Some(cell.bg);
        }
        if self.bold != Some(cell.bold) {
            out.queue(SetAttribute(if cell.bold {
                Attribute::Bold
            } else {
                Attribute::NormalIntensity
            }))?;
            self.bold = Some(cell.bold);
        }
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore_terminal_best_effort();
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}
