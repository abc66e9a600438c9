use std::{thread::sleep, time::{Duration, Instant}};

use color_eyre::{eyre::bail, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::info;

use wrapsnake::config::GameConfig;
use wrapsnake::food::SessionRng;
use wrapsnake::session::{EndReason, Session, Tick};
use wrapsnake::snake::Direction::*;
use wrapsnake::vector::Vector;

use crate::term::{Coords, TermInt, TermManager};

const POLL_INTERVAL_MS: u64 = 5;

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';

#[derive(Debug, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct SnakeGame {
    config: GameConfig,
    paused: bool,
    term: TermManager,
}

impl SnakeGame {
    pub fn new(config: GameConfig) -> Result<Self> {
        Ok(SnakeGame { config, paused: false, term: TermManager::new()? })
    }

    pub fn initialize(&mut self) -> Result<()> {
        let (need_w, need_h) = self.playground_size();
        let (w, h) = self.term.get_terminal_size();
        if need_w > w || need_h > h {
            bail!("a {}x{} playground needs a {}x{} terminal, this one is {}x{}",
                  self.config.width, self.config.height, need_w, need_h, w, h);
        }

        self.term.setup()?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        self.term.restore()?;
        Ok(())
    }

    pub fn show_intro(&mut self) -> Result<Flow> {
        self.term.show_message(&[
            "Arrow keys or WASD to move",
            "Esc to pause",
            "CTRL+C to quit",
            "",
            "Press any key to begin"
        ])?;

        if is_ctrl_c(&self.term.read_key_blocking()?) {
            return Ok(Flow::Quit);
        }

        self.term.hide_message()?;
        Ok(Flow::Continue)
    }

    /// Runs one session to its end, then waits out the restart pause.
    pub fn play(&mut self) -> Result<Flow> {
        let rng = match self.config.seed {
            Some(seed) => SessionRng::new(seed),
            None => SessionRng::from_random(),
        };
        info!("starting session with seed {}", rng.seed());
        let mut session = Session::new(&self.config, rng)?;

        self.paused = false;
        self.term.clear()?;
        self.term.draw_borders(self.playground_size())?;
        self.print_score(&session)?;
        self.print_snake(&session)?;
        self.print_cell(session.food(), FOOD_CHAR)?;
        self.term.flush()?;

        let mut clock = StepClock::new(self.config.tick_interval(), Instant::now());

        while !session.is_over() {
            sleep(Duration::from_millis(POLL_INTERVAL_MS));

            for key_ev in self.term.read_key_events_queue()? {
                match key_ev.code {
                    _ if is_ctrl_c(&key_ev) => return Ok(Flow::Quit),
                    KeyCode::Char('w') | KeyCode::Up => session.set_direction(Up),
                    KeyCode::Char('a') | KeyCode::Left => session.set_direction(Left),
                    KeyCode::Char('s') | KeyCode::Down => session.set_direction(Down),
                    KeyCode::Char('d') | KeyCode::Right => session.set_direction(Right),
                    KeyCode::Esc => {
                        self.toggle_pause()?;
                        clock.reset(Instant::now());
                    },
                    _ => {}
                }
            }

            if self.paused { continue; }

            if !clock.poll(Instant::now()) { continue; }

            match session.crawl() {
                Tick::Moved { new_head, old_head, old_tail } => {
                    self.print_cell(old_tail, ' ')?;
                    self.print_step(&session, new_head, old_head)?;
                },
                Tick::Ate { new_head, old_head, food } => {
                    self.print_step(&session, new_head, old_head)?;
                    self.print_cell(food, FOOD_CHAR)?;
                    self.print_score(&session)?;
                },
                Tick::Ended(_) | Tick::Idle => {},
            }
            self.term.flush()?;
        }

        if let Some(reason) = session.end_reason() {
            self.game_over(&session, reason)?;
        }

        self.wait_for_restart()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn playground_size(&self) -> Coords {
        let cells = |n: i32| TermInt::try_from(n).unwrap_or(TermInt::MAX);
        let width = cells(self.config.width).saturating_mul(self.config.scale).saturating_add(2);
        let height = cells(self.config.height).saturating_add(2);
        (width, height)
    }

    // Ctrl+C still quits during the pause
    fn wait_for_restart(&mut self) -> Result<Flow> {
        let deadline = Instant::now() + self.config.restart_pause();

        while Instant::now() < deadline {
            sleep(Duration::from_millis(POLL_INTERVAL_MS));
            if self.term.read_key_events_queue()?.iter().any(is_ctrl_c) {
                return Ok(Flow::Quit);
            }
        }

        Ok(Flow::Continue)
    }

    fn game_over(&mut self, session: &Session, reason: EndReason) -> Result<()> {
        let won = reason == EndReason::BoardFilled;
        let s = if won {"You won!"} else {"Game over!"};

        if won {
            self.print_snake(session)?;
        } else {
            for pos in session.body() {
                self.print_cell(*pos, DEAD_SNAKE_CHAR)?;
            }
        }

        let pause = format!("Next game in {:.1}s", self.config.restart_pause_ms as f64 / 1000.0);
        self.term.show_message(&[
            s,
            &*format!("Score: {}", session.score()),
            "",
            &*pause,
            "or CTRL+C to quit."
        ])?;
        Ok(())
    }

    fn cell_origin(&self, pos: Vector) -> Coords {
        (1 + pos.x as TermInt * self.config.scale, 1 + pos.y as TermInt)
    }

    fn print_cell(&mut self, pos: Vector, ch: char) -> Result<()> {
        let (x, y) = self.cell_origin(pos);
        for dx in 0..self.config.scale {
            self.term.print_at((x + dx, y), ch)?;
        }
        Ok(())
    }

    fn print_snake(&mut self, session: &Session) -> Result<()> {
        let snake_len = session.body().len();

        for (i, pos) in session.body().iter().enumerate() {
            let ch = if i == snake_len - 1 {session.head_char()} else {SNAKE_BODY_CHAR};
            self.print_cell(*pos, ch)?;
        }

        Ok(())
    }

    fn print_step(&mut self, session: &Session, new_head: Vector, old_head: Vector) -> Result<()> {
        self.print_cell(old_head, SNAKE_BODY_CHAR)?;
        self.print_cell(new_head, session.head_char())
    }

    fn print_score(&mut self, session: &Session) -> Result<()> {
        self.term.print_str_at((2, 0), &format!(" Score: {} ", session.score()))?;
        Ok(())
    }

    fn toggle_pause(&mut self) -> Result<()> {
        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or CTRL+C to quit"])?;
        } else {
            self.term.hide_message()?;
        }

        self.paused = !self.paused;
        Ok(())
    }
}

/// Paces steps against wall-clock time, whatever the polling and drawing cost.
struct StepClock {
    interval: Duration,
    next_step: Instant,
}

impl StepClock {
    fn new(interval: Duration, now: Instant) -> Self {
        StepClock { interval, next_step: now + interval }
    }

    /// True once per elapsed interval. After a long stall the schedule
    /// restarts from `now` instead of firing a burst of catch-up steps.
    fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_step {
            return false;
        }

        self.next_step += self.interval;
        if self.next_step <= now {
            self.next_step = now + self.interval;
        }
        true
    }

    fn reset(&mut self, now: Instant) {
        self.next_step = now + self.interval;
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
