use log::{debug, info, trace};

use crate::config::{ConfigError, GameConfig};
use crate::food::{place_food, CellSampler, SessionRng};
use crate::snake::{Direction, MoveResult, Snake};
use crate::vector::{Bounds, Vector};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndReason {
    SelfCollision,
    /// No cell left to put food on.
    BoardFilled,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    Running,
    Over(EndReason),
}

/// What one call to [`Session::crawl`] changed.
#[derive(Debug, PartialEq)]
pub enum Tick {
    Moved { new_head: Vector, old_head: Vector, old_tail: Vector },
    Ate { new_head: Vector, old_head: Vector, food: Vector },
    Ended(EndReason),
    /// The session was already over; nothing changed.
    Idle,
}

pub struct Session<S: CellSampler = SessionRng> {
    bounds: Bounds,
    snake: Snake,
    food: Vector,
    score: u32,
    score_per_food: u32,
    state: State,
    sampler: S,
}

impl<S: CellSampler> Session<S> {
    pub fn new(config: &GameConfig, mut sampler: S) -> Result<Self, ConfigError> {
        config.validate()?;

        let bounds = config.bounds();
        let snake = Snake::new(bounds.center(), config.initial_length, config.initial_direction, bounds);

        // validate() guarantees a free food cell in the starting layout
        let food = place_food(snake.body(), bounds, &mut sampler).ok_or(ConfigError::NoRoomForFood {
            length: config.initial_length,
            width: bounds.width,
            height: bounds.height,
        })?;

        info!("new {}x{} session, crawler at {}, food at {}", bounds.width, bounds.height, snake.head(), food);

        Ok(Session {
            bounds,
            snake,
            food,
            score: 0,
            score_per_food: config.score_per_food,
            state: State::Running,
            sampler,
        })
    }

    /// Advances the crawler one cell. A no-op once the session is over.
    pub fn crawl(&mut self) -> Tick {
        if let State::Over(_) = self.state {
            return Tick::Idle;
        }

        match self.snake.move_step(self.bounds, self.food) {
            MoveResult::Crashed => {
                info!("crawler hit itself at {}, final score {}", self.snake.next_head(self.bounds), self.score);
                self.end(EndReason::SelfCollision)
            },
            MoveResult::Moved { new_head, old_head, old_tail: Some(old_tail) } => {
                Tick::Moved { new_head, old_head, old_tail }
            },
            MoveResult::Moved { new_head, old_head, old_tail: None } => {
                self.score = self.score.saturating_add(self.score_per_food);
                debug!("ate food at {}, score {}, length {}", new_head, self.score, self.snake.body().len());

                match place_food(self.snake.body(), self.bounds, &mut self.sampler) {
                    Some(food) => {
                        debug!("food placed at {}", food);
                        self.food = food;
                        Tick::Ate { new_head, old_head, food }
                    },
                    None => {
                        info!("no room left for food, final score {}", self.score);
                        self.end(EndReason::BoardFilled)
                    },
                }
            },
        }
    }

    /// Silently ignores reversals and any request once the game is over.
    /// A reversal of the last step taken is rejected too, so two turns
    /// inside one tick can never point the head back into the neck.
    pub fn set_direction(&mut self, requested: Direction) {
        if self.is_over() {
            return;
        }

        if !self.snake.set_direction(requested) {
            trace!("ignored reversal to {:?} while heading {:?}", requested, self.snake.get_direction());
        }
    }

    fn end(&mut self, reason: EndReason) -> Tick {
        self.state = State::Over(reason);
        Tick::Ended(reason)
    }

    pub fn body(&self) -> &[Vector] {
        self.snake.body()
    }

    pub fn head_char(&self) -> char {
        self.snake.head_char()
    }

    pub fn direction(&self) -> Direction {
        self.snake.get_direction()
    }

    pub fn food(&self) -> Vector {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_over(&self) -> bool {
        matches!(self.state, State::Over(_))
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        match self.state {
            State::Running => None,
            State::Over(reason) => Some(reason),
        }
    }
}

#[cfg(test)]
impl<S: CellSampler> Session<S> {
    fn with_parts(bounds: Bounds, snake: Snake, food: Vector, sampler: S) -> Self {
        Session { bounds, snake, food, score: 0, score_per_food: 10, state: State::Running, sampler }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::testing::ScriptedSampler;
    use Direction::*;

    fn v(x: i32, y: i32) -> Vector {
        Vector::new(x, y)
    }

    fn row(xs: std::ops::RangeInclusive<i32>, y: i32) -> Vec<Vector> {
        xs.map(|x| v(x, y)).collect()
    }

    fn reference_session(food: &[Vector]) -> Session<ScriptedSampler> {
        Session::new(&GameConfig::default(), ScriptedSampler::new(food)).unwrap()
    }

    #[test]
    fn starts_running_with_reference_layout() {
        let session = reference_session(&[v(3, 3)]);

        assert_eq!(session.state(), State::Running);
        assert_eq!(session.body(), row(8..=14, 12).as_slice());
        assert_eq!(session.direction(), Right);
        assert_eq!(session.food(), v(3, 3));
        assert_eq!(session.score(), 0);
        assert_eq!(session.end_reason(), None);
    }

    #[test]
    fn initial_food_is_off_the_body() {
        let session = reference_session(&[v(10, 12), v(14, 12), v(1, 1)]);
        assert_eq!(session.food(), v(1, 1));
    }

    #[test]
    fn invalid_config_fails_construction() {
        let config = GameConfig { width: 0, ..GameConfig::default() };
        let res = Session::new(&config, ScriptedSampler::new(&[v(1, 1)]));
        assert!(matches!(res, Err(ConfigError::Dimension { .. })));
    }

    #[test]
    fn plain_tick_keeps_length() {
        let mut session = reference_session(&[v(3, 3)]);

        let tick = session.crawl();

        assert_eq!(tick, Tick::Moved { new_head: v(15, 12), old_head: v(14, 12), old_tail: v(8, 12) });
        assert_eq!(session.body(), row(9..=15, 12).as_slice());
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn head_wraps_around_right_edge() {
        let bounds = Bounds::new(25, 25);
        let snake = Snake::from_body(row(22..=24, 12), Right);
        let mut session = Session::with_parts(bounds, snake, v(5, 5), ScriptedSampler::new(&[v(1, 1)]));

        session.crawl();

        assert_eq!(session.body(), &[v(23, 12), v(24, 12), v(0, 12)]);
    }

    #[test]
    fn eating_grows_scores_and_replaces_food() {
        // First draw lands on the new head, so placement must retry.
        let mut session = reference_session(&[v(15, 12), v(15, 12), v(20, 3)]);
        assert_eq!(session.food(), v(15, 12));

        let tick = session.crawl();

        assert_eq!(tick, Tick::Ate { new_head: v(15, 12), old_head: v(14, 12), food: v(20, 3) });
        assert_eq!(session.score(), 10);
        assert_eq!(session.body(), row(8..=15, 12).as_slice());
        assert!(!session.body().contains(&session.food()));
    }

    #[test]
    fn score_increment_is_configurable() {
        let config = GameConfig { score_per_food: 3, ..GameConfig::default() };
        let mut session = Session::new(&config, ScriptedSampler::new(&[v(15, 12), v(16, 12), v(1, 1)])).unwrap();

        session.crawl();
        session.crawl();

        assert_eq!(session.score(), 6);
        assert_eq!(session.body().len(), 9);
    }

    #[test]
    fn score_saturates_instead_of_overflowing() {
        let config = GameConfig { score_per_food: u32::MAX, ..GameConfig::default() };
        let mut session = Session::new(&config, ScriptedSampler::new(&[v(15, 12), v(16, 12), v(1, 1)])).unwrap();

        session.crawl();
        session.crawl();

        assert_eq!(session.score(), u32::MAX);
        assert_eq!(session.body().len(), 9);
        assert_eq!(session.state(), State::Running);
    }

    #[test]
    fn start_without_food_cell_fails_construction() {
        let config = GameConfig { width: 3, height: 2, initial_length: 3, ..GameConfig::default() };
        let res = Session::new(&config, ScriptedSampler::new(&[v(1, 1)]));
        assert!(matches!(res, Err(ConfigError::NoRoomForFood { .. })));
    }

    #[test]
    fn small_grid_starts_running_with_food_off_body() {
        let config = GameConfig { width: 4, height: 2, initial_length: 3, ..GameConfig::default() };
        let session = Session::new(&config, SessionRng::new(9)).unwrap();

        assert_eq!(session.state(), State::Running);
        assert_eq!(session.food(), v(3, 1));
        assert!(!session.body().contains(&session.food()));
    }

    #[test]
    fn looping_into_body_ends_game() {
        let bounds = Bounds::new(25, 25);
        // Head at (5, 6) heading Up into (5, 5), the second segment.
        let body = vec![v(4, 5), v(5, 5), v(6, 5), v(6, 6), v(5, 6)];
        let snake = Snake::from_body(body.clone(), Up);
        let mut session = Session::with_parts(bounds, snake, v(10, 10), ScriptedSampler::new(&[v(1, 1)]));

        assert_eq!(session.crawl(), Tick::Ended(EndReason::SelfCollision));
        assert!(session.is_over());
        assert_eq!(session.body(), body.as_slice());
    }

    #[test]
    fn over_session_is_absorbing() {
        let bounds = Bounds::new(25, 25);
        let body = vec![v(4, 5), v(5, 5), v(6, 5), v(6, 6), v(5, 6)];
        let snake = Snake::from_body(body.clone(), Up);
        let mut session = Session::with_parts(bounds, snake, v(10, 10), ScriptedSampler::new(&[v(1, 1)]));
        session.crawl();

        session.set_direction(Left);
        for _ in 0..5 {
            assert_eq!(session.crawl(), Tick::Idle);
        }

        assert_eq!(session.body(), body.as_slice());
        assert_eq!(session.food(), v(10, 10));
        assert_eq!(session.score(), 0);
        assert_eq!(session.direction(), Up);
        assert_eq!(session.state(), State::Over(EndReason::SelfCollision));
    }

    #[test]
    fn reversal_request_is_ignored() {
        let mut session = reference_session(&[v(3, 3)]);

        session.set_direction(Left);

        assert_eq!(session.direction(), Right);
        session.crawl();
        assert_eq!(session.body().last(), Some(&v(15, 12)));
    }

    #[test]
    fn double_turn_inside_one_tick_cannot_reverse() {
        let mut session = reference_session(&[v(3, 3)]);

        session.set_direction(Up);
        session.set_direction(Left);
        session.crawl();

        assert_eq!(session.direction(), Up);
        assert_eq!(session.body().last(), Some(&v(14, 11)));
        assert!(!session.is_over());
    }

    #[test]
    fn turning_is_applied_on_next_tick() {
        let mut session = reference_session(&[v(3, 3)]);

        session.set_direction(Down);
        session.crawl();

        assert_eq!(session.body().last(), Some(&v(14, 13)));
    }

    #[test]
    fn filling_the_board_ends_game() {
        // 3x3 board: food cells are (1..3, 1..3). Body covers three of them,
        // eating the fourth leaves nowhere to put the next one.
        let bounds = Bounds::new(3, 3);
        let snake = Snake::from_body(vec![v(1, 1), v(2, 1), v(2, 2)], Down);
        let mut session = Session::with_parts(bounds, snake, v(1, 2), ScriptedSampler::new(&[v(1, 1)]));
        session.set_direction(Left);

        assert_eq!(session.crawl(), Tick::Ended(EndReason::BoardFilled));
        assert_eq!(session.score(), 10);
        assert_eq!(session.body().len(), 4);
        assert_eq!(session.crawl(), Tick::Idle);
    }

    #[test]
    fn length_changes_only_when_eating() {
        let mut session = Session::new(&GameConfig::default(), SessionRng::new(11)).unwrap();
        let directions = [Down, Down, Right, Right, Up, Up, Left, Down, Down, Down];

        for (i, d) in directions.iter().cycle().take(400).enumerate() {
            if session.is_over() {
                break;
            }
            let before = session.body().len();
            let food = session.food();
            session.set_direction(*d);

            match session.crawl() {
                Tick::Moved { .. } => assert_eq!(session.body().len(), before, "tick {}", i),
                Tick::Ate { new_head, food: new_food, .. } => {
                    assert_eq!(new_head, food);
                    assert_eq!(session.body().len(), before + 1);
                    assert!(!session.body().contains(&new_food));
                },
                Tick::Ended(_) => assert_eq!(session.body().len(), before),
                Tick::Idle => unreachable!(),
            }

            for p in session.body() {
                assert!(session.bounds().contains(*p), "{} out of bounds", p);
            }
        }
    }

    #[test]
    fn seeded_sessions_are_reproducible() {
        let a = Session::new(&GameConfig::default(), SessionRng::new(5)).unwrap();
        let b = Session::new(&GameConfig::default(), SessionRng::new(5)).unwrap();
        assert_eq!(a.food(), b.food());
    }
}
