use std::sync::Arc;

use log::debug;
use rand::Rng;

use crate::{
    direction::{Direction, Heading},
    error::GameOver,
    field::GameField,
    surface::{Style, Surface},
    Cell,
};

const SNAKE_CHAR: char = 'X';

/// What the world hands an actionable object for one tick.
pub struct ActionContext<'a> {
    pub field: &'a mut GameField,
    pub mouse: Option<Cell>,
}

/// Things an action asks the world to do once all actions of the tick ran.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Effect {
    MouseEaten,
}

pub struct Snake {
    segments: Vec<Cell>,
    heading: Arc<Heading>,
}

impl Snake {
    /// A one-segment snake on a random free cell, heading right.
    pub fn new<R: Rng + ?Sized>(field: &mut GameField, rng: &mut R) -> Result<Self, GameOver> {
        let pos = field.free_cell(rng)?;
        Ok(Self::spawn_at(field, pos, Direction::Right))
    }

    pub fn spawn_at(field: &mut GameField, pos: Cell, direction: Direction) -> Self {
        Self::with_segments(field, pos, &[], direction)
    }

    /// `tail` follows `head` in order and the whole body must be contiguous.
    pub fn with_segments(
        field: &mut GameField,
        head: Cell,
        tail: &[Cell],
        direction: Direction,
    ) -> Self {
        let mut segments = Vec::with_capacity(tail.len() + 1);
        segments.push(head);
        segments.extend_from_slice(tail);
        for &segment in &segments {
            field.set_blocked(segment, true);
        }
        Snake { segments, heading: Arc::new(Heading::new(direction)) }
    }

    pub fn head(&self) -> Cell {
        self.segments[0]
    }

    pub fn segments(&self) -> &[Cell] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.heading.current()
    }

    /// Handle for the input side; the only part of the snake shared across threads.
    pub fn heading(&self) -> Arc<Heading> {
        Arc::clone(&self.heading)
    }

    /// One tick: move, eat the mouse if the head landed on it, re-open the
    /// heading for changes.
    pub fn action(&mut self, ctx: &mut ActionContext) -> Result<Option<Effect>, GameOver> {
        self.move_step(ctx.field)?;

        let ate = ctx.mouse == Some(self.head());
        if ate {
            self.grow(ctx.field)?;
            debug!("mouse eaten at {:?}, length {}", ctx.mouse, self.len());
        }

        self.heading.end_tick();
        Ok(if ate { Some(Effect::MouseEaten) } else { None })
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        for &(row, col) in &self.segments {
            surface.put(row, col, SNAKE_CHAR, Style::Bold);
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn move_step(&mut self, field: &mut GameField) -> Result<(), GameOver> {
        self.move_tail(field);
        self.move_head(field)
    }

    // The new segment copies the head before it advances, so the body stays contiguous
    fn grow(&mut self, field: &mut GameField) -> Result<(), GameOver> {
        let head = self.head();
        self.segments.insert(0, head);
        self.move_head(field)
    }

    fn move_tail(&mut self, field: &mut GameField) {
        let mut vacated = self.segments[0];
        for segment in self.segments[1..].iter_mut() {
            let prev = *segment;
            *segment = vacated;
            field.set_blocked(vacated, true);
            vacated = prev;
        }
        field.set_blocked(vacated, false);
    }

    fn move_head(&mut self, field: &mut GameField) -> Result<(), GameOver> {
        let direction = self.heading.current();
        let target = direction
            .step(self.head())
            .filter(|&cell| !field.is_blocked(cell))
            .ok_or(GameOver::Collision(direction))?;

        self.segments[0] = target;
        field.set_blocked(target, true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{entities::Border, surface::Canvas};
    use crate::direction::Direction::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::BTreeSet;

    fn bordered(width: usize, height: usize) -> GameField {
        let mut field = GameField::new(width, height);
        Border::new(&mut field);
        field
    }

    fn ring(width: usize, height: usize) -> BTreeSet<Cell> {
        let mut field = GameField::new(width, height);
        Border::new(&mut field);
        field.blocked_cells().collect()
    }

    fn tick(
        snake: &mut Snake,
        field: &mut GameField,
        mouse: Option<Cell>,
    ) -> Result<Option<Effect>, GameOver> {
        snake.action(&mut ActionContext { field, mouse })
    }

    fn assert_occupancy(snake: &Snake, field: &GameField) {
        let mut expected = ring(field.width(), field.height());
        expected.extend(snake.segments().iter().copied());
        let actual: BTreeSet<Cell> = field.blocked_cells().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_spawn_on_free_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut field = bordered(26, 8);
        let snake = Snake::new(&mut field, &mut rng).unwrap();

        assert_eq!(snake.len(), 1);
        assert_eq!(snake.direction(), Right);
        assert!(field.is_blocked(snake.head()));
        assert_occupancy(&snake, &field);
    }

    #[test]
    fn test_spawn_on_full_board() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut field = bordered(3, 3);
        field.set_blocked((1, 1), true);
        assert_eq!(Snake::new(&mut field, &mut rng).err(), Some(GameOver::BoardFull));
    }

    #[test]
    fn test_moves_and_frees_vacated_cell() {
        let mut field = bordered(10, 6);
        let mut snake = Snake::spawn_at(&mut field, (2, 2), Right);

        assert_eq!(tick(&mut snake, &mut field, None), Ok(None));
        assert_eq!(snake.head(), (2, 3));
        assert!(!field.is_blocked((2, 2)));
        assert_occupancy(&snake, &field);
    }

    #[test]
    fn test_growth_adds_one_segment() {
        let mut field = bordered(10, 6);
        let mut snake = Snake::spawn_at(&mut field, (2, 2), Right);

        let effect = tick(&mut snake, &mut field, Some((2, 3))).unwrap();
        assert_eq!(effect, Some(Effect::MouseEaten));
        assert_eq!(snake.len(), 2);
        // the copy stays where the head was when growth started
        assert_eq!(snake.segments(), &[(2, 4), (2, 3)]);
        assert_occupancy(&snake, &field);
    }

    #[test]
    fn test_body_follows_head() {
        let mut field = bordered(10, 8);
        let mut snake = Snake::spawn_at(&mut field, (3, 2), Right);
        tick(&mut snake, &mut field, Some((3, 3))).unwrap();
        tick(&mut snake, &mut field, Some((3, 5))).unwrap();
        assert_eq!(snake.segments(), &[(3, 6), (3, 5), (3, 4)]);

        snake.heading().request_change(Down);
        tick(&mut snake, &mut field, None).unwrap();
        assert_eq!(snake.segments(), &[(4, 6), (3, 6), (3, 5)]);
        assert_occupancy(&snake, &field);

        tick(&mut snake, &mut field, None).unwrap();
        assert_eq!(snake.segments(), &[(5, 6), (4, 6), (3, 6)]);
        assert_occupancy(&snake, &field);
    }

    #[test]
    fn test_wall_collision() {
        let mut field = bordered(6, 5);
        let mut snake = Snake::spawn_at(&mut field, (2, 4), Right);
        assert_eq!(tick(&mut snake, &mut field, None), Err(GameOver::Collision(Right)));
    }

    #[test]
    fn test_collision_in_every_direction() {
        let cases = [(Up, (1, 2)), (Down, (3, 2)), (Left, (2, 1)), (Right, (2, 3))];
        for &(direction, start) in cases.iter() {
            let mut field = bordered(5, 5);
            let mut snake = Snake::spawn_at(&mut field, start, direction);
            let err = tick(&mut snake, &mut field, None).unwrap_err();
            assert_eq!(err, GameOver::Collision(direction));
            assert_eq!(err.to_string(), format!("bumped {}", direction));
        }
    }

    #[test]
    fn test_body_collision() {
        let mut field = bordered(12, 8);
        let mut snake = Snake::spawn_at(&mut field, (4, 2), Right);
        for mouse in [(4, 3), (4, 5), (4, 7), (4, 9)].iter() {
            tick(&mut snake, &mut field, Some(*mouse)).unwrap();
        }
        assert_eq!(snake.len(), 5);

        let heading = snake.heading();
        for &direction in [Up, Left, Down].iter() {
            assert!(heading.request_change(direction));
            if direction != Down {
                tick(&mut snake, &mut field, None).unwrap();
            }
        }
        assert_eq!(tick(&mut snake, &mut field, None), Err(GameOver::Collision(Down)));
    }

    #[test]
    fn test_obstacle_collision() {
        let mut field = bordered(10, 6);
        field.set_blocked((2, 5), true);
        let mut snake = Snake::spawn_at(&mut field, (2, 4), Right);
        assert_eq!(tick(&mut snake, &mut field, None), Err(GameOver::Collision(Right)));
    }

    #[test]
    fn test_tick_reopens_heading() {
        let mut field = bordered(10, 8);
        let mut snake = Snake::spawn_at(&mut field, (3, 3), Right);
        let heading = snake.heading();

        assert!(heading.request_change(Down));
        assert!(!heading.request_change(Left));
        tick(&mut snake, &mut field, None).unwrap();
        assert_eq!(snake.head(), (4, 3));

        assert!(heading.request_change(Left));
        tick(&mut snake, &mut field, None).unwrap();
        assert_eq!(snake.head(), (4, 2));
    }

    #[test]
    fn test_with_segments_marks_whole_body() {
        let mut field = bordered(8, 6);
        let snake = Snake::with_segments(&mut field, (2, 3), &[(2, 2), (3, 2)], Up);

        assert_eq!(snake.head(), (2, 3));
        assert_eq!(snake.segments(), &[(2, 3), (2, 2), (3, 2)]);
        assert_eq!(snake.direction(), Up);
        assert_occupancy(&snake, &field);
    }

    #[test]
    fn test_draw() {
        let mut field = bordered(8, 5);
        let mut snake = Snake::spawn_at(&mut field, (2, 1), Right);
        tick(&mut snake, &mut field, Some((2, 2))).unwrap();

        let mut canvas = Canvas::new(8, 5);
        snake.draw(&mut canvas);
        canvas.refresh().unwrap();
        assert_eq!(canvas.find('X'), vec![(2, 2), (2, 3)]);
    }
}
