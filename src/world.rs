use std::{sync::Arc, thread, time::Duration};

use anyhow::Result;
use log::{debug, info, trace};
use rand::Rng;

use crate::{
    config::GameConfig,
    entities::{Border, Info, Mouse},
    error::GameOver,
    field::GameField,
    input::{InputRelay, KeySource, Subscriber},
    snake::{ActionContext, Effect, Snake},
    surface::Surface,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Kind {
    Border,
    Info,
    Snake,
    Mouse,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Capability {
    Actionable,
    Drawable,
    Subscriber,
    Finalizer,
}

pub enum GameObject {
    Border(Border),
    Info(Info),
    Snake(Snake),
    Mouse(Mouse),
}

impl GameObject {
    pub fn kind(&self) -> Kind {
        match self {
            GameObject::Border(_) => Kind::Border,
            GameObject::Info(_) => Kind::Info,
            GameObject::Snake(_) => Kind::Snake,
            GameObject::Mouse(_) => Kind::Mouse,
        }
    }

    pub fn has(&self, capability: Capability) -> bool {
        match (self, capability) {
            (_, Capability::Drawable) => true,
            (GameObject::Snake(_), Capability::Actionable)
            | (GameObject::Snake(_), Capability::Subscriber) => true,
            (GameObject::Info(_), Capability::Finalizer) => true,
            _ => false,
        }
    }

    fn action(&mut self, ctx: &mut ActionContext) -> Result<Option<Effect>, GameOver> {
        match self {
            GameObject::Snake(snake) => snake.action(ctx),
            _ => Ok(None),
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        match self {
            GameObject::Border(border) => border.draw(surface),
            GameObject::Info(info) => info.draw(surface),
            GameObject::Snake(snake) => snake.draw(surface),
            GameObject::Mouse(mouse) => mouse.draw(surface),
        }
    }

    fn subscriber(&self) -> Option<Arc<dyn Subscriber>> {
        match self {
            GameObject::Snake(snake) => Some(snake.heading()),
            _ => None,
        }
    }

    fn finalize(&mut self, message: &str) {
        if let GameObject::Info(info) = self {
            info.finalize(message);
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    GameOver(GameOver),
}

/// Owns every game object and drives them at a fixed tick period, while the
/// input relay feeds key presses from its own thread.
pub struct GameWorld<S, R> {
    objects: Vec<GameObject>,
    field: GameField,
    relay: InputRelay,
    surface: S,
    rng: R,
    tick_period: Duration,
    ticks: u64,
}

impl<S: Surface, R: Rng> GameWorld<S, R> {
    pub fn new(
        field: GameField,
        surface: S,
        keys: Box<dyn KeySource>,
        rng: R,
        tick_period: Duration,
    ) -> Self {
        GameWorld {
            objects: vec![],
            field,
            relay: InputRelay::new(keys),
            surface,
            rng,
            tick_period,
            ticks: 0,
        }
    }

    /// The regular board: score panel, walls, a snake and a mouse on random free cells.
    pub fn classic(
        config: &GameConfig,
        surface: S,
        keys: Box<dyn KeySource>,
        rng: R,
    ) -> Result<Self, GameOver> {
        let field = GameField::new(config.board_width, config.board_height);
        let mut world = Self::new(field, surface, keys, rng, config.tick_period);

        let info = Info::new(config.board_height, config.info_height, config.board_width);
        world.add(GameObject::Info(info));
        let border = Border::new(&mut world.field);
        world.add(GameObject::Border(border));
        let snake = Snake::new(&mut world.field, &mut world.rng)?;
        world.add(GameObject::Snake(snake));
        let mouse = world.field.free_cell(&mut world.rng)?;
        world.add(GameObject::Mouse(Mouse::new(mouse)));

        Ok(world)
    }

    pub fn add(&mut self, object: GameObject) {
        if let Some(subscriber) = object.subscriber() {
            self.relay.add_subscriber(subscriber);
        }
        self.objects.push(object);
    }

    /// Drops every object of the given kind.
    pub fn remove(&mut self, kind: Kind) {
        self.objects.retain(|object| object.kind() != kind);
    }

    pub fn get(&self, kind: Kind) -> Option<&GameObject> {
        self.objects.iter().find(|object| object.kind() == kind)
    }

    pub fn kinds(&self) -> Vec<Kind> {
        self.objects.iter().map(GameObject::kind).collect()
    }

    pub fn snake(&self) -> Option<&Snake> {
        match self.get(Kind::Snake) {
            Some(GameObject::Snake(snake)) => Some(snake),
            _ => None,
        }
    }

    pub fn info(&self) -> Option<&Info> {
        match self.get(Kind::Info) {
            Some(GameObject::Info(info)) => Some(info),
            _ => None,
        }
    }

    pub fn mouse(&self) -> Option<&Mouse> {
        match self.get(Kind::Mouse) {
            Some(GameObject::Mouse(mouse)) => Some(mouse),
            _ => None,
        }
    }

    pub fn field(&self) -> &GameField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut GameField {
        &mut self.field
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Plays until the game is over. The input thread is stopped and joined
    /// before this returns, whatever the result.
    pub fn run(&mut self) -> Result<GameOver> {
        self.relay.start()?;
        info!("game started");

        let played = self.play_out();
        let stopped = self.relay.stop_and_join();
        let cause = played?;
        stopped?;

        let score = self.info().map_or(0, Info::score);
        info!("game over after {} ticks: {}, score {}", self.ticks, cause, score);
        Ok(cause)
    }

    /// A single tick without the trailing sleep. Nothing is drawn when the
    /// game ends during it. A dead input thread ends the game as a quit.
    pub fn tick(&mut self) -> Result<Outcome> {
        self.surface.clear();
        if self.relay.is_interrupted() {
            return Ok(Outcome::GameOver(GameOver::Quit));
        }
        if let Err(cause) = self.perform_actions() {
            return Ok(Outcome::GameOver(cause));
        }

        self.draw_objects();
        self.surface.refresh()?;
        self.ticks += 1;
        trace!("tick {}", self.ticks);
        Ok(Outcome::Continue)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn play_out(&mut self) -> Result<GameOver> {
        let cause = loop {
            match self.tick()? {
                Outcome::Continue => thread::sleep(self.tick_period),
                Outcome::GameOver(cause) => break cause,
            }
        };

        let message = cause.to_string();
        for object in self.objects.iter_mut().filter(|o| o.has(Capability::Finalizer)) {
            object.finalize(&message);
        }

        self.draw_objects();
        self.surface.refresh()?;
        Ok(cause)
    }

    fn perform_actions(&mut self) -> Result<(), GameOver> {
        let mouse = self.mouse().map(Mouse::pos);
        let mut effects = vec![];

        for object in self.objects.iter_mut().filter(|o| o.has(Capability::Actionable)) {
            let mut ctx = ActionContext { field: &mut self.field, mouse };
            effects.extend(object.action(&mut ctx)?);
        }

        for effect in effects {
            self.apply(effect)?;
        }
        Ok(())
    }

    fn apply(&mut self, effect: Effect) -> Result<(), GameOver> {
        match effect {
            Effect::MouseEaten => {
                let info = self.objects.iter_mut().find(|o| o.kind() == Kind::Info);
                if let Some(GameObject::Info(info)) = info {
                    info.add_point();
                }

                self.remove(Kind::Mouse);
                let pos = self.field.free_cell(&mut self.rng)?;
                debug!("mouse respawned at {:?}", pos);
                self.add(GameObject::Mouse(Mouse::new(pos)));
            }
        }
        Ok(())
    }

    fn draw_objects(&mut self) {
        for object in self.objects.iter().filter(|o| o.has(Capability::Drawable)) {
            object.draw(&mut self.surface);
        }
    }
}
