//! Terminal front end for the rubik3d cube engine
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{self},
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

use rubik3d_core::{Command, Config, CubeModel, Move, Renderer};

pub mod canvas;
pub mod input;
pub mod overlay;

pub use canvas::TerminalCanvas;
use input::{action_for_key, Action, DragTracker};

/// Main application struct: owns the cube, the renderer and the cell buffer
pub struct TerminalApp {
    config: Config,
    cube: CubeModel,
    renderer: Renderer,
    canvas: TerminalCanvas,
    rng: StdRng,
    drag: DragTracker,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// Create an app sized to the current terminal.
    ///
    /// `seed` makes scrambles reproducible; without one the RNG is seeded
    /// from the OS.
    pub fn new(config: Config, seed: Option<u64>) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(config, seed, width, height))
    }

    pub fn with_size(config: Config, seed: Option<u64>, width: u16, height: u16) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            cube: CubeModel::with_config(config.cube.clone()),
            renderer: Renderer::with_config(&config.render),
            canvas: TerminalCanvas::new(width, height),
            config,
            rng,
            drag: DragTracker::default(),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn cube(&self) -> &CubeModel {
        &self.cube
    }

    pub fn canvas(&self) -> &TerminalCanvas {
        &self.canvas
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Scramble with the app's RNG, returning the applied moves
    pub fn scramble(&mut self, moves: usize) -> Vec<Move> {
        self.cube.scramble_with(moves, &mut self.rng)
    }

    /// Take over the terminal, run until quit, and restore it afterwards
    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let setup = execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        );

        let result = setup.and_then(|()| self.main_loop());

        // Cleanup runs whatever the loop returned
        let restored = execute!(
            stdout(),
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        terminal::disable_raw_mode()?;

        result.and(restored)
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_secs_f64(1.0 / self.config.terminal.target_fps as f64);
        info!(
            "Entering main loop at {}x{}, target {} fps",
            self.canvas.width(),
            self.canvas.height(),
            self.config.terminal.target_fps
        );

        while self.running {
            let frame_start = Instant::now();

            // Drain pending input without blocking the frame
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event, Instant::now());
            }

            self.update(Instant::now());

            let mut stdout = stdout();
            self.render();
            self.canvas.draw(&mut stdout)?;
            stdout.flush()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        info!("Main loop finished");
        Ok(())
    }

    /// React to one terminal event
    pub fn handle_event(&mut self, event: Event, now: Instant) {
        let terminal_config = &self.config.terminal;
        let action = match event {
            Event::Key(key) => action_for_key(key, terminal_config.camera_step, terminal_config.scramble_moves),
            Event::Mouse(mouse) => self
                .drag
                .handle(mouse, terminal_config.camera_step)
                .map(Action::Cube),
            Event::Resize(width, height) => {
                debug!("Terminal resized to {width}x{height}");
                self.canvas.resize(width, height);
                None
            }
            _ => None,
        };

        match action {
            Some(Action::Quit) => self.running = false,
            Some(Action::Cube(Command::Scramble(moves))) => {
                self.scramble(moves);
            }
            Some(Action::Cube(command)) => self.cube.apply(command, now),
            None => {}
        }
    }

    fn update(&mut self, now: Instant) {
        self.cube.tick(now);
    }

    /// Redraw the cell buffer: cube plus overlay, or the resize request
    pub fn render(&mut self) {
        let terminal_config = &self.config.terminal;
        if self.canvas.width() < terminal_config.min_width
            || self.canvas.height() < terminal_config.min_height
        {
            overlay::draw_resize_message(
                &mut self.canvas,
                terminal_config.min_width,
                terminal_config.min_height,
            );
            return;
        }

        self.canvas.clear();
        self.renderer.draw(&self.cube, &mut self.canvas);
        overlay::draw_overlay(&mut self.canvas, &self.cube, self.fps);
    }
}
