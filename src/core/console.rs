//! Drop-down text console for tweaking settings at runtime.

use tracing::info;

use crate::config::Config;
use crate::core::doors::DoorRegistry;
use crate::core::player::Player;

const MAX_LOG: usize = 200;
const MAX_HISTORY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleAction { None, Quit }

#[derive(Debug, Default)]
pub struct Console {
    pub open: bool,
    pub input: String,
    history: Vec<String>,
    /// `None` while editing a fresh line.
    history_index: Option<usize>,
    log: Vec<String>,
}

/// What the console commands may read and change.
pub struct ConsoleContext<'a> {
    pub cfg: &'a mut Config,
    pub player: &'a Player,
    pub doors: &'a DoorRegistry,
}

impl Console {
    pub fn log(&self) -> &[String] { &self.log }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
        self.history_index = None;
    }

    pub fn push_char(&mut self, c: char) {
        if !c.is_control() {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    fn add_line(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
        if self.log.len() > MAX_LOG {
            let excess = self.log.len() - MAX_LOG;
            self.log.drain(..excess);
        }
    }

    pub fn history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let i = match self.history_index {
            None => self.history.len() - 1,
            Some(i) => i.saturating_sub(1),
        };
        self.history_index = Some(i);
        self.input = self.history[i].clone();
    }

    pub fn history_down(&mut self) {
        let Some(i) = self.history_index else { return };
        if i + 1 >= self.history.len() {
            self.history_index = None;
            self.input.clear();
        } else {
            self.history_index = Some(i + 1);
            self.input = self.history[i + 1].clone();
        }
    }

    /// Runs the current input line and clears it.
    pub fn submit(&mut self, ctx: ConsoleContext<'_>) -> ConsoleAction {
        let line = std::mem::take(&mut self.input);
        let trimmed = line.trim();
        self.history_index = None;
        if trimmed.is_empty() {
            return ConsoleAction::None;
        }
        self.history.push(trimmed.to_string());
        if self.history.len() > MAX_HISTORY {
            let excess = self.history.len() - MAX_HISTORY;
            self.history.drain(..excess);
        }
        self.execute(trimmed, ctx)
    }

    pub fn execute(&mut self, cmd: &str, mut ctx: ConsoleContext<'_>) -> ConsoleAction {
        self.add_line(format!("> {cmd}"));
        info!(command = cmd, "console");
        let lowered = cmd.to_lowercase();
        let tokens: Vec<&str> = lowered.split_whitespace().collect();
        let Some((&name, args)) = tokens.split_first() else {
            return ConsoleAction::None;
        };
        let arg = args.first().and_then(|s| s.parse::<f32>().ok());

        match name {
            "help" => {
                for line in [
                    "Commands:",
                    "  help               - Show this help",
                    "  clear              - Clear console output",
                    "  pos                - Print player position",
                    "  speed              - Show movement speeds",
                    "  set_speed <v>      - Set walk speed",
                    "  set_sprint <v>     - Set sprint speed",
                    "  wall_height <v>    - Set wall height scale",
                    "  show_fps           - Toggle FPS counter",
                    "  doors              - List doors and their state",
                    "  quit/exit          - Quit the game",
                ] {
                    self.add_line(line);
                }
            }
            "clear" => self.log.clear(),
            "pos" => {
                let p = ctx.player.pos;
                self.add_line(format!("pos: ({:.2}, {:.2})", p.x, p.y));
            }
            "speed" => {
                let line = format!("walk={:.2} sprint={:.2}", ctx.cfg.move_speed, ctx.cfg.sprint_speed);
                self.add_line(line);
            }
            "set_speed" if !args.is_empty() => match arg {
                Some(v) if v > 0.0 => {
                    ctx.cfg.move_speed = v;
                    self.add_line(format!("walk speed set to {v:.2}"));
                }
                _ => self.add_line("Invalid speed value"),
            },
            "set_sprint" if !args.is_empty() => match arg {
                Some(v) if v > 0.0 => {
                    ctx.cfg.sprint_speed = v;
                    self.add_line(format!("sprint speed set to {v:.2}"));
                }
                _ => self.add_line("Invalid sprint value"),
            },
            "wall_height" if !args.is_empty() => match arg {
                Some(v) if v > 0.1 => {
                    ctx.cfg.wall_height = v;
                    self.add_line(format!("wall height set to {v:.2}"));
                }
                _ => self.add_line("Invalid wall height value"),
            },
            "show_fps" => {
                ctx.cfg.show_fps = !ctx.cfg.show_fps;
                let state = if ctx.cfg.show_fps { "enabled" } else { "disabled" };
                self.add_line(format!("FPS display {state}"));
            }
            "doors" if ctx.doors.is_empty() => self.add_line("No doors on this map"),
            "doors" => {
                self.add_line(format!("{} doors", ctx.doors.len()));
                let lines: Vec<String> = ctx
                    .doors
                    .iter()
                    .map(|d| {
                        let (x, y) = d.cell();
                        format!("  ({x}, {y}) {:?} open={:.2}", d.state(), d.open_fraction)
                    })
                    .collect();
                for line in lines {
                    self.add_line(line);
                }
            }
            "quit" | "exit" => return ConsoleAction::Quit,
            other => self.add_line(format!("Unknown command: {other}")),
        }
        ConsoleAction::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::Grid;

    struct Fixture {
        cfg: Config,
        player: Player,
        doors: DoorRegistry,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                cfg: Config::default(),
                player: Player::new(2.25, 3.5, 0.0, 0.66),
                doors: DoorRegistry::from_grid(&Grid::demo()),
            }
        }

        fn ctx(&mut self) -> ConsoleContext<'_> {
            ConsoleContext { cfg: &mut self.cfg, player: &self.player, doors: &self.doors }
        }
    }

    fn run(console: &mut Console, fx: &mut Fixture, line: &str) -> ConsoleAction {
        console.input = line.to_string();
        console.submit(fx.ctx())
    }

    #[test]
    fn set_speed_and_reject_bad_values() {
        let mut c = Console::default();
        let mut fx = Fixture::new();
        run(&mut c, &mut fx, "SET_SPEED 4.5");
        assert_eq!(fx.cfg.move_speed, 4.5);
        run(&mut c, &mut fx, "set_speed -2");
        assert_eq!(fx.cfg.move_speed, 4.5);
        assert_eq!(c.log().last().unwrap(), "Invalid speed value");
        run(&mut c, &mut fx, "wall_height 0.05");
        assert_eq!(fx.cfg.wall_height, 1.0);
        run(&mut c, &mut fx, "wall_height 1.5");
        assert_eq!(fx.cfg.wall_height, 1.5);
    }

    #[test]
    fn pos_and_unknown() {
        let mut c = Console::default();
        let mut fx = Fixture::new();
        run(&mut c, &mut fx, "  pos ");
        assert_eq!(c.log(), &["> pos".to_string(), "pos: (2.25, 3.50)".to_string()]);
        run(&mut c, &mut fx, "fly");
        assert_eq!(c.log().last().unwrap(), "Unknown command: fly");
        // argument-less set_speed is not a known form
        run(&mut c, &mut fx, "set_speed");
        assert_eq!(c.log().last().unwrap(), "Unknown command: set_speed");
    }

    #[test]
    fn quit_and_toggles() {
        let mut c = Console::default();
        let mut fx = Fixture::new();
        assert_eq!(run(&mut c, &mut fx, "exit"), ConsoleAction::Quit);
        assert!(fx.cfg.show_fps);
        run(&mut c, &mut fx, "show_fps");
        assert!(!fx.cfg.show_fps);
        run(&mut c, &mut fx, "clear");
        assert!(c.log().is_empty());
    }

    #[test]
    fn doors_lists_every_door() {
        let mut c = Console::default();
        let mut fx = Fixture::new();
        run(&mut c, &mut fx, "doors");
        assert_eq!(c.log()[1], "4 doors");
        assert_eq!(c.log().len(), 2 + 4);
        assert!(c.log()[2].contains("Closed"));
    }

    #[test]
    fn doors_on_a_doorless_map() {
        let mut c = Console::default();
        let mut fx = Fixture::new();
        fx.doors = DoorRegistry::default();
        run(&mut c, &mut fx, "doors");
        assert_eq!(c.log(), &["> doors".to_string(), "No doors on this map".to_string()]);
    }

    #[test]
    fn history_walks_back_and_forward() {
        let mut c = Console::default();
        let mut fx = Fixture::new();
        run(&mut c, &mut fx, "pos");
        run(&mut c, &mut fx, "speed");
        c.history_up();
        assert_eq!(c.input, "speed");
        c.history_up();
        assert_eq!(c.input, "pos");
        c.history_up();
        assert_eq!(c.input, "pos");
        c.history_down();
        assert_eq!(c.input, "speed");
        c.history_down();
        assert_eq!(c.input, "");
    }

    #[test]
    fn log_is_bounded() {
        let mut c = Console::default();
        let mut fx = Fixture::new();
        for _ in 0..300 {
            run(&mut c, &mut fx, "pos");
        }
        assert_eq!(c.log().len(), MAX_LOG);
        assert_eq!(c.history.len(), MAX_HISTORY);
    }
}
