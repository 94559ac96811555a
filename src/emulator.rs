use std::time::{Duration, Instant};

use anyhow::Context;
use chip8vm::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, Framebuffer, Key, Machine, RegisterSnapshot, StepOutcome,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::cli::{Settings, StepBudget, TIMER_HZ};

pub struct Emulator {
    vm: Machine,
    settings: Settings,
    budget: StepBudget,
}

/// Host keyboard layout: the left-hand 4x4 block stands in for the hex keypad.
fn map_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Char('1') => Key::Key1,
        KeyCode::Char('2') => Key::Key2,
        KeyCode::Char('3') => Key::Key3,
        KeyCode::Char('4') => Key::KeyC,
        KeyCode::Char('q') => Key::Key4,
        KeyCode::Char('w') => Key::Key5,
        KeyCode::Char('e') => Key::Key6,
        KeyCode::Char('r') => Key::KeyD,
        KeyCode::Char('a') => Key::Key7,
        KeyCode::Char('s') => Key::Key8,
        KeyCode::Char('d') => Key::Key9,
        KeyCode::Char('f') => Key::KeyE,
        KeyCode::Char('z') => Key::KeyA,
        KeyCode::Char('x') => Key::Key0,
        KeyCode::Char('c') => Key::KeyB,
        KeyCode::Char('v') => Key::KeyF,
        _ => return None,
    };
    Some(key)
}

fn render_screen(framebuffer: &Framebuffer) -> String {
    let mut screen = String::with_capacity(DISPLAY_WIDTH * DISPLAY_HEIGHT + DISPLAY_HEIGHT);
    for y in 0..DISPLAY_HEIGHT {
        for x in 0..DISPLAY_WIDTH {
            screen.push(if framebuffer.pixel(x, y) { '█' } else { ' ' });
        }
        screen.push('\n');
    }
    screen
}

fn render_registers(regs: &RegisterSnapshot) -> String {
    let v: Vec<String> = regs.v.iter().map(|value| format!("{value:02X}")).collect();
    format!(
        "V: {}\nI: {:03X}  PC: {:03X}  SP: {}  DT: {:02X}  ST: {:02X}",
        v.join(" "),
        regs.i,
        regs.pc,
        regs.sp,
        regs.delay,
        regs.sound
    )
}

impl Emulator {
    pub fn new(settings: Settings) -> Self {
        Emulator {
            vm: Machine::new(settings.config),
            budget: settings.step_budget(),
            settings,
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame, area: Rect, rom_name: &str) {
        let game_width = (DISPLAY_WIDTH as u16) + 2;
        let game_height = (DISPLAY_HEIGHT as u16) + 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(game_height),
                Constraint::Length(4),
                Constraint::Min(0),
            ])
            .split(area);

        let game_area = if chunks[0].width > game_width {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Min(0),
                    Constraint::Length(game_width),
                    Constraint::Min(0),
                ])
                .split(chunks[0])[1]
        } else {
            chunks[0]
        };

        let game = Paragraph::new(render_screen(&self.vm.framebuffer()))
            .block(Block::default().borders(Borders::ALL).title(rom_name))
            .style(Style::default().fg(Color::White));
        frame.render_widget(game, game_area);

        let title = if self.vm.is_waiting_for_key() {
            "Registers (waiting for key)"
        } else {
            "Registers"
        };
        let registers = Paragraph::new(render_registers(&self.vm.registers()))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(title))
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(registers, chunks[1]);
    }

    /// Drains pending terminal events. Returns `false` once Esc is pressed.
    fn poll_input(&mut self) -> anyhow::Result<bool> {
        while event::poll(Duration::ZERO)? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if key.code == KeyCode::Esc {
                return Ok(false);
            }
            if let Some(mapped) = map_key(key.code) {
                self.vm.set_key(usize::from(mapped.index()), true)?;
            }
        }
        Ok(true)
    }

    fn run_frame(&mut self) -> anyhow::Result<()> {
        self.vm.tick_timers();

        for _ in 0..self.budget.next_frame() {
            match self.vm.step() {
                Ok(StepOutcome::Executed(instruction)) => {
                    log::trace!("executed {instruction:?}");
                }
                Ok(StepOutcome::WaitingForKey) => {
                    log::debug!("waiting for key at {:#05X}", self.vm.registers().pc);
                    break;
                }
                Err(err) if !err.is_fatal() && !self.settings.halt_on_unsupported => {
                    log::warn!("skipping: {err}");
                }
                Err(err) => {
                    log::error!("halting: {err}");
                    return Err(err.into());
                }
            }
        }
        Ok(())
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        let rom_data = std::fs::read(&self.settings.rom)
            .with_context(|| format!("reading {}", self.settings.rom.display()))?;
        self.vm.load(&rom_data)?;
        log::info!(
            "loaded {} bytes from {}",
            rom_data.len(),
            self.settings.rom.display()
        );

        let rom_stem: String = self
            .settings
            .rom
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Unknown ROM".to_string());

        enable_raw_mode()?;
        let result = self.main_loop(&rom_stem);
        disable_raw_mode()?;
        result
    }

    fn main_loop(&mut self, rom_name: &str) -> anyhow::Result<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / TIMER_HZ as f64);
        let backend = CrosstermBackend::new(std::io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        loop {
            let frame_start = Instant::now();

            if !self.poll_input()? {
                break;
            }
            self.run_frame()?;
            terminal.draw(|frame| {
                let area = frame.area();
                self.draw(frame, area, rom_name);
            })?;

            // Terminals do not report key releases, so a press lasts one frame.
            self.vm.release_all_keys();

            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                std::thread::sleep(frame_duration - elapsed);
            }
        }
        terminal.clear()?;
        Ok(())
    }
}
