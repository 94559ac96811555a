use std::path::PathBuf;

use chip8vm::{Config, Quirks};
use clap::Parser;

pub const DEFAULT_INSTRUCTIONS_PER_SECOND: u64 = 700;
/// Timers always count down at this rate; the driver also renders once per tick.
pub const TIMER_HZ: u64 = 60;

#[derive(Parser, Debug)]
#[command(version, about = "Run a CHIP-8 program in the terminal")]
pub struct Args {
    /// Raw program image, loaded at 0x200
    pub rom: PathBuf,

    /// Instructions executed per second, spread evenly over 60 frames
    #[arg(long, default_value_t = DEFAULT_INSTRUCTIONS_PER_SECOND)]
    pub ips: u64,

    /// Seed for the random number instruction
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop on an unsupported opcode instead of skipping it
    #[arg(long)]
    pub halt_on_unsupported: bool,

    /// 8xy6/8xyE shift Vy into Vx
    #[arg(long)]
    pub shift_reads_vy: bool,

    /// 8xy1/8xy2/8xy3 clear VF
    #[arg(long)]
    pub logic_resets_flag: bool,

    /// Fx55/Fx65 advance I past the transferred bytes
    #[arg(long)]
    pub load_store_advances_index: bool,
}

pub struct Settings {
    pub ips: u64,
    pub rom: PathBuf,
    pub halt_on_unsupported: bool,
    pub config: Config,
}

/// Spreads `ips` instructions over the 60 frames of each second. The part of
/// `ips` that does not divide evenly is carried into later frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepBudget {
    ips: u64,
    carry: u64,
}

impl StepBudget {
    pub fn new(ips: u64) -> Self {
        StepBudget { ips, carry: 0 }
    }

    /// Instructions to execute in the next frame.
    pub fn next_frame(&mut self) -> u64 {
        let total = self.carry + self.ips;
        self.carry = total % TIMER_HZ;
        total / TIMER_HZ
    }
}

impl Settings {
    pub fn step_budget(&self) -> StepBudget {
        StepBudget::new(self.ips)
    }
}

impl From<Args> for Settings {
    fn from(args: Args) -> Self {
        let quirks = Quirks {
            shift_reads_vy: args.shift_reads_vy,
            logic_resets_flag: args.logic_resets_flag,
            load_store_advances_index: args.load_store_advances_index,
        };
        Settings {
            ips: args.ips,
            rom: args.rom,
            halt_on_unsupported: args.halt_on_unsupported,
            config: Config {
                seed: args.seed,
                ..Config::default()
            }
            .with_quirks(quirks),
        }
    }
}
