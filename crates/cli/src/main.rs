//! # W65C02 CLI
//!
//! 生のバイナリイメージを64KiB RAMに読み込み、W65C02コアで実行するホスト

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use w65c02_core::{Bus, Cpu, Ram, RunMode, RESET_VECTOR};

/// W65C02 エミュレータ CLI
#[derive(Parser, Debug)]
#[command(name = "w65c02")]
#[command(about = "Run a raw 65C02 program image until it halts or traps", long_about = None)]
struct Args {
    /// イメージファイルのパス
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    /// ロードアドレス（16進数）
    #[arg(long, default_value = "0x0000", value_parser = parse_address)]
    origin: u16,

    /// リセット後に設定するPC（16進数）
    #[arg(long, value_parser = parse_address)]
    entry: Option<u16>,

    /// リセット前に$FFFC/$FFFDへ書き込むベクタ（16進数）
    #[arg(long, value_parser = parse_address)]
    reset_vector: Option<u16>,

    /// 1回のrun呼び出しあたりの予算
    #[arg(long, default_value_t = 1_000_000)]
    budget: i32,

    /// 予算の単位（cycles | instructions）
    #[arg(long, default_value_t = RunMode::CycleCount)]
    mode: RunMode,

    /// run呼び出しの最大回数
    #[arg(long, default_value_t = 10_000)]
    max_slices: u64,

    /// 成功とみなすトラップアドレス（16進数）
    #[arg(long, value_parser = parse_address)]
    success: Option<u16>,

    /// リセット時のSP（16進数）
    #[arg(long, value_parser = parse_byte)]
    sp: Option<u8>,

    /// リセット時のステータス（16進数）
    #[arg(long, value_parser = parse_byte)]
    status: Option<u8>,
}

/// 実行の終了理由
#[derive(Debug, PartialEq)]
enum Outcome {
    Stopped,
    Waiting,
    Trapped(u16),
    SliceLimit,
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    // イメージの読み込み
    let image = std::fs::read(&args.image)
        .with_context(|| format!("failed to read image {}", args.image.display()))?;
    let mut ram = Ram::new();
    ram.load(args.origin, &image)
        .with_context(|| format!("failed to load {}", args.image.display()))?;
    log::info!(
        "Loaded {} bytes at ${:04X} from {:?}",
        image.len(),
        args.origin,
        args.image
    );

    if let Some(vector) = args.reset_vector {
        ram.set_vector(RESET_VECTOR, vector);
    }

    // CPUの初期化
    let mut cpu = Cpu::new(ram);
    if let Some(sp) = args.sp {
        cpu.set_reset_sp(sp);
    }
    if let Some(status) = args.status {
        cpu.set_reset_status(status);
    }
    cpu.reset();
    if let Some(entry) = args.entry {
        cpu.set_pc(entry);
    }

    let mut cycles = 0;
    let (outcome, slices) = run_slices(&mut cpu, &mut cycles, &args);
    log::info!(
        "Finished after {} slice(s), {} cycles: {:?}",
        slices,
        cycles,
        outcome
    );

    println!("{:?}", cpu);
    println!("cycles: {}", cycles);

    let passed = match (outcome, args.success) {
        (Outcome::Trapped(pc), Some(success)) if pc == success => {
            println!("PASSED: trapped at ${:04X}", pc);
            true
        }
        (Outcome::Trapped(pc), Some(success)) => {
            log::warn!("Trapped at ${:04X}, expected ${:04X}", pc, success);
            println!("FAILED: trapped at ${:04X}", pc);
            false
        }
        (outcome, Some(_)) => {
            println!("FAILED: {:?}", outcome);
            false
        }
        (_, None) => true,
    };

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Runs `budget`-sized slices until the CPU halts, the PC stops moving or the
/// slice limit is reached.
fn run_slices<B: Bus>(cpu: &mut Cpu<B>, cycles: &mut u64, args: &Args) -> (Outcome, u64) {
    let mut slices = 0;
    while slices < args.max_slices {
        let start_pc = cpu.pc();
        cpu.run(args.budget, cycles, args.mode);
        slices += 1;

        if cpu.is_stopped() {
            return (Outcome::Stopped, slices);
        }
        if cpu.is_waiting() {
            return (Outcome::Waiting, slices);
        }
        if cpu.pc() == start_pc && is_trap(cpu) {
            return (Outcome::Trapped(start_pc), slices);
        }
    }
    (Outcome::SliceLimit, slices)
}

/// A branch or jump whose target is its own address.
fn is_trap<B: Bus>(cpu: &mut Cpu<B>) -> bool {
    let pc = cpu.pc();
    let bus = cpu.bus_mut();
    match bus.read(pc) {
        // JMP abs
        0x4C => bus.read_word(pc.wrapping_add(1)) == pc,
        // BRA / Bcc with offset -2
        0x80 | 0x10 | 0x30 | 0x50 | 0x70 | 0x90 | 0xB0 | 0xD0 | 0xF0 => {
            bus.read(pc.wrapping_add(1)) == 0xFE
        }
        _ => false,
    }
}

fn parse_address(s: &str) -> Result<u16, String> {
    u16::from_str_radix(strip_hex_prefix(s), 16).map_err(|e| format!("invalid address `{}`: {}", s, e))
}

fn parse_byte(s: &str) -> Result<u8, String> {
    u8::from_str_radix(strip_hex_prefix(s), 16).map_err(|e| format!("invalid byte `{}`: {}", s, e))
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .or_else(|| s.strip_prefix('$'))
        .unwrap_or(s)
}
