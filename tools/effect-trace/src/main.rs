//! # effect-trace
//!
//! 动画曲线调试工具：按配置启动一个动画，逐 tick 推进，
//! 每个 tick 输出一行 JSON（原始进度、缓动后进度、方向），最后输出汇总。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p effect-trace -- --direction in_out_in --increment 0.5 --secondary-increment 0.25
//! cargo run -p effect-trace -- --config effects.json --effect ease_out
//! RUST_LOG=effect_engine=debug cargo run -p effect-trace -- --direction in_out_repeating_in --max-ticks 40
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use effect_engine::{
    AnimationDirection, AnimationEngine, EffectType, EngineConfig, EngineMode, Point,
};
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "effect-trace")]
#[command(about = "动画曲线调试工具 - 逐 tick 输出进度")]
#[command(version)]
struct Cli {
    /// 动画方向（in, out, in_out_in, in_out_out, in_out_repeating_in, in_out_repeating_out）
    #[arg(short, long, default_value = "in")]
    direction: String,

    /// 配置文件（JSON），命令行参数覆盖其中的值
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 缓动效果（linear, ease_out, ease_in_out, custom_quadratic）
    #[arg(short, long)]
    effect: Option<String>,

    /// 主步长
    #[arg(long)]
    increment: Option<f64>,

    /// 往返下降阶段步长
    #[arg(long)]
    secondary_increment: Option<f64>,

    /// 使用多实例模式
    #[arg(long)]
    multiple: bool,

    /// 最多推进的 tick 数（循环动画不会自行结束）
    #[arg(long, default_value_t = 10_000)]
    max_ticks: u32,
}

/// 单个 tick 的输出
#[derive(Debug, Clone, PartialEq, Serialize)]
struct TickLine {
    tick: u32,
    raw: f64,
    eased: f64,
    direction: String,
}

/// 汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
struct Summary {
    ticks: u32,
    finished: bool,
    remaining: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("effect-trace error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;
    info!(
        mode = ?config.mode,
        increment = config.increment,
        secondary_increment = config.secondary_increment,
        effect = %config.effect,
        "开始追踪"
    );

    let mut engine: AnimationEngine<()> = AnimationEngine::from_config(&config)?;
    engine.start_new_animation_named(&cli.direction, Point::origin(), None)?;

    let (lines, summary) = trace(&mut engine, cli.max_ticks)?;
    for line in &lines {
        println!("{}", serde_json::to_string(line)?);
    }
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

/// 合并配置文件与命令行参数
fn build_config(cli: &Cli) -> anyhow::Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    if let Some(effect) = &cli.effect {
        config.effect = effect.parse::<EffectType>()?;
    }
    if let Some(increment) = cli.increment {
        config.increment = increment;
    }
    if let Some(secondary) = cli.secondary_increment {
        config.secondary_increment = secondary;
    }
    if cli.multiple {
        config.mode = EngineMode::Multiple;
    }

    config.validate()?;
    Ok(config)
}

/// 推进到结束或达到 `max_ticks`
///
/// 每个 tick 记录第一个实例。
fn trace(
    engine: &mut AnimationEngine<()>,
    max_ticks: u32,
) -> anyhow::Result<(Vec<TickLine>, Summary)> {
    let mut lines = Vec::new();
    let mut last: Option<TickLine> = None;
    let mut ticks = 0;

    while engine.is_animating() && ticks < max_ticks {
        engine.advance();
        ticks += 1;

        let line = if engine.raw_progress_at(0).is_ok() {
            TickLine {
                tick: ticks,
                raw: engine.raw_progress_at(0)?,
                eased: engine.progress_at(0)?,
                direction: engine.direction_at(0)?.to_string(),
            }
        } else {
            // 多实例模式下实例已被清除：停在该方向的结束边界上
            let previous = last
                .clone()
                .ok_or_else(|| anyhow::anyhow!("没有可追踪的动画实例"))?;
            let direction: AnimationDirection = previous.direction.parse()?;
            let raw = if direction.is_rising() { 1.0 } else { 0.0 };
            TickLine {
                tick: ticks,
                raw,
                eased: engine.effect().calculate(raw),
                direction: previous.direction,
            }
        };

        last = Some(line.clone());
        lines.push(line);
    }

    let summary = Summary {
        ticks,
        finished: !engine.is_animating(),
        remaining: engine.animation_count(),
    };
    Ok((lines, summary))
}
