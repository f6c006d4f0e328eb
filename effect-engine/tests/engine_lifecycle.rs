//! # 引擎生命周期集成测试
//!
//! 通过公开 API 驱动完整的启动 → tick → 结束流程。
//! 这些测试不依赖真实的定时器，直接调用 `advance()` 模拟 tick 源。

use std::cell::RefCell;
use std::rc::Rc;

use effect_engine::{
    AnimationDirection, AnimationEngine, EffectError, EffectType, EngineMode, Point,
};

fn build_engine<D: 'static>(
    mode: EngineMode,
    increment: f64,
    secondary: f64,
) -> AnimationEngine<D> {
    AnimationEngine::new(mode)
        .with_increment(increment)
        .and_then(|engine| engine.with_secondary_increment(secondary))
        .unwrap()
}

/// 记录完成通知触发时的 tick 序号
fn finished_ticks<D: 'static>(engine: &mut AnimationEngine<D>) -> Rc<RefCell<Vec<u32>>> {
    let ticks = Rc::new(RefCell::new(Vec::new()));
    let counter = Rc::new(RefCell::new(0u32));

    let c = counter.clone();
    engine.on_progress(move |_| *c.borrow_mut() += 1);

    let t = ticks.clone();
    engine.on_finished(move |_| t.borrow_mut().push(*counter.borrow()));
    ticks
}

/// 所有方向、所有缓动效果下，每个 tick 后原始进度都在 [0, 1] 内
#[test]
fn test_progress_stays_in_bounds() {
    for mode in [EngineMode::Singular, EngineMode::Multiple] {
        for effect in EffectType::ALL {
            let mut engine: AnimationEngine<()> =
                build_engine(mode, 0.3, 0.7).with_effect(effect);
            for direction in AnimationDirection::ALL {
                engine.start_new_animation(direction);
            }

            for _ in 0..50 {
                engine.advance();
                for i in 0..engine.animation_count() {
                    let raw = engine.raw_progress_at(i).unwrap();
                    assert!((0.0..=1.0).contains(&raw), "{:?} {:?}: {}", mode, effect, raw);
                }
            }
        }
    }
}

/// In 动画，步长 0.1：第 10 个 tick 恰好到达 1.0 并触发完成通知
#[test]
fn test_in_animation_ten_ticks() {
    let mut engine: AnimationEngine<()> = build_engine(EngineMode::Singular, 0.1, 0.1);
    let finished = finished_ticks(&mut engine);

    engine.start_new_animation(AnimationDirection::In);
    let mut last = engine.progress().unwrap();
    for _ in 0..10 {
        engine.advance();
        let progress = engine.progress().unwrap();
        assert!(progress >= last);
        last = progress;
    }

    assert_eq!(engine.progress().unwrap(), 1.0);
    assert_eq!(*finished.borrow(), vec![10]);
    assert!(!engine.is_animating());
}

/// 每个启动/停止周期各触发一次完成通知
#[test]
fn test_finished_fires_once_per_cycle() {
    let mut engine: AnimationEngine<()> = build_engine(EngineMode::Singular, 0.25, 0.25);
    let finished = finished_ticks(&mut engine);

    engine.start_new_animation(AnimationDirection::In);
    while engine.is_animating() {
        engine.advance();
    }
    engine.advance();
    assert_eq!(*finished.borrow(), vec![4]);

    engine.start_new_animation(AnimationDirection::Out);
    while engine.is_animating() {
        engine.advance();
    }
    assert_eq!(*finished.borrow(), vec![4, 9]);
    assert_eq!(engine.raw_progress_at(0).unwrap(), 0.0);
}

/// 完成通知中接着启动下一个动画：tick 源不停，后续动画结束时再次通知
#[test]
fn test_finished_callback_chains_follow_up() {
    let mut engine: AnimationEngine<&'static str> = build_engine(EngineMode::Singular, 0.5, 0.5);
    let finished = finished_ticks(&mut engine);

    engine.on_finished(|engine| {
        if engine.direction().unwrap() == AnimationDirection::In {
            engine.start_new_animation_with(AnimationDirection::Out, (4.0, 4.0), Some("fade"));
        }
    });

    engine.start_new_animation(AnimationDirection::In);
    engine.advance();
    let report = engine.advance();
    assert!(report.finished);
    assert!(engine.is_animating());
    assert_eq!(engine.direction().unwrap(), AnimationDirection::Out);
    assert_eq!(engine.data().unwrap(), Some(&"fade"));
    assert_eq!(engine.raw_progress_at(0).unwrap(), 1.0);

    while engine.is_animating() {
        engine.advance();
    }
    assert_eq!(*finished.borrow(), vec![2, 4]);
    assert_eq!(engine.direction().unwrap(), AnimationDirection::Out);
}

/// 回调中新增的订阅在下一个 tick 生效，且不影响已有订阅
#[test]
fn test_subscribe_from_callback() {
    let mut engine: AnimationEngine<()> = build_engine(EngineMode::Multiple, 0.25, 0.25);
    let late_hits = Rc::new(RefCell::new(0u32));

    let hits = late_hits.clone();
    let mut registered = false;
    engine.on_progress(move |engine| {
        if !registered {
            registered = true;
            let h = hits.clone();
            engine.on_progress(move |_| *h.borrow_mut() += 1);
        }
    });

    engine.start_new_animation(AnimationDirection::In);
    engine.advance();
    assert_eq!(*late_hits.borrow(), 0);
    engine.advance();
    engine.advance();
    assert_eq!(*late_hits.borrow(), 2);
}

/// TickReport 中的活跃实例数
#[test]
fn test_tick_report_active_count() {
    let mut engine: AnimationEngine<()> = build_engine(EngineMode::Multiple, 0.5, 0.5);
    engine.start_new_animation(AnimationDirection::In);
    engine.start_new_animation(AnimationDirection::InOutRepeatingIn);

    let report = engine.advance();
    assert_eq!((report.removed, report.active), (0, 2));

    // In 到达 1.0 后被清除，循环动画仍活跃
    let report = engine.advance();
    assert_eq!((report.removed, report.active), (1, 1));
    assert!(!report.finished);

    let mut engine: AnimationEngine<()> = build_engine(EngineMode::Singular, 0.5, 0.5);
    engine.start_new_animation(AnimationDirection::In);
    engine.advance();
    // 单实例停在边界上但不再活跃
    let report = engine.advance();
    assert_eq!((report.removed, report.active), (0, 0));
    assert!(report.finished);
    assert_eq!(engine.animation_count(), 1);
}

/// 往返动画：上升 2 个 tick，下降 4 个 tick
#[test]
fn test_in_out_round_trip_six_ticks() {
    let mut engine: AnimationEngine<()> = build_engine(EngineMode::Singular, 0.5, 0.25);
    let finished = finished_ticks(&mut engine);

    engine.start_new_animation(AnimationDirection::InOutIn);

    let mut trace = Vec::new();
    for tick in 1..=6 {
        let report = engine.advance();
        trace.push(format!(
            "{} {:.2} {}{}",
            tick,
            engine.raw_progress_at(0).unwrap(),
            engine.direction().unwrap(),
            if report.finished { " finished" } else { "" }
        ));
    }

    insta::assert_snapshot!(trace.join("\n"), @r"
    1 0.50 in_out_in
    2 1.00 in_out_out
    3 0.75 in_out_out
    4 0.50 in_out_out
    5 0.25 in_out_out
    6 0.00 in_out_out finished
    ");
    assert_eq!(*finished.borrow(), vec![6]);
}

/// 单实例循环动画不会自行结束，直到被非循环动画替换
#[test]
fn test_repeating_singular_runs_until_replaced() {
    let mut engine: AnimationEngine<()> = build_engine(EngineMode::Singular, 0.1, 0.2);
    let finished = finished_ticks(&mut engine);

    engine.start_new_animation(AnimationDirection::InOutRepeatingIn);

    let mut seen_out = false;
    let mut seen_back_in = false;
    for _ in 0..1000 {
        engine.advance();
        match engine.direction().unwrap() {
            AnimationDirection::InOutRepeatingOut => seen_out = true,
            AnimationDirection::InOutRepeatingIn if seen_out => seen_back_in = true,
            _ => {}
        }
        assert!(engine.is_animating());
    }
    assert!(seen_out && seen_back_in);
    assert!(finished.borrow().is_empty());

    engine.start_new_animation(AnimationDirection::Out);
    assert_eq!(engine.direction().unwrap(), AnimationDirection::Out);
    for _ in 0..10 {
        engine.advance();
    }
    assert!(!engine.is_animating());
    assert_eq!(finished.borrow().len(), 1);
}

/// 多实例模式下循环动画永远不会被清除
#[test]
fn test_repeating_multiple_never_removed() {
    let mut engine: AnimationEngine<()> = build_engine(EngineMode::Multiple, 0.25, 0.25);
    engine.start_new_animation(AnimationDirection::InOutRepeatingOut);
    engine.start_new_animation(AnimationDirection::In);

    for _ in 0..200 {
        engine.advance();
    }

    assert_eq!(engine.animation_count(), 1);
    assert!(engine.direction_at(0).unwrap().is_repeating());
    assert!(engine.is_animating());
}

/// 多实例模式：每结束一个实例，数量恰好减一，且不影响其它活跃实例
#[test]
fn test_multiple_instances_complete_independently() {
    let mut engine: AnimationEngine<&'static str> = build_engine(EngineMode::Multiple, 0.25, 0.5);
    let finished = finished_ticks(&mut engine);

    engine.start_new_animation_with(AnimationDirection::In, (1.0, 1.0), Some("a"));
    engine.start_new_animation_with(AnimationDirection::InOutIn, (2.0, 2.0), Some("b"));
    engine.advance();
    engine.start_new_animation_with(AnimationDirection::Out, (3.0, 3.0), Some("c"));
    assert_eq!(engine.animation_count(), 3);

    let mut counts = Vec::new();
    while engine.is_animating() {
        let before = engine.animation_count();
        let report = engine.advance();
        let after = engine.animation_count();
        assert!(before - after <= 1);
        assert_eq!(before - after, report.removed);
        counts.push(after);
    }

    // tick 2..=6：a 在第 4 个 tick 结束，c 在第 5 个，b 在第 6 个
    assert_eq!(counts, vec![3, 3, 2, 1, 0]);
    assert_eq!(*finished.borrow(), vec![6]);
}

/// 清除实例后，剩余实例保持各自的起点与数据
#[test]
fn test_removal_preserves_remaining_records() {
    let mut engine: AnimationEngine<&'static str> = build_engine(EngineMode::Multiple, 0.25, 0.5);

    engine.start_new_animation_with(AnimationDirection::In, (1.0, 1.0), Some("a"));
    engine.start_new_animation_with(AnimationDirection::InOutIn, (2.0, 2.0), Some("b"));
    engine.advance();
    engine.start_new_animation_with(AnimationDirection::Out, (3.0, 3.0), Some("c"));

    for _ in 0..3 {
        engine.advance();
    }
    assert_eq!(engine.animation_count(), 2);
    assert_eq!(engine.data_at(0).unwrap(), Some(&"b"));
    assert_eq!(engine.source_at(0).unwrap(), Point::new(2.0, 2.0));
    assert_eq!(engine.direction_at(0).unwrap(), AnimationDirection::InOutOut);
    assert_eq!(engine.data_at(1).unwrap(), Some(&"c"));
    assert_eq!(engine.source_at(1).unwrap(), Point::new(3.0, 3.0));

    engine.advance();
    assert_eq!(engine.animation_count(), 1);
    assert_eq!(engine.data_at(0).unwrap(), Some(&"b"));
    assert_eq!(
        engine.data_at(1).unwrap_err(),
        EffectError::IndexOutOfRange { index: 1, count: 1 }
    );
}

/// EaseOut 通过引擎读取
#[test]
fn test_ease_out_through_engine() {
    let mut engine: AnimationEngine<()> =
        build_engine(EngineMode::Singular, 0.5, 0.5).with_effect(EffectType::EaseOut);
    engine.start_new_animation(AnimationDirection::In);

    engine.advance();
    assert_eq!(engine.progress().unwrap(), 0.75);
    engine.advance();
    assert_eq!(engine.progress().unwrap(), 1.0);
}

/// 不允许替换时，动画进行中的启动请求不改变当前实例
#[test]
fn test_start_while_animating_without_interrupt() {
    let mut engine: AnimationEngine<String> =
        build_engine(EngineMode::Singular, 0.1, 0.1).with_interrupt(false);

    engine.start_new_animation_with(AnimationDirection::In, Point::origin(), Some("hover".into()));
    engine.advance();

    let placed = engine.start_new_animation_with(
        AnimationDirection::InOutRepeatingOut,
        Point::new(9.0, 9.0),
        Some("press".into()),
    );
    assert_eq!(placed, None);
    assert_eq!(engine.direction().unwrap(), AnimationDirection::In);
    assert_eq!(engine.data().unwrap().map(String::as_str), Some("hover"));
    assert!(engine.is_animating());

    // 结束后再次启动会被接受
    while engine.is_animating() {
        engine.advance();
    }
    let placed = engine.start_new_animation_with(
        AnimationDirection::Out,
        Point::new(9.0, 9.0),
        Some("press".into()),
    );
    assert_eq!(placed, Some(0));
    assert_eq!(engine.data().unwrap().map(String::as_str), Some("press"));
}

/// 多实例模式下不允许替换时，动画进行中不会追加新实例
#[test]
fn test_multiple_without_interrupt_does_not_append() {
    let mut engine: AnimationEngine<()> =
        build_engine(EngineMode::Multiple, 0.1, 0.1).with_interrupt(false);
    engine.start_new_animation(AnimationDirection::In);
    engine.start_new_animation(AnimationDirection::Out);
    assert_eq!(engine.animation_count(), 1);
}

/// 渲染层用法：在进度通知中读取进度与起点计算涟漪半径
#[test]
fn test_ripple_render_consumer() {
    const MAX_RADIUS: f64 = 40.0;

    let frames = Rc::new(RefCell::new(Vec::new()));
    let mut engine: AnimationEngine<()> = build_engine(EngineMode::Multiple, 0.25, 0.25);

    let f = frames.clone();
    engine.on_progress(move |engine| {
        let ripples: Vec<(Point, f64)> = (0..engine.animation_count())
            .map(|i| {
                (
                    engine.source_at(i).unwrap(),
                    engine.progress_at(i).unwrap() * MAX_RADIUS,
                )
            })
            .collect();
        f.borrow_mut().push(ripples);
    });

    engine.start_new_animation_at(AnimationDirection::In, (10.0, 20.0));
    while engine.is_animating() {
        engine.advance();
    }

    let frames = frames.borrow();
    assert_eq!(frames.len(), 4);
    assert_eq!(frames[0], vec![(Point::new(10.0, 20.0), 10.0)]);
    assert_eq!(frames[2], vec![(Point::new(10.0, 20.0), 30.0)]);
    // 最后一帧实例已被清除
    assert!(frames[3].is_empty());
}
