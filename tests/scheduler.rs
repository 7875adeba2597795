mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    use embassy_time::{Duration, Instant};
    use rgbw_light_core::arbiter::ModeArbiter;
    use rgbw_light_core::color::{Channel, ChannelQuad};
    use rgbw_light_core::effect::EffectSlot;
    use rgbw_light_core::error::{OutputError, OutputErrorKind, TickError};
    use rgbw_light_core::scheduler::{AnimationScheduler, SchedulerState, TickOutcome};
    use rgbw_light_core::{EffectId, PwmOutput};

    const PERIOD: Duration = Duration::from_millis(20);

    /// Records duty writes and fails on demand
    struct MockOutput {
        max_duty: u16,
        duties: [u16; 4],
        writes: usize,
        failures: usize,
    }

    impl MockOutput {
        fn new(max_duty: u16) -> Self {
            Self {
                max_duty,
                duties: [0; 4],
                writes: 0,
                failures: 0,
            }
        }

        fn fail_next(&mut self, count: usize) {
            self.failures = count;
        }

        fn quad(&self) -> ChannelQuad {
            let [r, g, b, w] = self.duties;
            ChannelQuad::new(r, g, b, w)
        }
    }

    impl PwmOutput for MockOutput {
        fn set_channel_duty(&mut self, channel: Channel, duty: u16) -> Result<(), OutputError> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(OutputError {
                    channel,
                    kind: OutputErrorKind::UpdateFailed,
                });
            }
            self.duties[channel.index()] = duty;
            self.writes += 1;
            Ok(())
        }

        fn max_duty(&self) -> u16 {
            self.max_duty
        }
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn running<'a>(
        arbiter: &'a ModeArbiter,
        output: &'a mut MockOutput,
    ) -> AnimationScheduler<'a, &'a mut MockOutput> {
        let mut scheduler = AnimationScheduler::with_frame_period(arbiter, output, PERIOD);
        scheduler.start();
        scheduler
    }

    fn rendered(outcome: TickOutcome) -> ChannelQuad {
        match outcome {
            TickOutcome::Rendered(quad) => quad,
            other => panic!("expected a rendered frame, got {other:?}"),
        }
    }

    #[test]
    fn test_idle_scheduler_writes_nothing() {
        let arbiter = ModeArbiter::new(255);
        let mut output = MockOutput::new(255);
        let mut scheduler = AnimationScheduler::with_frame_period(&arbiter, &mut output, PERIOD);

        assert_eq!(scheduler.state(), SchedulerState::Idle);
        let result = scheduler.tick(at(0)).unwrap();
        assert_eq!(result.outcome, TickOutcome::Stopped);
        assert_eq!(scheduler.output().writes, 0);
    }

    #[test]
    fn test_off_outputs_zero() {
        let arbiter = ModeArbiter::new(255);
        let mut output = MockOutput::new(255);
        output.duties = [9; 4];
        let mut scheduler = running(&arbiter, &mut output);

        arbiter.set_effect(EffectId::Off);
        let result = scheduler.tick(at(0)).unwrap();
        assert_eq!(result.outcome, TickOutcome::Rendered(ChannelQuad::ZERO));
        assert_eq!(scheduler.output().quad(), ChannelQuad::ZERO);
    }

    #[test]
    fn test_manual_channel_write_reaches_output() {
        let arbiter = ModeArbiter::new(255);
        let mut output = MockOutput::new(255);
        let mut scheduler = running(&arbiter, &mut output);

        arbiter.set_channel(Channel::Red, 128);
        arbiter.set_channel(Channel::Green, 0);
        arbiter.set_channel(Channel::Blue, 0);
        arbiter.set_channel(Channel::WarmWhite, 0);

        let result = scheduler.tick(at(0)).unwrap();
        assert_eq!(rendered(result.outcome), ChannelQuad::new(128, 0, 0, 0));
        assert_eq!(scheduler.output().quad(), ChannelQuad::new(128, 0, 0, 0));

        // Static output stays live on later ticks
        arbiter.set_brightness(0);
        let result = scheduler.tick(at(20)).unwrap();
        assert_eq!(rendered(result.outcome), ChannelQuad::ZERO);
    }

    #[test]
    fn test_manual_mode_holds_animation() {
        let arbiter = ModeArbiter::new(255);
        let mut output = MockOutput::new(255);
        let mut scheduler = running(&arbiter, &mut output);

        rendered(scheduler.tick(at(0)).unwrap().outcome);
        let writes = scheduler.output().writes;
        let tick = scheduler.effect_tick();

        arbiter.enable_manual_mode();
        for i in 1..10 {
            let result = scheduler.tick(at(i * 20)).unwrap();
            assert_eq!(result.outcome, TickOutcome::Held);
        }
        assert_eq!(scheduler.output().writes, writes);
        assert_eq!(scheduler.effect_tick(), tick);

        arbiter.disable_manual_mode();
        rendered(scheduler.tick(at(200)).unwrap().outcome);
        assert_eq!(scheduler.effect_tick(), tick + 1);
    }

    #[test]
    fn test_disabled_holds_animation() {
        let arbiter = ModeArbiter::new(255);
        let mut output = MockOutput::new(255);
        let mut scheduler = running(&arbiter, &mut output);

        arbiter.set_enabled(false);
        assert_eq!(scheduler.tick(at(0)).unwrap().outcome, TickOutcome::Held);
        assert_eq!(scheduler.output().writes, 0);
    }

    #[test]
    fn test_selected_effect_runs_while_connected() {
        let arbiter = ModeArbiter::new(255);
        let mut output = MockOutput::new(255);
        let mut scheduler = running(&arbiter, &mut output);

        arbiter.on_link_connected(true);
        assert_eq!(scheduler.tick(at(0)).unwrap().outcome, TickOutcome::Held);

        arbiter.set_effect(EffectId::RgbCycle);
        let quad = rendered(scheduler.tick(at(20)).unwrap().outcome);
        assert_eq!(quad, ChannelQuad::new(255, 0, 0, 0));
    }

    #[test]
    fn test_effect_switch_resets_scratch_state() {
        let arbiter = ModeArbiter::new(255);
        let mut output = MockOutput::new(255);
        let mut scheduler = running(&arbiter, &mut output);

        arbiter.set_effect(EffectId::RgbCycle);
        arbiter.set_speed(255);
        let mut now = 0;
        for _ in 0..120 {
            scheduler.tick(at(now)).unwrap();
            now += 20;
        }
        match scheduler.current_slot() {
            EffectSlot::RgbCycle(effect) => assert_eq!(effect.state(), 2),
            other => panic!("unexpected slot {other:?}"),
        }

        arbiter.set_effect(EffectId::Breathing);
        scheduler.tick(at(now)).unwrap();
        assert_eq!(scheduler.current_slot().id(), EffectId::Breathing);
        assert_eq!(scheduler.effect_tick(), 1);

        arbiter.set_effect(EffectId::RgbCycle);
        let quad = rendered(scheduler.tick(at(now + 20)).unwrap().outcome);
        assert_eq!(quad, ChannelQuad::new(255, 0, 0, 0));
        match scheduler.current_slot() {
            EffectSlot::RgbCycle(effect) => assert_eq!(effect.state(), 0),
            other => panic!("unexpected slot {other:?}"),
        }
    }

    #[test]
    fn test_reselecting_effect_restarts_it() {
        let arbiter = ModeArbiter::new(255);
        let mut output = MockOutput::new(255);
        let mut scheduler = running(&arbiter, &mut output);

        arbiter.set_effect(EffectId::SmoothFade);
        for i in 0..10 {
            scheduler.tick(at(i * 20)).unwrap();
        }
        assert_eq!(scheduler.effect_tick(), 10);

        arbiter.set_effect(EffectId::SmoothFade);
        scheduler.tick(at(200)).unwrap();
        assert_eq!(scheduler.effect_tick(), 1);
    }

    #[test]
    fn test_invalid_effect_does_not_disturb_animation() {
        let arbiter = ModeArbiter::new(255);
        let mut output = MockOutput::new(255);
        let mut scheduler = running(&arbiter, &mut output);

        for i in 0..5 {
            scheduler.tick(at(i * 20)).unwrap();
        }
        assert!(arbiter.set_effect_raw(99).is_err());
        scheduler.tick(at(100)).unwrap();
        assert_eq!(scheduler.effect_tick(), 6);
        assert_eq!(scheduler.current_slot().id(), EffectId::SmoothFade);
    }

    #[test]
    fn test_write_failure_holds_state_and_retries() {
        let arbiter = ModeArbiter::new(255);
        let mut output = MockOutput::new(255);
        let mut scheduler = running(&arbiter, &mut output);

        arbiter.set_effect(EffectId::RgbCycle);
        arbiter.set_speed(255);
        for i in 0..3 {
            scheduler.tick(at(i * 20)).unwrap();
        }
        let last = scheduler.last_output();
        let tick = scheduler.effect_tick();

        scheduler.output_mut().fail_next(1);
        let err = scheduler.tick(at(60)).unwrap_err();
        assert_eq!(
            err,
            TickError::Output(OutputError {
                channel: Channel::Red,
                kind: OutputErrorKind::UpdateFailed,
            })
        );
        assert_eq!(scheduler.last_output(), last);
        assert_eq!(scheduler.effect_tick(), tick);
        assert!(scheduler.is_running());

        rendered(scheduler.tick(at(80)).unwrap().outcome);
        assert_eq!(scheduler.effect_tick(), tick + 1);
    }

    #[test]
    fn test_stop_writes_zero_and_is_idempotent() {
        let arbiter = ModeArbiter::new(255);
        let mut output = MockOutput::new(255);
        let mut scheduler = running(&arbiter, &mut output);

        arbiter.set_channel(Channel::Blue, 255);
        scheduler.tick(at(0)).unwrap();
        assert_ne!(scheduler.output().quad(), ChannelQuad::ZERO);

        scheduler.stop().unwrap();
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.output().quad(), ChannelQuad::ZERO);
        assert_eq!(scheduler.last_output(), Some(ChannelQuad::ZERO));

        let writes = scheduler.output().writes;
        scheduler.stop().unwrap();
        assert_eq!(scheduler.output().writes, writes);

        assert_eq!(scheduler.tick(at(20)).unwrap().outcome, TickOutcome::Stopped);
        assert_eq!(scheduler.output().writes, writes);
    }

    #[test]
    fn test_failed_stop_write_is_retried_by_stop() {
        let arbiter = ModeArbiter::new(255);
        let mut output = MockOutput::new(255);
        let mut scheduler = running(&arbiter, &mut output);

        arbiter.set_channel(Channel::Blue, 255);
        scheduler.tick(at(0)).unwrap();

        scheduler.output_mut().fail_next(1);
        assert!(scheduler.stop().is_err());
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert!(scheduler.blackout_pending());
        assert_ne!(scheduler.output().quad(), ChannelQuad::ZERO);

        scheduler.stop().unwrap();
        assert!(!scheduler.blackout_pending());
        assert_eq!(scheduler.output().quad(), ChannelQuad::ZERO);
        assert_eq!(scheduler.last_output(), Some(ChannelQuad::ZERO));
    }

    #[test]
    fn test_failed_stop_write_is_retried_by_tick() {
        let arbiter = ModeArbiter::new(255);
        let mut output = MockOutput::new(255);
        let mut scheduler = running(&arbiter, &mut output);

        arbiter.set_channel(Channel::Red, 200);
        scheduler.tick(at(0)).unwrap();

        scheduler.output_mut().fail_next(2);
        assert!(scheduler.stop().is_err());
        // Second failure lands on the first idle tick
        assert!(scheduler.tick(at(20)).is_err());
        assert_ne!(scheduler.output().quad(), ChannelQuad::ZERO);

        let result = scheduler.tick(at(40)).unwrap();
        assert_eq!(result.outcome, TickOutcome::Stopped);
        assert_eq!(scheduler.output().quad(), ChannelQuad::ZERO);

        let writes = scheduler.output().writes;
        scheduler.tick(at(60)).unwrap();
        scheduler.stop().unwrap();
        assert_eq!(scheduler.output().writes, writes);
    }

    #[test]
    fn test_restart_restarts_effect() {
        let arbiter = ModeArbiter::new(255);
        let mut output = MockOutput::new(255);
        let mut scheduler = running(&arbiter, &mut output);

        for i in 0..5 {
            scheduler.tick(at(i * 20)).unwrap();
        }
        scheduler.stop().unwrap();
        scheduler.start();
        scheduler.tick(at(200)).unwrap();
        assert_eq!(scheduler.effect_tick(), 1);
    }

    #[test]
    fn test_frame_pacing() {
        let arbiter = ModeArbiter::new(255);
        let mut output = MockOutput::new(255);
        let mut scheduler = running(&arbiter, &mut output);

        let result = scheduler.tick(at(0)).unwrap();
        assert_eq!(result.next_deadline, at(20));
        assert_eq!(result.sleep_duration, Duration::from_millis(20));

        let result = scheduler.tick(at(25)).unwrap();
        assert_eq!(result.next_deadline, at(40));
        assert_eq!(result.sleep_duration, Duration::from_millis(15));
    }

    #[test]
    fn test_drift_correction_skips_backlog() {
        let arbiter = ModeArbiter::new(255);
        let mut output = MockOutput::new(255);
        let mut scheduler = running(&arbiter, &mut output);

        scheduler.tick(at(0)).unwrap();
        let result = scheduler.tick(at(1000)).unwrap();
        assert_eq!(result.next_deadline, at(1020));
        assert_eq!(result.sleep_duration, PERIOD);
    }

    #[test]
    fn test_seeded_schedulers_agree() {
        let arbiter = ModeArbiter::new(255);
        arbiter.set_effect(EffectId::CandleFlicker);

        let mut out_a = MockOutput::new(255);
        let mut out_b = MockOutput::new(255);
        let mut a = AnimationScheduler::with_frame_period(&arbiter, &mut out_a, PERIOD).with_seed(7);
        let mut b = AnimationScheduler::with_frame_period(&arbiter, &mut out_b, PERIOD).with_seed(7);
        a.start();
        b.start();

        for i in 0..50 {
            let frame_a = a.tick(at(i * 20)).unwrap().outcome;
            let frame_b = b.tick(at(i * 20)).unwrap().outcome;
            assert_eq!(frame_a, frame_b);
        }
    }

    #[test]
    fn test_concurrent_control_never_animates_in_manual_mode() {
        static ARBITER: ModeArbiter = ModeArbiter::new(255);
        static DONE: AtomicBool = AtomicBool::new(false);

        let writer = thread::spawn(|| {
            for i in 0..5000u32 {
                match i % 5 {
                    0 => ARBITER.on_link_connected(true),
                    1 => ARBITER.set_channel(Channel::Green, i as u8),
                    2 => ARBITER.set_effect(EffectId::RgbCycle),
                    3 => ARBITER.on_link_connected(false),
                    _ => ARBITER.set_effect(EffectId::Off),
                }
            }
            ARBITER.on_link_connected(true);
            ARBITER.set_color(ChannelQuad::ZERO);
            ARBITER.set_channel(Channel::Red, 12);
            ARBITER.set_channel(Channel::Blue, 34);
            DONE.store(true, Ordering::SeqCst);
        });

        let mut output = MockOutput::new(255);
        let mut scheduler = running(&ARBITER, &mut output);
        let mut now = 0;
        let mut ticks = 0;

        while !DONE.load(Ordering::SeqCst) || ticks < 100 {
            let result = scheduler.tick(at(now)).unwrap();
            now += 20;
            ticks += 1;

            let state = scheduler.last_state().unwrap();
            let id = scheduler.current_slot().id();
            assert_eq!(id, state.config.current_effect);
            match result.outcome {
                TickOutcome::Rendered(_) => assert!(
                    !state.manual_mode || id.is_manual_only(),
                    "{id:?} rendered in manual mode"
                ),
                TickOutcome::Held => assert!(!id.is_manual_only()),
                TickOutcome::Stopped => panic!("scheduler stopped"),
            }
        }
        writer.join().unwrap();

        // Last write wins on the next tick
        let quad = rendered(scheduler.tick(at(now)).unwrap().outcome);
        assert_eq!(quad, ChannelQuad::new(12, 0, 34, 0));
        assert!(scheduler.last_state().unwrap().manual_mode);
    }
}
