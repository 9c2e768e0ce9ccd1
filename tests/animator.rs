mod tests {
    use std::thread;

    use embassy_time::Duration;
    use piglow_animator::{
        Animator, AnimatorError, Arm, Blinker, Color, DeviceSink, FOREVER, LED_COUNT, Led,
        LedRegistry, OneShot, Termination,
    };

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[derive(Default)]
    struct RecordingSink {
        frames: Vec<Vec<u8>>,
        commits: usize,
        fail: bool,
    }

    impl DeviceSink for RecordingSink {
        type Error = &'static str;

        fn write(&mut self, start_address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
            if self.fail {
                return Err("bus error");
            }
            if start_address == 1 && bytes.len() == LED_COUNT {
                self.frames.push(bytes.to_vec());
            }
            Ok(())
        }

        fn commit(&mut self) -> Result<(), Self::Error> {
            self.commits += 1;
            Ok(())
        }
    }

    const fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn test_start_without_animations_terminates() {
        static LEDS: LedRegistry = LedRegistry::new();
        let mut animator = Animator::new(RecordingSink::default(), &LEDS);

        animator.start().unwrap();
        assert!(!animator.is_running());
        assert_eq!(
            animator.wait_for_termination(TIMEOUT),
            Ok(Termination::Finished)
        );

        let sink = animator.sink_mut().unwrap();
        assert_eq!(sink.commits, 0);
        assert!(sink.frames.is_empty());
    }

    #[test]
    fn test_runs_until_all_animations_complete() {
        static LEDS: LedRegistry = LedRegistry::new();
        let top = Led::by_arm(Arm::Top);
        let left = Led::by_arm(Arm::Left);
        let mut animator = Animator::new(RecordingSink::default(), &LEDS);
        animator.add_animation(OneShot::new(ms(0), 255, top)).unwrap();
        animator.add_animation(OneShot::new(ms(150), 128, left)).unwrap();
        animator.add_animation(OneShot::new(ms(300), 0, top)).unwrap();

        animator.start().unwrap();
        assert_eq!(
            animator.wait_for_termination(TIMEOUT),
            Ok(Termination::Finished)
        );
        assert!(!animator.is_running());

        assert!(top.iter().all(|led| LEDS.intensity(*led) == 0));
        assert!(left.iter().all(|led| LEDS.intensity(*led) == 128));

        let sink = animator.sink_mut().unwrap();
        assert_eq!(sink.commits, 3);
        assert_eq!(sink.frames.len(), 3);
        let first = &sink.frames[0];
        assert!(top.iter().all(|led| first[led.index()] == 255));
        assert!(left.iter().all(|led| first[led.index()] == 0));
    }

    #[test]
    fn test_stop_ends_endless_animation() {
        static LEDS: LedRegistry = LedRegistry::new();
        let leds = Led::by_color(Color::Green);
        let mut animator = Animator::new(RecordingSink::default(), &LEDS);
        animator
            .add_animation(Blinker::simple(ms(0), ms(20), 0, 255, FOREVER, leds).unwrap())
            .unwrap();

        animator.start().unwrap();
        assert!(animator.is_running());
        thread::sleep(std::time::Duration::from_millis(60));

        animator.stop();
        assert_eq!(
            animator.wait_for_termination(TIMEOUT),
            Ok(Termination::Finished)
        );
        assert!(!animator.is_running());
        assert!(animator.sink_mut().unwrap().commits > 0);
    }

    #[test]
    fn test_wait_times_out_while_running() {
        static LEDS: LedRegistry = LedRegistry::new();
        let mut animator = Animator::new(RecordingSink::default(), &LEDS);
        animator
            .add_animation(
                Blinker::simple(ms(0), ms(50), 0, 255, FOREVER, Led::by_arm(Arm::Right))
                    .unwrap(),
            )
            .unwrap();

        animator.start().unwrap();
        assert_eq!(
            animator.wait_for_termination(ms(20)),
            Ok(Termination::TimedOut)
        );
        assert!(animator.is_running());
        assert!(animator.sink_mut().is_none());

        animator.stop();
        assert_eq!(
            animator.wait_for_termination(TIMEOUT),
            Ok(Termination::Finished)
        );
        assert!(animator.sink_mut().is_some());
    }

    #[test]
    fn test_rejects_changes_while_running() {
        static LEDS: LedRegistry = LedRegistry::new();
        let led = Led::find(Arm::Top, Color::Red);
        let mut animator = Animator::new(RecordingSink::default(), &LEDS);
        animator
            .add_animation(Blinker::simple(ms(0), ms(50), 0, 255, FOREVER, led).unwrap())
            .unwrap();

        animator.start().unwrap();
        assert_eq!(
            animator.add_animation(OneShot::new(ms(0), 1, led)),
            Err(AnimatorError::AlreadyStarted)
        );
        assert_eq!(animator.start(), Err(AnimatorError::AlreadyStarted));

        animator.stop();
        animator.wait_for_termination(TIMEOUT).unwrap();
    }

    #[test]
    fn test_disable_while_running() {
        static LEDS: LedRegistry = LedRegistry::new();
        let top = Led::by_arm(Arm::Top);
        let left = Led::by_arm(Arm::Left);
        let mut animator = Animator::new(RecordingSink::default(), &LEDS);
        let top_id = animator
            .add_animation(OneShot::new(ms(0), 255, top))
            .unwrap();
        animator
            .add_animation(OneShot::new(ms(0), 255, left))
            .unwrap();
        animator
            .add_animation(OneShot::new(ms(100), 1, Led::find(Arm::Right, Color::Red)))
            .unwrap();

        animator.start().unwrap();
        thread::sleep(std::time::Duration::from_millis(30));
        animator.set_enabled(top_id, false).unwrap();
        assert_eq!(animator.is_enabled(top_id), Some(false));

        assert_eq!(
            animator.wait_for_termination(TIMEOUT),
            Ok(Termination::Finished)
        );
        let last = animator.sink_mut().unwrap().frames.last().unwrap().clone();
        assert!(top.iter().all(|led| last[led.index()] == 0));
        assert!(left.iter().all(|led| last[led.index()] == 255));
    }

    #[test]
    fn test_device_failure_stops_animator() {
        static LEDS: LedRegistry = LedRegistry::new();
        let sink = RecordingSink {
            fail: true,
            ..RecordingSink::default()
        };
        let mut animator = Animator::new(sink, &LEDS);
        animator
            .add_animation(
                Blinker::simple(ms(0), ms(20), 0, 255, FOREVER, Led::by_arm(Arm::Top)).unwrap(),
            )
            .unwrap();

        animator.start().unwrap();
        assert_eq!(
            animator.wait_for_termination(TIMEOUT),
            Err(AnimatorError::Device("bus error"))
        );
        assert!(!animator.is_running());
        assert_eq!(animator.sink_mut().unwrap().commits, 0);
    }

    #[test]
    fn test_restart_after_termination() {
        static LEDS: LedRegistry = LedRegistry::new();
        let led = Led::find(Arm::Left, Color::Blue);
        let mut animator = Animator::new(RecordingSink::default(), &LEDS);
        animator.add_animation(OneShot::new(ms(0), 99, led)).unwrap();

        animator.start().unwrap();
        animator.wait_for_termination(TIMEOUT).unwrap();
        animator.sink_mut().unwrap().all_off(&LEDS).unwrap();
        assert_eq!(LEDS.intensity(led), 0);

        animator.start().unwrap();
        animator.wait_for_termination(TIMEOUT).unwrap();
        assert_eq!(LEDS.intensity(led), 99);

        let sink = animator.into_sink().unwrap();
        assert_eq!(sink.frames.len(), 3);
    }

    #[test]
    fn test_set_enabled_unknown_animation() {
        static LEDS: LedRegistry = LedRegistry::new();
        let mut other = Animator::new(RecordingSink::default(), &LEDS);
        let id = other
            .add_animation(OneShot::new(ms(0), 1, Led::find(Arm::Top, Color::Red)))
            .unwrap();

        let animator = Animator::new(RecordingSink::default(), &LEDS);
        assert_eq!(
            animator.set_enabled(id, false),
            Err(AnimatorError::UnknownAnimation)
        );
        assert_eq!(animator.is_enabled(id), None);
    }
}
