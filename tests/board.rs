mod tests {
    use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
    use piglow_animator::board::DEFAULT_I2C_ADDRESS;
    use piglow_animator::{
        Arm, BoardConfig, BoardError, Color, DeviceSink, LED_COUNT, Led, LedRegistry, PiGlow,
    };

    #[derive(Default)]
    struct FakeBus {
        writes: Vec<(u8, Vec<u8>)>,
        fail: bool,
    }

    impl ErrorType for FakeBus {
        type Error = ErrorKind;
    }

    impl I2c for FakeBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            for operation in operations {
                if let Operation::Write(bytes) = operation {
                    self.writes.push((address, bytes.to_vec()));
                }
            }
            Ok(())
        }
    }

    fn board() -> PiGlow<FakeBus> {
        PiGlow::new(FakeBus::default(), BoardConfig::DEFAULT)
    }

    #[test]
    fn test_enable_sequence() {
        let mut board = board();
        board.enable().unwrap();

        let bus = board.release();
        let expected = [
            vec![0x00, 0x01],
            vec![0x13, 0xFF],
            vec![0x14, 0xFF],
            vec![0x15, 0xFF],
        ];
        assert_eq!(bus.writes.len(), expected.len());
        for ((address, bytes), expected) in bus.writes.iter().zip(expected) {
            assert_eq!(*address, DEFAULT_I2C_ADDRESS);
            assert_eq!(*bytes, expected);
        }
    }

    #[test]
    fn test_update_writes_all_registers_then_latches() {
        static LEDS: LedRegistry = LedRegistry::new();
        LEDS.set(Led::find(Arm::Left, Color::Red), 9);
        LEDS.set(Led::find(Arm::Right, Color::Red), 200);

        let mut board = board();
        board.update(&LEDS).unwrap();

        let bus = board.release();
        assert_eq!(bus.writes.len(), 2);
        let frame = &bus.writes[0].1;
        assert_eq!(frame.len(), LED_COUNT + 1);
        assert_eq!(frame[0], 0x01);
        assert_eq!(frame[1], 9);
        assert_eq!(frame[LED_COUNT], 200);
        assert_eq!(bus.writes[1].1, vec![0x16, 0xFF]);
    }

    #[test]
    fn test_set_led_intensity() {
        static LEDS: LedRegistry = LedRegistry::new();
        let led = Led::find(Arm::Top, Color::White);

        let mut board = board();
        board.set_led_intensity(led, 77, &LEDS).unwrap();
        assert_eq!(LEDS.intensity(led), 77);

        let bus = board.release();
        assert_eq!(bus.writes[0].1, vec![10, 77]);
        assert_eq!(bus.writes[1].1, vec![0x16, 0xFF]);
    }

    #[test]
    fn test_all_off() {
        static LEDS: LedRegistry = LedRegistry::new();
        LEDS.set_all(Led::by_arm(Arm::Top).into(), 255);

        let mut board = board();
        board.all_off(&LEDS).unwrap();
        assert_eq!(LEDS.snapshot(), [0; LED_COUNT]);

        let bus = board.release();
        assert!(bus.writes[0].1[1..].iter().all(|value| *value == 0));
    }

    #[test]
    fn test_write_out_of_range() {
        let mut board = board();
        assert_eq!(board.write(0, &[1]), Err(BoardError::OutOfRange));
        assert_eq!(board.write(18, &[1, 2]), Err(BoardError::OutOfRange));
        assert_eq!(board.write(18, &[1]), Ok(()));
        assert_eq!(board.release().writes.len(), 1);
    }

    #[test]
    fn test_custom_address_and_bus_error() {
        let config = BoardConfig { address: 0x20 };
        let mut board = PiGlow::new(FakeBus::default(), config);
        board.commit().unwrap();
        let mut bus = board.release();
        assert_eq!(bus.writes[0].0, 0x20);

        bus.fail = true;
        let mut board = PiGlow::new(bus, config);
        assert_eq!(board.enable(), Err(BoardError::I2c(ErrorKind::Other)));
    }
}
