mod tests {
    use myrtio_signal_light::{LightLabel, Mode, StatusRecord};

    #[test]
    fn test_exact_line_format() {
        let record = StatusRecord {
            light: LightLabel::Red,
            red: 1,
            yellow: 0,
            blue: 0,
            mode: Mode::Normal,
            brightness: 255,
        };
        let line = record.to_line().unwrap();
        assert_eq!(
            line.as_str(),
            r#"{"Light":"Red","Red":1,"Yellow":0,"Blue":0,"Mode":"Normal","Brightness":255}"#
        );
    }

    #[test]
    fn test_multi_word_labels() {
        let record = StatusRecord {
            light: LightLabel::AllBlinking,
            red: 1,
            yellow: 1,
            blue: 1,
            mode: Mode::RedOnly,
            brightness: 5,
        };
        let line = record.to_line().unwrap();
        assert_eq!(
            line.as_str(),
            r#"{"Light":"All Blinking","Red":1,"Yellow":1,"Blue":1,"Mode":"Red Only","Brightness":5}"#
        );
    }

    #[test]
    fn test_line_parses_back() {
        let record = StatusRecord {
            light: LightLabel::Off,
            red: 0,
            yellow: 0,
            blue: 0,
            mode: Mode::AllOff,
            brightness: 130,
        };
        let line = record.to_line().unwrap();
        let (parsed, _): (StatusRecord, usize) = serde_json_core::from_str(&line).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(Mode::default(), Mode::Normal);
        assert_eq!(Mode::Blink.as_str(), "Blink");
        assert_eq!(Mode::AllOff.as_str(), "All Off");
    }
}
