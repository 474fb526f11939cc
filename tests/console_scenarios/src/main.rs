fn main() {
    println!("Run `cargo test -p console-scenarios` to execute the console scenarios.");
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use astralis_console_log::{LogFacility, NullSink, WriterSink};
    use astralis_hub_console_log::ConsoleSession;
    use astralis_protocol::{Counts, Rgb, Severity};

    fn quiet_facility() -> LogFacility {
        LogFacility::new().with_sink(NullSink)
    }

    /// `Write` handle over a shared buffer so the sink output can be read back.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn warning_reaches_sink_and_console() {
        let buf = SharedBuf::default();
        let facility = LogFacility::new().with_sink(WriterSink::new(buf.clone()));
        let session = ConsoleSession::attach(&facility);

        facility.warn("Physics", "Collision depth high");

        let output = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let hex = facility.color_of("Physics").to_hex();
        assert_eq!(
            output,
            format!("WARNING <color=#{hex}>[Physics]</color> Collision depth high\n")
        );

        let hub = session.hub();
        let visible = hub.visible_entries();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].category, "Physics");
        assert_eq!(visible[0].message, "Collision depth high");
        assert_eq!(visible[0].severity, Severity::Warning);
        assert_eq!(hub.counts().warning, 1);
    }

    #[test]
    fn disabling_category_hides_and_uncounts() {
        let facility = quiet_facility();
        let session = ConsoleSession::attach(&facility);
        facility.warn("Physics", "Collision depth high");

        let mut hub = session.hub();
        hub.set_category_enabled("Physics", false);

        assert!(hub.visible_entries().is_empty());
        assert_eq!(hub.counts().warning, 0);
        assert_eq!(hub.len(), 1);
    }

    #[test]
    fn unmatched_search_hides_but_keeps_counts() {
        let facility = quiet_facility();
        let session = ConsoleSession::attach(&facility);
        facility.warn("Physics", "Collision depth high");

        let mut hub = session.hub();
        hub.set_search_text("xyz");

        assert!(hub.visible_entries().is_empty());
        assert_eq!(hub.counts().warning, 1);
    }

    #[test]
    fn one_of_each_severity() {
        let facility = quiet_facility();
        let session = ConsoleSession::attach(&facility);

        facility.log_general("boot");
        facility.warn("AI", "path blocked");
        facility.error("Save", "slot corrupt");

        assert_eq!(
            session.hub().counts(),
            Counts {
                info: 1,
                warning: 1,
                error: 1
            }
        );
        assert_eq!(session.hub().entries()[0].category, "General");
    }

    #[test]
    fn detached_console_stops_growing() {
        let facility = quiet_facility();
        let mut session = ConsoleSession::attach(&facility);

        facility.log("UI", "a");
        facility.log("UI", "b");
        session.detach();
        facility.log("UI", "c");

        assert_eq!(session.hub().len(), 2);
        assert_eq!(facility.observer_count(), 0);
    }

    #[test]
    fn first_registration_keeps_color() {
        let facility = quiet_facility();
        let red = Rgb::new(1.0, 0.0, 0.0);

        assert!(facility.register_category("Boss", red));
        assert!(!facility.register_category("Boss", Rgb::new(0.0, 0.0, 1.0)));
        assert_eq!(facility.color_of("Boss"), red);

        // Built-in colors cannot be overridden either.
        let physics = facility.color_of("Physics");
        assert!(!facility.register_category("Physics", red));
        assert_eq!(facility.color_of("Physics"), physics);
        assert_eq!(facility.color_of("Nope"), Rgb::WHITE);
    }

    #[test]
    fn emission_order_preserved() {
        let facility = quiet_facility();
        let session = ConsoleSession::attach(&facility);

        for i in 0..50 {
            let severity = Severity::ALL[i % 3];
            facility.emit("Network", format!("packet {i}"), severity);
        }

        let hub = session.hub();
        let messages: Vec<String> = hub.entries().iter().map(|e| e.message.clone()).collect();
        let expected: Vec<String> = (0..50).map(|i| format!("packet {i}")).collect();
        assert_eq!(messages, expected);
        assert!(hub.entries().windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn clear_is_idempotent() {
        let facility = quiet_facility();
        let session = ConsoleSession::attach(&facility);
        facility.error("Combat", "boom");

        let mut hub = session.hub();
        hub.clear();
        hub.clear();

        assert!(hub.is_empty());
        assert_eq!(hub.counts(), Counts::default());
        assert!(hub.visible_entries().is_empty());
    }

    #[test]
    fn observers_outlive_a_panicking_peer() {
        let facility = quiet_facility();
        let _bad = facility.subscribe(|_| panic!("observer bug"));
        let session = ConsoleSession::attach(&facility);

        facility.log("Quest", "accepted");

        assert_eq!(session.hub().len(), 1);
    }

    #[test]
    fn captured_stack_skips_facility_frames() {
        let facility = quiet_facility();
        let session = ConsoleSession::attach(&facility);

        facility.log("Input", "pressed");

        let hub = session.hub();
        let stack = &hub.entries()[0].stack;
        let first = stack.lines().next().unwrap_or_default();
        assert!(
            !first.starts_with("astralis_console_log::"),
            "first frame belongs to the facility: {first}"
        );
    }
}
