use attrlog::attr::{Attr, Level};
use attrlog::capture::capture_records;
use attrlog::check::{has_attr, in_group};
use attrlog::handler::{AttrHandlerOptions, CaptureRecord, HandlerOptions, Logger, Record};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn records_in_logging_order() {
    let (records, result) = capture_records(None, |h| {
        let logger = Logger::new(h);
        logger.info("one", [Attr::int("n", 1)]);
        logger.with_group("G").error("two", [Attr::int("n", 2)]);
        Ok(())
    });
    result.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].message, "one");
    assert_eq!(records[1].level, Level::ERROR);
    has_attr(Attr::int("n", 1))(records[0].attrs()).unwrap();
    in_group("G", [has_attr(Attr::int("n", 2))])(records[1].attrs()).unwrap();
}

#[test]
fn default_options_filter_debug() {
    let (records, result) = capture_records(Some(AttrHandlerOptions::default()), |h| {
        let logger = Logger::new(h);
        logger.debug("hidden", []);
        logger.info("shown", []);
        Ok(())
    });
    result.unwrap();
    let msgs: Vec<&str> = records.iter().map(|r| r.message.as_str()).collect();
    assert_eq!(msgs, vec!["shown"]);
}

#[test]
fn handler_level_is_honored() {
    let opts = AttrHandlerOptions {
        handler: HandlerOptions {
            level: Level::WARN,
            ..Default::default()
        },
        capture_record: None,
    };
    let (records, result) = capture_records(Some(opts), |h| {
        let logger = Logger::new(h);
        logger.info("info", []);
        logger.warn("warn", []);
        logger.error("error", []);
        Ok(())
    });
    result.unwrap();
    let msgs: Vec<&str> = records.iter().map(|r| r.message.as_str()).collect();
    assert_eq!(msgs, vec!["warn", "error"]);
}

#[test]
fn records_are_kept_when_run_fails() {
    let (records, result) = capture_records(None, |h| {
        Logger::new(h).info("before failure", []);
        anyhow::bail!("run failed")
    });
    assert_eq!(records.len(), 1);
    assert_eq!(result.unwrap_err().to_string(), "run failed");
}

#[test]
fn user_callback_sees_each_record_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let capture: CaptureRecord = Arc::new(move |r: Record| {
        assert_eq!(r.message, "m");
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    let opts = AttrHandlerOptions {
        handler: HandlerOptions::default(),
        capture_record: Some(capture),
    };

    let (records, result) = capture_records(Some(opts), |h| {
        let logger = Logger::new(h);
        logger.info("m", []);
        logger.info("m", []);
        Ok(())
    });
    result.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn handler_can_move_to_other_threads() {
    let (records, result) = capture_records(None, |h| {
        let workers: Vec<_> = (0..4)
            .map(|i| {
                let logger = Logger::new(h.with_group(format!("w{i}")));
                std::thread::spawn(move || logger.info("work", [Attr::int("i", i)]))
            })
            .collect();
        for w in workers {
            w.join().map_err(|_| anyhow::anyhow!("worker panicked"))?;
        }
        Ok(())
    });
    result.unwrap();
    assert_eq!(records.len(), 4);
    for r in &records {
        assert_eq!(r.attrs().len(), 4, "{:?}", r.attrs());
    }
}
