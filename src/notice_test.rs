use super::*;

#[test]
fn notices_expire_after_ttl() {
    let notifier = Notifier::new(EventBus::new(), Duration::from_secs(3));
    let start = Instant::now();
    notifier.push_at(NoticeLevel::Success, "Added to wishlist", start);

    assert_eq!(notifier.active(start + Duration::from_secs(2)).len(), 1);
    assert!(notifier.active(start + Duration::from_secs(3)).is_empty());
}

#[test]
fn dismiss_removes_one_notice() {
    let notifier = Notifier::new(EventBus::new(), DEFAULT_NOTICE_TTL);
    let start = Instant::now();
    let first = notifier.push_at(NoticeLevel::Info, "one", start);
    notifier.push_at(NoticeLevel::Info, "two", start);

    assert!(notifier.dismiss(first));
    assert!(!notifier.dismiss(first));
    let active = notifier.active(start);
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].message, "two");
}

#[test]
fn push_publishes_on_bus() {
    let bus = EventBus::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let _sub = {
        let seen = Arc::clone(&seen);
        bus.subscribe(move |event| {
            if let Event::Notice(notice) = event {
                seen.lock().unwrap().push((notice.level, notice.message.clone()));
            }
        })
    };

    let notifier = Notifier::new(bus, DEFAULT_NOTICE_TTL);
    notifier.error("Network error occurred");

    assert_eq!(*seen.lock().unwrap(), vec![(NoticeLevel::Error, "Network error occurred".to_owned())]);
}

#[test]
fn latest_returns_most_recent() {
    let notifier = Notifier::new(EventBus::new(), DEFAULT_NOTICE_TTL);
    assert!(notifier.latest().is_none());
    notifier.info("first");
    notifier.warning("second");
    let latest = notifier.latest().unwrap();
    assert_eq!(latest.level, NoticeLevel::Warning);
    assert_eq!(latest.message, "second");
}
