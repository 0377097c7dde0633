use log::LevelFilter;
use tracing_subscriber::filter::LevelFilter as SubscriberLevel;

fn subscriber_level(level: LevelFilter) -> SubscriberLevel {
    match level {
        LevelFilter::Off => SubscriberLevel::OFF,
        LevelFilter::Error => SubscriberLevel::ERROR,
        LevelFilter::Warn => SubscriberLevel::WARN,
        LevelFilter::Info => SubscriberLevel::INFO,
        LevelFilter::Debug => SubscriberLevel::DEBUG,
        LevelFilter::Trace => SubscriberLevel::TRACE,
    }
}

/// Routes `log` records to stderr so they never mix with the board on stdout.
pub fn init(level: LevelFilter) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(subscriber_level(level))
        .with_writer(std::io::stderr)
        .try_init();
}
