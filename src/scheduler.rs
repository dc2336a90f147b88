//! The polling loop.
//!
//! A [`Monitor`] walks the configured sources one at a time, asks the
//! detector for updates, and pushes every new article through the
//! summarizer and the delivery channel. Failures are logged per source and
//! never stop the cycle.

use crate::api::Summarize;
use crate::config::Schedule;
use crate::detector::UpdateDetector;
use crate::fetcher::PageFetcher;
use crate::models::{Source, Update};
use crate::snapshot::SnapshotStore;
use crate::telegram::{Deliver, format_message};
use crate::utils::truncate_for_log;
use chrono::{Local, Timelike};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

/// Whether a cycle is due at `now`.
pub fn should_run(now: &impl Timelike, schedule: &Schedule) -> bool {
    now.hour() % schedule.fetch_interval_hours == 0 && now.minute() == schedule.trigger_minute
}

/// What happened to each source during one cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub delivered: Vec<Source>,
    pub unchanged: Vec<Source>,
    pub failed: Vec<Source>,
}

pub struct Monitor<F, S, Z, D> {
    detector: UpdateDetector<F, S>,
    summarizer: Z,
    delivery: D,
    sources: Vec<Source>,
}

impl<F, S, Z, D> Monitor<F, S, Z, D>
where
    F: PageFetcher,
    S: SnapshotStore,
    Z: Summarize,
    D: Deliver,
{
    pub fn new(detector: UpdateDetector<F, S>, summarizer: Z, delivery: D, sources: Vec<Source>) -> Self {
        Self {
            detector,
            summarizer,
            delivery,
            sources,
        }
    }

    /// Check every source once, in order.
    #[instrument(level = "info", skip_all)]
    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();

        for &source in &self.sources {
            match self.detector.check_for_update(source).await {
                Ok(None) => {
                    info!(%source, "No updates");
                    report.unchanged.push(source);
                }
                Ok(Some(update)) => {
                    if !update.recorded {
                        warn!(%source, link = %update.link, "Snapshot not recorded; this article may be sent again");
                    }
                    if self.publish(source, &update).await {
                        report.delivered.push(source);
                    } else {
                        report.failed.push(source);
                    }
                }
                Err(e) => {
                    error!(%source, error = %e, "Update check failed");
                    report.failed.push(source);
                }
            }
        }

        info!(
            delivered = report.delivered.len(),
            unchanged = report.unchanged.len(),
            failed = report.failed.len(),
            "{}",
            "-".repeat(60)
        );
        report
    }

    /// Summarize and deliver one update. Returns whether it was sent.
    async fn publish(&self, source: Source, update: &Update) -> bool {
        let article = update.body.to_string();
        debug!(%source, preview = %truncate_for_log(&article, 200), "New article text");

        let summary = match self.summarizer.summarize(&article).await {
            Ok(summary) => summary,
            Err(e) => {
                error!(%source, link = %update.link, error = %e, "Summarization failed");
                return false;
            }
        };

        let message = format_message(&summary, update.url.as_str());
        match self.delivery.deliver(&message).await {
            Ok(()) => {
                info!(%source, link = %update.link, "New article processed");
                true
            }
            Err(e) => {
                error!(%source, link = %update.link, error = %e, "Delivery failed");
                false
            }
        }
    }

    /// Run cycles on `schedule` forever.
    pub async fn run(&self, schedule: &Schedule) {
        info!(sources = ?self.sources, ?schedule, "News monitoring started");
        loop {
            if should_run(&Local::now(), schedule) {
                let report = self.run_cycle().await;
                if !report.failed.is_empty() {
                    warn!(failed = ?report.failed, "Some sources failed this cycle");
                }
                sleep(schedule.sleep_after_execution()).await;
            } else {
                sleep(schedule.polling_interval()).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SummarizeError;
    use crate::error::{FetchError, PersistenceError};
    use crate::models::{ArticleListing, ArticleRef};
    use crate::telegram::DeliveryError;
    use chrono::NaiveTime;
    use scraper::Html;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[test]
    fn test_should_run_on_trigger_minute_of_matching_hour() {
        let schedule = Schedule::default();
        let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();

        assert!(should_run(&at(0, 59), &schedule));
        assert!(should_run(&at(3, 59), &schedule));
        assert!(should_run(&at(21, 59), &schedule));
        assert!(!should_run(&at(3, 58), &schedule));
        assert!(!should_run(&at(4, 59), &schedule));
        assert!(!should_run(&at(12, 0), &schedule));
    }

    #[test]
    fn test_should_run_with_hourly_schedule() {
        let schedule = Schedule {
            fetch_interval_hours: 1,
            trigger_minute: 0,
            ..Schedule::default()
        };
        assert!(should_run(&NaiveTime::from_hms_opt(7, 0, 30).unwrap(), &schedule));
        assert!(!should_run(&NaiveTime::from_hms_opt(7, 1, 0).unwrap(), &schedule));
    }

    struct Pages(HashMap<&'static str, String>);

    impl PageFetcher for Pages {
        async fn fetch(&self, url: &str) -> Result<Html, FetchError> {
            self.0
                .get(url)
                .map(|html| Html::parse_document(html))
                .ok_or_else(|| FetchError::Status {
                    url: url.to_string(),
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                })
        }
    }

    #[derive(Default)]
    struct Memory(Mutex<HashMap<Source, ArticleListing>>);

    impl SnapshotStore for Memory {
        async fn load(&self, source: Source) -> Result<ArticleListing, PersistenceError> {
            Ok(self.0.lock().unwrap().get(&source).cloned().unwrap_or_default())
        }

        async fn save(&self, source: Source, listing: &[ArticleRef]) -> Result<(), PersistenceError> {
            self.0.lock().unwrap().insert(source, listing.to_vec());
            Ok(())
        }
    }

    struct Echo;

    impl Summarize for Echo {
        async fn summarize(&self, article: &str) -> Result<String, SummarizeError> {
            let headline = article.lines().next().unwrap_or_default();
            Ok(format!("**{}**\nSOURCELINK", headline.trim_start_matches("# ")))
        }
    }

    #[derive(Default)]
    struct Outbox(Mutex<Vec<String>>);

    impl Deliver for &Outbox {
        async fn deliver(&self, message: &str) -> Result<(), DeliveryError> {
            self.0.lock().unwrap().push(message.to_string());
            Ok(())
        }
    }

    fn gov_pages() -> HashMap<&'static str, String> {
        HashMap::from([
            (
                "https://www.gov.am/en/news",
                r#"<div id="content"><div class="news">
                     <strong>Cabinet sitting</strong>
                     <p class="news-date">Date: 16.03.2025</p>
                     <a href="/en/news/item/1/">more »</a>
                   </div></div>"#
                    .to_string(),
            ),
            (
                "https://www.gov.am/en/news/item/1/",
                r#"<html><head><title>Cabinet sitting</title></head><body>
                     <p style="text-align: justify;">The Government approved the budget.</p>
                   </body></html>"#
                    .to_string(),
            ),
            // MIL serves a page without its news section.
            ("https://www.mil.am/en/news", "<html><body>maintenance</body></html>".to_string()),
        ])
    }

    #[tokio::test]
    async fn test_cycle_continues_past_failing_sources() {
        let outbox = Outbox::default();
        let detector = UpdateDetector::new(Pages(gov_pages()), Memory::default());
        let monitor = Monitor::new(
            detector,
            Echo,
            &outbox,
            vec![Source::Mfa, Source::Mil, Source::Gov],
        );

        let report = monitor.run_cycle().await;

        assert_eq!(report.delivered, vec![Source::Gov]);
        assert_eq!(report.failed, vec![Source::Mfa, Source::Mil]);
        assert_eq!(
            *outbox.0.lock().unwrap(),
            vec!["*Cabinet sitting*\n[SOURCE](https://www.gov.am/en/news/item/1/)".to_string()]
        );
    }

    #[tokio::test]
    async fn test_second_cycle_sends_nothing_new() {
        let outbox = Outbox::default();
        let detector = UpdateDetector::new(Pages(gov_pages()), Memory::default());
        let monitor = Monitor::new(detector, Echo, &outbox, vec![Source::Gov]);

        monitor.run_cycle().await;
        let report = monitor.run_cycle().await;

        assert_eq!(report.unchanged, vec![Source::Gov]);
        assert_eq!(outbox.0.lock().unwrap().len(), 1);
    }
}
